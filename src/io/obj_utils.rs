// Copyright @yucwang 2026

use std::fs;
use std::path::Path;

use wavefront_obj::{obj, ParseError};
use std::fmt;

use crate::math::constants::Vector3f;

#[derive(Debug)]
pub enum ObjLoadError {
    Io(std::io::Error),
    Parse(ParseError),
    NoGeometry,
}

impl From<std::io::Error> for ObjLoadError {
    fn from(err: std::io::Error) -> Self {
        ObjLoadError::Io(err)
    }
}

impl From<ParseError> for ObjLoadError {
    fn from(err: ParseError) -> Self {
        ObjLoadError::Parse(err)
    }
}

impl fmt::Display for ObjLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjLoadError::Io(err) => write!(f, "io error: {}", err),
            ObjLoadError::Parse(err) => write!(f, "parse error: {}", err),
            ObjLoadError::NoGeometry => write!(f, "obj file contains no triangles"),
        }
    }
}

impl std::error::Error for ObjLoadError {}

/// Parses an OBJ document into a flat triangle soup: every object's
/// vertex positions concatenated into one array, with indices rebased
/// to match. Faces with more than three corners are fan-triangulated
/// first.
pub fn load_obj_from_str<S: AsRef<str>>(input: S) -> Result<(Vec<Vector3f>, Vec<u32>), ObjLoadError> {
    let triangulated = triangulate_faces(input.as_ref());
    let obj_set = obj::parse(triangulated)?;

    let mut vertices: Vec<Vector3f> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    for object in obj_set.objects {
        let base = vertices.len() as u32;
        for v in object.vertices {
            vertices.push(Vector3f::new(v.x as f32, v.y as f32, v.z as f32));
        }
        for geom in object.geometry {
            for shape in geom.shapes {
                if let obj::Primitive::Triangle(a, b, c) = shape.primitive {
                    indices.push(base + a.0 as u32);
                    indices.push(base + b.0 as u32);
                    indices.push(base + c.0 as u32);
                }
            }
        }
    }

    if indices.is_empty() {
        return Err(ObjLoadError::NoGeometry);
    }
    Ok((vertices, indices))
}

pub fn load_obj_from_file<P: AsRef<Path>>(path: P) -> Result<(Vec<Vector3f>, Vec<u32>), ObjLoadError> {
    let data = fs::read_to_string(path)?;
    load_obj_from_str(data)
}

fn triangulate_faces(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    for line in input.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("f ") || trimmed.starts_with("f\t") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() > 4 {
                let base = parts[1];
                for i in 2..(parts.len() - 1) {
                    out.push_str("f ");
                    out.push_str(base);
                    out.push(' ');
                    out.push_str(parts[i]);
                    out.push(' ');
                    out.push_str(parts[i + 1]);
                    out.push('\n');
                }
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
