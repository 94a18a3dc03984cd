// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::core::rng::PathRng;
use crate::core::scene::{Instance, Scene, SceneError, Sky, TriangleMesh};
use crate::core::sensor::Sensor;
use crate::io::obj_utils;
use crate::materials;
use crate::math::constants::{Float, Vector3f, PI};
use crate::math::transform::Transform;
use crate::sensors::pinhole::PinholeCamera;

#[derive(Debug)]
pub enum SceneLoadError {
    Io(std::io::Error),
    Parse(String),
    MissingField(&'static str),
    Scene(SceneError),
}

impl From<std::io::Error> for SceneLoadError {
    fn from(err: std::io::Error) -> Self {
        SceneLoadError::Io(err)
    }
}

impl From<SceneError> for SceneLoadError {
    fn from(err: SceneError) -> Self {
        SceneLoadError::Scene(err)
    }
}

impl fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneLoadError::Io(err) => write!(f, "io error: {}", err),
            SceneLoadError::Parse(message) => write!(f, "parse error: {}", message),
            SceneLoadError::MissingField(field) => write!(f, "missing field: {}", field),
            SceneLoadError::Scene(err) => write!(f, "invalid scene: {}", err),
        }
    }
}

impl std::error::Error for SceneLoadError {}

pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneLoadError> {
    let result = load_scene_with_settings(path)?;
    Ok(result.scene)
}

pub struct SceneLoadResult {
    pub scene: Scene,
    pub sensor: Option<Box<dyn Sensor>>,
    pub samples_per_pixel: Option<u32>,
    pub sample_batches: Option<u32>,
    pub max_depth: Option<u32>,
}

pub fn load_scene_with_settings<P: AsRef<Path>>(path: P) -> Result<SceneLoadResult, SceneLoadError> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_scene(&xml, base_dir)
}

fn parse_scene(xml: &str, base_dir: &Path) -> Result<SceneLoadResult, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut defaults: HashMap<String, String> = HashMap::new();

    let mut in_sensor = false;
    let mut in_film = false;
    let mut in_sensor_transform = false;
    let mut in_shape = false;
    let mut in_shape_transform = false;
    let mut in_sky = false;

    let mut fov_deg: Option<Float> = None;
    let mut fov_slope: Option<Float> = None;
    let mut origin: Option<Vector3f> = None;
    let mut target: Option<Vector3f> = None;
    let mut up: Option<Vector3f> = None;
    let mut width: Option<usize> = None;
    let mut height: Option<usize> = None;

    let mut max_depth: Option<u32> = None;
    let mut spp: Option<u32> = None;
    let mut sample_batches: Option<u32> = None;

    let mut sky_horizon: Option<Vector3f> = None;
    let mut sky_zenith: Option<Vector3f> = None;
    let mut sky_ground: Option<Vector3f> = None;

    let mut current_shape_kind: Option<String> = None;
    let mut current_shape_filename: Option<String> = None;
    let mut current_shape_material: usize = 0;
    let mut current_shape_transform = Transform::default();
    let mut current_grid_extent: u32 = 10;
    let mut current_grid_seed: u32 = 0;

    let mut sensor_out: Option<Box<dyn Sensor>> = None;

    let mut scene = Scene::new();
    scene.set_materials(materials::standard_set());

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                match e.name().as_ref() {
                    b"default" => {
                        let mut key: Option<String> = None;
                        let mut value: Option<String> = None;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"name" => key = Some(attr.unescape_value().unwrap_or_default().to_string()),
                                b"value" => value = Some(attr.unescape_value().unwrap_or_default().to_string()),
                                _ => {}
                            }
                        }
                        if let (Some(k), Some(v)) = (key, value) {
                            defaults.insert(k, v);
                        }
                    }
                    b"integrator" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"type" {
                                let integrator_type = resolve_value(&attr.unescape_value().unwrap_or_default(), &defaults);
                                if integrator_type != "path" {
                                    return Err(SceneLoadError::Parse(format!("unsupported integrator: {}", integrator_type)));
                                }
                            }
                        }
                    }
                    b"sensor" => {
                        let mut sensor_type: Option<String> = None;
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"type" {
                                sensor_type = Some(resolve_value(&attr.unescape_value().unwrap_or_default(), &defaults));
                            }
                        }
                        in_sensor = matches!(sensor_type.as_deref(), Some("perspective"));
                    }
                    b"film" => {
                        if in_sensor {
                            in_film = true;
                        }
                    }
                    b"transform" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"name" {
                                let name = attr.unescape_value().unwrap_or_default();
                                if name.as_ref() == "to_world" {
                                    if in_sensor {
                                        in_sensor_transform = true;
                                    } else if in_shape {
                                        in_shape_transform = true;
                                    }
                                }
                            }
                        }
                    }
                    b"lookat" => {
                        if in_sensor && in_sensor_transform {
                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"origin" => origin = Some(parse_vec3(&attr.unescape_value().unwrap_or_default())?),
                                    b"target" => target = Some(parse_vec3(&attr.unescape_value().unwrap_or_default())?),
                                    b"up" => up = Some(parse_vec3(&attr.unescape_value().unwrap_or_default())?),
                                    _ => {}
                                }
                            }
                        }
                    }
                    b"translate" => {
                        if in_shape && in_shape_transform {
                            let mut x: Float = 0.0;
                            let mut y: Float = 0.0;
                            let mut z: Float = 0.0;
                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"x" => x = parse_float(&attr.unescape_value().unwrap_or_default())?,
                                    b"y" => y = parse_float(&attr.unescape_value().unwrap_or_default())?,
                                    b"z" => z = parse_float(&attr.unescape_value().unwrap_or_default())?,
                                    _ => {}
                                }
                            }
                            current_shape_transform = Transform::translate(Vector3f::new(x, y, z))
                                .compose(&current_shape_transform);
                        }
                    }
                    b"rotate" => {
                        if in_shape && in_shape_transform {
                            let mut x: Float = 0.0;
                            let mut y: Float = 0.0;
                            let mut z: Float = 0.0;
                            let mut angle_deg: Float = 0.0;
                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"x" => x = parse_float(&attr.unescape_value().unwrap_or_default())?,
                                    b"y" => y = parse_float(&attr.unescape_value().unwrap_or_default())?,
                                    b"z" => z = parse_float(&attr.unescape_value().unwrap_or_default())?,
                                    b"angle" => angle_deg = parse_float(&attr.unescape_value().unwrap_or_default())?,
                                    _ => {}
                                }
                            }
                            let axis = Vector3f::new(x, y, z);
                            if axis.norm() <= 0.0 {
                                return Err(SceneLoadError::Parse("rotate axis is zero".to_string()));
                            }
                            current_shape_transform = Transform::rotate(axis, angle_deg * PI / 180.0)
                                .compose(&current_shape_transform);
                        }
                    }
                    b"scale" => {
                        if in_shape && in_shape_transform {
                            let mut sx: Option<Float> = None;
                            let mut sy: Option<Float> = None;
                            let mut sz: Option<Float> = None;
                            let mut uniform: Option<Float> = None;
                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"x" => sx = Some(parse_float(&attr.unescape_value().unwrap_or_default())?),
                                    b"y" => sy = Some(parse_float(&attr.unescape_value().unwrap_or_default())?),
                                    b"z" => sz = Some(parse_float(&attr.unescape_value().unwrap_or_default())?),
                                    b"value" => uniform = Some(parse_float(&attr.unescape_value().unwrap_or_default())?),
                                    _ => {}
                                }
                            }
                            let scale = if let Some(u) = uniform {
                                Transform::uniform_scale(u)
                            } else {
                                Transform::scale(Vector3f::new(
                                    sx.unwrap_or(1.0), sy.unwrap_or(1.0), sz.unwrap_or(1.0)))
                            };
                            current_shape_transform = scale.compose(&current_shape_transform);
                        }
                    }
                    b"float" => {
                        if in_sensor {
                            let mut name_attr: Option<String> = None;
                            let mut value_attr: Option<String> = None;
                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"name" => name_attr = Some(attr.unescape_value().unwrap_or_default().to_string()),
                                    b"value" => value_attr = Some(resolve_value(&attr.unescape_value().unwrap_or_default(), &defaults)),
                                    _ => {}
                                }
                            }
                            if let (Some(name_attr), Some(value_attr)) = (name_attr, value_attr) {
                                if name_attr == "fov" {
                                    fov_deg = Some(parse_float(&value_attr)?);
                                }
                                if name_attr == "fov_slope" {
                                    fov_slope = Some(parse_float(&value_attr)?);
                                }
                            }
                        }
                    }
                    b"integer" => {
                        let mut name_attr: Option<String> = None;
                        let mut value_attr: Option<String> = None;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"name" => name_attr = Some(attr.unescape_value().unwrap_or_default().to_string()),
                                b"value" => value_attr = Some(resolve_value(&attr.unescape_value().unwrap_or_default(), &defaults)),
                                _ => {}
                            }
                        }
                        if let (Some(name_attr), Some(value_attr)) = (name_attr, value_attr) {
                            if in_sensor && in_film {
                                if name_attr == "width" {
                                    width = Some(parse_usize(&value_attr)?);
                                } else if name_attr == "height" {
                                    height = Some(parse_usize(&value_attr)?);
                                }
                            } else if in_shape {
                                if name_attr == "material" {
                                    current_shape_material = parse_usize(&value_attr)?;
                                } else if name_attr == "extent" {
                                    current_grid_extent = parse_u32(&value_attr)?;
                                } else if name_attr == "seed" {
                                    current_grid_seed = parse_u32(&value_attr)?;
                                }
                            } else {
                                if name_attr == "max_depth" {
                                    max_depth = Some(parse_u32(&value_attr)?);
                                } else if name_attr == "sample_count" {
                                    spp = Some(parse_u32(&value_attr)?);
                                } else if name_attr == "sample_batches" {
                                    sample_batches = Some(parse_u32(&value_attr)?);
                                }
                            }
                        }
                    }
                    b"string" => {
                        if in_shape {
                            let mut name_attr: Option<String> = None;
                            let mut value_attr: Option<String> = None;
                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"name" => name_attr = Some(attr.unescape_value().unwrap_or_default().to_string()),
                                    b"value" => value_attr = Some(resolve_value(&attr.unescape_value().unwrap_or_default(), &defaults)),
                                    _ => {}
                                }
                            }
                            if let (Some(name_attr), Some(value_attr)) = (name_attr, value_attr) {
                                if name_attr == "filename" {
                                    current_shape_filename = Some(value_attr);
                                }
                            }
                        }
                    }
                    b"rgb" => {
                        if in_sky {
                            let mut name_attr: Option<String> = None;
                            let mut value_attr: Option<String> = None;
                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"name" => name_attr = Some(attr.unescape_value().unwrap_or_default().to_string()),
                                    b"value" => value_attr = Some(resolve_value(&attr.unescape_value().unwrap_or_default(), &defaults)),
                                    _ => {}
                                }
                            }
                            if let (Some(name_attr), Some(value_attr)) = (name_attr, value_attr) {
                                if name_attr == "horizon" {
                                    sky_horizon = Some(parse_vec3(&value_attr)?);
                                } else if name_attr == "zenith" {
                                    sky_zenith = Some(parse_vec3(&value_attr)?);
                                } else if name_attr == "ground" {
                                    sky_ground = Some(parse_vec3(&value_attr)?);
                                }
                            }
                        }
                    }
                    b"emitter" => {
                        let mut emitter_type: Option<String> = None;
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"type" {
                                emitter_type = Some(resolve_value(&attr.unescape_value().unwrap_or_default(), &defaults));
                            }
                        }
                        in_sky = matches!(emitter_type.as_deref(), Some("sky"));
                        if !in_sky {
                            log::warn!("Ignoring emitter of type {:?}.", emitter_type);
                        }
                    }
                    b"shape" => {
                        let mut shape_type: Option<String> = None;
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"type" {
                                shape_type = Some(resolve_value(&attr.unescape_value().unwrap_or_default(), &defaults));
                            }
                        }
                        match shape_type.as_deref() {
                            Some("obj") | Some("obj_grid") => {
                                in_shape = true;
                                current_shape_kind = shape_type;
                                current_shape_filename = None;
                                current_shape_material = 0;
                                current_shape_transform = Transform::default();
                                current_grid_extent = 10;
                                current_grid_seed = 0;
                            }
                            _ => {
                                log::warn!("Ignoring shape of type {:?}.", shape_type);
                                in_shape = false;
                                current_shape_kind = None;
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                match e.name().as_ref() {
                    b"sensor" => {
                        if in_sensor {
                            let origin = origin.ok_or(SceneLoadError::MissingField("sensor.origin"))?;
                            let target = target.ok_or(SceneLoadError::MissingField("sensor.target"))?;
                            let up = up.ok_or(SceneLoadError::MissingField("sensor.up"))?;
                            let width = width.ok_or(SceneLoadError::MissingField("film.width"))?;
                            let height = height.ok_or(SceneLoadError::MissingField("film.height"))?;
                            let slope = match (fov_slope, fov_deg) {
                                (Some(slope), _) => slope,
                                (None, Some(deg)) => (0.5 * deg * PI / 180.0).tan(),
                                (None, None) => return Err(SceneLoadError::MissingField("sensor.fov")),
                            };

                            let camera = PinholeCamera::with_fov_slope(
                                origin, target, up, slope, width, height);
                            sensor_out = Some(Box::new(camera));
                        }

                        in_sensor = false;
                        in_film = false;
                        in_sensor_transform = false;
                    }
                    b"film" => {
                        in_film = false;
                    }
                    b"transform" => {
                        in_sensor_transform = false;
                        in_shape_transform = false;
                    }
                    b"emitter" => {
                        in_sky = false;
                    }
                    b"shape" => {
                        if in_shape {
                            let filename = current_shape_filename.take()
                                .ok_or(SceneLoadError::MissingField("shape.filename"))?;
                            let filename = if Path::new(&filename).is_absolute() {
                                filename
                            } else {
                                base_dir.join(filename).to_string_lossy().to_string()
                            };

                            let (vertices, indices) = obj_utils::load_obj_from_file(&filename)
                                .map_err(|e| SceneLoadError::Parse(format!("obj load failed: {}", e)))?;
                            let mesh_index = scene.add_mesh(TriangleMesh::new(vertices, indices)?);

                            match current_shape_kind.as_deref() {
                                Some("obj_grid") => {
                                    add_grid_instances(
                                        &mut scene,
                                        mesh_index,
                                        &current_shape_transform,
                                        current_grid_extent,
                                        current_grid_seed,
                                    );
                                }
                                _ => {
                                    scene.add_instance(Instance::new(
                                        mesh_index,
                                        current_shape_transform,
                                        current_shape_material,
                                    ));
                                }
                            }
                        }
                        in_shape = false;
                        in_shape_transform = false;
                        current_shape_kind = None;
                        current_shape_filename = None;
                        current_shape_material = 0;
                        current_shape_transform = Transform::default();
                    }
                    _ => {}
                }
            }
            Err(e) => {
                return Err(SceneLoadError::Parse(e.to_string()));
            }
            _ => {}
        }

        buf.clear();
    }

    if sky_horizon.is_some() || sky_zenith.is_some() || sky_ground.is_some() {
        let defaults = Sky::default();
        scene.set_sky(Sky {
            horizon: sky_horizon.unwrap_or(defaults.horizon),
            zenith: sky_zenith.unwrap_or(defaults.zenith),
            ground: sky_ground.unwrap_or(defaults.ground),
        });
    }

    scene.build()?;
    log::info!("Scene loaded: {} meshes, {} instances.",
               scene.meshes().len(), scene.instances().len());

    Ok(SceneLoadResult {
        scene,
        sensor: sensor_out,
        samples_per_pixel: spp,
        sample_batches,
        max_depth,
    })
}

// One mesh placed on a (2*extent+1)^2 lattice in the z = 0 plane. Each
// cell sinks the mesh by one unit, tilts it about x then y by angles
// drawn from [-0.5, 0.5), shrinks it to fit the cell, and moves it to
// its lattice position; the material id is drawn uniformly from the
// standard table. Everything is derived from `seed`, so the same seed
// always produces the same arrangement.
fn add_grid_instances(scene: &mut Scene, mesh_index: usize, outer: &Transform,
                      extent: u32, seed: u32) {
    let mut rng = PathRng::new(seed);
    let extent = extent as i32;
    for x in -extent..=extent {
        for y in -extent..=extent {
            let x_angle = rng.next_f32() - 0.5;
            let y_angle = rng.next_f32() - 0.5;
            let material = ((rng.next_f32() * 9.0) as usize).min(8);

            let transform = Transform::translate(Vector3f::new(x as Float, y as Float, 0.0))
                .compose(&Transform::uniform_scale(1.0 / 2.7))
                .compose(&Transform::rotate(Vector3f::new(0.0, 1.0, 0.0), y_angle))
                .compose(&Transform::rotate(Vector3f::new(1.0, 0.0, 0.0), x_angle))
                .compose(&Transform::translate(Vector3f::new(0.0, -1.0, 0.0)));
            scene.add_instance(Instance::new(
                mesh_index, outer.compose(&transform), material));
        }
    }
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    for (k, v) in defaults {
        out = out.replace(&format!("${}", k), v);
    }
    out
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_u32(value: &str) -> Result<u32, SceneLoadError> {
    value.parse::<u32>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_usize(value: &str) -> Result<usize, SceneLoadError> {
    value.parse::<usize>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_vec3(value: &str) -> Result<Vector3f, SceneLoadError> {
    let mut parts = value.split(',').map(|s| s.trim()).filter(|s| !s.is_empty());
    let x = parts.next().ok_or_else(|| SceneLoadError::Parse("invalid vec3".to_string()))?;
    let y = parts.next().ok_or_else(|| SceneLoadError::Parse("invalid vec3".to_string()))?;
    let z = parts.next().ok_or_else(|| SceneLoadError::Parse("invalid vec3".to_string()))?;
    Ok(Vector3f::new(parse_float(x)?, parse_float(y)?, parse_float(z)?))
}
