// Copyright @yucwang 2026

use crate::math::constants::Float;

use image::codecs::hdr::HdrEncoder;
use image::Rgb;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;

#[derive(Debug)]
pub enum HdrWriteError {
    Io(std::io::Error),
    Encode(image::ImageError),
}

impl From<std::io::Error> for HdrWriteError {
    fn from(err: std::io::Error) -> Self {
        HdrWriteError::Io(err)
    }
}

impl From<image::ImageError> for HdrWriteError {
    fn from(err: image::ImageError) -> Self {
        HdrWriteError::Encode(err)
    }
}

impl fmt::Display for HdrWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HdrWriteError::Io(err) => write!(f, "io error: {}", err),
            HdrWriteError::Encode(err) => write!(f, "hdr encode error: {}", err),
        }
    }
}

impl std::error::Error for HdrWriteError {}

// Write Radiance HDR image to file
pub fn write_hdr_to_file(image: &Vec<(Float, Float, Float)>,
                         width: usize,
                         height: usize,
                         file_path: &str) -> Result<(), HdrWriteError> {
    log::info!("Starting writing Radiance HDR image: {}.", file_path);

    let pixels: Vec<Rgb<f32>> = image.iter().map(|p| Rgb([p.0, p.1, p.2])).collect();
    let file = File::create(file_path)?;
    let encoder = HdrEncoder::new(BufWriter::new(file));
    encoder.encode(&pixels, width, height)?;

    log::info!("HDR written to: {}.", file_path);
    Ok(())
}
