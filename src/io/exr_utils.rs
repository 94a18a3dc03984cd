/* Copyright 2020 @TwoCookingMice */

use crate::math::constants::Float;

use exr::prelude::*;
use std::fmt;

#[derive(Debug)]
pub enum ExrReadError {
    Read(exr::error::Error),
}

impl From<exr::error::Error> for ExrReadError {
    fn from(err: exr::error::Error) -> Self {
        ExrReadError::Read(err)
    }
}

impl fmt::Display for ExrReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExrReadError::Read(err) => write!(f, "exr read error: {}", err),
        }
    }
}

impl std::error::Error for ExrReadError {}

// Read EXR Image from file
pub fn read_exr_from_file(file_path: &str)
    -> std::result::Result<(Vec<(Float, Float, Float)>, usize, usize), ExrReadError> {
    log::info!("Starting reading OpenEXR image from: {}.", file_path);

    struct Pixels {
        width: usize,
        height: usize,
        data: Vec<(Float, Float, Float)>,
    }

    let image = read().no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _| Pixels {
                width: resolution.width(),
                height: resolution.height(),
                data: vec![(0.0, 0.0, 0.0); resolution.width() * resolution.height()],
            },
            |image, position, (r, g, b, _a): (f32, f32, f32, f32)| {
                let idx = position.y() * image.width + position.x();
                image.data[idx] = (r, g, b);
            },
        )
        .first_valid_layer()
        .all_attributes()
        .from_file(file_path)?;

    let pixels = image.layer_data.channel_data.pixels;
    log::info!("OpenEXR loaded, width = {}, height = {}.", pixels.width, pixels.height);
    Ok((pixels.data, pixels.width, pixels.height))
}

// Write EXR Image to file
pub fn write_exr_to_file(image: &std::vec::Vec<(Float, Float, Float)>,
                         width: usize,
                         height: usize,
                         file_path: &str) {
    log::info!("Starting writing openexr images: {}.", file_path);

    let write_result = write_rgb_file(file_path, width, height, |x,y| {
        (
            image[y*width+x].0,
            image[y*width+x].1,
            image[y*width+x].2
        )
    });
    match write_result {
        Ok(()) => println!("EXR written to: {}.", file_path),
        Err(e) => println!("EXR written error: {}.", e.to_string())
    }
}
