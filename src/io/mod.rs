// Copyright @yucwang 2021

pub mod exr_utils;
pub mod hdr_utils;
pub mod obj_utils;
