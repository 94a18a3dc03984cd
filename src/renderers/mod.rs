// Copyright @yucwang 2021

pub mod batch;
pub mod renderer;
