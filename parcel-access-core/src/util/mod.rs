pub mod duration_ops;
pub mod geo_utils;
