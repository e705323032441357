//! Logic Module - Feature alignment & inference
//!
//! - `features/` - input record, canonical layout, mapping, schema alignment
//! - `model/` - artifacts, scaling gate, inference engine, response composer

pub mod features;
pub mod model;
