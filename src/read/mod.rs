//! Turns text into geometries.

pub mod wkt;
