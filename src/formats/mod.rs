//! File format codecs.

pub mod heightmap;
