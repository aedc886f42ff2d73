//! Application services: envelope decoding, rendering and navigation.

pub mod envelope;
pub mod error;
pub mod navigation;
pub mod ports;
pub mod renderer;
