//! Ocean surface: immutable grid mesh plus the time-driven wave field.

mod mesh;
mod wave;

pub use mesh::{OceanGrid, Vertex};
pub use wave::{shallow_mix, wave_height, OceanUniforms, WaveField};
