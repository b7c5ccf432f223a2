//! Stormglass library - animated ocean vignette with rain, an orbiting light
//! and an optional prop model

pub mod camera;
pub mod clock;
pub mod error;
pub mod frame;
pub mod light;
pub mod ocean;
pub mod params;
pub mod prop;
pub mod rain;
pub mod rendering;
