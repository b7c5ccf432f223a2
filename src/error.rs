//! Error types for stormglass.
//!
//! Configuration errors are raised at construction time, asset errors travel
//! through the prop handoff, and GPU/window errors abort start-up.

use std::fmt;
use std::path::PathBuf;

/// Malformed configuration, rejected before anything is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Value is NaN or infinite.
    NotFinite { field: &'static str },
    /// Value must be strictly greater than zero.
    NotPositive { field: &'static str, value: f32 },
    /// Value must not be below zero.
    Negative { field: &'static str, value: f32 },
    /// Count or size must be non-zero.
    Empty { field: &'static str },
    /// Count exceeds what the GPU buffers can address.
    TooLarge {
        field: &'static str,
        value: usize,
        max: usize,
    },
    /// Value falls outside a closed range.
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    /// Two related values are in the wrong order (e.g. near >= far).
    Misordered {
        low: &'static str,
        high: &'static str,
    },
    /// An explicit particle violates the rain field invariants.
    InvalidParticle { index: usize, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFinite { field } => write!(f, "{} must be finite", field),
            ConfigError::NotPositive { field, value } => {
                write!(f, "{} must be > 0, got {}", field, value)
            }
            ConfigError::Negative { field, value } => {
                write!(f, "{} must be >= 0, got {}", field, value)
            }
            ConfigError::Empty { field } => write!(f, "{} must be non-zero", field),
            ConfigError::TooLarge { field, value, max } => {
                write!(f, "{} must be <= {}, got {}", field, max, value)
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{} must be in [{}, {}], got {}", field, min, max, value),
            ConfigError::Misordered { low, high } => {
                write!(f, "{} must be less than {}", low, high)
            }
            ConfigError::InvalidParticle { index, reason } => {
                write!(f, "particle {}: {}", index, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to produce the prop entity. Reported once; the prop stays absent.
#[derive(Debug)]
pub enum AssetLoadError {
    /// The glTF importer rejected the file (I/O, parse or buffer errors).
    Gltf { path: PathBuf, source: gltf::Error },
    /// The file parsed but contains no triangle geometry.
    NoGeometry { path: PathBuf },
    /// The loader stopped without delivering a result.
    LoaderVanished,
}

impl fmt::Display for AssetLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetLoadError::Gltf { path, source } => {
                write!(f, "Failed to load model {}: {}", path.display(), source)
            }
            AssetLoadError::NoGeometry { path } => {
                write!(f, "Model {} contains no triangle meshes", path.display())
            }
            AssetLoadError::LoaderVanished => {
                write!(f, "Model loader exited without reporting a result")
            }
        }
    }
}

impl std::error::Error for AssetLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetLoadError::Gltf { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Surface reports no usable texture format.
    NoSurfaceFormat,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found"),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::NoSurfaceFormat => write!(f, "Surface supports no texture formats"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that stop the application before or while it starts.
#[derive(Debug)]
pub enum AppError {
    /// Invalid configuration.
    Config(ConfigError),
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Recording output directory could not be created.
    Io(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Invalid configuration: {}", e),
            AppError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            AppError::Window(e) => write!(f, "Failed to create window: {}", e),
            AppError::Gpu(e) => write!(f, "GPU error: {}", e),
            AppError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Gpu(e) => Some(e),
            AppError::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_messages() {
        let e = ConfigError::NotPositive {
            field: "rain.count",
            value: -1.0,
        };
        assert_eq!(e.to_string(), "rain.count must be > 0, got -1");

        let e = ConfigError::Misordered {
            low: "near",
            high: "far",
        };
        assert_eq!(e.to_string(), "near must be less than far");
    }

    #[test]
    fn test_app_error_keeps_source() {
        let e = AppError::from(ConfigError::Empty { field: "rain.count" });
        assert!(e.source().is_some());
        assert!(e.to_string().contains("rain.count"));
    }
}
