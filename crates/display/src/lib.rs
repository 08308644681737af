//! TAO Display
//!
//! Physical unit conversion and screen classification.

pub mod converter;
pub mod device;
pub mod screen;
pub mod source;

pub use converter::Unit;
pub use device::{DeviceType, Diagonal};
pub use screen::{classify, Screen, PHONE_MAX_DIAGONAL_FOR_DETERMINATION};
pub use source::{DisplayMetricsSource, ScreenBounds, ScreenDpi, StaticDisplay};

/// Screen errors
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("Invalid display metrics: {0}")]
    InvalidMetrics(String),
}
