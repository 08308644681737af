//! Display Metrics Source
//!
//! The raw readings the screen classifier works from. On a device these come
//! from the window manager and package manager; `StaticDisplay` serves fixed
//! values for device profiles and tests.

use serde::{Deserialize, Serialize};

/// Physical pixels per inch on each axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenDpi {
    pub xdpi: f32,
    pub ydpi: f32,
}

/// Width and height in one unit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl ScreenBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The larger of width and height
    pub fn biggest(&self) -> f32 {
        self.width.max(self.height)
    }

    /// Pythagorean diagonal of this rectangle
    pub fn diagonal(&self) -> f64 {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        (w * w + h * h).sqrt()
    }
}

/// Platform display queries
pub trait DisplayMetricsSource {
    /// Usable display area in pixels
    fn current_bounds(&self) -> ScreenBounds;

    /// Reported physical density per axis
    fn current_dpi(&self) -> ScreenDpi;

    /// Generalized density bucket, used when an axis density is missing
    fn density_dpi(&self) -> f32;

    /// UI mode reports a watch
    fn ui_mode_is_watch(&self) -> bool;

    /// Watch hardware feature is declared
    fn has_watch_feature(&self) -> bool {
        false
    }

    fn has_telephony_hardware(&self) -> bool;
}

/// Fixed display readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticDisplay {
    pub width_px: f32,
    pub height_px: f32,
    pub xdpi: f32,
    pub ydpi: f32,
    pub density_dpi: f32,
    pub watch: bool,
    pub telephony: bool,
}

impl Default for StaticDisplay {
    fn default() -> Self {
        // Pixel 6 class handset
        Self {
            width_px: 1080.0,
            height_px: 2400.0,
            xdpi: 411.0,
            ydpi: 411.0,
            density_dpi: 420.0,
            watch: false,
            telephony: true,
        }
    }
}

impl StaticDisplay {
    pub fn new(width_px: f32, height_px: f32, dpi: f32) -> Self {
        Self {
            width_px,
            height_px,
            xdpi: dpi,
            ydpi: dpi,
            density_dpi: dpi,
            ..Default::default()
        }
    }

    pub fn with_telephony(mut self, telephony: bool) -> Self {
        self.telephony = telephony;
        self
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }
}

impl DisplayMetricsSource for StaticDisplay {
    fn current_bounds(&self) -> ScreenBounds {
        ScreenBounds::new(self.width_px, self.height_px)
    }

    fn current_dpi(&self) -> ScreenDpi {
        ScreenDpi {
            xdpi: self.xdpi,
            ydpi: self.ydpi,
        }
    }

    fn density_dpi(&self) -> f32 {
        self.density_dpi
    }

    fn ui_mode_is_watch(&self) -> bool {
        self.watch
    }

    fn has_telephony_hardware(&self) -> bool {
        self.telephony
    }
}
