//! Screen Classifier
//!
//! Reads pixel bounds and density once, derives the physical size in inches
//! and millimetres, and puts the device into a [`DeviceType`].
//!
//! Every diagonal is computed from the width and height of its own unit, never
//! by converting another unit's diagonal, and classification uses the same
//! inch diagonal the getters report.

use serde::Serialize;
use tracing::{debug, info};

use crate::converter::{self, inch_to_mm};
use crate::device::{DeviceType, Diagonal};
use crate::source::{DisplayMetricsSource, ScreenBounds, ScreenDpi};
use crate::ScreenError;

/// Diagonals strictly above this are tablets
pub const PHONE_MAX_DIAGONAL_FOR_DETERMINATION: f64 = 7.5;

/// Decide the device type.
///
/// Watch detection wins over the tablet diagonal, which wins over telephony.
pub fn classify(diagonal_inch: f64, is_watch: bool, has_telephony: bool) -> DeviceType {
    if is_watch {
        DeviceType::Watch
    } else if diagonal_inch > PHONE_MAX_DIAGONAL_FOR_DETERMINATION {
        DeviceType::Tablet
    } else if has_telephony {
        DeviceType::Phone
    } else {
        DeviceType::Unknown
    }
}

fn resolve_dpi(source: &dyn DisplayMetricsSource) -> Result<ScreenDpi, ScreenError> {
    let reported = source.current_dpi();
    let fallback = source.density_dpi();

    let pick = |axis: &str, value: f32| -> Result<f32, ScreenError> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else if fallback.is_finite() && fallback > 0.0 {
            debug!("No {} density reported, using density dpi {}", axis, fallback);
            Ok(fallback)
        } else {
            Err(ScreenError::InvalidMetrics(format!(
                "{} density {} and density dpi {} are not usable",
                axis, value, fallback
            )))
        }
    };

    Ok(ScreenDpi {
        xdpi: pick("x", reported.xdpi)?,
        ydpi: pick("y", reported.ydpi)?,
    })
}

/// Screen metrics from a single reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    dpi: ScreenDpi,
    bounds_pixels: ScreenBounds,
    bounds_inch: ScreenBounds,
    bounds_mm: ScreenBounds,
    diagonal_inch: f64,
    diagonal_mm: f64,
    diagonal_pixels: f64,
    device_type: DeviceType,
}

impl Screen {
    /// Query the display and derive every metric from that one sample
    pub fn init(source: &dyn DisplayMetricsSource) -> Result<Self, ScreenError> {
        let dpi = resolve_dpi(source)?;

        let bounds_pixels = source.current_bounds();
        if !(bounds_pixels.width.is_finite()
            && bounds_pixels.height.is_finite()
            && bounds_pixels.width >= 0.0
            && bounds_pixels.height >= 0.0)
        {
            return Err(ScreenError::InvalidMetrics(format!(
                "display bounds {}x{} px",
                bounds_pixels.width, bounds_pixels.height
            )));
        }

        let bounds_inch = ScreenBounds::new(
            bounds_pixels.width / dpi.xdpi,
            bounds_pixels.height / dpi.ydpi,
        );
        let bounds_mm = ScreenBounds::new(
            inch_to_mm(bounds_inch.width),
            inch_to_mm(bounds_inch.height),
        );

        let diagonal_inch = bounds_inch.diagonal();
        let diagonal_mm = bounds_mm.diagonal();
        let diagonal_pixels = bounds_pixels.diagonal();

        let is_watch = source.ui_mode_is_watch() || source.has_watch_feature();
        let device_type = classify(diagonal_inch, is_watch, source.has_telephony_hardware());

        let screen = Self {
            dpi,
            bounds_pixels,
            bounds_inch,
            bounds_mm,
            diagonal_inch,
            diagonal_mm,
            diagonal_pixels,
            device_type,
        };

        info!("\n{}", screen.summary());
        Ok(screen)
    }

    /// Human-readable metrics block
    pub fn summary(&self) -> String {
        format!(
            "Device type:     {}\n\
             Screen diagonal: {:.2}\"\n\
             Screen width:    {:.2}\"\n\
             Screen height:   {:.2}\"\n\
             Screen width:    {:.0} px\n\
             Screen height:   {:.0} px\n\
             Screen xdpi:     {:.2} dpi\n\
             Screen ydpi:     {:.2} dpi",
            self.device_type,
            self.diagonal_inch,
            self.bounds_inch.width,
            self.bounds_inch.height,
            self.bounds_pixels.width,
            self.bounds_pixels.height,
            self.dpi.xdpi,
            self.dpi.ydpi,
        )
    }

    /// Exact physical pixels per inch in the X dimension
    pub fn xdpi(&self) -> f32 {
        self.dpi.xdpi
    }

    /// Exact physical pixels per inch in the Y dimension
    pub fn ydpi(&self) -> f32 {
        self.dpi.ydpi
    }

    pub fn dpi(&self) -> ScreenDpi {
        self.dpi
    }

    /// Width in whole pixels
    pub fn width(&self) -> u32 {
        self.bounds_pixels.width as u32
    }

    /// Height in whole pixels
    pub fn height(&self) -> u32 {
        self.bounds_pixels.height as u32
    }

    pub fn bounds_in_pixels(&self) -> ScreenBounds {
        self.bounds_pixels
    }

    pub fn bounds_in_inch(&self) -> ScreenBounds {
        self.bounds_inch
    }

    pub fn bounds_in_mm(&self) -> ScreenBounds {
        self.bounds_mm
    }

    pub fn biggest_size_in_pixels(&self) -> u32 {
        self.bounds_pixels.biggest() as u32
    }

    pub fn biggest_size_in_inch(&self) -> f32 {
        self.bounds_inch.biggest()
    }

    pub fn biggest_size_in_mm(&self) -> f32 {
        self.bounds_mm.biggest()
    }

    pub fn diagonal_inch(&self) -> f64 {
        self.diagonal_inch
    }

    pub fn diagonal_mm(&self) -> f64 {
        self.diagonal_mm
    }

    pub fn diagonal_pixels(&self) -> f64 {
        self.diagonal_pixels
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Size bucket of the inch diagonal
    pub fn diagonal_bucket(&self) -> Option<Diagonal> {
        Diagonal::from_inches(self.diagonal_inch)
    }

    pub fn is_phone(&self) -> bool {
        self.device_type == DeviceType::Phone
    }

    pub fn is_tablet(&self) -> bool {
        self.device_type == DeviceType::Tablet
    }

    pub fn is_watch(&self) -> bool {
        self.device_type == DeviceType::Watch
    }

    pub fn inch_to_pixels_x(&self, inch: f32) -> f32 {
        inch * self.dpi.xdpi
    }

    pub fn inch_to_pixels_y(&self, inch: f32) -> f32 {
        inch * self.dpi.ydpi
    }

    pub fn mm_to_pixels_x(&self, mm: f32) -> f32 {
        self.inch_to_pixels_x(converter::mm_to_inch(mm))
    }

    pub fn mm_to_pixels_y(&self, mm: f32) -> f32 {
        self.inch_to_pixels_y(converter::mm_to_inch(mm))
    }

    pub fn pixels_x_to_inch(&self, pixels: f32) -> f32 {
        pixels / self.dpi.xdpi
    }

    pub fn pixels_y_to_inch(&self, pixels: f32) -> f32 {
        pixels / self.dpi.ydpi
    }

    pub fn pixels_x_to_mm(&self, pixels: f32) -> f32 {
        inch_to_mm(self.pixels_x_to_inch(pixels))
    }

    pub fn pixels_y_to_mm(&self, pixels: f32) -> f32 {
        inch_to_mm(self.pixels_y_to_inch(pixels))
    }

    /// Convert dp to pixels on the X axis
    pub fn xdp_to_pixels(&self, dp: f32) -> f32 {
        converter::dp_to_pixels(dp, self.dpi.xdpi)
    }

    /// Convert dp to pixels on the Y axis
    pub fn ydp_to_pixels(&self, dp: f32) -> f32 {
        converter::dp_to_pixels(dp, self.dpi.ydpi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticDisplay;

    #[test]
    fn test_classification_order() {
        assert_eq!(classify(10.0, true, true), DeviceType::Watch);
        assert_eq!(classify(10.0, false, true), DeviceType::Tablet);
        assert_eq!(classify(10.0, false, false), DeviceType::Tablet);
        assert_eq!(classify(6.0, false, true), DeviceType::Phone);
        assert_eq!(classify(6.0, false, false), DeviceType::Unknown);
    }

    #[test]
    fn test_tablet_threshold_is_exclusive() {
        assert_eq!(classify(7.5, false, true), DeviceType::Phone);
        assert_eq!(classify(7.51, false, true), DeviceType::Tablet);
    }

    #[test]
    fn test_exact_threshold_display_is_phone() {
        // 4.5" x 6" at 400 dpi, diagonal exactly 7.5"
        let display = StaticDisplay::new(1800.0, 2400.0, 400.0);
        let screen = Screen::init(&display).unwrap();

        assert_eq!(screen.diagonal_inch(), 7.5);
        assert_eq!(screen.device_type(), DeviceType::Phone);
        assert_eq!(screen.diagonal_bucket(), Some(Diagonal::Tablet8));
    }

    #[test]
    fn test_diagonals_use_own_units() {
        let display = StaticDisplay::new(1080.0, 2400.0, 411.0);
        let screen = Screen::init(&display).unwrap();

        let inch = screen.bounds_in_inch();
        let (w, h) = (f64::from(inch.width), f64::from(inch.height));
        let expected_inch = (w * w + h * h).sqrt();
        assert_eq!(screen.diagonal_inch(), expected_inch);

        let mm = screen.bounds_in_mm();
        let (w, h) = (f64::from(mm.width), f64::from(mm.height));
        let expected_mm = (w * w + h * h).sqrt();
        assert_eq!(screen.diagonal_mm(), expected_mm);

        let expected_px = (1080.0f64 * 1080.0 + 2400.0 * 2400.0).sqrt();
        assert_eq!(screen.diagonal_pixels(), expected_px);

        assert!((screen.diagonal_mm() / screen.diagonal_inch() - 25.4).abs() < 1e-3);
    }

    #[test]
    fn test_large_display_is_tablet_even_with_telephony() {
        let display = StaticDisplay::new(1600.0, 2560.0, 300.0).with_telephony(true);
        let screen = Screen::init(&display).unwrap();
        assert!(screen.diagonal_inch() > PHONE_MAX_DIAGONAL_FOR_DETERMINATION);
        assert!(screen.is_tablet());
    }

    #[test]
    fn test_watch_wins() {
        let display = StaticDisplay::new(2000.0, 2000.0, 100.0).with_watch(true);
        let screen = Screen::init(&display).unwrap();
        assert!(screen.is_watch());
    }

    #[test]
    fn test_missing_axis_dpi_falls_back_to_density() {
        let display = StaticDisplay {
            xdpi: 0.0,
            ..StaticDisplay::new(1080.0, 1920.0, 480.0)
        };
        let screen = Screen::init(&display).unwrap();
        assert_eq!(screen.xdpi(), 480.0);
    }

    #[test]
    fn test_unusable_density_is_an_error() {
        let display = StaticDisplay {
            xdpi: 0.0,
            ydpi: 0.0,
            density_dpi: 0.0,
            ..Default::default()
        };
        assert!(matches!(Screen::init(&display), Err(ScreenError::InvalidMetrics(_))));
    }

    #[test]
    fn test_pixel_conversions() {
        let screen = Screen::init(&StaticDisplay::new(1000.0, 2000.0, 200.0)).unwrap();

        assert_eq!(screen.width(), 1000);
        assert_eq!(screen.biggest_size_in_pixels(), 2000);
        assert_eq!(screen.biggest_size_in_inch(), 10.0);
        assert_eq!(screen.inch_to_pixels_x(2.0), 400.0);
        assert_eq!(screen.pixels_y_to_inch(400.0), 2.0);
        assert!((screen.mm_to_pixels_x(25.4) - 200.0).abs() < 1e-3);
        assert!((screen.pixels_x_to_mm(200.0) - 25.4).abs() < 1e-4);
        assert_eq!(screen.xdp_to_pixels(160.0), 200.0);
    }

    #[test]
    fn test_summary_mentions_type() {
        let screen = Screen::init(&StaticDisplay::default()).unwrap();
        assert!(screen.summary().starts_with("Device type:     PHONE"));
    }
}
