//! Unit Conversion
//!
//! Fixed ratios between inches, millimetres, centimetres, twips and points,
//! plus density-independent pixels. Derived ratios are computed from the four
//! base ones so that no pair drifts from another.

use serde::{Deserialize, Serialize};

/// One inch in mm
pub const INCH_IN_MM: f32 = 25.4;

/// One mm in inches
pub const MM_IN_INCH: f32 = 1.0 / INCH_IN_MM;

/// One inch in cm
pub const INCH_IN_CM: f32 = 2.54;

/// One cm in inches
pub const CM_IN_INCH: f32 = 1.0 / INCH_IN_CM;

/// One inch in twips
pub const INCH_IN_TWIP: f32 = 1440.0;

/// One twip in inches
pub const TWIP_IN_INCH: f32 = 1.0 / INCH_IN_TWIP;

/// One inch in points
pub const INCH_IN_PT: f32 = 72.0;

/// One point in inches
pub const PT_IN_INCH: f32 = 1.0 / INCH_IN_PT;

/// One mm in twips
pub const MM_IN_TWIP: f32 = INCH_IN_TWIP / INCH_IN_MM;

/// One twip in mm
pub const TWIP_IN_MM: f32 = INCH_IN_MM / INCH_IN_TWIP;

/// One point in twips
pub const PT_IN_TWIP: f32 = INCH_IN_TWIP / INCH_IN_PT;

/// One twip in points
pub const TWIP_IN_PT: f32 = INCH_IN_PT / INCH_IN_TWIP;

/// One mm in points
pub const MM_IN_PT: f32 = INCH_IN_PT / INCH_IN_MM;

/// One point in mm
pub const PT_IN_MM: f32 = INCH_IN_MM / INCH_IN_PT;

/// Baseline density for dp, in dots per inch
pub const DP_BASELINE_DPI: f32 = 160.0;

pub fn inch_to_mm(inch: f32) -> f32 {
    inch * INCH_IN_MM
}

pub fn mm_to_inch(mm: f32) -> f32 {
    mm * MM_IN_INCH
}

pub fn inch_to_cm(inch: f32) -> f32 {
    inch * INCH_IN_CM
}

pub fn cm_to_inch(cm: f32) -> f32 {
    cm * CM_IN_INCH
}

pub fn inch_to_pt(inch: f32) -> f32 {
    inch * INCH_IN_PT
}

pub fn pt_to_inch(pt: f32) -> f32 {
    pt * PT_IN_INCH
}

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_IN_PT
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * PT_IN_MM
}

pub fn twip_to_pt(twip: f32) -> f32 {
    twip * TWIP_IN_PT
}

pub fn pt_to_twip(pt: f32) -> f32 {
    pt * PT_IN_TWIP
}

pub fn twip_to_inch(twip: f32) -> f32 {
    twip * TWIP_IN_INCH
}

pub fn inch_to_twip(inch: f32) -> f32 {
    inch * INCH_IN_TWIP
}

pub fn twip_to_mm(twip: f32) -> f32 {
    twip * TWIP_IN_MM
}

pub fn mm_to_twip(mm: f32) -> f32 {
    mm * MM_IN_TWIP
}

/// Pixels covered by `dp` density-independent pixels at the given density
pub fn dp_to_pixels(dp: f32, dpi: f32) -> f32 {
    dp * dpi / DP_BASELINE_DPI
}

/// Physical length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Inch,
    Mm,
    Cm,
    Twip,
    Pt,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Inch => "inch",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::Twip => "twip",
            Unit::Pt => "pt",
        }
    }

    /// Parse a unit name or its usual abbreviation
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "inch" | "inches" | "in" | "\"" => Some(Unit::Inch),
            "mm" | "millimeter" | "millimetre" => Some(Unit::Mm),
            "cm" | "centimeter" | "centimetre" => Some(Unit::Cm),
            "twip" | "twips" => Some(Unit::Twip),
            "pt" | "point" | "points" => Some(Unit::Pt),
            _ => None,
        }
    }

    fn to_inch(self, value: f32) -> f32 {
        match self {
            Unit::Inch => value,
            Unit::Mm => mm_to_inch(value),
            Unit::Cm => cm_to_inch(value),
            Unit::Twip => twip_to_inch(value),
            Unit::Pt => pt_to_inch(value),
        }
    }

    fn from_inch(self, inch: f32) -> f32 {
        match self {
            Unit::Inch => inch,
            Unit::Mm => inch_to_mm(inch),
            Unit::Cm => inch_to_cm(inch),
            Unit::Twip => inch_to_twip(inch),
            Unit::Pt => inch_to_pt(inch),
        }
    }
}

/// Convert between any two units
pub fn convert(value: f32, from: Unit, to: Unit) -> f32 {
    match (from, to) {
        _ if from == to => value,
        (Unit::Mm, Unit::Pt) => mm_to_pt(value),
        (Unit::Pt, Unit::Mm) => pt_to_mm(value),
        (Unit::Twip, Unit::Pt) => twip_to_pt(value),
        (Unit::Pt, Unit::Twip) => pt_to_twip(value),
        (Unit::Twip, Unit::Mm) => twip_to_mm(value),
        (Unit::Mm, Unit::Twip) => mm_to_twip(value),
        _ => to.from_inch(from.to_inch(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        let tolerance = 1e-4 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "{} is not within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    const SAMPLES: [f32; 7] = [0.0, 0.5, 1.0, 3.25, 10.0, 123.456, 2048.0];

    #[test]
    fn test_base_ratios() {
        assert_eq!(inch_to_mm(1.0), 25.4);
        assert_eq!(inch_to_cm(1.0), 2.54);
        assert_eq!(inch_to_twip(1.0), 1440.0);
        assert_eq!(inch_to_pt(1.0), 72.0);
        assert_eq!(pt_to_twip(1.0), 20.0);
    }

    #[test]
    fn test_derived_ratios_agree() {
        assert_close(MM_IN_PT, INCH_IN_MM.recip() * INCH_IN_PT);
        assert_close(mm_to_pt(25.4), 72.0);
        assert_close(mm_to_twip(25.4), 1440.0);
        assert_close(twip_to_mm(1440.0), 25.4);
    }

    #[test]
    fn test_round_trips() {
        for x in SAMPLES {
            assert_close(mm_to_inch(inch_to_mm(x)), x);
            assert_close(cm_to_inch(inch_to_cm(x)), x);
            assert_close(twip_to_pt(pt_to_twip(x)), x);
            assert_close(mm_to_pt(pt_to_mm(x)), x);
            assert_close(twip_to_mm(mm_to_twip(x)), x);
            assert_close(twip_to_inch(inch_to_twip(x)), x);
        }
    }

    #[test]
    fn test_dp_to_pixels() {
        assert_eq!(dp_to_pixels(16.0, 160.0), 16.0);
        assert_eq!(dp_to_pixels(16.0, 480.0), 48.0);
    }

    #[test]
    fn test_convert_matches_direct_functions() {
        assert_close(convert(10.0, Unit::Cm, Unit::Inch), cm_to_inch(10.0));
        assert_close(convert(10.0, Unit::Pt, Unit::Mm), pt_to_mm(10.0));
        assert_close(convert(1.0, Unit::Cm, Unit::Mm), 10.0);
        assert_eq!(convert(3.0, Unit::Twip, Unit::Twip), 3.0);
    }

    #[test]
    fn test_unit_names() {
        assert_eq!(Unit::from_name("IN"), Some(Unit::Inch));
        assert_eq!(Unit::from_name("points"), Some(Unit::Pt));
        assert_eq!(Unit::from_name("furlong"), None);
    }
}
