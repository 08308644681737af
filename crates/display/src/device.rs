//! Device Classes
//!
//! Coarse device categories derived from the screen, and the finer diagonal
//! size buckets used in diagnostics.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Device category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Phone,
    Tablet,
    Watch,
    #[default]
    Unknown,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Phone => "PHONE",
            DeviceType::Tablet => "TABLET",
            DeviceType::Watch => "WATCH",
            DeviceType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Screen diagonal bucket, each covering `[min, max)` inches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Diagonal {
    SmallPhoneOrWatch,
    Phone2,
    Phone3,
    Phone4,
    Phone5,
    Phone6,
    Tablet7,
    Tablet8,
    Tablet9,
    Tablet10,
    Tablet11,
    Tablet12,
    TabletBig,
}

impl Diagonal {
    pub const ALL: [Diagonal; 13] = [
        Diagonal::SmallPhoneOrWatch,
        Diagonal::Phone2,
        Diagonal::Phone3,
        Diagonal::Phone4,
        Diagonal::Phone5,
        Diagonal::Phone6,
        Diagonal::Tablet7,
        Diagonal::Tablet8,
        Diagonal::Tablet9,
        Diagonal::Tablet10,
        Diagonal::Tablet11,
        Diagonal::Tablet12,
        Diagonal::TabletBig,
    ];

    /// Lower bound in inches, inclusive
    pub fn min(&self) -> f64 {
        match self {
            Diagonal::SmallPhoneOrWatch => 0.0,
            Diagonal::Phone2 => 2.0,
            Diagonal::Phone3 => 2.5,
            Diagonal::Phone4 => 3.5,
            Diagonal::Phone5 => 4.5,
            Diagonal::Phone6 => 5.5,
            Diagonal::Tablet7 => 6.5,
            Diagonal::Tablet8 => 7.5,
            Diagonal::Tablet9 => 8.5,
            Diagonal::Tablet10 => 9.5,
            Diagonal::Tablet11 => 10.5,
            Diagonal::Tablet12 => 11.5,
            Diagonal::TabletBig => 12.5,
        }
    }

    /// Upper bound in inches, exclusive
    pub fn max(&self) -> f64 {
        match self {
            Diagonal::TabletBig => f64::MAX,
            other => {
                let next = Self::ALL.iter().position(|d| d == other).map(|i| Self::ALL[i + 1]);
                next.map(|d| d.min()).unwrap_or(f64::MAX)
            }
        }
    }

    pub fn contains(&self, inches: f64) -> bool {
        inches >= self.min() && inches < self.max()
    }

    /// Bucket for a diagonal; `None` for negative or NaN input
    pub fn from_inches(inches: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.contains(inches))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Diagonal::SmallPhoneOrWatch => "SMALL_PHONE_OR_WATCH",
            Diagonal::Phone2 => "PHONE_2",
            Diagonal::Phone3 => "PHONE_3",
            Diagonal::Phone4 => "PHONE_4",
            Diagonal::Phone5 => "PHONE_5",
            Diagonal::Phone6 => "PHONE_6",
            Diagonal::Tablet7 => "TABLET_7",
            Diagonal::Tablet8 => "TABLET_8",
            Diagonal::Tablet9 => "TABLET_9",
            Diagonal::Tablet10 => "TABLET_10",
            Diagonal::Tablet11 => "TABLET_11",
            Diagonal::Tablet12 => "TABLET_12",
            Diagonal::TabletBig => "TABLET_BIG",
        }
    }
}

impl fmt::Display for Diagonal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_are_contiguous() {
        for pair in Diagonal::ALL.windows(2) {
            assert_eq!(pair[0].max(), pair[1].min());
        }
        assert_eq!(Diagonal::TabletBig.max(), f64::MAX);
    }

    #[test]
    fn test_bucket_bounds() {
        assert_eq!(Diagonal::from_inches(1.4), Some(Diagonal::SmallPhoneOrWatch));
        assert_eq!(Diagonal::from_inches(6.1), Some(Diagonal::Phone6));
        assert_eq!(Diagonal::from_inches(7.5), Some(Diagonal::Tablet8));
        assert_eq!(Diagonal::from_inches(7.49), Some(Diagonal::Tablet7));
        assert_eq!(Diagonal::from_inches(32.0), Some(Diagonal::TabletBig));
        assert_eq!(Diagonal::from_inches(-1.0), None);
        assert_eq!(Diagonal::from_inches(f64::NAN), None);
    }

    #[test]
    fn test_device_type_display() {
        assert_eq!(DeviceType::Tablet.to_string(), "TABLET");
        assert_eq!(DeviceType::default(), DeviceType::Unknown);
    }
}
