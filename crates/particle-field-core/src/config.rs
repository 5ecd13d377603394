use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{error::Error, fmt};

/// Viewport-width bucket used to pick particle density and interaction mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    pub const MOBILE_MAX_WIDTH: f64 = 480.0;
    pub const TABLET_MAX_WIDTH: f64 = 768.0;

    pub fn from_width(width: f64) -> Self {
        if width <= Self::MOBILE_MAX_WIDTH {
            DeviceClass::Mobile
        } else if width <= Self::TABLET_MAX_WIDTH {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    /// Inclusive `(low, high)` clamp applied to the raw `floor(width / 50)`
    /// density for this class.
    pub fn density_bounds(self) -> (u32, u32) {
        match self {
            DeviceClass::Mobile => (10, 20),
            DeviceClass::Tablet => (15, 30),
            DeviceClass::Desktop => (20, 40),
        }
    }
}

/// Particles per axis for a viewport width: `clamp(floor(width/50), low, high)`.
///
/// A zero or negative width clamps to the class floor rather than dividing
/// into nonsense; the field builder independently degenerates to an empty
/// field in that case.
pub fn density_for_width(width: f64, class: DeviceClass) -> u32 {
    let (low, high) = class.density_bounds();
    let raw = (width / 50.0).floor();
    let raw = if raw.is_finite() && raw > 0.0 {
        raw as u32
    } else {
        0
    };
    raw.clamp(low, high)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Seed for every randomness source in the engine (grid jitter, circle
    /// radii, drift targets and durations). Fixed seed ⇒ reproducible runs.
    pub seed: u64,
    /// Startup delay before pointer interaction is armed, from the host
    /// page's `--fade-duration` value. See [`parse_fade_duration`].
    pub fade_duration_secs: f64,
    /// Pointer-follow mode requires the viewport to be strictly wider than
    /// this (and no touch capability).
    pub interactive_breakpoint: f64,
    /// Quiet period before a width resize triggers a field rebuild.
    pub resize_debounce: Duration,
    /// Maximum drift displacement from a particle's origin, per axis.
    pub shift_radius: f64,
    /// Each drift segment's duration is uniform in `[min, max)` seconds.
    pub shift_duration_min_secs: f64,
    pub shift_duration_max_secs: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            fade_duration_secs: 0.0,
            interactive_breakpoint: DeviceClass::TABLET_MAX_WIDTH,
            resize_debounce: Duration::from_millis(250),
            shift_radius: 50.0,
            shift_duration_min_secs: 1.0,
            shift_duration_max_secs: 2.0,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("fade_duration_secs", self.fade_duration_secs),
            ("interactive_breakpoint", self.interactive_breakpoint),
            ("shift_radius", self.shift_radius),
            ("shift_duration_min_secs", self.shift_duration_min_secs),
            ("shift_duration_max_secs", self.shift_duration_max_secs),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteValue { field });
            }
        }
        if self.fade_duration_secs < 0.0 {
            return Err(ConfigError::NegativeValue {
                field: "fade_duration_secs",
            });
        }
        if self.shift_radius < 0.0 {
            return Err(ConfigError::NegativeValue {
                field: "shift_radius",
            });
        }
        if self.shift_duration_min_secs <= 0.0
            || self.shift_duration_max_secs < self.shift_duration_min_secs
        {
            return Err(ConfigError::InvalidShiftDurationRange {
                min: self.shift_duration_min_secs,
                max: self.shift_duration_max_secs,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonFiniteValue { field: &'static str },
    NegativeValue { field: &'static str },
    InvalidShiftDurationRange { min: f64, max: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonFiniteValue { field } => {
                write!(f, "{field} must be finite")
            }
            ConfigError::NegativeValue { field } => {
                write!(f, "{field} must be non-negative")
            }
            ConfigError::InvalidShiftDurationRange { min, max } => {
                write!(
                    f,
                    "shift duration range [{min}, {max}) must satisfy 0 < min <= max"
                )
            }
        }
    }
}

impl Error for ConfigError {}

/// Parse the host page's `--fade-duration` custom-property value (seconds).
///
/// Accepts a bare number or a CSS seconds literal like `"1.5s"`. An absent or
/// malformed value falls back to `0.0`; startup must not fail on it.
pub fn parse_fade_duration(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().trim_end_matches('s').parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_class_bucket_boundaries_are_480_and_768() {
        assert_eq!(DeviceClass::from_width(479.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_width(480.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_width(481.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_width(768.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_width(769.0), DeviceClass::Desktop);
    }

    #[test]
    fn density_stays_within_10_to_40_for_all_widths() {
        let mut width = 0.0;
        while width <= 5000.0 {
            let class = DeviceClass::from_width(width);
            let density = density_for_width(width, class);
            assert!(
                (10..=40).contains(&density),
                "width {width}: density {density} out of [10, 40]"
            );
            let (low, high) = class.density_bounds();
            assert!((low..=high).contains(&density));
            width += 7.3;
        }
    }

    #[test]
    fn density_clamps_to_class_floor_at_zero_width() {
        assert_eq!(density_for_width(0.0, DeviceClass::Mobile), 10);
        assert_eq!(density_for_width(-100.0, DeviceClass::Mobile), 10);
        assert_eq!(density_for_width(0.0, DeviceClass::Desktop), 20);
    }

    #[test]
    fn density_follows_floor_of_width_over_50_between_clamps() {
        // 800 / 50 = 16, clamped into desktop's [20, 40] => 20.
        assert_eq!(density_for_width(800.0, DeviceClass::Desktop), 20);
        // 1250 / 50 = 25, inside [20, 40].
        assert_eq!(density_for_width(1250.0, DeviceClass::Desktop), 25);
        // 2500 / 50 = 50, clamped to 40.
        assert_eq!(density_for_width(2500.0, DeviceClass::Desktop), 40);
    }

    #[test]
    fn fade_duration_parses_css_seconds_and_bare_numbers() {
        assert_eq!(parse_fade_duration(Some("1.5s")), 1.5);
        assert_eq!(parse_fade_duration(Some("2")), 2.0);
        assert_eq!(parse_fade_duration(Some("  0.25s ")), 0.25);
    }

    #[test]
    fn fade_duration_falls_back_to_zero_without_crashing() {
        assert_eq!(parse_fade_duration(None), 0.0);
        assert_eq!(parse_fade_duration(Some("")), 0.0);
        assert_eq!(parse_fade_duration(Some("fast")), 0.0);
        assert_eq!(parse_fade_duration(Some("-1s")), 0.0);
        assert_eq!(parse_fade_duration(Some("NaN")), 0.0);
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(AnimationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_inverted_shift_durations() {
        let config = AnimationConfig {
            shift_duration_min_secs: 2.0,
            shift_duration_max_secs: 1.0,
            ..AnimationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidShiftDurationRange { min: 2.0, max: 1.0 })
        );
    }

    #[test]
    fn validate_rejects_non_finite_breakpoint() {
        let config = AnimationConfig {
            interactive_breakpoint: f64::NAN,
            ..AnimationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFiniteValue {
                field: "interactive_breakpoint"
            })
        );
    }
}
