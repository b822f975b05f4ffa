//! Timecode arithmetic shared by every subtitle grammar.
//!
//! All formats derive their hour/minute/second/sub-second fields from the
//! same millisecond decomposition, so a time renders identically (up to
//! precision) in SRT, WebVTT and ASS.

use std::fmt;

/// A non-negative time split into clock fields, at millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timecode {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
    pub millis: u16,
}

impl Timecode {
    /// Decompose a time in seconds, rounding to the nearest millisecond.
    ///
    /// Negative and non-finite inputs collapse to zero.
    pub fn from_secs(secs: f64) -> Self {
        let total_ms = if secs.is_finite() && secs > 0.0 {
            (secs * 1000.0).round() as u64
        } else {
            0
        };
        Self::from_millis(total_ms)
    }

    /// Decompose a whole number of milliseconds.
    pub fn from_millis(total_ms: u64) -> Self {
        Self {
            hours: total_ms / 3_600_000,
            minutes: ((total_ms % 3_600_000) / 60_000) as u8,
            seconds: ((total_ms % 60_000) / 1000) as u8,
            millis: (total_ms % 1000) as u16,
        }
    }

    /// Compose clock fields into seconds.
    pub fn from_fields(hours: u64, minutes: u64, seconds: u64, millis: u64) -> f64 {
        (hours * 3600 + minutes * 60 + seconds) as f64 + millis as f64 / 1000.0
    }

    /// Total milliseconds represented by this timecode.
    pub fn total_millis(&self) -> u64 {
        self.hours * 3_600_000
            + self.minutes as u64 * 60_000
            + self.seconds as u64 * 1000
            + self.millis as u64
    }

    /// Seconds represented by this timecode.
    pub fn as_secs(&self) -> f64 {
        self.total_millis() as f64 / 1000.0
    }

    /// Sub-second field truncated to centiseconds.
    pub fn centis(&self) -> u16 {
        self.millis / 10
    }

    /// `HH:MM:SS<sep>mmm`, used by SRT (`,`) and WebVTT (`.`).
    pub fn display_millis(&self, separator: char) -> MillisDisplay {
        MillisDisplay {
            timecode: *self,
            separator,
        }
    }

    /// `H:MM:SS.cc`, used by ASS. The hour field is not zero-padded.
    pub fn display_centis(&self) -> CentisDisplay {
        CentisDisplay { timecode: *self }
    }
}

/// Formatter returned by [`Timecode::display_millis`].
#[derive(Debug, Clone, Copy)]
pub struct MillisDisplay {
    timecode: Timecode,
    separator: char,
}

impl fmt::Display for MillisDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.timecode;
        write!(
            f,
            "{:02}:{:02}:{:02}{}{:03}",
            t.hours, t.minutes, t.seconds, self.separator, t.millis
        )
    }
}

/// Formatter returned by [`Timecode::display_centis`].
#[derive(Debug, Clone, Copy)]
pub struct CentisDisplay {
    timecode: Timecode,
}

impl fmt::Display for CentisDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.timecode;
        write!(
            f,
            "{}:{:02}:{:02}.{:02}",
            t.hours,
            t.minutes,
            t.seconds,
            t.centis()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decomposition() {
        let tc = Timecode::from_secs(3661.5);
        assert_eq!(tc.hours, 1);
        assert_eq!(tc.minutes, 1);
        assert_eq!(tc.seconds, 1);
        assert_eq!(tc.millis, 500);
    }

    #[test]
    fn test_rounds_float_noise_to_nearest_millisecond() {
        // 1.001 * 1000.0 is 1000.9999999999999 in binary floating point.
        assert_eq!(Timecode::from_secs(1.001).millis, 1);
        assert_eq!(Timecode::from_secs(0.0004).millis, 0);
    }

    #[test]
    fn test_negative_and_nan_collapse_to_zero() {
        assert_eq!(Timecode::from_secs(-3.0), Timecode::default());
        assert_eq!(Timecode::from_secs(f64::NAN), Timecode::default());
    }

    #[test]
    fn test_millis_display() {
        let tc = Timecode::from_secs(3661.5);
        assert_eq!(tc.display_millis(',').to_string(), "01:01:01,500");
        assert_eq!(tc.display_millis('.').to_string(), "01:01:01.500");
    }

    #[test]
    fn test_centis_display_truncates_and_leaves_hour_unpadded() {
        let tc = Timecode::from_secs(5.678);
        assert_eq!(tc.display_centis().to_string(), "0:00:05.67");
        let tc = Timecode::from_secs(36_000.0);
        assert_eq!(tc.display_centis().to_string(), "10:00:00.00");
    }

    #[test]
    fn test_hours_do_not_wrap_at_a_day() {
        let tc = Timecode::from_secs(25.0 * 3600.0);
        assert_eq!(tc.display_millis(',').to_string(), "25:00:00,000");
    }

    #[test]
    fn test_from_fields() {
        assert!((Timecode::from_fields(0, 1, 2, 345) - 62.345).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_millis_survive_decomposition(ms in 0u64..360_000_000) {
            let tc = Timecode::from_millis(ms);
            prop_assert_eq!(tc.total_millis(), ms);
            prop_assert_eq!(Timecode::from_secs(tc.as_secs()), tc);
        }
    }
}
