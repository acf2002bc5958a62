//! Recording length value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default recording length (10 seconds)
pub const DEFAULT_DURATION_SECS: u64 = 10;

/// Longest take accepted. The whole take is buffered as f32 in memory.
pub const MAX_DURATION_SECS: u64 = 10 * 60;

/// How long the microphone stays open for one take.
/// Always positive and at most [`MAX_DURATION_SECS`] when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    pub const fn default_duration() -> Self {
        Self::from_secs(DEFAULT_DURATION_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

/// Milliseconds per unit suffix
fn unit_millis(unit: &str) -> Option<u64> {
    match unit {
        "ms" => Some(1),
        "s" => Some(1_000),
        "m" => Some(60_000),
        _ => None,
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse `<number><unit>` groups, e.g. `30s`, `2m30s`, `1500ms`.
    /// Units are `m`, `s` and `ms`, case-insensitive, each used at most once.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason| DurationParseError {
            input: s.to_string(),
            reason,
        };

        let input = s.trim().to_lowercase();
        if input.is_empty() {
            return Err(fail("empty"));
        }

        let mut rest = input.as_str();
        let mut total: u64 = 0;
        let mut seen: Vec<&str> = Vec::new();

        while !rest.is_empty() {
            let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            if digits == 0 {
                return Err(fail("expected a number"));
            }
            let value: u64 = rest[..digits].parse().map_err(|_| fail("number too large"))?;
            rest = &rest[digits..];

            let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
            let unit = &rest[..unit_len];
            if unit.is_empty() {
                return Err(fail("missing unit"));
            }
            let scale = unit_millis(unit).ok_or_else(|| fail("unknown unit"))?;
            if seen.contains(&unit) {
                return Err(fail("unit repeated"));
            }
            seen.push(unit);
            rest = &rest[unit_len..];

            total = value
                .checked_mul(scale)
                .and_then(|ms| total.checked_add(ms))
                .ok_or_else(|| fail("too long"))?;
        }

        if total == 0 {
            return Err(fail("must be longer than zero"));
        }
        if total > MAX_DURATION_SECS * 1000 {
            return Err(fail("longer than 10m"));
        }

        Ok(Self {
            milliseconds: total,
        })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.milliseconds / 60_000;
        let seconds = (self.milliseconds / 1000) % 60;
        let millis = self.milliseconds % 1000;

        let mut wrote = false;
        if minutes > 0 {
            write!(f, "{}m", minutes)?;
            wrote = true;
        }
        if seconds > 0 {
            write!(f, "{}s", seconds)?;
            wrote = true;
        }
        if millis > 0 || !wrote {
            write!(f, "{}ms", millis)?;
        }
        Ok(())
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_units() {
        assert_eq!("30s".parse::<Duration>().unwrap().as_secs(), 30);
        assert_eq!("2m".parse::<Duration>().unwrap().as_secs(), 120);
        assert_eq!("1500ms".parse::<Duration>().unwrap().as_millis(), 1500);
    }

    #[test]
    fn parse_combined_groups() {
        assert_eq!("2m30s".parse::<Duration>().unwrap().as_secs(), 150);
        assert_eq!("1s250ms".parse::<Duration>().unwrap().as_millis(), 1250);
    }

    #[test]
    fn parse_is_lenient_about_case_and_padding() {
        assert_eq!("1M30S".parse::<Duration>().unwrap().as_secs(), 90);
        assert_eq!("  30s  ".parse::<Duration>().unwrap().as_secs(), 30);
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "30", "abc", "30x", "s", "1m1m", "5h"] {
            assert!(bad.parse::<Duration>().is_err(), "{:?} parsed", bad);
        }
    }

    #[test]
    fn parse_rejects_zero_and_overlong() {
        assert!("0s".parse::<Duration>().is_err());
        assert!("0m0s".parse::<Duration>().is_err());
        assert!("11m".parse::<Duration>().is_err());
        assert!("99999999999999999999s".parse::<Duration>().is_err());
        assert!("10m".parse::<Duration>().is_ok());
    }

    #[test]
    fn error_names_the_problem() {
        let err = "5h".parse::<Duration>().unwrap_err();
        assert_eq!(err.reason, "unknown unit");
        assert!(err.to_string().starts_with("Invalid duration \"5h\""));
    }

    #[test]
    fn display_round_trips() {
        for text in ["30s", "2m", "2m30s", "750ms", "1s250ms"] {
            let d: Duration = text.parse().unwrap();
            assert_eq!(d.to_string(), text);
        }
        assert_eq!(Duration::from_millis(0).to_string(), "0ms");
    }

    #[test]
    fn as_std_duration() {
        assert_eq!(Duration::from_secs(30).as_std(), StdDuration::from_secs(30));
    }

    #[test]
    fn default_is_ten_seconds() {
        assert_eq!(Duration::default().as_millis(), 10_000);
    }
}
