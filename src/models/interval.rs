//! Trailing window selection

use std::fmt;
use std::str::FromStr;

/// Selectable trailing windows, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    #[default]
    Minutes5,
    Minutes15,
    Minutes30,
    Minutes60,
    Minutes120,
}

impl Interval {
    pub const ALL: [Interval; 5] = [
        Interval::Minutes5,
        Interval::Minutes15,
        Interval::Minutes30,
        Interval::Minutes60,
        Interval::Minutes120,
    ];

    pub fn minutes(self) -> u32 {
        match self {
            Interval::Minutes5 => 5,
            Interval::Minutes15 => 15,
            Interval::Minutes30 => 30,
            Interval::Minutes60 => 60,
            Interval::Minutes120 => 120,
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.minutes() == minutes)
    }

    /// Comma separated list for help and error messages
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(|i| i.minutes().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.minutes())
    }
}

impl FromStr for Interval {
    type Err = String;

    /// Accepts "15" as well as "15m"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let digits = trimmed.strip_suffix('m').unwrap_or(&trimmed);

        let minutes: u32 = digits
            .parse()
            .map_err(|_| format!("Invalid interval '{}'. Choose one of: {} minutes", s, Self::choices()))?;

        Self::from_minutes(minutes)
            .ok_or_else(|| format!("Unsupported interval '{}'. Choose one of: {} minutes", s, Self::choices()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval() {
        assert_eq!("15".parse::<Interval>().unwrap(), Interval::Minutes15);
        assert_eq!("120m".parse::<Interval>().unwrap(), Interval::Minutes120);
        assert!("7".parse::<Interval>().is_err());
        assert!("abc".parse::<Interval>().is_err());
    }

    #[test]
    fn test_default_is_five_minutes() {
        assert_eq!(Interval::default().minutes(), 5);
    }
}
