//! Challenge ratings and their XP values
//!
//! A challenge rating is one of a fixed set: 0, 1/8, 1/4, 1/2, then 1
//! through 30. Anything else is rejected when content is parsed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Challenge rating (in eighths) -> XP
const CR_XP: [(u16, u32); 34] = [
    (0, 10),
    (1, 25),
    (2, 50),
    (4, 100),
    (8, 200),
    (16, 450),
    (24, 700),
    (32, 1100),
    (40, 1800),
    (48, 2300),
    (56, 2900),
    (64, 3900),
    (72, 5000),
    (80, 5900),
    (88, 7200),
    (96, 8400),
    (104, 10000),
    (112, 11500),
    (120, 13000),
    (128, 15000),
    (136, 18000),
    (144, 20000),
    (152, 22000),
    (160, 25000),
    (168, 33000),
    (176, 41000),
    (184, 50000),
    (192, 62000),
    (200, 75000),
    (208, 90000),
    (216, 105000),
    (224, 120000),
    (232, 135000),
    (240, 155000),
];

/// A monster's challenge rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "CrRepr", into = "f64")]
pub struct ChallengeRating {
    eighths: u16,
}

impl ChallengeRating {
    /// Look up a rating by value; `None` if it is not a valid rating
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let scaled = value * 8.0;
        let eighths = scaled.round();
        if (scaled - eighths).abs() > 1e-6 {
            return None;
        }
        let eighths = eighths as u16;
        CR_XP
            .iter()
            .any(|(e, _)| *e == eighths)
            .then_some(Self { eighths })
    }

    /// Numeric value (0.125 for CR 1/8)
    pub fn value(&self) -> f64 {
        self.eighths as f64 / 8.0
    }

    /// XP awarded for a creature of this rating
    pub fn xp(&self) -> u32 {
        CR_XP
            .iter()
            .find(|(e, _)| *e == self.eighths)
            .map(|(_, xp)| *xp)
            .unwrap_or(0)
    }

    /// Every valid rating in ascending order
    pub fn all() -> impl Iterator<Item = ChallengeRating> {
        CR_XP.iter().map(|(eighths, _)| ChallengeRating { eighths: *eighths })
    }
}

impl fmt::Display for ChallengeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.eighths {
            1 => write!(f, "1/8"),
            2 => write!(f, "1/4"),
            4 => write!(f, "1/2"),
            e => write!(f, "{}", e / 8),
        }
    }
}

impl FromStr for ChallengeRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value = match s.split_once('/') {
            Some((num, den)) => {
                let num: f64 = num.trim().parse().map_err(|_| format!("invalid challenge rating: {}", s))?;
                let den: f64 = den.trim().parse().map_err(|_| format!("invalid challenge rating: {}", s))?;
                if den == 0.0 {
                    return Err(format!("invalid challenge rating: {}", s));
                }
                num / den
            }
            None => s.parse().map_err(|_| format!("invalid challenge rating: {}", s))?,
        };
        ChallengeRating::new(value).ok_or_else(|| format!("unknown challenge rating: {}", s))
    }
}

/// Challenge ratings appear in data files as numbers or strings ("1/4")
#[derive(Deserialize)]
#[serde(untagged)]
enum CrRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<CrRepr> for ChallengeRating {
    type Error = String;

    fn try_from(repr: CrRepr) -> Result<Self, Self::Error> {
        match repr {
            CrRepr::Number(value) => ChallengeRating::new(value)
                .ok_or_else(|| format!("unknown challenge rating: {}", value)),
            CrRepr::Text(text) => text.parse(),
        }
    }
}

impl From<ChallengeRating> for f64 {
    fn from(cr: ChallengeRating) -> f64 {
        cr.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ratings() {
        assert_eq!(ChallengeRating::new(0.125).unwrap().xp(), 25);
        assert_eq!(ChallengeRating::new(4.0).unwrap().xp(), 1100);
        assert_eq!(ChallengeRating::new(30.0).unwrap().xp(), 155000);
        assert_eq!(ChallengeRating::all().count(), 34);
    }

    #[test]
    fn test_invalid_ratings() {
        assert!(ChallengeRating::new(0.3).is_none());
        assert!(ChallengeRating::new(31.0).is_none());
        assert!(ChallengeRating::new(-1.0).is_none());
        assert!(ChallengeRating::new(1.5).is_none());
    }

    #[test]
    fn test_parse_and_display() {
        let quarter: ChallengeRating = "1/4".parse().unwrap();
        assert_eq!(quarter.value(), 0.25);
        assert_eq!(quarter.to_string(), "1/4");
        assert_eq!("12".parse::<ChallengeRating>().unwrap().to_string(), "12");
        assert!("1/3".parse::<ChallengeRating>().is_err());
    }

    #[test]
    fn test_serde_forms() {
        let from_number: ChallengeRating = serde_json::from_str("0.5").unwrap();
        let from_text: ChallengeRating = serde_json::from_str("\"1/2\"").unwrap();
        assert_eq!(from_number, from_text);
        assert!(serde_json::from_str::<ChallengeRating>("0.7").is_err());
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "0.5");
    }

    #[test]
    fn test_ordering() {
        let low = ChallengeRating::new(0.25).unwrap();
        let high = ChallengeRating::new(2.0).unwrap();
        assert!(low < high);
    }
}
