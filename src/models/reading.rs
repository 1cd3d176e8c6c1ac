//! Numeric reading that keeps the provider's JSON representation

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A measurement as the provider wrote it.
///
/// Integers stay integers and floats stay floats, so a payload that is
/// parsed and served again keeps its exact numbers (`81` is not turned into
/// `81.0`). Use [`Reading::value`] for arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reading(Number);

impl Reading {
    /// The reading as a float
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0.as_f64().unwrap_or_default()
    }
}

impl From<i64> for Reading {
    fn from(value: i64) -> Self {
        Self(Number::from(value))
    }
}

impl From<f64> for Reading {
    /// Non-finite values have no JSON form and read as 0
    fn from(value: f64) -> Self {
        Self(Number::from_f64(value).unwrap_or_else(|| Number::from(0)))
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("81", "81")]
    #[case("11.3", "11.3")]
    #[case("10.0", "10.0")]
    #[case("-4", "-4")]
    fn test_keeps_json_representation(#[case] input: &str, #[case] expected: &str) {
        let reading: Reading = serde_json::from_str(input).unwrap();
        assert_eq!(serde_json::to_string(&reading).unwrap(), expected);
    }

    #[test]
    fn test_value_and_display() {
        assert_eq!(Reading::from(1012_i64).value(), 1012.0);
        assert_eq!(Reading::from(1012_i64).to_string(), "1012");
        assert_eq!(Reading::from(3.1).to_string(), "3.1");
        assert_eq!(Reading::from(f64::NAN).value(), 0.0);
    }
}
