// Cargo category value object

use serde::{Deserialize, Serialize};

/// The closed set of cargo categories stored in godowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CargoType {
    LSA,
    DSA,
    RBC,
}

impl CargoType {
    pub const ALL: [CargoType; 3] = [CargoType::LSA, CargoType::DSA, CargoType::RBC];

    pub fn as_str(&self) -> &'static str {
        match self {
            CargoType::LSA => "LSA",
            CargoType::DSA => "DSA",
            CargoType::RBC => "RBC",
        }
    }

    /// Case-insensitive tag match. Unrecognized tags yield `None` so callers
    /// drop them from aggregation instead of coercing into a bucket.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "LSA" => Some(CargoType::LSA),
            "DSA" => Some(CargoType::DSA),
            "RBC" => Some(CargoType::RBC),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(CargoType::parse("lsa"), Some(CargoType::LSA));
        assert_eq!(CargoType::parse(" Dsa "), Some(CargoType::DSA));
        assert_eq!(CargoType::parse("RBC"), Some(CargoType::RBC));
    }

    #[test]
    fn parse_rejects_unknown_tags() {
        assert_eq!(CargoType::parse(""), None);
        assert_eq!(CargoType::parse("WHEAT"), None);
    }
}
