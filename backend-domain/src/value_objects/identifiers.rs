// Identifier value objects

use serde::{Deserialize, Serialize};

/// A vehicle registration plate, stored uppercase with separators stripped
/// (e.g. "gj-01 xy 1234" becomes "GJ01XY1234").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruckNumber(String);

impl TruckNumber {
    pub fn normalize(raw: &str) -> Self {
        let cleaned = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Self(cleaned)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_separators_and_uppercases() {
        assert_eq!(TruckNumber::normalize("gj-01 xy 1234").as_str(), "GJ01XY1234");
        assert_eq!(TruckNumber::normalize("MH.12.AB.0001").as_str(), "MH12AB0001");
    }

    #[test]
    fn normalize_of_garbage_is_empty() {
        assert!(TruckNumber::normalize("--- ---").is_empty());
    }
}
