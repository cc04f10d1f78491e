// Godown registry entity

use serde::{Deserialize, Serialize};

/// One physical storage unit. The registry's ordered set of numbers is the
/// fixed domain of the stock ledger: events naming any other godown are
/// ignored by aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GodownEntry {
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GodownRegistryPayload {
    pub godowns: Vec<GodownEntry>,
}

pub fn godown_numbers(entries: &[GodownEntry]) -> Vec<u32> {
    entries.iter().map(|entry| entry.number).collect()
}
