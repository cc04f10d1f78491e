// Visit status value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitStatus {
    IN,
    OUT,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::IN => "IN",
            VisitStatus::OUT => "OUT",
        }
    }
}

impl From<&str> for VisitStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "OUT" => VisitStatus::OUT,
            _ => VisitStatus::IN,
        }
    }
}
