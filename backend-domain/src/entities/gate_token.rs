// Gate token entity

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct GateTokenRequest {
    pub operator_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GateTokenResponse {
    pub token: String,
    pub day: String,
    pub operator_id: String,
    pub expires_at: String,
}
