use anyhow::anyhow;
use chrono::{Local, TimeZone};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{AppError, AppState};
use backend_domain::{GateTokenRequest, GateTokenResponse, RuntimeConfig};

const TOKEN_PREFIX: &str = "yardgate";
const TOKEN_VERSION: &str = "v1";

type HmacSha256 = Hmac<Sha256>;

/// Issues a gate token valid for the rest of the local day. The token lets
/// gate staff use the non-admin surfaces without handing out the admin token.
pub async fn issue_gate_token(
    state: &AppState,
    payload: GateTokenRequest,
) -> Result<GateTokenResponse, AppError> {
    let operator_id = normalize_required_text(payload.operator_id, "operator_id")?;
    authorize_issue(&state.config, &operator_id)?;

    let secret = state
        .config
        .gate_token_secret
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("gate_token_secret is not configured".to_string())
        })?;

    let day = Local::now().format("%Y%m%d").to_string();
    let signature = sign_gate_token(secret, &day, &operator_id)?;
    let token = format!(
        "{}.{}.{}.{}.{}",
        TOKEN_PREFIX, TOKEN_VERSION, day, operator_id, signature
    );

    Ok(GateTokenResponse {
        token,
        day,
        operator_id,
        expires_at: next_local_midnight_rfc3339()?,
    })
}

/// Accepts a token of the form `yardgate.v1.<yyyymmdd>.<operator>.<signature>`
/// signed for the current local day.
pub fn is_valid_gate_token(config: &RuntimeConfig, token: &str) -> bool {
    let Some(secret) = config
        .gate_token_secret
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    else {
        return false;
    };

    let parts: Vec<&str> = token.split('.').collect();
    let [prefix, version, day, operator, signature] = parts.as_slice() else {
        return false;
    };
    if *prefix != TOKEN_PREFIX || *version != TOKEN_VERSION || operator.is_empty() {
        return false;
    }
    if *day != Local::now().format("%Y%m%d").to_string() {
        return false;
    }
    match sign_gate_token(secret, day, operator) {
        Ok(expected) => expected == *signature,
        Err(_) => false,
    }
}

fn authorize_issue(config: &RuntimeConfig, operator_id: &str) -> Result<(), AppError> {
    if is_operator_authorized(&config.gate_admin_ids, &config.gate_operator_ids, operator_id) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

fn is_operator_authorized(
    admin_ids: &[String],
    operator_ids: &[String],
    operator_id: &str,
) -> bool {
    admin_ids.iter().any(|candidate| candidate == operator_id)
        || operator_ids.iter().any(|candidate| candidate == operator_id)
}

fn normalize_required_text(value: String, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn sign_gate_token(secret: &str, day: &str, operator_id: &str) -> Result<String, AppError> {
    let payload = format!("{}|{}|{}|{}", TOKEN_PREFIX, TOKEN_VERSION, day, operator_id);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| AppError::Internal(anyhow!("hmac init failed: {err}")))?;
    mac.update(payload.as_bytes());
    let digest = mac.finalize().into_bytes();

    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    Ok(out)
}

fn next_local_midnight_rfc3339() -> Result<String, AppError> {
    let now = Local::now();
    let next_day = now
        .date_naive()
        .succ_opt()
        .ok_or_else(|| AppError::Internal(anyhow!("failed to calculate next day")))?;
    let next_midnight = next_day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::Internal(anyhow!("failed to calculate next midnight")))?;
    let local_time = Local
        .from_local_datetime(&next_midnight)
        .single()
        .or_else(|| Local.from_local_datetime(&next_midnight).earliest())
        .ok_or_else(|| {
            AppError::Internal(anyhow!(
                "failed to resolve local timezone for next midnight"
            ))
        })?;
    Ok(local_time.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret(secret: &str) -> RuntimeConfig {
        RuntimeConfig {
            gate_token_secret: Some(secret.to_string()),
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn operator_authorization_accepts_admin_or_listed_operator() {
        let admins = vec!["supervisor_1".to_string()];
        let operators = vec!["gate_a".to_string()];
        assert!(is_operator_authorized(&admins, &operators, "supervisor_1"));
        assert!(is_operator_authorized(&admins, &operators, "gate_a"));
        assert!(!is_operator_authorized(&admins, &operators, "gate_b"));
    }

    #[test]
    fn signature_is_hex_encoded_sha256() {
        let signature = sign_gate_token("secret", "20260807", "gate_a").expect("signature");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn todays_token_round_trips_through_validation() {
        let config = config_with_secret("secret");
        let day = Local::now().format("%Y%m%d").to_string();
        let signature = sign_gate_token("secret", &day, "gate_a").expect("signature");
        let token = format!("yardgate.v1.{}.gate_a.{}", day, signature);
        assert!(is_valid_gate_token(&config, &token));
    }

    #[test]
    fn stale_or_tampered_tokens_are_rejected() {
        let config = config_with_secret("secret");
        let signature = sign_gate_token("secret", "20200101", "gate_a").expect("signature");
        let stale = format!("yardgate.v1.20200101.gate_a.{}", signature);
        assert!(!is_valid_gate_token(&config, &stale));

        let day = Local::now().format("%Y%m%d").to_string();
        let signature = sign_gate_token("other-secret", &day, "gate_a").expect("signature");
        let forged = format!("yardgate.v1.{}.gate_a.{}", day, signature);
        assert!(!is_valid_gate_token(&config, &forged));

        assert!(!is_valid_gate_token(&config, "yardgate.v1.garbage"));
    }

    #[test]
    fn validation_is_disabled_without_a_secret() {
        let config = RuntimeConfig::default();
        assert!(!is_valid_gate_token(&config, "yardgate.v1.x.y.z"));
    }
}
