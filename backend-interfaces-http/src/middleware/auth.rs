use axum::http::HeaderMap;

use backend_application::commands::gate_token_commands::is_valid_gate_token;
use backend_domain::RuntimeConfig;

/// Gate-level access: the admin token or a gate token valid today. With no
/// admin token configured the instance runs open (dev mode).
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if config.api_token.is_none() {
        return true;
    }
    let Some(bearer) = extract_bearer(headers) else {
        return false;
    };
    if matches_api_token(config, &bearer) {
        return true;
    }
    is_valid_gate_token(config, &bearer)
}

/// Admin surfaces accept only the admin token, never gate tokens.
pub fn authorize_admin(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if config.api_token.is_none() {
        return true;
    }
    extract_bearer(headers)
        .map(|bearer| matches_api_token(config, &bearer))
        .unwrap_or(false)
}

fn matches_api_token(config: &RuntimeConfig, bearer: &str) -> bool {
    config
        .api_token
        .as_deref()
        .map(|token| token == bearer)
        .unwrap_or(false)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", token)).expect("header"),
        );
        headers
    }

    fn config_with_token(token: &str) -> RuntimeConfig {
        RuntimeConfig {
            api_token: Some(token.to_string()),
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn open_instance_accepts_anything() {
        let config = RuntimeConfig::default();
        assert!(authorize(&config, &HeaderMap::new()));
        assert!(authorize_admin(&config, &HeaderMap::new()));
    }

    #[test]
    fn admin_token_passes_both_tiers() {
        let config = config_with_token("s3cret");
        let headers = headers_with("s3cret");
        assert!(authorize(&config, &headers));
        assert!(authorize_admin(&config, &headers));
    }

    #[test]
    fn wrong_or_missing_bearer_is_rejected() {
        let config = config_with_token("s3cret");
        assert!(!authorize(&config, &HeaderMap::new()));
        assert!(!authorize(&config, &headers_with("nope")));
        assert!(!authorize_admin(&config, &headers_with("nope")));
    }
}
