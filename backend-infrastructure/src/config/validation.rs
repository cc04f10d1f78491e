use anyhow::{anyhow, Result};

use backend_domain::GodownEntry;

pub fn validate_godown_registry(entries: &[GodownEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(anyhow!("godown registry is empty"));
    }
    let mut seen = std::collections::HashSet::new();
    for entry in entries {
        if entry.number == 0 {
            return Err(anyhow!("godown number must be positive"));
        }
        if !seen.insert(entry.number) {
            return Err(anyhow!("duplicate godown number {}", entry.number));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_well_formed_registry() {
        let entries = vec![
            GodownEntry { number: 1, name: Some("Main".to_string()) },
            GodownEntry { number: 2, name: None },
        ];
        assert!(validate_godown_registry(&entries).is_ok());
    }

    #[test]
    fn rejects_zero_and_duplicate_numbers() {
        let zero = vec![GodownEntry { number: 0, name: None }];
        assert!(validate_godown_registry(&zero).is_err());

        let dup = vec![
            GodownEntry { number: 2, name: None },
            GodownEntry { number: 2, name: None },
        ];
        assert!(validate_godown_registry(&dup).is_err());
    }
}
