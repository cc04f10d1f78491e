use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use backend_domain::{GodownEntry, RegistryRepository};

use crate::config::validate_godown_registry;

/// YAML-file backing for the godown registry. The file lives next to the
/// config file and is rewritten whole on every save.
pub struct GodownFileRepository;

impl GodownFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GodownFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryRepository for GodownFileRepository {
    async fn load_godowns(&self, path: &str) -> anyhow::Result<Vec<GodownEntry>> {
        if !Path::new(path).exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).await?;
        let mut godowns: Vec<GodownEntry> = serde_yaml::from_str(&content)?;
        godowns.sort_by_key(|godown| godown.number);
        validate_godown_registry(&godowns)?;
        Ok(godowns)
    }

    async fn save_godowns(&self, path: &str, godowns: &[GodownEntry]) -> anyhow::Result<()> {
        validate_godown_registry(godowns)?;
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_yaml::to_string(godowns)?;
        fs::write(path, content).await?;
        Ok(())
    }
}
