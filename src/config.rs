use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

const PROJECTS_COLLECTION_VAR: &str = "LINKHUB_PROJECTS_COLLECTION";
const LINKS_COLLECTION_VAR: &str = "LINKHUB_LINKS_COLLECTION";
const COPIED_INDICATOR_VAR: &str = "LINKHUB_COPIED_INDICATOR_MS";

/// Session settings. Store credentials are the remote client's business and
/// do not live here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HubConfig {
    pub projects_collection: String,
    pub links_collection: String,
    /// How long a copied link stays marked, in milliseconds.
    pub copied_indicator_ms: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            projects_collection: "projects".to_string(),
            links_collection: "links".to_string(),
            copied_indicator_ms: 2_000,
        }
    }
}

impl HubConfig {
    pub fn copied_indicator(&self) -> Duration {
        Duration::from_millis(self.copied_indicator_ms)
    }

    /// Defaults overlaid with `LINKHUB_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(name) = lookup(PROJECTS_COLLECTION_VAR) {
            anyhow::ensure!(!name.is_empty(), "{PROJECTS_COLLECTION_VAR} is empty");
            config.projects_collection = name;
        }
        if let Some(name) = lookup(LINKS_COLLECTION_VAR) {
            anyhow::ensure!(!name.is_empty(), "{LINKS_COLLECTION_VAR} is empty");
            config.links_collection = name;
        }
        if let Some(ms) = lookup(COPIED_INDICATOR_VAR) {
            config.copied_indicator_ms = ms
                .parse()
                .with_context(|| format!("Invalid {COPIED_INDICATOR_VAR} value {ms:?}"))?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() -> anyhow::Result<()> {
        let config = HubConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config, HubConfig::default());
        assert_eq!(config.copied_indicator(), Duration::from_secs(2));
        Ok(())
    }

    #[test]
    fn overrides_apply() -> anyhow::Result<()> {
        let config = HubConfig::from_lookup(lookup(&[
            (LINKS_COLLECTION_VAR, "bookmarks"),
            (COPIED_INDICATOR_VAR, "500"),
        ]))?;
        assert_eq!(config.projects_collection, "projects");
        assert_eq!(config.links_collection, "bookmarks");
        assert_eq!(config.copied_indicator(), Duration::from_millis(500));
        Ok(())
    }

    #[test]
    fn unparsable_duration_is_an_error() {
        let result = HubConfig::from_lookup(lookup(&[(COPIED_INDICATOR_VAR, "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() -> anyhow::Result<()> {
        let config: HubConfig = serde_json::from_str(r#"{ "linksCollection": "bookmarks" }"#)?;
        assert_eq!(config.projects_collection, "projects");
        assert_eq!(config.links_collection, "bookmarks");
        Ok(())
    }
}
