use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Display metadata for a parser: what `--help` and `--version` print.
///
/// Can be built in code, loaded from a JSON file, or overridden from
/// `<PREFIX>_NAME`, `<PREFIX>_VERSION`, `<PREFIX>_DESCRIPTION`,
/// `<PREFIX>_AUTHOR` and `<PREFIX>_HELP_TEXT` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserConfig {
    name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,

    /// Free text printed after the usage line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    help_text: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ParserConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read parser config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse parser config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from the process environment.
    pub fn merge_env(self, prefix: &str) -> Self {
        let env: Vec<(String, String)> = std::env::vars().collect();
        self.merge_env_vars(prefix, &env)
    }

    /// Override fields from `env`. Empty values are ignored.
    pub fn merge_env_vars(mut self, prefix: &str, env: &[(String, String)]) -> Self {
        let lookup = |suffix: &str| -> Option<String> {
            let key = format!("{prefix}_{suffix}");
            env.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = lookup("NAME") {
            self.name = v;
        }
        if let Some(v) = lookup("VERSION") {
            self.version = Some(v);
        }
        if let Some(v) = lookup("DESCRIPTION") {
            self.description = Some(v);
        }
        if let Some(v) = lookup("AUTHOR") {
            self.author = Some(v);
        }
        if let Some(v) = lookup("HELP_TEXT") {
            self.help_text = Some(v);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("parser name must not be empty");
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        self.name.trim()
    }

    /// Configured version; `None` when unset or blank.
    pub fn version(&self) -> Option<&str> {
        non_empty(&self.version)
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    pub fn author(&self) -> Option<&str> {
        non_empty(&self.author)
    }

    pub fn help_text(&self) -> Option<&str> {
        non_empty(&self.help_text)
    }
}
