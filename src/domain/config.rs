use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::HeadingRule;

/// Configuration for semantic analysis.
///
/// Controls how spec object types are classified as headings when
/// rebuilding document trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct Config {
    /// How headings are recognised.
    ///
    /// By default a spec object type is a heading if its long name contains
    /// "heading", ignoring case.
    heading_rule: HeadingRule,
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, if the TOML content is
    /// invalid, or if the heading pattern is not a valid regular expression.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Returns the rule used to recognise headings.
    #[must_use]
    pub const fn heading_rule(&self) -> &HeadingRule {
        &self.heading_rule
    }

    /// Replaces the rule used to recognise headings.
    pub fn set_heading_rule(&mut self, rule: HeadingRule) {
        self.heading_rule = rule;
    }
}

fn default_heading_token() -> String {
    HeadingRule::DEFAULT_TOKEN.to_string()
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        /// Case-insensitive token searched for in spec object type names.
        #[serde(default = "default_heading_token")]
        heading_token: String,

        /// Regular expression matched against spec object type names.
        ///
        /// Takes precedence over `heading_token` when set.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading_pattern: Option<String>,
    },
}

impl TryFrom<Versions> for Config {
    type Error = regex::Error;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 {
                heading_token,
                heading_pattern,
            } => {
                let heading_rule = match heading_pattern {
                    Some(pattern) => HeadingRule::pattern(&pattern)?,
                    None => HeadingRule::Token(heading_token),
                };
                Ok(Self { heading_rule })
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        match config.heading_rule {
            HeadingRule::Token(heading_token) => Self::V1 {
                heading_token,
                heading_pattern: None,
            },
            HeadingRule::Pattern(pattern) => Self::V1 {
                heading_token: default_heading_token(),
                heading_pattern: Some(pattern.as_str().to_string()),
            },
        }
    }
}
