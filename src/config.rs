//! Engine configuration loaded from TOML.
//!
//! Every section is optional; missing values fall back to the defaults of the
//! corresponding type.
//!
//! ```toml
//! [fields]
//! title = 3.0
//! content = 1.0
//! [fields.metadata]
//! author = 0.5
//!
//! [tokenize]
//! stemming = false
//!
//! [category_weights]
//! security = 1.4
//!
//! [[notes.categories]]
//! label = "billing"
//! keywords = ["invoice", "refund"]
//! ```

use crate::error::ConfigError;
use crate::search::{FieldWeights, TokenizeOptions};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

/// Upper bound for field weights. Indexing repeats each field `floor(weight)`
/// times, so the weight bounds per-document term counts.
pub const MAX_FIELD_WEIGHT: f64 = 100.0;

/// Top-level configuration for a knowledge-base search engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub fields: FieldWeights,
    pub tokenize: TokenizeOptions,
    pub search: SearchDefaults,
    pub category_weights: BTreeMap<String, f64>,
    pub tag_weights: BTreeMap<String, f64>,
    pub notes: NoteKeywords,
}

/// Default query limits applied when a caller does not specify them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub limit: usize,
    pub min_score: f64,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            limit: 10,
            min_score: 0.1,
        }
    }
}

/// A label assigned when any of its keywords occurs in a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// Whether any keyword is a substring of `lowercased`.
    pub fn matches(&self, lowercased: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowercased.contains(keyword.to_lowercase().as_str()))
    }
}

/// Keyword tables used to derive categories and tags from free-form notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteKeywords {
    pub categories: Vec<KeywordRule>,
    pub tags: Vec<KeywordRule>,
}

impl Default for NoteKeywords {
    fn default() -> Self {
        Self {
            categories: vec![
                KeywordRule::new("account", &["password", "login", "log in", "sign in", "username", "account"]),
                KeywordRule::new("network", &["wifi", "wi-fi", "network", "internet", "router", "connection"]),
                KeywordRule::new("hardware", &["printer", "laptop", "monitor", "keyboard", "mouse", "device"]),
                KeywordRule::new("software", &["install", "update", "application", "software", "crash", "license"]),
                KeywordRule::new("email", &["email", "e-mail", "inbox", "outlook", "mailbox"]),
                KeywordRule::new("security", &["virus", "malware", "phishing", "security", "breach", "suspicious"]),
            ],
            tags: vec![
                KeywordRule::new("urgent", &["urgent", "asap", "immediately", "critical", "emergency"]),
                KeywordRule::new("how-to", &["how to", "how do i", "guide", "steps", "tutorial"]),
                KeywordRule::new("error", &["error", "fail", "broken", "not working", "crash"]),
                KeywordRule::new("mobile", &["phone", "mobile", "android", "iphone", "tablet"]),
                KeywordRule::new("remote", &["vpn", "remote", "home office", "from home"]),
            ],
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml(source: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file. A leading `~` expands to the home directory.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let expanded = expand_tilde(path);
        let path = Path::new(expanded.as_ref());
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&source, path)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Rejects values the engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tokenize.min_token_length == 0 {
            return Err(ConfigError::Invalid {
                field: "tokenize.min_token_length",
                reason: "must be at least 1".to_string(),
            });
        }

        let weights = [
            ("fields.title", self.fields.title),
            ("fields.content", self.fields.content),
            ("fields.tags", self.fields.tags),
            ("fields.category", self.fields.category),
        ];
        for (field, weight) in weights {
            check_field_weight(field, weight)?;
        }
        for weight in self.fields.metadata.values() {
            check_field_weight("fields.metadata", *weight)?;
        }
        for weight in self.category_weights.values().chain(self.tag_weights.values()) {
            check_weight("category_weights/tag_weights", *weight)?;
        }
        Ok(())
    }
}

fn check_weight(field: &'static str, weight: f64) -> Result<(), ConfigError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("weight {} must be a finite, non-negative number", weight),
        })
    }
}

fn check_field_weight(field: &'static str, weight: f64) -> Result<(), ConfigError> {
    check_weight(field, weight)?;
    if weight > MAX_FIELD_WEIGHT {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("weight {} exceeds the maximum of {}", weight, MAX_FIELD_WEIGHT),
        });
    }
    Ok(())
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
