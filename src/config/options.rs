// src/config/options.rs
//
// Run configuration. Every section has a full `Default`, so a config file only
// needs to name the values it changes:
//
//   [normalize]
//   unit_column = "Unit"
//   excluded_columns = ["Action"]
//
//   [mail]
//   recipients = ["me@example.com"]

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::consts::*;
use crate::error::WatchError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppOptions {
    pub parse: ParseOptions,
    pub normalize: NormalizeOptions,
    pub store: StoreOptions,
    pub report: ReportOptions,
    pub mail: MailOptions,
}

impl AppOptions {
    pub fn from_toml_str(text: &str) -> Result<Self, WatchError> {
        toml::from_str(text).map_err(|e| WatchError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, WatchError> {
        let text = fs::read_to_string(path)
            .map_err(|e| WatchError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

/// Where the groups live in the page markup.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    pub container_id: String,
    pub heading_tag: String,
    pub label_attr: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            container_id: s!(CONTAINER_ID),
            heading_tag: s!(HEADING_TAG),
            label_attr: s!(LABEL_ATTR),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeOptions {
    /// Row column holding the per-group unit id.
    pub unit_column: String,
    pub key_separator: String,
    /// Noise columns dropped from every record.
    pub excluded_columns: Vec<String>,
    /// Numeric field used for the display order (descending).
    pub sort_field: String,
    /// Exact label sequence every row must carry. `None` lets the first row
    /// of each group define it.
    pub expected_columns: Option<Vec<String>>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            unit_column: s!(UNIT_COLUMN),
            key_separator: s!(KEY_SEP),
            excluded_columns: EXCLUDED_COLUMNS.iter().map(|c| s!(*c)).collect(),
            sort_field: s!(SORT_FIELD),
            expected_columns: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreOptions {
    pub dir: PathBuf,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { dir: PathBuf::from(STORE_DIR) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportOptions {
    /// Wrapped around each added key, e.g. `***Tower 101***`.
    pub marker: String,
    /// Singular noun used in the summary sentences.
    pub noun: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { marker: s!(ADDED_MARKER), noun: s!(ITEM_NOUN) }
    }
}

/// Delivery settings. Supplied by the caller; nothing here is compiled in
/// beyond harmless defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MailOptions {
    pub from: String,
    pub subject: String,
    pub recipients: Vec<String>,
    pub outbox_dir: PathBuf,
}

impl Default for MailOptions {
    fn default() -> Self {
        Self {
            from: s!(MAIL_FROM),
            subject: s!(MAIL_SUBJECT),
            recipients: Vec::new(),
            outbox_dir: PathBuf::from(OUTBOX_DIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let opts = AppOptions::from_toml_str("").unwrap();
        assert_eq!(opts, AppOptions::default());
        assert_eq!(opts.normalize.unit_column, "Apartment");
        assert_eq!(opts.normalize.excluded_columns.len(), 4);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let opts = AppOptions::from_toml_str(
            r#"
            [normalize]
            unit_column = "Unit"

            [mail]
            recipients = ["a@example.com", "b@example.com"]
            "#,
        )
        .unwrap();
        assert_eq!(opts.normalize.unit_column, "Unit");
        assert_eq!(opts.normalize.sort_field, "Bedroom");
        assert_eq!(opts.mail.recipients, vec!["a@example.com", "b@example.com"]);
        assert_eq!(opts.mail.subject, MAIL_SUBJECT);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppOptions::from_toml_str("[store]\ndirectory = \"x\"\n").unwrap_err();
        assert!(matches!(err, WatchError::Config(_)));
    }
}
