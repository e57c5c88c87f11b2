// src/features.rs
//! Shared-feature descriptor grammar.
//!
//! ```text
//! descriptor := token ( "," token )*
//! token      := value SP key          (split on the last space)
//! key        := word [ "s" ]          (a trailing plural "s" is dropped)
//! ```
//! `"2 Bedrooms, 1 Bathroom"` → `[("Bedroom", "2"), ("Bathroom", "1")]`.

use crate::config::consts::PLURAL_SUFFIX;
use crate::error::{Result, WatchError};

/// One `(field, value)` column shared by every record of a group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feature {
    pub field: String,
    pub value: String,
}

pub fn parse_descriptor(descriptor: &str) -> Result<Vec<Feature>> {
    let mut out: Vec<Feature> = Vec::new();
    for token in descriptor.split(',') {
        let feature = parse_token(token.trim())
            .ok_or_else(|| {
                WatchError::parse(format!("malformed feature token {token:?} in {descriptor:?}"))
            })?;
        if out.iter().any(|f| f.field == feature.field) {
            return Err(WatchError::parse(format!(
                "feature {:?} repeated in {descriptor:?}",
                feature.field
            )));
        }
        out.push(feature);
    }
    Ok(out)
}

fn parse_token(token: &str) -> Option<Feature> {
    let (value, key) = token.rsplit_once(' ')?;
    let value = value.trim();
    if value.is_empty() || key.is_empty() {
        return None;
    }
    Some(Feature { field: singularize(key), value: s!(value) })
}

/// `"Bedrooms"` → `"Bedroom"`. A bare `"s"` is left alone.
pub fn singularize(key: &str) -> String {
    match key.strip_suffix(PLURAL_SUFFIX) {
        Some(stem) if !stem.is_empty() => s!(stem),
        _ => s!(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(fs: &[Feature]) -> Vec<(&str, &str)> {
        fs.iter().map(|f| (f.field.as_str(), f.value.as_str())).collect()
    }

    #[test]
    fn plural_and_singular_keys() {
        let fs = parse_descriptor("2 Bedrooms, 1 Bathroom").unwrap();
        assert_eq!(pairs(&fs), vec![("Bedroom", "2"), ("Bathroom", "1")]);
    }

    #[test]
    fn splits_on_last_space() {
        let fs = parse_descriptor("1.5 Baths,Ground floor Levels").unwrap();
        assert_eq!(pairs(&fs), vec![("Bath", "1.5"), ("Level", "Ground floor")]);
    }

    #[test]
    fn token_without_space_is_rejected() {
        let err = parse_descriptor("2 Bedrooms, Studio").unwrap_err();
        assert!(matches!(err, WatchError::Parse(ref m) if m.contains("Studio")));
    }

    #[test]
    fn empty_tokens_are_rejected() {
        assert!(parse_descriptor("").is_err());
        assert!(parse_descriptor("2 Bedrooms,").is_err());
    }

    #[test]
    fn repeated_field_is_rejected() {
        assert!(parse_descriptor("2 Bedrooms, 3 Bedroom").is_err());
    }

    #[test]
    fn singularize_edges() {
        assert_eq!(singularize("Baths"), "Bath");
        assert_eq!(singularize("Bath"), "Bath");
        assert_eq!(singularize("s"), "s");
    }
}
