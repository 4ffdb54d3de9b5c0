//! Loading restriction policies from JSON.
//!
//! ```json
//! { "no_unset": true, "no_empty": false, "no_digit": true, "mode": "all_errors" }
//! ```
//!
//! Missing fields take their defaults. A name filter cannot be expressed
//! in JSON; attach one afterwards with [`Restrictions::with_name_filter`].

use std::path::Path;

use envsubst_types::Restrictions;

use crate::error::{Error, Result};

/// Decode restrictions from a JSON string.
pub fn restrictions_from_json(json: &str) -> Result<Restrictions> {
    let restrictions: Restrictions = serde_json::from_str(json)?;
    Ok(restrictions.normalized())
}

/// Read and decode restrictions from a JSON file.
pub fn restrictions_from_path(path: impl AsRef<Path>) -> Result<Restrictions> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    restrictions_from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use envsubst_types::Mode;

    #[test]
    fn test_full_config() {
        let r = restrictions_from_json(
            r#"{"no_unset": true, "no_empty": true, "no_digit": true, "mode": "all_errors"}"#,
        )
        .unwrap();
        assert!(r.no_unset && r.no_empty && r.no_digit);
        assert_eq!(r.mode, Mode::AllErrors);
    }

    #[test]
    fn test_keep_unset_is_normalized() {
        let r = restrictions_from_json(r#"{"no_unset": true, "keep_unset": true}"#).unwrap();
        assert!(r.keep_unset);
        assert!(!r.no_unset);
    }

    #[test]
    fn test_invalid_mode_is_config_error() {
        let err = restrictions_from_json(r#"{"mode": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = restrictions_from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().starts_with("failed to read /definitely/not/here.json"));
    }
}
