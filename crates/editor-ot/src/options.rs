use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::FAN_OUT_KEY;
use crate::error::OptionsError;
use crate::path::Path;

/// Which text remote positions are resolved against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginalDocument {
    /// The editor's text when the remote op arrives.
    ///
    /// Default. A store that applies an op before notifying listeners no
    /// longer holds the text the op's positions refer to; the editor still
    /// does until the decoded changes are dispatched.
    #[default]
    Editor,
    /// The store's current value at the watched path. Only correct for
    /// stores that notify before applying.
    Store,
}

/// Configuration for one sync controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncOptions {
    /// Location of the edited string in the shared document.
    pub path: Path,
    /// Collection key that introduces fan-out operations.
    pub fan_out_key: String,
    pub original_document: OriginalDocument,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            path: Path::root(),
            fan_out_key: FAN_OUT_KEY.to_string(),
            original_document: OriginalDocument::Editor,
        }
    }
}

impl SyncOptions {
    pub fn new(path: Path) -> Self {
        Self { path, ..Self::default() }
    }

    pub fn with_fan_out_key(mut self, key: impl Into<String>) -> Self {
        self.fan_out_key = key.into();
        self
    }

    pub fn with_original_document(mut self, source: OriginalDocument) -> Self {
        self.original_document = source;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, OptionsError> {
        serde_json::from_str::<Self>(s)?.validated()
    }

    pub fn from_value(v: Value) -> Result<Self, OptionsError> {
        serde_json::from_value::<Self>(v)?.validated()
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.fan_out_key.is_empty() {
            return Err(OptionsError::EmptyFanOutKey);
        }
        Ok(())
    }

    fn validated(self) -> Result<Self, OptionsError> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathKey;
    use serde_json::json;

    #[test]
    fn defaults_fill_missing_fields() {
        let opts = SyncOptions::from_json_str(r#"{"path": ["content", "files", "2432", "text"]}"#).unwrap();
        assert_eq!(opts.path, Path::new(["content", "files", "2432", "text"]));
        assert_eq!(opts.fan_out_key, "files");
        assert_eq!(opts.original_document, OriginalDocument::Editor);
        assert_eq!(SyncOptions::from_json_str("{}").unwrap(), SyncOptions::default());
    }

    #[test]
    fn reads_all_fields() {
        let opts = SyncOptions::from_value(json!({
            "path": ["docs", 0],
            "fan_out_key": "docs",
            "original_document": "store"
        }))
        .unwrap();
        assert_eq!(
            opts,
            SyncOptions::new(Path::new([PathKey::from("docs"), PathKey::Index(0)]))
                .with_fan_out_key("docs")
                .with_original_document(OriginalDocument::Store)
        );
    }

    #[test]
    fn rejects_bad_options() {
        assert!(matches!(
            SyncOptions::from_json_str(r#"{"fan_out_key": ""}"#),
            Err(OptionsError::EmptyFanOutKey)
        ));
        assert!(matches!(
            SyncOptions::from_json_str(r#"{"pth": []}"#),
            Err(OptionsError::Parse(_))
        ));
        assert!(matches!(
            SyncOptions::from_json_str(r#"{"original_document": "disk"}"#),
            Err(OptionsError::Parse(_))
        ));
    }
}
