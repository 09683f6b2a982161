//! Message file parsing and serialization
//!
//! A message file is a JSON array of message objects. Parsing validates
//! the structural shape up front and fails loudly with the path of the
//! offending element - the model never guesses a default to paper over
//! malformed input. Serialization is the structural inverse and keeps
//! the index-significant order of `points` and `fields`.

use crate::sim;
use crate::types::{CanFile, CanMessage, ModelError, Result};
use std::collections::HashSet;
use std::path::Path;

/// Highest valid standard (11-bit) CAN identifier
pub const MAX_STD_ID: u32 = 0x7FF;
/// Highest valid extended (29-bit) CAN identifier
pub const MAX_EXT_ID: u32 = 0x1FFF_FFFF;

impl CanFile {
    /// Parse a message file from its JSON content
    ///
    /// Re-parsing identical JSON yields an equal file, so a caller may
    /// deliver the same logical file repeatedly and replace the previous
    /// one wholesale.
    ///
    /// # Errors
    /// `Validation` for malformed JSON, missing attributes, duplicate
    /// message IDs, empty point lists, zero-width points, unparseable or
    /// out-of-width CAN IDs, and invalid sim descriptors.
    pub fn parse(filename: impl Into<String>, json: &str) -> Result<CanFile> {
        let filename = filename.into();
        let content: Vec<CanMessage> = serde_json::from_str(json).map_err(|e| {
            ModelError::Validation {
                path: format!("{}:{}:{}", filename, e.line(), e.column()),
                reason: e.to_string(),
            }
        })?;
        validate_messages(&content)?;
        log::debug!("parsed {}: {} messages", filename, content.len());
        Ok(CanFile {
            filename,
            content,
            is_dirty: false,
        })
    }

    /// Read and parse a message file from disk
    pub fn from_path(path: &Path) -> Result<CanFile> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let json = std::fs::read_to_string(path)?;
        Self::parse(filename, &json)
    }

    /// Serialize the message array back to JSON
    ///
    /// Inverse of [`CanFile::parse`] for any file it produced; `points`
    /// and `fields` keep their order. The filename/dirty envelope is the
    /// application layer's concern and is not emitted.
    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.content)?)
    }

    /// Look up a message by its textual ID
    pub fn message(&self, id: &str) -> Option<&CanMessage> {
        self.content.iter().find(|m| m.id == id)
    }
}

/// Parse a textual CAN ID, hex with a `0x` prefix or plain decimal
pub fn parse_can_id(id: &str) -> Option<u32> {
    if let Some(hex) = id.strip_prefix("0x").or_else(|| id.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        id.parse::<u32>().ok()
    }
}

fn validate_messages(messages: &[CanMessage]) -> Result<()> {
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for (msg_idx, message) in messages.iter().enumerate() {
        let msg_path = format!("[{}] (id {})", msg_idx, message.id);

        if !seen_ids.insert(message.id.as_str()) {
            return Err(ModelError::Validation {
                path: msg_path,
                reason: format!("duplicate message id '{}'", message.id),
            });
        }

        let id_limit = if message.is_extended() {
            MAX_EXT_ID
        } else {
            MAX_STD_ID
        };
        match parse_can_id(&message.id) {
            None => {
                return Err(ModelError::Validation {
                    path: format!("{}.id", msg_path),
                    reason: format!("'{}' is not a hex or decimal CAN id", message.id),
                });
            }
            Some(value) if value > id_limit => {
                return Err(ModelError::Validation {
                    path: format!("{}.id", msg_path),
                    reason: format!(
                        "{:#x} exceeds the {}-bit identifier space",
                        value,
                        if message.is_extended() { 29 } else { 11 }
                    ),
                });
            }
            Some(_) => {}
        }

        if message.points.is_empty() {
            return Err(ModelError::Validation {
                path: format!("{}.points", msg_path),
                reason: "message has no points to decode".to_string(),
            });
        }

        for (point_idx, point) in message.points.iter().enumerate() {
            if point.size == 0 {
                return Err(ModelError::Validation {
                    path: format!("{}.points[{}].size", msg_path, point_idx),
                    reason: "point size must be positive".to_string(),
                });
            }
            if let Some(descriptor) = &point.sim {
                let violations = sim::validate(descriptor);
                if !violations.is_empty() {
                    let reasons: Vec<String> =
                        violations.iter().map(|v| v.to_string()).collect();
                    return Err(ModelError::Validation {
                        path: format!("{}.points[{}].sim", msg_path, point_idx),
                        reason: reasons.join("; "),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"[
        {
            "id": "0x100",
            "desc": "status",
            "points": [{"size": 8}],
            "fields": [{"name": "State", "unit": "", "values": [1]}]
        }
    ]"#;

    #[test]
    fn test_parse_minimal_file() {
        let file = CanFile::parse("status.json", MINIMAL).unwrap();
        assert_eq!(file.filename, "status.json");
        assert_eq!(file.content.len(), 1);
        assert!(!file.is_dirty);
        assert!(file.message("0x100").is_some());
        assert!(file.message("0x200").is_none());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let first = CanFile::parse("a.json", MINIMAL).unwrap();
        let second = CanFile::parse("a.json", MINIMAL).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = r#"[
            {"id": "0x100", "desc": "a", "points": [{"size": 8}], "fields": []},
            {"id": "0x100", "desc": "b", "points": [{"size": 8}], "fields": []}
        ]"#;
        let err = CanFile::parse("dup.json", json).unwrap_err();
        match err {
            ModelError::Validation { reason, .. } => assert!(reason.contains("duplicate")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_points_rejected() {
        let json = r#"[{"id": "0x100", "desc": "a", "points": [], "fields": []}]"#;
        let err = CanFile::parse("empty.json", json).unwrap_err();
        match err {
            ModelError::Validation { path, .. } => assert!(path.contains("points")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_attribute_rejected() {
        // NetField without a unit
        let json = r#"[
            {"id": "0x100", "desc": "a", "points": [{"size": 8}],
             "fields": [{"name": "X", "values": []}]}
        ]"#;
        assert!(matches!(
            CanFile::parse("bad.json", json),
            Err(ModelError::Validation { .. })
        ));
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let json = r#"[
            {"id": "0x100", "desc": "a", "points": [{"size": 8, "parse": true}],
             "fields": []}
        ]"#;
        assert!(matches!(
            CanFile::parse("bad.json", json),
            Err(ModelError::Validation { .. })
        ));
    }

    #[test]
    fn test_standard_id_width_enforced() {
        let json = r#"[{"id": "0x800", "desc": "a", "points": [{"size": 8}], "fields": []}]"#;
        assert!(CanFile::parse("wide.json", json).is_err());

        // Same ID is fine once the message is extended
        let json = r#"[{"id": "0x800", "desc": "a", "points": [{"size": 8}], "fields": [],
                        "is_ext": true}]"#;
        assert!(CanFile::parse("wide.json", json).is_ok());
    }

    #[test]
    fn test_decimal_id_accepted() {
        let json = r#"[{"id": "291", "desc": "a", "points": [{"size": 8}], "fields": []}]"#;
        assert!(CanFile::parse("dec.json", json).is_ok());
    }

    #[test]
    fn test_unparseable_id_rejected() {
        let json = r#"[{"id": "engine", "desc": "a", "points": [{"size": 8}], "fields": []}]"#;
        let err = CanFile::parse("name.json", json).unwrap_err();
        match err {
            ModelError::Validation { path, .. } => assert!(path.ends_with(".id")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_sim_rejected_with_path() {
        let json = r#"[
            {"id": "0x100", "desc": "a",
             "points": [{"size": 8, "sim": {"min": 10, "max": 1}}],
             "fields": []}
        ]"#;
        let err = CanFile::parse("sim.json", json).unwrap_err();
        match err {
            ModelError::Validation { path, reason } => {
                assert!(path.contains("points[0].sim"));
                assert!(reason.contains("min"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_can_id_forms() {
        assert_eq!(parse_can_id("0x100"), Some(0x100));
        assert_eq!(parse_can_id("0X7ff"), Some(0x7FF));
        assert_eq!(parse_can_id("42"), Some(42));
        assert_eq!(parse_can_id("0xZZ"), None);
        assert_eq!(parse_can_id(""), None);
    }
}
