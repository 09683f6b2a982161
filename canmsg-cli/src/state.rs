//! Application state
//!
//! Holds the loaded message files, the active-file selection and the
//! dirty flags. All mutation goes through one entry point,
//! [`AppState::apply`], so there is no ambient shared state anywhere:
//! the model stays pure and every change is an explicit update.

use anyhow::{anyhow, Result};
use canmsg_model::{CanFile, CanPoint};

/// A single state transition
#[derive(Debug, Clone)]
pub enum StateUpdate {
    /// A file arrived from the file source; replaces any previously
    /// loaded file with the same name wholesale
    FileLoaded(CanFile),
    /// Select the active file by name
    FileActivated(String),
    /// Copy-on-write edit: replace one point record and mark the file
    /// dirty. `point_index` is 1-based, matching the reference space.
    PointReplaced {
        filename: String,
        message_id: String,
        point_index: usize,
        point: CanPoint,
    },
}

/// Loaded files plus the active-file selection
#[derive(Debug, Default)]
pub struct AppState {
    files: Vec<CanFile>,
    active: Option<usize>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one state transition
    pub fn apply(&mut self, update: StateUpdate) -> Result<()> {
        match update {
            StateUpdate::FileLoaded(file) => {
                log::info!("loaded {} ({} messages)", file.filename, file.content.len());
                match self.files.iter().position(|f| f.filename == file.filename) {
                    Some(pos) => self.files[pos] = file,
                    None => self.files.push(file),
                }
                Ok(())
            }
            StateUpdate::FileActivated(filename) => {
                let pos = self
                    .files
                    .iter()
                    .position(|f| f.filename == filename)
                    .ok_or_else(|| anyhow!("no loaded file named '{}'", filename))?;
                self.active = Some(pos);
                Ok(())
            }
            StateUpdate::PointReplaced {
                filename,
                message_id,
                point_index,
                point,
            } => {
                let file = self
                    .files
                    .iter_mut()
                    .find(|f| f.filename == filename)
                    .ok_or_else(|| anyhow!("no loaded file named '{}'", filename))?;
                let message = file
                    .content
                    .iter_mut()
                    .find(|m| m.id == message_id)
                    .ok_or_else(|| anyhow!("no message '{}' in {}", message_id, filename))?;
                let slot = point_index
                    .checked_sub(1)
                    .and_then(|i| message.points.get_mut(i))
                    .ok_or_else(|| {
                        anyhow!("message '{}' has no point {}", message_id, point_index)
                    })?;
                *slot = point;
                file.is_dirty = true;
                Ok(())
            }
        }
    }

    pub fn files(&self) -> &[CanFile] {
        &self.files
    }

    pub fn active_file(&self) -> Option<&CanFile> {
        self.active.and_then(|i| self.files.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> CanFile {
        let json = r#"[{"id": "0x100", "desc": "d",
                        "points": [{"size": 8}, {"size": 8}],
                        "fields": []}]"#;
        CanFile::parse(name, json).unwrap()
    }

    #[test]
    fn test_load_and_activate() {
        let mut state = AppState::new();
        state.apply(StateUpdate::FileLoaded(file("a.json"))).unwrap();
        state.apply(StateUpdate::FileLoaded(file("b.json"))).unwrap();
        assert_eq!(state.files().len(), 2);
        assert!(state.active_file().is_none());

        state
            .apply(StateUpdate::FileActivated("b.json".to_string()))
            .unwrap();
        assert_eq!(state.active_file().unwrap().filename, "b.json");

        assert!(state
            .apply(StateUpdate::FileActivated("missing.json".to_string()))
            .is_err());
    }

    #[test]
    fn test_reload_replaces_wholesale() {
        let mut state = AppState::new();
        state.apply(StateUpdate::FileLoaded(file("a.json"))).unwrap();
        state
            .apply(StateUpdate::PointReplaced {
                filename: "a.json".to_string(),
                message_id: "0x100".to_string(),
                point_index: 1,
                point: CanPoint::new(16),
            })
            .unwrap();
        assert!(state.files()[0].is_dirty);

        // A fresh delivery of the same file discards the edit
        state.apply(StateUpdate::FileLoaded(file("a.json"))).unwrap();
        assert_eq!(state.files().len(), 1);
        assert!(!state.files()[0].is_dirty);
        assert_eq!(state.files()[0].content[0].points[0].size, 8);
    }

    #[test]
    fn test_point_replacement_marks_dirty() {
        let mut state = AppState::new();
        state.apply(StateUpdate::FileLoaded(file("a.json"))).unwrap();

        let mut edited = CanPoint::new(8);
        edited.signed = Some(true);
        state
            .apply(StateUpdate::PointReplaced {
                filename: "a.json".to_string(),
                message_id: "0x100".to_string(),
                point_index: 2,
                point: edited.clone(),
            })
            .unwrap();

        let loaded = &state.files()[0];
        assert!(loaded.is_dirty);
        assert_eq!(loaded.content[0].points[1], edited);
        // Untouched sibling point keeps its record
        assert_eq!(loaded.content[0].points[0], CanPoint::new(8));
    }

    #[test]
    fn test_point_replacement_bad_index() {
        let mut state = AppState::new();
        state.apply(StateUpdate::FileLoaded(file("a.json"))).unwrap();
        for bad in [0, 3] {
            assert!(state
                .apply(StateUpdate::PointReplaced {
                    filename: "a.json".to_string(),
                    message_id: "0x100".to_string(),
                    point_index: bad,
                    point: CanPoint::new(8),
                })
                .is_err());
        }
        assert!(!state.files()[0].is_dirty);
    }
}
