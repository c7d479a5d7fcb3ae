//! App state persistence — JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use freightdeck_core::cascade::FilterMode;
use freightdeck_core::schema::UploadMode;

use crate::app::{AppState, ExportKind, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    pub active_panel: Panel,
    pub filter_mode: FilterMode,
    pub export_kind: ExportKind,
    pub out_dir: String,
    pub overwrite: bool,
    pub upload_mode: UploadMode,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            active_panel: Panel::Schedules,
            filter_mode: FilterMode::Vessel,
            export_kind: ExportKind::Bulk,
            // Empty means "keep the configured default".
            out_dir: String::new(),
            overwrite: false,
            upload_mode: UploadMode::Bulk,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        active_panel: app.active_panel,
        filter_mode: app.schedules.cascade.mode(),
        export_kind: app.transfer.export_kind,
        out_dir: app.transfer.out_dir.clone(),
        overwrite: app.transfer.overwrite,
        upload_mode: app.transfer.upload_mode,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_panel = state.active_panel;
    if state.filter_mode != app.schedules.cascade.mode() {
        app.schedules.cascade.set_mode(state.filter_mode);
    }
    app.transfer.export_kind = state.export_kind;
    if !state.out_dir.is_empty() {
        app.transfer.out_dir = state.out_dir;
    }
    app.transfer.overwrite = state.overwrite;
    app.transfer.upload_mode = state.upload_mode;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = PersistedState {
            active_panel: Panel::Transfer,
            filter_mode: FilterMode::Origin,
            export_kind: ExportKind::Template,
            out_dir: "/tmp/out".into(),
            overwrite: true,
            upload_mode: UploadMode::Origin,
        };
        save(&path, &state).unwrap();
        let loaded = load(&path);
        assert_eq!(loaded.active_panel, Panel::Transfer);
        assert_eq!(loaded.filter_mode, FilterMode::Origin);
        assert_eq!(loaded.out_dir, "/tmp/out");
        assert!(loaded.overwrite);
        assert_eq!(loaded.upload_mode, UploadMode::Origin);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let loaded = load(&dir.path().join("nope.json"));
        assert_eq!(loaded.active_panel, Panel::Schedules);
        assert_eq!(loaded.filter_mode, FilterMode::Vessel);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{broken").unwrap();
        let loaded = load(&path);
        assert_eq!(loaded.export_kind, ExportKind::Bulk);
    }
}
