use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

const DEBUG_ENV: &str = "COMICS_CREATOR_DEBUG";
const DEBUG_GENERATION_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    /// Artificial delay of the placeholder character generator.
    pub generation_delay_ms: u64,
    /// Multi-select limit of the photo picker.
    pub max_photos_per_import: usize,
    /// Total photos a session may hold.
    pub max_photos: usize,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            generation_delay_ms: 2000,
            max_photos_per_import: 10,
            max_photos: 50,
        }
    }
}

impl WorkflowSettings {
    pub fn generation_delay(&self) -> Duration {
        let debug_mode = std::env::var(DEBUG_ENV)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        if debug_mode {
            Duration::from_millis(self.generation_delay_ms.min(DEBUG_GENERATION_DELAY_MS))
        } else {
            Duration::from_millis(self.generation_delay_ms)
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    workflow: WorkflowSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn workflow(&self) -> WorkflowSettings {
        self.read().workflow.clone()
    }

    pub fn update_workflow(&self, settings: WorkflowSettings) -> Result<()> {
        let mut guard = self.write();
        guard.workflow = settings;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: UserSettings = serde_json::from_str(&contents)?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.workflow(), WorkflowSettings::default());
    }

    #[test]
    fn garbage_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.workflow(), WorkflowSettings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"workflow": {"max_photos": 4}}"#).unwrap();

        let store = SettingsStore::new(path).unwrap();
        let workflow = store.workflow();
        assert_eq!(workflow.max_photos, 4);
        assert_eq!(workflow.max_photos_per_import, 10);
    }

    #[test]
    fn updates_persist_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let settings = WorkflowSettings {
            generation_delay_ms: 500,
            max_photos_per_import: 4,
            max_photos: 8,
        };
        store.update_workflow(settings.clone()).unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.workflow(), settings);
        reopened.reload().unwrap();
        assert_eq!(reopened.workflow(), settings);
    }
}
