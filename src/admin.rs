use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories_next::BaseDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gate::GateWindow;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("a password is required")]
    EmptyPassword,
    #[error("password confirmation did not match")]
    ConfirmationMismatch,
    #[error("wrong admin password")]
    WrongPassword,
    #[error("could not persist admin settings")]
    Storage(#[source] anyhow::Error),
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_pwd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quiz_open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quiz_close: Option<String>,
}

/// Key-value store for the operator-set password and open/close window, the
/// widget's equivalent of origin-scoped local storage. Not a security
/// boundary: the password is a plaintext comparison gating the settings form.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn open_default() -> Result<Self> {
        let mut path = BaseDirs::new()
            .context("could not locate system directories")?
            .config_dir()
            .to_path_buf();
        path.push("quizgate");
        path.push("config.json");
        Ok(ConfigStore { path })
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_password(&self) -> bool {
        self.read().admin_pwd.is_some()
    }

    pub fn gate_window(&self) -> GateWindow {
        let stored = self.read();
        GateWindow::from_stored(stored.quiz_open.as_deref(), stored.quiz_close.as_deref())
    }

    /// The admin save flow. With `require_password` set: an empty password is
    /// rejected; the first save establishes the password and needs a matching
    /// confirmation; later saves must present the stored password. Blank
    /// open/close inputs leave the stored bounds untouched.
    pub fn save_gate_settings(
        &self,
        entered: &str,
        confirmation: Option<&str>,
        open: &str,
        close: &str,
        require_password: bool,
    ) -> Result<(), AdminError> {
        let mut stored = self.read();

        if require_password {
            let entered = entered.trim();
            if entered.is_empty() {
                return Err(AdminError::EmptyPassword);
            }
            match &stored.admin_pwd {
                None => {
                    let confirmation = confirmation.map(str::trim);
                    if confirmation != Some(entered) {
                        return Err(AdminError::ConfirmationMismatch);
                    }
                    stored.admin_pwd = Some(entered.to_owned());
                }
                Some(current) if current != entered => {
                    return Err(AdminError::WrongPassword);
                }
                Some(_) => (),
            }
        }

        let open = open.trim();
        if !open.is_empty() {
            stored.quiz_open = Some(open.to_owned());
        }
        let close = close.trim();
        if !close.is_empty() {
            stored.quiz_close = Some(close.to_owned());
        }

        self.write(&stored).map_err(AdminError::Storage)
    }

    pub fn change_password(&self, current: &str, new: &str) -> Result<(), AdminError> {
        let mut stored = self.read();
        match &stored.admin_pwd {
            Some(existing) if existing == current.trim() => (),
            _ => return Err(AdminError::WrongPassword),
        }
        let new = new.trim();
        if new.is_empty() {
            return Err(AdminError::EmptyPassword);
        }
        stored.admin_pwd = Some(new.to_owned());
        self.write(&stored).map_err(AdminError::Storage)
    }

    fn read(&self) -> StoredConfig {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|error| {
                warn!("ignoring corrupt config store: {}", error);
                StoredConfig::default()
            }),
            Err(_) => StoredConfig::default(),
        }
    }

    fn write(&self, stored: &StoredConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(stored)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("could not write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(test_name: &str) -> ConfigStore {
        let path = std::env::temp_dir()
            .join("quizgate-tests")
            .join(format!("{}-{}.json", test_name, std::process::id()));
        let _ = fs::remove_file(&path);
        ConfigStore::at_path(path)
    }

    #[test]
    fn first_save_sets_password_with_confirmation() {
        let store = store("first-save");
        assert!(!store.has_password());

        let result = store.save_gate_settings("s3cret", Some("nope"), "", "", true);
        assert!(matches!(result, Err(AdminError::ConfirmationMismatch)));
        assert!(!store.has_password());

        store
            .save_gate_settings("s3cret", Some("s3cret"), "", "", true)
            .unwrap();
        assert!(store.has_password());
    }

    #[test]
    fn empty_password_is_rejected() {
        let store = store("empty-password");
        let result = store.save_gate_settings("   ", None, "", "", true);
        assert!(matches!(result, Err(AdminError::EmptyPassword)));
    }

    #[test]
    fn wrong_password_leaves_the_window_untouched() {
        let store = store("wrong-password");
        store
            .save_gate_settings("s3cret", Some("s3cret"), "2026-08-07 09:00", "", true)
            .unwrap();

        let result =
            store.save_gate_settings("guess", None, "2026-08-07 10:00", "2026-08-07 18:00", true);
        assert!(matches!(result, Err(AdminError::WrongPassword)));

        let window = store.gate_window();
        assert_eq!(window.opens_at, crate::gate::parse_flexible("2026-08-07 09:00"));
        assert_eq!(window.closes_at, None);
    }

    #[test]
    fn correct_password_saves_the_window() {
        let store = store("correct-password");
        store
            .save_gate_settings("s3cret", Some("s3cret"), "", "", true)
            .unwrap();
        store
            .save_gate_settings("s3cret", None, "2026-08-07 09:00", "2026-08-07 17:00", true)
            .unwrap();

        let window = store.gate_window();
        assert!(window.opens_at.is_some());
        assert!(window.closes_at.is_some());
    }

    #[test]
    fn blank_inputs_keep_existing_bounds() {
        let store = store("blank-inputs");
        store
            .save_gate_settings("s3cret", Some("s3cret"), "2026-08-07 09:00", "2026-08-07 17:00", true)
            .unwrap();
        store
            .save_gate_settings("s3cret", None, "", "   ", true)
            .unwrap();

        let window = store.gate_window();
        assert!(window.opens_at.is_some());
        assert!(window.closes_at.is_some());
    }

    #[test]
    fn password_can_be_changed_after_login() {
        let store = store("change-password");
        store
            .save_gate_settings("old", Some("old"), "", "", true)
            .unwrap();

        assert!(matches!(
            store.change_password("wrong", "new"),
            Err(AdminError::WrongPassword)
        ));
        assert!(matches!(
            store.change_password("old", "  "),
            Err(AdminError::EmptyPassword)
        ));

        store.change_password("old", "new").unwrap();
        let result = store.save_gate_settings("old", None, "", "", true);
        assert!(matches!(result, Err(AdminError::WrongPassword)));
        store.save_gate_settings("new", None, "", "", true).unwrap();
    }

    #[test]
    fn password_check_can_be_disabled() {
        let store = store("no-password");
        store
            .save_gate_settings("", None, "2026-08-07 09:00", "2026-08-07 17:00", false)
            .unwrap();
        assert!(!store.has_password());
        assert!(store.gate_window().opens_at.is_some());
    }
}
