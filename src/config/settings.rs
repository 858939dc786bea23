//! Environment-backed generator settings.

use std::path::Path;

use super::DEFAULT_BACKUP_FOLDERS;
use super::chat::ChatIds;

pub const ENV_DEVICE_ID: &str = "STORM_DEVICE_ID";
pub const ENV_CRYPTO_PASSWORD: &str = "STORM_CRYPTO_PASSWORD";
pub const ENV_TELEGRAM_TOKEN: &str = "STORM_TELEGRAM_TOKEN";
pub const ENV_CHAT_ID_BOT: &str = "STORM_TELEGRAM_CHAT_ID_BOT";
pub const ENV_CHAT_ID_DV: &str = "STORM_TELEGRAM_CHAT_ID_DV";
pub const ENV_OPTIONS: &str = "STORM_OPTIONS";
pub const ENV_BACKUP_FOLDERS: &str = "STORM_BACKUP_FOLDERS";

/// Everything the renderer needs besides the parsed options.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Device identifier, used in the backup destination.
    pub device_id: String,

    /// Password written to the `crypto` section.
    pub crypto_password: String,

    /// Telegram bot token.
    pub telegram_token: String,

    /// Chat ids available to the chat selector.
    pub chat_ids: ChatIds,

    /// Raw options JSON.
    pub options: String,

    /// Folder list, one `source[:dest]` per line.
    pub backup_folders: String,
}

fn default_options() -> String {
    "{}".to_owned()
}

fn default_backup_folders() -> String {
    DEFAULT_BACKUP_FOLDERS.to_owned()
}

impl GeneratorSettings {
    /// Creates settings from the process environment.
    ///
    /// Expects `STORM_DEVICE_ID`, `STORM_CRYPTO_PASSWORD`,
    /// `STORM_TELEGRAM_TOKEN` and `STORM_TELEGRAM_CHAT_ID_BOT` to be set.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates settings from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::MissingEnvVar(key));

        let chat_id_bot = require(ENV_CHAT_ID_BOT)?;
        let chat_id_dv = get(ENV_CHAT_ID_DV).unwrap_or_else(|| chat_id_bot.clone());

        Ok(Self {
            device_id: require(ENV_DEVICE_ID)?,
            crypto_password: require(ENV_CRYPTO_PASSWORD)?,
            telegram_token: require(ENV_TELEGRAM_TOKEN)?,
            chat_ids: ChatIds::new(chat_id_bot, chat_id_dv),
            options: get(ENV_OPTIONS).unwrap_or_else(default_options),
            backup_folders: get(ENV_BACKUP_FOLDERS).unwrap_or_else(default_backup_folders),
        })
    }

    /// Replaces the folder list with the contents of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load_backup_folders(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.backup_folders = std::fs::read_to_string(path)?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid options JSON: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("Unknown telegram chat selector `{selector}` (expected one of: {})", available.join(", "))]
    UnknownChatSelector {
        selector: String,
        available: Vec<String>,
    },

    #[error("Failed to read folder list: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        (ENV_DEVICE_ID, "pixel"),
        (ENV_CRYPTO_PASSWORD, "hunter2"),
        (ENV_TELEGRAM_TOKEN, "123:abc"),
        (ENV_CHAT_ID_BOT, "-1001"),
    ];

    #[test]
    fn test_from_lookup_defaults() {
        let settings = GeneratorSettings::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(settings.device_id, "pixel");
        assert_eq!(settings.crypto_password, "hunter2");
        assert_eq!(settings.telegram_token, "123:abc");
        assert_eq!(settings.chat_ids, ChatIds::new("-1001".to_owned(), "-1001".to_owned()));
        assert_eq!(settings.options, "{}");
        assert_eq!(settings.backup_folders, DEFAULT_BACKUP_FOLDERS);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            (ENV_CHAT_ID_DV, "-2002"),
            (ENV_OPTIONS, r#"{"tasker":{"log":false}}"#),
            (ENV_BACKUP_FOLDERS, "Music"),
        ]);
        let settings = GeneratorSettings::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(settings.chat_ids.dv, "-2002");
        assert_eq!(settings.options, r#"{"tasker":{"log":false}}"#);
        assert_eq!(settings.backup_folders, "Music");
    }

    #[test]
    fn test_missing_required_var() {
        let vars: Vec<_> = REQUIRED
            .into_iter()
            .filter(|(k, _)| *k != ENV_TELEGRAM_TOKEN)
            .collect();
        assert_matches!(
            GeneratorSettings::from_lookup(lookup(&vars)),
            Err(ConfigError::MissingEnvVar(ENV_TELEGRAM_TOKEN))
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut vars = REQUIRED.to_vec();
        vars[0] = (ENV_DEVICE_ID, "  ");
        assert_matches!(
            GeneratorSettings::from_lookup(lookup(&vars)),
            Err(ConfigError::MissingEnvVar(ENV_DEVICE_ID))
        );
    }

    #[test]
    fn test_load_backup_folders() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Tasker\nDCIM:Photos").unwrap();

        let mut settings = GeneratorSettings::from_lookup(lookup(&REQUIRED)).unwrap();
        settings.load_backup_folders(file.path()).unwrap();
        assert_eq!(settings.backup_folders, "Tasker\nDCIM:Photos\n");
    }

    #[test]
    fn test_load_backup_folders_missing_file() {
        let mut settings = GeneratorSettings::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_matches!(
            settings.load_backup_folders("/nonexistent/storm/folders.txt"),
            Err(ConfigError::IoError(_))
        );
    }
}
