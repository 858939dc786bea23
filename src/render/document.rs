//! Typed form of the Storm configuration document.
//!
//! Field names and nesting follow what Storm reads; unknown keys are
//! rejected when a document is loaded back.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::FolderMapping;

/// Errors found while loading or checking a document.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Backup path at index {index} is not absolute: {from}")]
    RelativeBackupPath { index: usize, from: String },

    #[error("Backup provider `{provider}` is not configured under cloud.providers")]
    UnknownBackupProvider { provider: String },

    #[error("Camera path at index {index} ({from}) has {field} set to unknown provider `{provider}`")]
    UnknownCameraProvider {
        index: usize,
        from: String,
        field: &'static str,
        provider: String,
    },

    #[error("Telegram {field} is empty")]
    EmptyTelegramField { field: &'static str },

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Files to back up and where they go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Backup {
    #[serde(default = "default_backup_provider")]
    pub provider: String,

    /// Remote directory for this device. Not read by Storm itself.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to: String,

    #[serde(default = "default_backup_max_kb")]
    pub max_kb: u32,

    #[serde(default = "default_backup_denylist")]
    pub denylist: Vec<String>,

    pub paths: Vec<FolderMapping>,
}

impl Default for Backup {
    fn default() -> Self {
        Self {
            provider: default_backup_provider(),
            to: String::new(),
            max_kb: default_backup_max_kb(),
            denylist: default_backup_denylist(),
            paths: Vec::new(),
        }
    }
}

fn default_backup_provider() -> String {
    "box".to_owned()
}

fn default_backup_max_kb() -> u32 {
    1024
}

fn default_backup_denylist() -> Vec<String> {
    vec![r".*\.app".to_owned()]
}

/// A cloud provider and its local staging directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Provider {
    /// Local buffer directory, staged before upload.
    pub buffer: String,

    /// rclone remote name, if the provider is pushed through rclone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rclone: Option<String>,

    /// All files land in one remote folder instead of mirroring the tree.
    #[serde(default, skip_serializing_if = "is_false")]
    pub single_folder: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_rclone_push_args: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_path_fallback: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Cloud providers by name, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cloud {
    #[serde(default)]
    pub providers: IndexMap<String, Provider>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Crypto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A camera folder and the providers receiving each kind of copy.
///
/// Only `low_unzipped` is written by the generator; the other targets fall
/// back to Storm's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraPath {
    pub from: String,
    pub to: String,

    #[serde(default = "default_low_unzipped")]
    pub low_unzipped: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_zipped: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_unzipped: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_zipped: Option<String>,
}

fn default_low_unzipped() -> String {
    "gphotos".to_owned()
}

impl CameraPath {
    /// Creates a path with only the unarchived low-quality target set.
    #[must_use]
    pub fn new(from: String, to: String, low_unzipped: String) -> Self {
        Self {
            from,
            to,
            low_unzipped,
            low_zipped: None,
            high_unzipped: None,
            high_zipped: None,
        }
    }

    /// Returns `(field, provider)` for `low_unzipped` and every target set
    /// explicitly. Unset targets use Storm's built-in defaults.
    pub fn targets(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("low_unzipped", Some(self.low_unzipped.as_str())),
            ("low_zipped", self.low_zipped.as_deref()),
            ("high_unzipped", self.high_unzipped.as_deref()),
            ("high_zipped", self.high_zipped.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, provider)| Some((field, provider?)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Camera {
    #[serde(default)]
    pub paths: Vec<CameraPath>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraBackup {
    #[serde(default)]
    pub local_source: String,
    #[serde(default)]
    pub local_intermediate: String,
    #[serde(default)]
    pub intermediate_provider: String,
    #[serde(default)]
    pub intermediate_relative: String,
    #[serde(default)]
    pub ref_provider: String,
}

/// Long-term archive settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Archive {
    #[serde(default = "default_archive_max_file_kb")]
    pub max_file_kb: u32,

    #[serde(default = "default_archive_max_zip_kb")]
    pub max_zip_kb: u32,

    #[serde(default)]
    pub denylist: Vec<String>,

    #[serde(default = "default_archive_source_provider")]
    pub source_provider: String,

    #[serde(default = "default_archive_provider")]
    pub provider: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_folder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmp_buffer: Option<String>,
}

fn default_archive_max_file_kb() -> u32 {
    300 * 1024
}

fn default_archive_max_zip_kb() -> u32 {
    500 * 1024
}

fn default_archive_source_provider() -> String {
    "alumni".to_owned()
}

fn default_archive_provider() -> String {
    "azure".to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Parallelism {
    #[serde(default = "default_workers")]
    pub workers: u8,
}

fn default_workers() -> u8 {
    4
}

/// Storm database location. Not read by Storm itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Db {
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Telegram {
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub chat_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
}

/// Tasker integration; present only when progress logging is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tasker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_task: Option<String>,
}

/// The full configuration document.
///
/// Every section Storm reads is accepted; sections the generator does not
/// write are kept optional so hand-edited files still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    #[serde(default)]
    pub backup: Backup,

    #[serde(default)]
    pub cloud: Cloud,

    #[serde(default)]
    pub crypto: Crypto,

    #[serde(default)]
    pub camera: Camera,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<Db>,

    #[serde(default)]
    pub telegram: Telegram,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasker: Option<Tasker>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<Archive>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_backup: Option<CameraBackup>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<Parallelism>,
}

impl Document {
    /// Serializes the document to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Parses a document from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid document.
    pub fn from_yaml(text: &str) -> Result<Self, ValidationError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads a document from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Checks the document, returning the first error encountered.
    ///
    /// # Errors
    ///
    /// Returns the first validation error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.validate_all().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Returns every validation error in the document.
    #[must_use]
    pub fn validate_all(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let providers: HashSet<&str> = self.cloud.providers.keys().map(String::as_str).collect();

        if !providers.contains(self.backup.provider.as_str()) {
            errors.push(ValidationError::UnknownBackupProvider {
                provider: self.backup.provider.clone(),
            });
        }

        for (index, path) in self.backup.paths.iter().enumerate() {
            // Device paths are POSIX regardless of the host.
            if !path.from.starts_with('/') {
                errors.push(ValidationError::RelativeBackupPath {
                    index,
                    from: path.from.clone(),
                });
            }
        }

        for (index, path) in self.camera.paths.iter().enumerate() {
            for (field, provider) in path.targets() {
                if !providers.contains(provider) {
                    errors.push(ValidationError::UnknownCameraProvider {
                        index,
                        from: path.from.clone(),
                        field,
                        provider: provider.to_owned(),
                    });
                }
            }
        }

        if self.telegram.token.trim().is_empty() {
            errors.push(ValidationError::EmptyTelegramField { field: "token" });
        }
        if self.telegram.chat_id.trim().is_empty() {
            errors.push(ValidationError::EmptyTelegramField { field: "chat_id" });
        }

        errors
    }

    /// Returns whether Tasker progress logging is configured.
    #[must_use]
    pub fn logs_to_tasker(&self) -> bool {
        self.tasker.as_ref().is_some_and(|t| t.log_task.is_some())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const MINIMAL: &str = r"
backup:
  provider: box
  to: Devices/pixel
  max_kb: 1024
  denylist:
    - .app
  paths:
    - from: /sdcard/Tasker
      to: Tasker
cloud:
  providers:
    box:
      buffer: /sdcard/Storm/box
      rclone: box
    gphotos:
      buffer: /sdcard/DCIM/GPhotos
      single_folder: true
crypto:
  password: hunter2
camera:
  paths:
    - from: /sdcard/Pictures/Camera
      to: Pictures/Camera
      low_unzipped: gphotos
db:
  path: /sdcard/Tasker/db/storm_storage.txt
telegram:
  token: '123:abc'
  chat_id: '-1001'
";

    #[test]
    fn test_parse_minimal_document() {
        let doc = Document::from_yaml(MINIMAL).unwrap();
        assert_eq!(doc.backup.paths.len(), 1);
        assert_eq!(doc.telegram.chat_id, "-1001");
        assert!(!doc.logs_to_tasker());

        let gphotos = &doc.cloud.providers["gphotos"];
        assert!(gphotos.single_folder);
        assert_eq!(gphotos.rclone, None);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = format!("{MINIMAL}extra:\n  key: value\n");
        assert_matches!(Document::from_yaml(&text), Err(ValidationError::ParseError(_)));
    }

    #[test]
    fn test_relative_backup_path() {
        let mut doc = Document::from_yaml(MINIMAL).unwrap();
        doc.backup.paths[0].from = "Tasker".to_owned();
        assert_matches!(
            doc.validate(),
            Err(ValidationError::RelativeBackupPath { index: 0, .. })
        );
    }

    #[test]
    fn test_unknown_providers() {
        let mut doc = Document::from_yaml(MINIMAL).unwrap();
        doc.backup.provider = "dropbox".to_owned();
        doc.camera.paths[0].low_unzipped = "flickr".to_owned();

        let errors = doc.validate_all();
        assert_eq!(errors.len(), 2);
        assert_matches!(&errors[0], ValidationError::UnknownBackupProvider { provider } if provider == "dropbox");
        assert_matches!(
            &errors[1],
            ValidationError::UnknownCameraProvider { field: "low_unzipped", provider, .. } if provider == "flickr"
        );
    }

    #[test]
    fn test_empty_telegram_fields() {
        let mut doc = Document::from_yaml(MINIMAL).unwrap();
        doc.telegram.chat_id = String::new();
        assert_matches!(
            doc.validate(),
            Err(ValidationError::EmptyTelegramField { field: "chat_id" })
        );
    }

    const HAND_EDITED: &str = r"
backup:
  paths:
    - from: /sdcard/Tasker
      to: Tasker
cloud:
  providers:
    box:
      buffer: /sdcard/Storm/box
      rclone: box
      extra_rclone_push_args:
        - --fast-list
      remote_path_fallback: Backups
    gphotos:
      buffer: /sdcard/DCIM/GPhotos
      single_folder: true
    pcloud:
      buffer: /sdcard/Storm/pcloud
camera:
  paths:
    - from: /sdcard/Pictures/Camera
      to: Pictures/Camera
      low_zipped: pcloud
camera_backup:
  local_source: /sdcard/DCIM/Camera
  ref_provider: gphotos
archive:
  provider: pcloud
  tmp_buffer: /sdcard/Storm/tmp
parallelism:
  workers: 2
telegram:
  token: '123:abc'
  chat_id: '-1001'
  db_path: /sdcard/Storm/telegram.db
tasker: {}
";

    #[test]
    fn test_parse_consumer_sections() {
        let doc = Document::from_yaml(HAND_EDITED).unwrap();

        assert_eq!(doc.backup.provider, "box");
        assert_eq!(doc.backup.max_kb, 1024);
        assert_eq!(doc.backup.denylist, vec![r".*\.app".to_owned()]);

        let boxed = &doc.cloud.providers["box"];
        assert_eq!(boxed.extra_rclone_push_args, Some(vec!["--fast-list".to_owned()]));
        assert_eq!(boxed.remote_path_fallback.as_deref(), Some("Backups"));

        let camera = &doc.camera.paths[0];
        assert_eq!(camera.low_unzipped, "gphotos");
        assert_eq!(camera.low_zipped.as_deref(), Some("pcloud"));

        let archive = doc.archive.as_ref().unwrap();
        assert_eq!(archive.provider, "pcloud");
        assert_eq!(archive.source_provider, "alumni");
        assert_eq!(archive.max_zip_kb, 500 * 1024);
        assert_eq!(doc.camera_backup.as_ref().unwrap().ref_provider, "gphotos");
        assert_eq!(doc.parallelism.as_ref().unwrap().workers, 2);
        assert_eq!(doc.crypto.password, None);
        assert_eq!(doc.db, None);
        assert!(!doc.logs_to_tasker());

        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_explicit_camera_target_checked() {
        let mut doc = Document::from_yaml(HAND_EDITED).unwrap();
        doc.camera.paths[0].high_zipped = Some("azure".to_owned());
        assert_matches!(
            doc.validate(),
            Err(ValidationError::UnknownCameraProvider { field: "high_zipped", .. })
        );
    }

    #[test]
    fn test_providers_keep_document_order() {
        let doc = Document::from_yaml(HAND_EDITED).unwrap();
        let names: Vec<&str> = doc.cloud.providers.keys().map(String::as_str).collect();
        assert_eq!(names, ["box", "gphotos", "pcloud"]);
    }

    #[test]
    fn test_load_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), MINIMAL).unwrap();
        let doc = Document::load_from_file(file.path()).unwrap();
        assert_eq!(doc.crypto.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_load_missing_file() {
        assert_matches!(
            Document::load_from_file("/nonexistent/storm/config.yaml"),
            Err(ValidationError::IoError(_))
        );
    }
}
