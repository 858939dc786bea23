//! Assembles the Storm configuration document.
//!
//! Everything except the device id, secrets, chat id and backup folders is
//! fixed: the provider set, camera folders and database path are the same
//! for every device.

mod document;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, FolderMapping, GeneratorSettings, Options, parse_folder_list};

pub use document::{
    Archive, Backup, Camera, CameraBackup, CameraPath, Cloud, Crypto, Db, Document, Parallelism,
    Provider, Tasker, Telegram, ValidationError,
};

/// Provider receiving device backups.
pub const BACKUP_PROVIDER: &str = "box";

/// Size cap for backed up files, in KiB.
pub const BACKUP_MAX_KB: u32 = 1024;

/// Patterns excluded from backups.
pub const BACKUP_DENYLIST: &[&str] = &[".app"];

/// Storm database location on the device.
pub const DB_PATH: &str = "/sdcard/Tasker/db/storm_storage.txt";

/// Tasker task that receives progress lines.
pub const LOG_TASK: &str = "Log Storm progress";

/// `(name, buffer, rclone remote, single folder)`
const PROVIDERS: &[(&str, &str, Option<&str>, bool)] = &[
    ("alumni", "/sdcard/Storm/alumni", Some("alumni"), false),
    ("box", "/sdcard/Storm/box", Some("box"), false),
    ("gphotos", "/sdcard/DCIM/GPhotos", None, true),
    ("vvgphotos", "/sdcard/Storm/VVGPhotos", Some("vvgphotos"), true),
    ("pcloud", "/sdcard/Storm/pcloud", Some("pcloud"), false),
    ("telegram", "/sdcard/Storm/telegram", None, false),
];

/// `(from, to, low_unzipped)`
const CAMERA_PATHS: &[(&str, &str, &str)] = &[
    ("/sdcard/Pictures/Camera", "Pictures/Camera", "gphotos"),
    ("/sdcard/Pictures/VV/Camera", "VV/Pictures/Camera", "vvgphotos"),
];

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to serialize configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Builds the backup folder list.
#[must_use]
pub fn render_folder_mappings(folders: &str) -> Vec<FolderMapping> {
    let paths = parse_folder_list(folders);
    debug!("Rendered {} backup folder mappings", paths.len());
    paths
}

fn cloud() -> Cloud {
    let providers: IndexMap<String, Provider> = PROVIDERS
        .iter()
        .map(|&(name, buffer, rclone, single_folder)| {
            let provider = Provider {
                buffer: buffer.to_owned(),
                rclone: rclone.map(str::to_owned),
                single_folder,
                extra_rclone_push_args: None,
                remote_path_fallback: None,
            };
            (name.to_owned(), provider)
        })
        .collect();

    Cloud { providers }
}

fn camera() -> Camera {
    let paths = CAMERA_PATHS
        .iter()
        .map(|&(from, to, low_unzipped)| {
            CameraPath::new(from.to_owned(), to.to_owned(), low_unzipped.to_owned())
        })
        .collect();

    Camera { paths }
}

/// Builds the document for the given settings and options.
///
/// # Errors
///
/// Returns an error if the options select an unknown chat.
pub fn build_document(
    settings: &GeneratorSettings,
    options: &Options,
) -> Result<Document, ConfigError> {
    let selector = options.chat_selector();
    let chat_id = settings.chat_ids.resolve(&selector)?;
    debug!("Using telegram chat `{}`", selector);

    let tasker = options.should_log().then(|| Tasker {
        log_task: Some(LOG_TASK.to_owned()),
    });

    Ok(Document {
        backup: Backup {
            provider: BACKUP_PROVIDER.to_owned(),
            to: format!("Devices/{}", settings.device_id),
            max_kb: BACKUP_MAX_KB,
            denylist: BACKUP_DENYLIST.iter().map(|&s| s.to_owned()).collect(),
            paths: render_folder_mappings(&settings.backup_folders),
        },
        cloud: cloud(),
        crypto: Crypto {
            password: Some(settings.crypto_password.clone()),
        },
        camera: camera(),
        db: Some(Db {
            path: DB_PATH.to_owned(),
        }),
        telegram: Telegram {
            token: settings.telegram_token.clone(),
            chat_id: chat_id.to_owned(),
            db_path: None,
        },
        tasker,
        archive: None,
        camera_backup: None,
        parallelism: None,
    })
}

/// Renders the configuration document as YAML.
///
/// # Errors
///
/// Returns an error if the chat selector is unknown or serialization fails.
pub fn render(settings: &GeneratorSettings, options: &Options) -> Result<String, RenderError> {
    let document = build_document(settings, options)?;
    Ok(document.to_yaml()?)
}
