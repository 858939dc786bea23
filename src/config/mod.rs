//! Generator inputs for the Storm configuration.
//!
//! Covers the options JSON, chat-id selection, backup folder mappings and
//! the environment-backed settings that hold device id and secrets.

mod chat;
mod folders;
mod options;
mod settings;

pub use chat::{ChatIds, ChatSelector};
pub use folders::{FolderMapping, parse_folder_list};
pub use options::{Options, TaskerOptions, TelegramOptions};
pub use settings::{ConfigError, GeneratorSettings};

/// Root prepended to relative backup sources.
pub const DEFAULT_ROOT: &str = "/sdcard/";

/// Chat selector used when the options do not name one.
pub const DEFAULT_CHAT_SELECTOR: &str = "bot";

/// Backup folders rendered when no list is supplied.
pub const DEFAULT_BACKUP_FOLDERS: &str = "dotfiles/local:dotfiles
Tasker
epsxe/memcards
/data/data/com.termux/files/home/.termux:Termux/termux";
