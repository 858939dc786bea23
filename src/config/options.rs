//! Options JSON accepted by the generator.
//!
//! Any valid JSON is accepted. Fields that are missing, null or of an
//! unexpected shape fall back to their defaults.

use serde_json::Value;
use tracing::debug;

use super::DEFAULT_CHAT_SELECTOR;
use super::settings::ConfigError;

/// Telegram-related options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelegramOptions {
    /// Chat selector, matched case-insensitively (`bot`, `dv`).
    pub chat: Option<String>,
}

/// Tasker-related options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskerOptions {
    /// Whether progress should be logged through the Tasker log task.
    pub log: Option<bool>,
}

/// Generator options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub telegram: TelegramOptions,
    pub tasker: TaskerOptions,
}

/// JavaScript-style truthiness, used for loosely typed flags.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl Options {
    /// Parses options from a JSON string. Blank input yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOptions`] if the text is not valid JSON.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    /// Extracts the known options from a JSON value.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let chat = value
            .get("telegram")
            .and_then(|t| t.get("chat"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        let log = value
            .get("tasker")
            .and_then(|t| t.get("log"))
            .filter(|v| !v.is_null())
            .map(truthy);

        Self {
            telegram: TelegramOptions { chat },
            tasker: TaskerOptions { log },
        }
    }

    /// Returns the lower-cased chat selector, `bot` when none is set.
    #[must_use]
    pub fn chat_selector(&self) -> String {
        self.telegram
            .chat
            .as_deref()
            .filter(|chat| !chat.is_empty())
            .unwrap_or(DEFAULT_CHAT_SELECTOR)
            .to_lowercase()
    }

    /// Returns whether Tasker logging is enabled. Defaults to `true`.
    #[must_use]
    pub fn should_log(&self) -> bool {
        let log = self.tasker.log;
        debug!(?log, "Resolved tasker logging preference");
        log.unwrap_or(true)
    }
}
