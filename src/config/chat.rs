//! Telegram chat selection.

use std::fmt;
use std::str::FromStr;

use super::settings::ConfigError;

/// Known chat selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatSelector {
    /// The bot's own chat.
    Bot,

    /// The `dv` chat.
    Dv,
}

impl ChatSelector {
    /// All selectors, in display order.
    pub const ALL: [Self; 2] = [Self::Bot, Self::Dv];

    /// Returns the selector's key as written in the options.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bot => "bot",
            Self::Dv => "dv",
        }
    }
}

impl fmt::Display for ChatSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatSelector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|selector| selector.as_str() == key)
            .ok_or_else(|| ConfigError::UnknownChatSelector {
                selector: s.to_owned(),
                available: Self::ALL.iter().map(ToString::to_string).collect(),
            })
    }
}

/// Chat ids keyed by selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatIds {
    pub bot: String,
    pub dv: String,
}

impl ChatIds {
    /// Creates the lookup table.
    #[must_use]
    pub const fn new(bot: String, dv: String) -> Self {
        Self { bot, dv }
    }

    /// Returns the chat id for a selector.
    #[must_use]
    pub fn get(&self, selector: ChatSelector) -> &str {
        match selector {
            ChatSelector::Bot => &self.bot,
            ChatSelector::Dv => &self.dv,
        }
    }

    /// Resolves a raw selector string to its chat id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownChatSelector`] for selectors outside
    /// the table.
    pub fn resolve(&self, selector: &str) -> Result<&str, ConfigError> {
        let selector: ChatSelector = selector.parse()?;
        Ok(self.get(selector))
    }
}
