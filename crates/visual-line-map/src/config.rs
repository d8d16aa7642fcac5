//! Wrap configuration and its string tokens.
//!
//! The tokens (`"nowrap"`, `"word"`, `"letter"`, `"viewport"`, `"line_breaking_column"`) are the
//! only persisted surface of this crate; they are shared by [`std::str::FromStr`],
//! [`std::fmt::Display`] and serde.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default tab width (in space advances).
pub const DEFAULT_TAB_WIDTH: u32 = 4;

/// Errors produced when parsing configuration tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown wrap mode '{0}' (expected nowrap, word or letter)")]
    /// The token does not name a [`WrapMode`].
    UnknownWrapMode(String),

    #[error("unknown wrap boundary '{0}' (expected viewport or line_breaking_column)")]
    /// The token does not name a [`WrapBoundary`].
    UnknownWrapBoundary(String),
}

/// Soft wrapping policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    /// No soft wrapping: one visual row per logical line.
    #[default]
    NoWrap,
    /// Break after whitespace/punctuation, falling back to a hard break.
    Word,
    /// Break exactly where the width limit is exceeded.
    Letter,
}

impl WrapMode {
    /// Stable string token.
    pub const fn as_token(self) -> &'static str {
        match self {
            WrapMode::NoWrap => "nowrap",
            WrapMode::Word => "word",
            WrapMode::Letter => "letter",
        }
    }

    /// Lenient parse: case-insensitive, unknown tokens map to [`WrapMode::NoWrap`].
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for WrapMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nowrap" => Ok(WrapMode::NoWrap),
            "word" => Ok(WrapMode::Word),
            "letter" => Ok(WrapMode::Letter),
            _ => Err(ConfigError::UnknownWrapMode(s.to_string())),
        }
    }
}

/// What the wrap width is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapBoundary {
    /// Wrap at the viewport's right edge.
    #[default]
    Viewport,
    /// Wrap at a fixed column (measured in space advances).
    LineBreakingColumn,
}

impl WrapBoundary {
    /// Stable string token.
    pub const fn as_token(self) -> &'static str {
        match self {
            WrapBoundary::Viewport => "viewport",
            WrapBoundary::LineBreakingColumn => "line_breaking_column",
        }
    }

    /// Lenient parse: case-insensitive, unknown tokens map to [`WrapBoundary::Viewport`].
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }

    /// Resolve the pixel width to hand to the view cache.
    ///
    /// `LineBreakingColumn` uses `column * space_advance`, falling back to the viewport width
    /// when no column is configured.
    pub fn max_width(self, viewport_width: f32, column: u32, space_advance: f32) -> f32 {
        match self {
            WrapBoundary::LineBreakingColumn if column > 0 => column as f32 * space_advance,
            _ => viewport_width,
        }
    }
}

impl fmt::Display for WrapBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for WrapBoundary {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewport" => Ok(WrapBoundary::Viewport),
            "line_breaking_column" => Ok(WrapBoundary::LineBreakingColumn),
            _ => Err(ConfigError::UnknownWrapBoundary(s.to_string())),
        }
    }
}

/// Soft wrap configuration of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapConfig {
    /// Wrap policy.
    pub mode: WrapMode,
    /// Wrap boundary.
    pub boundary: WrapBoundary,
    /// Tab width in space advances (at least 1).
    pub tab_width: u32,
    /// Align wrapped continuation rows under the first row's text start.
    pub keep_indentation: bool,
}

impl WrapConfig {
    /// Default configuration with the given wrap mode.
    pub fn with_mode(mode: WrapMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Whether soft wrapping is enabled.
    pub fn is_wrap_enabled(&self) -> bool {
        self.mode != WrapMode::NoWrap
    }

    /// Tab width clamped to at least 1.
    pub fn effective_tab_width(&self) -> u32 {
        self.tab_width.max(1)
    }
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            mode: WrapMode::NoWrap,
            boundary: WrapBoundary::Viewport,
            tab_width: DEFAULT_TAB_WIDTH,
            keep_indentation: true,
        }
    }
}
