//! Runtime configuration read from the environment.
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `VERITY_COLOR` | `always`, `never`, `auto` | `auto` |
//! | `NO_COLOR` | any non-empty value disables color | unset |
//! | `VERITY_LOG` | `off`, `warn`, `debug` | `warn` |
//!
//! `VERITY_COLOR` takes precedence over `NO_COLOR`.

use std::io::IsTerminal;

use thiserror::Error;

pub const COLOR_VAR: &str = "VERITY_COLOR";
pub const NO_COLOR_VAR: &str = "NO_COLOR";
pub const LOG_VAR: &str = "VERITY_LOG";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: expected one of {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Whether failure banners are colored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    Always,
    Never,
    /// Color when stderr is a terminal.
    #[default]
    Auto,
}

impl ColorChoice {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "always" => Some(ColorChoice::Always),
            "never" => Some(ColorChoice::Never),
            "auto" => Some(ColorChoice::Auto),
            _ => None,
        }
    }
}

/// Verbosity of the library's own diagnostics on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off,
    #[default]
    Warn,
    Debug,
}

impl LogLevel {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "off" => Some(LogLevel::Off),
            "warn" => Some(LogLevel::Warn),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub color: ColorChoice,
    pub log: LogLevel,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let color = match get(COLOR_VAR) {
            Some(value) => ColorChoice::from_name(&value).ok_or(ConfigError::Invalid {
                var: COLOR_VAR,
                value,
                expected: "always, never, auto",
            })?,
            None if get(NO_COLOR_VAR).is_some() => ColorChoice::Never,
            None => ColorChoice::Auto,
        };

        let log = match get(LOG_VAR) {
            Some(value) => LogLevel::from_name(&value).ok_or(ConfigError::Invalid {
                var: LOG_VAR,
                value,
                expected: "off, warn, debug",
            })?,
            None => LogLevel::default(),
        };

        Ok(Config { color, log })
    }

    pub fn color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    pub fn log(mut self, log: LogLevel) -> Self {
        self.log = log;
        self
    }

    pub fn use_color(&self) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stderr().is_terminal(),
        }
    }
}
