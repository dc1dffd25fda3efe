use std::collections::HashMap;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

use crate::error::{SvgtintError, SvgtintResult};

/// Application configuration mapped from `app.toml`.
///
/// Only logging is configured through the file; everything else comes from
/// the command line.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub version: u32,
    pub disable_existing_loggers: bool,
    #[serde(default)]
    pub loggers: HashMap<String, LoggerProps>,
    #[serde(default)]
    pub handlers: HashMap<String, HandlerProps>,
    #[serde(default)]
    pub formatters: HashMap<String, FormatterProps>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggerProps {
    pub level: String,
    pub handlers: Vec<String>,
    pub propagate: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HandlerProps {
    pub class: String,
    pub level: String,
    pub formatter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatterProps {
    pub format: String,
    pub datefmt: String,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> SvgtintResult<Self> {
        let config: AppConfig = toml::from_str(text)?;
        config.logging.validate()?;
        Ok(config)
    }
}

impl LoggingConfig {
    /// Cross-reference checks that toml deserialization cannot express.
    pub fn validate(&self) -> SvgtintResult<()> {
        if self.version != 1 {
            return Err(SvgtintError::config(format!(
                "unsupported logging config version {}",
                self.version
            )));
        }
        for (name, formatter) in &self.formatters {
            validate_datefmt(name, &formatter.datefmt)?;
        }
        for (name, handler) in &self.handlers {
            if !self.formatters.contains_key(&handler.formatter) {
                return Err(SvgtintError::config(format!(
                    "handler '{}' references unknown formatter '{}'",
                    name, handler.formatter
                )));
            }
            parse_level(&handler.level)?;
        }
        for (name, logger) in &self.loggers {
            for handler in &logger.handlers {
                if !self.handlers.contains_key(handler) {
                    return Err(SvgtintError::config(format!(
                        "logger '{}' references unknown handler '{}'",
                        name, handler
                    )));
                }
            }
            parse_level(&logger.level)?;
        }
        Ok(())
    }

    /// Level of the root logger; the bridge filters everything below it.
    pub fn root_level(&self) -> SvgtintResult<LevelFilter> {
        match self.loggers.get("root") {
            Some(root) => parse_level(&root.level),
            None => Ok(LevelFilter::INFO),
        }
    }

    pub fn set_root_level(&mut self, level: &str) -> SvgtintResult<()> {
        parse_level(level)?;
        if let Some(root) = self.loggers.get_mut("root") {
            root.level = level.to_string();
        }
        Ok(())
    }
}

/// A bad strftime spec would otherwise panic at the first formatted record,
/// inside the detached dispatcher task where nobody sees it.
fn validate_datefmt(name: &str, datefmt: &str) -> SvgtintResult<()> {
    use chrono::format::Item;
    use chrono::format::strftime::StrftimeItems;

    if StrftimeItems::new(datefmt).any(|item| matches!(item, Item::Error)) {
        return Err(SvgtintError::config(format!(
            "formatter '{}' has invalid datefmt '{}'",
            name, datefmt
        )));
    }
    Ok(())
}

/// Accepts Python-style level names so the original `app.toml` keeps working.
pub fn parse_level(name: &str) -> SvgtintResult<LevelFilter> {
    match name.to_ascii_uppercase().as_str() {
        "NOTSET" | "TRACE" => Ok(LevelFilter::TRACE),
        "DEBUG" => Ok(LevelFilter::DEBUG),
        "INFO" => Ok(LevelFilter::INFO),
        "WARN" | "WARNING" => Ok(LevelFilter::WARN),
        "ERROR" | "CRITICAL" => Ok(LevelFilter::ERROR),
        other => Err(SvgtintError::config(format!(
            "unknown log level '{}'",
            other
        ))),
    }
}
