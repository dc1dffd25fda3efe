use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::{SvgtintError, SvgtintResult};

pub const CONFIG_FILE: &str = "app.toml";
pub const DISPLAY_TEMPLATE: &str = "svg_display.html";
pub const INDEX_PAGE: &str = "index.html";

const SVG_PLACEHOLDER: &str = "%SVG%";

/// Loader for bundled static assets (config file and HTML templates).
#[derive(Debug, Clone)]
pub struct Resources {
    dir: PathBuf,
}

impl Resources {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn read(&self, filename: &str) -> SvgtintResult<String> {
        let path = self.dir.join(filename);
        fs::read_to_string(&path).map_err(|e| {
            SvgtintError::resource(format!("failed to read '{}': {}", path.display(), e))
        })
    }

    /// Fatal on a missing or malformed file; the process cannot run without
    /// valid logging configuration.
    pub fn load_config(&self) -> SvgtintResult<AppConfig> {
        let text = self.read(CONFIG_FILE)?;
        AppConfig::from_toml_str(&text)
    }

    /// Splices SVG markup into the display template.
    ///
    /// The markup is inserted verbatim; rendering uploaded SVG as-is is the
    /// whole point of the page.
    pub fn render_display(&self, svg: &str) -> SvgtintResult<String> {
        let template = self.read(DISPLAY_TEMPLATE)?;
        Ok(template.replace(SVG_PLACEHOLDER, svg))
    }
}
