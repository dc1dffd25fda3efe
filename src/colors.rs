use once_cell::sync::Lazy;
use regex::Regex;

// An early revision matched [A-F0-9]{6} only, silently missing lowercase
// markup; case-insensitive is the default and the strict form stays opt-in.
static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[0-9a-fA-F]{6}").expect("hex color pattern"));

/// Finds hex color tokens (`#` + 6 hex digits) in SVG markup.
#[derive(Debug, Clone)]
pub struct ColorExtractor {
    pattern: Regex,
}

impl ColorExtractor {
    pub fn new() -> Self {
        Self {
            pattern: HEX_COLOR.clone(),
        }
    }

    /// Uppercase-only matching, kept for markup known to be normalized.
    pub fn case_sensitive() -> Self {
        Self {
            pattern: Regex::new(r"#[A-F0-9]{6}").expect("hex color pattern"),
        }
    }

    /// Distinct tokens in order of first appearance.
    pub fn extract(&self, content: &str) -> Vec<String> {
        let mut colors: Vec<String> = Vec::new();
        for m in self.pattern.find_iter(content) {
            if !colors.iter().any(|c| c == m.as_str()) {
                colors.push(m.as_str().to_string());
            }
        }
        colors
    }
}

impl Default for ColorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

pub fn extract_colors(content: &str) -> Vec<String> {
    ColorExtractor::new().extract(content)
}

/// Applies literal old -> new substitutions in edit order.
///
/// Edits are expected in the extraction order of the current color list, so
/// a replacement that collides with a later edit's target is resolved
/// deterministically: later edits see the already-rewritten text.
pub fn recolor(content: &str, edits: &[(String, String)]) -> String {
    let mut result = content.to_string();
    for (old, new) in edits {
        if old != new {
            result = result.replace(old.as_str(), new.as_str());
        }
    }
    result
}
