use crate::colors::{extract_colors, recolor};

/// Per-session view record.
///
/// Never mutated in place: every interaction builds a replacement with
/// copy-with-update constructors and the web layer swaps it in. `colors` is
/// always exactly the distinct hex tokens of `content` in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub filename: Option<String>,
    pub content: Option<String>,
    pub colors: Vec<String>,
    pub messages: Vec<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the uploaded file; console messages carry over.
    pub fn with_upload(&self, filename: String, content: String) -> Self {
        let colors = extract_colors(&content);
        Self {
            filename: Some(filename),
            content: Some(content),
            colors,
            messages: self.messages.clone(),
        }
    }

    /// Applies swatch edits to the current markup.
    ///
    /// Returns `None` when nothing has been uploaded yet, leaving the
    /// caller's state untouched.
    pub fn with_recolor(&self, edits: &[(String, String)]) -> Option<Self> {
        let content = self.content.as_deref()?;
        let updated = recolor(content, edits);
        let colors = extract_colors(&updated);
        Some(Self {
            filename: self.filename.clone(),
            content: Some(updated),
            colors,
            messages: self.messages.clone(),
        })
    }

    pub fn with_messages(&self, messages: Vec<String>) -> Self {
        Self {
            filename: self.filename.clone(),
            content: self.content.clone(),
            colors: self.colors.clone(),
            messages,
        }
    }

    pub fn with_cleared_console(&self) -> Self {
        self.with_messages(Vec::new())
    }
}
