use serde::{Deserialize, Serialize};

/// Upload body: the browser decodes the chosen file and sends its text.
#[derive(Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    pub content: String,
}

/// Swatch edits, in the extraction order of the current color list.
#[derive(Deserialize)]
pub struct RecolorRequest {
    pub edits: Vec<(String, String)>,
}

#[derive(Serialize)]
pub struct ViewResponse {
    pub filename: Option<String>,
    pub display: Option<String>,
    pub colors: Vec<String>,
}

#[derive(Serialize)]
pub struct ConsoleResponse {
    pub messages: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
