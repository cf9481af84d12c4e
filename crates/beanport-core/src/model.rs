use camino::Utf8PathBuf;

/// Metadata key marking a transaction as a repeat within the current run.
/// Double-underscore keys are internal markers and never render.
pub const DUPLICATE_META: &str = "__duplicate__";

/// A candidate statement file: path, contents, and guessed MIME type.
///
/// Contents are read up front so importers stay pure; statement exports are
/// small text files.
#[derive(Clone, Debug)]
pub struct Document {
    pub path: Utf8PathBuf,
    pub contents: String,
    pub mime: Option<String>,
}

impl Document {
    pub fn new(path: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        let path = path.into();
        let mime = guess_mime(&path);
        Self {
            path,
            contents: contents.into(),
            mime,
        }
    }

    /// Final path component (`Downloads/a.ofx` -> `a.ofx`).
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or(self.path.as_str())
    }

    /// File name without the final extension.
    pub fn stem(&self) -> &str {
        self.path.file_stem().unwrap_or(self.path.as_str())
    }

    pub fn extension(&self) -> Option<&str> {
        self.path.extension()
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }
}

/// MIME lookup by extension. The OFX family is not in the shared registry,
/// so those are mapped explicitly, matching what banks actually serve.
fn guess_mime(path: &Utf8PathBuf) -> Option<String> {
    let ext = path.extension()?.to_ascii_lowercase();
    match ext.as_str() {
        "ofx" => Some("application/x-ofx".to_string()),
        "qfx" => Some("application/vnd.intu.qfx".to_string()),
        "qbo" => Some("application/vnd.intu.qbo".to_string()),
        _ => mime_guess::from_path(path.as_std_path())
            .first()
            .map(|m| m.essence_str().to_string()),
    }
}
