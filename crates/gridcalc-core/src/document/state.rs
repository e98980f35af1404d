use crate::error::Result;
use gridcalc_engine::engine::Sheet;
use std::path::PathBuf;

/// UI-agnostic document state: one sheet plus its file binding.
pub struct Document {
    /// The cell sheet.
    pub sheet: Sheet,
    /// Current file path.
    pub file_path: Option<PathBuf>,
    /// Whether the sheet has been modified since the last save/load.
    pub modified: bool,
    /// Pending one-shot notice for the UI. The first message queued since
    /// the last take wins; later ones are dropped.
    notice: Option<String>,
}

impl Document {
    /// Create a new document.
    ///
    /// This constructor is side-effect free: it does not touch the
    /// filesystem.
    pub fn new() -> Self {
        Document {
            sheet: Sheet::default(),
            file_path: None,
            modified: false,
            notice: None,
        }
    }

    /// Create a document and load `path` if it exists. A missing file just
    /// binds the path so the first save creates it.
    pub fn with_file(path: Option<PathBuf>) -> Result<Self> {
        let mut doc = Self::new();
        if let Some(p) = path {
            if p.exists() {
                doc.load_file(&p)?;
            } else {
                doc.file_path = Some(p);
            }
        }
        Ok(doc)
    }

    /// Queue a notice unless one is already pending.
    pub fn push_notice(&mut self, message: impl Into<String>) {
        if self.notice.is_none() {
            self.notice = Some(message.into());
        }
    }

    /// Take the pending notice, clearing the slot.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
