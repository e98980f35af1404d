use super::Document;
use crate::error::{CoreError, Result};
use crate::storage::{parse_sheet, write_sheet};
use std::path::{Path, PathBuf};

impl Document {
    /// Save to the current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = &self.file_path else {
            return Err(CoreError::NoFilePath);
        };

        write_sheet(path, &self.sheet)?;
        self.modified = false;
        Ok(path.clone())
    }

    /// Save to a new path, which becomes the current path.
    pub fn save_file_as(&mut self, path: &Path) -> Result<PathBuf> {
        self.file_path = Some(path.to_path_buf());
        self.save_file()
    }

    /// Load from a file, replacing the current sheet.
    ///
    /// Bad lines are skipped: the first one is queued as a notice, the rest
    /// of the file still loads.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let (sheet, issues) = parse_sheet(path)?;
        self.sheet = sheet;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        for issue in issues {
            self.push_notice(issue.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::View;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gridcalc_io_{}_{}.grid", std::process::id(), name))
    }

    #[test]
    fn save_without_path_fails() {
        let mut doc = Document::new();
        assert!(matches!(doc.save_file(), Err(CoreError::NoFilePath)));
    }

    #[test]
    fn save_and_reload_round_trip() {
        let path = temp_path("round_trip");
        let mut doc = Document::new();
        doc.set_cell_text(0, 0, "=2+3").expect("in range");
        doc.set_cell_text(3, 1, "label").expect("in range");
        doc.save_file_as(&path).expect("save");
        assert!(!doc.modified);

        let mut reloaded = Document::new();
        reloaded.load_file(&path).expect("load");
        assert_eq!(reloaded.sheet.text(0, 0), Some("=2+3"));
        assert_eq!(reloaded.sheet.text(3, 1), Some("label"));
        assert_eq!(reloaded.display_cell(0, 0, View::Values).content, "5");
        assert!(!reloaded.modified);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_with_bad_line_keeps_good_cells_and_queues_notice() {
        let path = temp_path("bad_line");
        std::fs::write(&path, "0 0 =1+1\nnonsense\n1 0 ok\n").expect("write");

        let mut doc = Document::new();
        doc.load_file(&path).expect("load");
        assert_eq!(doc.sheet.text(0, 0), Some("=1+1"));
        assert_eq!(doc.sheet.text(1, 0), Some("ok"));
        let notice = doc.take_notice().expect("a notice is queued");
        assert!(notice.contains("line 2"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_an_io_error() {
        let path = temp_path("definitely_missing");
        let _ = std::fs::remove_file(&path);
        let mut doc = Document::new();
        assert!(matches!(doc.load_file(&path), Err(CoreError::Io(_))));
    }
}
