use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the print surface.
#[derive(Error, Debug)]
pub enum PrintError {
    #[error("could not write print document: {0}")]
    Write(#[from] std::io::Error),

    #[error("no viewer available to open {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },
}

impl PrintError {
    pub fn user_message(&self) -> String {
        match self {
            PrintError::Write(e) => format!("print failed: {e}"),
            PrintError::OpenFailed { path, reason } => {
                format!("wrote {} but could not open a viewer: {reason}", path.display())
            }
        }
    }
}

/// Capability for materializing the rendered resume and handing it to the
/// desktop. Failure is never fatal; callers log and show a status line.
pub trait PrintSurface {
    /// Write `html` as a standalone document and open it in the system
    /// viewer, which owns the print dialog from there.
    fn open(&self, html: &str) -> Result<PathBuf, PrintError>;
}

/// Desktop opener for the current OS.
fn opener() -> &'static str {
    match std::env::consts::OS {
        "macos" => "open",
        "windows" => "explorer",
        _ => "xdg-open",
    }
}

/// Writes the document to the configured directory (or a kept temp file)
/// and spawns the desktop opener on it.
pub struct SystemPrintSurface {
    dir: Option<PathBuf>,
}

impl SystemPrintSurface {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Write the document and return its path. Temp files are persisted,
    /// otherwise the viewer would race the delete-on-drop.
    fn write_document(&self, html: &str) -> Result<PathBuf, PrintError> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        match &self.dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(format!("resume-{stamp}.html"));
                std::fs::write(&path, html)?;
                Ok(path)
            }
            None => {
                let file = tempfile::Builder::new()
                    .prefix("resume-")
                    .suffix(".html")
                    .tempfile()?;
                std::fs::write(file.path(), html)?;
                let (_, path) = file.keep().map_err(|e| PrintError::Write(e.error))?;
                Ok(path)
            }
        }
    }
}

impl PrintSurface for SystemPrintSurface {
    fn open(&self, html: &str) -> Result<PathBuf, PrintError> {
        let path = self.write_document(html)?;
        launch_viewer(&path)?;
        Ok(path)
    }
}

fn launch_viewer(path: &Path) -> Result<(), PrintError> {
    std::process::Command::new(opener())
        .arg(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| PrintError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_document_to_configured_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let surface = SystemPrintSurface::new(Some(tmp.path().join("out")));
        let path = surface.write_document("<html>doc</html>").unwrap();
        assert!(path.starts_with(tmp.path().join("out")));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html>doc</html>");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("resume-") && name.ends_with(".html"));
    }

    #[test]
    fn test_write_document_tempfile_survives() {
        let surface = SystemPrintSurface::new(None);
        let path = surface.write_document("kept").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_unwritable_dir_reports_write_error() {
        // A path under a regular file can never become a directory.
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();
        let surface = SystemPrintSurface::new(Some(blocker.join("out")));
        assert!(matches!(
            surface.write_document("doc"),
            Err(PrintError::Write(_))
        ));
    }
}
