use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Report payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The report payloads carried in an analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Csv,
    Pdf,
    /// Distribution chart image.
    Chart,
}

impl ReportKind {
    pub fn filename(self) -> &'static str {
        match self {
            Self::Csv => "analysis.csv",
            Self::Pdf => "analysis.pdf",
            Self::Chart => "emotion_distribution.png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
            Self::Chart => "image/png",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV Report",
            Self::Pdf => "PDF Report",
            Self::Chart => "Distribution Chart",
        }
    }
}

/// Export controls on the download step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadControl {
    /// The single control shown before the split.
    Combined,
    Csv,
    Pdf,
}

/// What pressing a control should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadAction {
    /// The combined control split into the two report controls.
    Expanded,
    Save(ReportKind),
    /// Control not shown in the current state.
    Ignored,
}

/// Two-stage disclosure: one combined control that, once pressed, splits
/// into CSV and PDF controls for the rest of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSequencer {
    expanded: bool,
}

impl DownloadSequencer {
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Controls currently on screen.
    pub fn controls(&self) -> &'static [DownloadControl] {
        if self.expanded {
            &[DownloadControl::Csv, DownloadControl::Pdf]
        } else {
            &[DownloadControl::Combined]
        }
    }

    pub fn press(&mut self, control: DownloadControl) -> DownloadAction {
        match (self.expanded, control) {
            (false, DownloadControl::Combined) => {
                self.expanded = true;
                DownloadAction::Expanded
            }
            (true, DownloadControl::Csv) => DownloadAction::Save(ReportKind::Csv),
            (true, DownloadControl::Pdf) => DownloadAction::Save(ReportKind::Pdf),
            _ => DownloadAction::Ignored,
        }
    }

    pub fn reset(&mut self) {
        self.expanded = false;
    }
}

/// A report written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    pub path: PathBuf,
    pub mime_type: &'static str,
    pub bytes: usize,
}

/// Decode a base64 payload. Empty input is an empty file, not an error.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, ExportError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    Ok(STANDARD.decode(trimmed)?)
}

/// Write a decoded report into `dir` under its fixed filename.
pub fn save_report(payload: &str, kind: ReportKind, dir: &Path) -> Result<SavedReport, ExportError> {
    let bytes = decode_payload(payload)?;
    if bytes.is_empty() {
        log::warn!("{} payload is empty, writing an empty file", kind.label());
    }

    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(kind.filename());
    std::fs::write(&path, &bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    log::info!("Saved {} ({} bytes, {})", path.display(), bytes.len(), kind.mime_type());
    Ok(SavedReport {
        path,
        mime_type: kind.mime_type(),
        bytes: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_collapsed() {
        let s = DownloadSequencer::default();
        assert!(!s.is_expanded());
        assert_eq!(s.controls(), &[DownloadControl::Combined]);
    }

    #[test]
    fn test_first_press_expands_without_download() {
        let mut s = DownloadSequencer::default();
        assert_eq!(s.press(DownloadControl::Combined), DownloadAction::Expanded);
        assert!(s.is_expanded());
        assert_eq!(s.controls(), &[DownloadControl::Csv, DownloadControl::Pdf]);
    }

    #[test]
    fn test_expanded_is_sticky() {
        let mut s = DownloadSequencer::default();
        s.press(DownloadControl::Combined);
        assert_eq!(s.press(DownloadControl::Combined), DownloadAction::Ignored);
        assert_eq!(s.press(DownloadControl::Csv), DownloadAction::Save(ReportKind::Csv));
        assert_eq!(s.press(DownloadControl::Pdf), DownloadAction::Save(ReportKind::Pdf));
        assert!(s.is_expanded());
    }

    #[test]
    fn test_split_controls_hidden_while_collapsed() {
        let mut s = DownloadSequencer::default();
        assert_eq!(s.press(DownloadControl::Csv), DownloadAction::Ignored);
        assert_eq!(s.press(DownloadControl::Pdf), DownloadAction::Ignored);
        assert!(!s.is_expanded());
    }

    #[test]
    fn test_report_names() {
        assert_eq!(ReportKind::Csv.filename(), "analysis.csv");
        assert_eq!(ReportKind::Csv.mime_type(), "text/csv");
        assert_eq!(ReportKind::Pdf.filename(), "analysis.pdf");
        assert_eq!(ReportKind::Pdf.mime_type(), "application/pdf");
    }

    #[test]
    fn test_decode_payload() {
        assert_eq!(decode_payload("aGVsbG8=").unwrap(), b"hello");
        assert!(decode_payload("").unwrap().is_empty());
        assert!(matches!(decode_payload("not base64!!"), Err(ExportError::Decode(_))));
    }

    #[test]
    fn test_save_report_writes_decoded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_report("U2NlbmUsRW1vdGlvbgoxLGpveQo=", ReportKind::Csv, dir.path()).unwrap();
        assert_eq!(saved.path, dir.path().join("analysis.csv"));
        assert_eq!(saved.mime_type, "text/csv");
        let contents = std::fs::read_to_string(&saved.path).unwrap();
        assert_eq!(contents, "Scene,Emotion\n1,joy\n");
    }

    #[test]
    fn test_empty_payload_saves_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_report("", ReportKind::Pdf, dir.path()).unwrap();
        assert_eq!(saved.bytes, 0);
        assert_eq!(std::fs::metadata(&saved.path).unwrap().len(), 0);
    }

    #[test]
    fn test_save_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("inception");
        let saved = save_report("aGk=", ReportKind::Chart, &nested).unwrap();
        assert!(saved.path.ends_with("emotion_distribution.png"));
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"hi");
    }
}
