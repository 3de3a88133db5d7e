pub mod console;
pub mod csv_export;
pub mod markdown;

use crate::error::Result;
use crate::models::CommitReport;
use crate::prompt::ExportChoice;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the files `choice` asks for into `dir`, replacing any existing ones.
/// Each file is announced on `out` as soon as it is written, so a later
/// failure still leaves the earlier files reported.
pub fn export(
    report: &CommitReport,
    choice: ExportChoice,
    dir: &Path,
    out: &mut impl Write,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if choice.includes_csv() {
        let path = csv_export::export_csv(report, dir)?;
        writeln!(out, "✓ Commits exported to {}", path.display())?;
        written.push(path);
    }
    if choice.includes_markdown() {
        let path = markdown::export_markdown(report, dir)?;
        writeln!(out, "✓ Commits exported to {}", path.display())?;
        written.push(path);
    }
    Ok(written)
}
