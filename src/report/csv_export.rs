use crate::error::Result;
use crate::models::{AuthoredCommit, CommitReport};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const HEADER: [&str; 6] = ["Date", "Repository", "Private", "SHA", "Message", "URL"];

/// One row per commit. Multi-line messages are flattened with ` | ` so a row
/// never spans lines.
pub fn write_csv(out: impl Write, commits: &[AuthoredCommit]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;

    for commit in commits {
        let message = commit.message.replace('\n', " | ");
        writer.write_record([
            commit.timestamp.as_str(),
            commit.repository.full_name.as_str(),
            if commit.repository.private { "Yes" } else { "No" },
            commit.short_sha.as_str(),
            message.as_str(),
            commit.html_url.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn export_csv(report: &CommitReport, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.csv", report.file_stem()));
    write_csv(File::create(&path)?, &report.commits)?;
    Ok(path)
}
