use crate::error::Result;
use crate::models::CommitReport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Renders the report as Markdown. A `###` heading starts every time the
/// repository changes while walking the date-sorted list, so a repository
/// whose commits interleave with another's gets more than one heading.
pub fn write_markdown(out: &mut impl Write, report: &CommitReport) -> Result<()> {
    writeln!(out, "# GitHub Commits Report\n")?;
    writeln!(out, "**Period:** {} to {}\n", report.start, report.end)?;
    writeln!(out, "**Total Commits:** {}\n", report.commits.len())?;
    writeln!(out, "**Repositories:** {}\n", report.repo_counts.len())?;

    writeln!(out, "## Summary by Repository\n")?;
    for (repo, count) in report.repo_breakdown() {
        writeln!(out, "- **{}**: {} commits", repo, count)?;
    }

    writeln!(out, "\n---\n\n## Detailed Commits\n")?;

    let mut current_repo: Option<&str> = None;
    for commit in &report.commits {
        let repo = commit.repository.full_name.as_str();
        if current_repo != Some(repo) {
            let visibility = if commit.repository.private {
                "🔒 Private"
            } else {
                "🌐 Public"
            };
            writeln!(out, "\n### {} {}\n", visibility, repo)?;
            current_repo = Some(repo);
        }

        writeln!(
            out,
            "- **{}** ({}): {} [→ View]({})",
            commit.short_sha,
            commit.display_date()?,
            commit.summary_line(),
            commit.html_url
        )?;
    }
    Ok(())
}

pub fn export_markdown(report: &CommitReport, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.md", report.file_stem()));
    let mut out = BufWriter::new(File::create(&path)?);
    write_markdown(&mut out, report)?;
    out.flush()?;
    Ok(path)
}
