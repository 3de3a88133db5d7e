use crate::error::Result;
use crate::models::CommitReport;
use std::io::Write;

fn rule() -> String {
    "=".repeat(80)
}

pub fn write_no_commits(out: &mut impl Write) -> Result<()> {
    writeln!(out, "\n{}", rule())?;
    writeln!(out, "No commits found in the specified date range.")?;
    writeln!(out, "{}", rule())?;
    Ok(())
}

/// Totals, per-repository breakdown, then one numbered entry per commit.
pub fn write_summary(out: &mut impl Write, report: &CommitReport) -> Result<()> {
    writeln!(out, "\n{}", rule())?;
    writeln!(out, "SUMMARY")?;
    writeln!(out, "{}", rule())?;
    writeln!(out, "Total commits: {}", report.commits.len())?;
    writeln!(out, "Repositories with commits: {}", report.repo_counts.len())?;
    writeln!(out)?;

    writeln!(out, "Commits by repository:")?;
    for (repo, count) in report.repo_breakdown() {
        writeln!(out, "  {}: {} commits", repo, count)?;
    }

    writeln!(out, "\n{}", rule())?;
    writeln!(out, "DETAILED COMMIT LIST")?;
    writeln!(out, "{}\n", rule())?;

    for (i, commit) in report.commits.iter().enumerate() {
        writeln!(
            out,
            "{}. {} [{}]",
            i + 1,
            commit.repository.label(),
            commit.repository.full_name
        )?;
        writeln!(out, "   SHA: {}", commit.short_sha)?;
        writeln!(out, "   Date: {}", commit.display_date()?)?;
        writeln!(out, "   Message: {}", commit.summary_line())?;
        writeln!(out, "   URL: {}", commit.html_url)?;
        writeln!(out)?;
    }
    Ok(())
}
