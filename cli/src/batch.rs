use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tft_scout_core::MatchFetcher;
use tracing::*;

/// One `riot_id, tag_line, matchesNum` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub riot_id: String,
    pub tag_line: String,
    pub matches: u32,
}

/// Parses the batch file. Columns are found by header name, whitespace around
/// cells is ignored, and bad rows are logged and left out.
pub fn parse_players(content: &str) -> Result<Vec<PlayerRow>> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next().ok_or_else(|| anyhow!("csv file is empty"))?;
    let columns = header
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>();
    let column = |name: &str| columns.iter().position(|c| *c == name);
    let (riot_id_col, tag_line_col, matches_col) = (
        column("riot_id").ok_or_else(|| anyhow!("missing riot_id column"))?,
        column("tag_line").ok_or_else(|| anyhow!("missing tag_line column"))?,
        column("matchesNum").ok_or_else(|| anyhow!("missing matchesNum column"))?,
    );

    let mut rows = Vec::new();
    for (line_num, line) in lines.enumerate() {
        let cells = line.split(',').map(str::trim).collect::<Vec<_>>();
        let cell = |i: usize| cells.get(i).copied().unwrap_or_default();
        let (riot_id, tag_line, matches_raw) = (cell(riot_id_col), cell(tag_line_col), cell(matches_col));

        if riot_id.is_empty() || tag_line.is_empty() {
            event!(Level::WARN, row = line_num + 2, "skipping row with missing riot_id/tag_line: {line}");
            continue;
        }
        let Ok(matches) = matches_raw.parse::<u32>() else {
            event!(
                Level::WARN,
                row = line_num + 2,
                "invalid matchesNum '{matches_raw}' for {riot_id}#{tag_line}, skipping"
            );
            continue;
        };
        rows.push(PlayerRow {
            riot_id: riot_id.to_string(),
            tag_line: tag_line.to_string(),
            matches,
        });
    }
    Ok(rows)
}

pub async fn run_csv(fetcher: &MatchFetcher, path: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .context(format!("failed to open csv file: {}", path.display()))?;
    for row in parse_players(&content)? {
        match fetcher
            .save_recent_matches(&row.riot_id, &row.tag_line, row.matches)
            .await
        {
            Ok(report) => event!(
                Level::INFO,
                "{}#{}: saved {}, skipped {}, failed {}",
                row.riot_id,
                row.tag_line,
                report.saved,
                report.skipped,
                report.failed
            ),
            Err(e) => event!(
                Level::WARN,
                "{}#{}: {:#}",
                row.riot_id,
                row.tag_line,
                anyhow::Error::from(e)
            ),
        }
    }
    Ok(())
}
