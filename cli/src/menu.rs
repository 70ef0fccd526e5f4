use std::path::Path;

use anyhow::Result;
use tft_scout_core::MatchFetcher;
use tokio::io::{stdin, AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tracing::*;

use crate::batch::run_csv;

pub const MAX_MATCHES: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    SaveByRiotId,
    CsvFile,
    Exit,
}

impl Choice {
    pub fn parse(input: &str) -> Option<Choice> {
        match input.trim() {
            "1" => Some(Choice::SaveByRiotId),
            "2" => Some(Choice::CsvFile),
            "3" => Some(Choice::Exit),
            _ => None,
        }
    }
}

/// Accepts 1 through [`MAX_MATCHES`].
pub fn parse_match_count(input: &str) -> Option<u32> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| (1..=MAX_MATCHES).contains(n))
}

pub fn csv_file_name(input: &str) -> String {
    let name = input.trim();
    if name.ends_with(".csv") {
        name.to_string()
    } else {
        format!("{name}.csv")
    }
}

struct Prompt<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    /// `None` once stdin is closed.
    async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.lines.next_line().await?)
    }
}

pub async fn run(fetcher: &MatchFetcher, data_path: &Path) -> Result<()> {
    let mut prompt = Prompt {
        lines: BufReader::new(stdin()).lines(),
    };

    loop {
        let Some(input) = prompt
            .ask(
                "Menu:\n  1: Save recent matches by Riot ID and Tag Line\n  2: CSV File Input [riot_id, tag_line, matchesNum]\n  3: Exit\nEnter your choice: ",
            )
            .await?
        else {
            break;
        };
        let Some(choice) = Choice::parse(&input) else {
            println!("Invalid input. Please enter a number.");
            continue;
        };

        match choice {
            Choice::SaveByRiotId => {
                let Some(riot_id) = prompt.ask("Enter Riot ID: ").await? else { break };
                let Some(tag_line) = prompt.ask("Enter Tag Line: ").await? else { break };
                let count = loop {
                    let Some(raw) = prompt
                        .ask("Enter number of recent matches to save: ")
                        .await?
                    else {
                        return Ok(());
                    };
                    match parse_match_count(&raw) {
                        Some(count) => break count,
                        None => println!("Invalid number. Please enter an integer from 1 to {MAX_MATCHES}."),
                    }
                };
                let (riot_id, tag_line) = (riot_id.trim(), tag_line.trim());
                match fetcher.save_recent_matches(riot_id, tag_line, count).await {
                    Ok(report) => println!(
                        "{riot_id}#{tag_line}: saved {}, already saved {}, failed {}",
                        report.saved, report.skipped, report.failed
                    ),
                    Err(e) => {
                        event!(Level::ERROR, "{riot_id}#{tag_line}: {:#}", anyhow::Error::from(e))
                    }
                }
            }
            Choice::CsvFile => {
                let Some(name) = prompt
                    .ask(&format!(
                        "=== Put file in {} (with .csv extension) ===\n File headers: riot_id, tag_line, matchesNum\n Please enter file name: ",
                        data_path.display()
                    ))
                    .await?
                else {
                    break;
                };
                let path = data_path.join(csv_file_name(&name));
                if let Err(e) = run_csv(fetcher, &path).await {
                    event!(Level::ERROR, "{e:#}");
                }
            }
            Choice::Exit => break,
        }
    }

    println!("Exiting program...");
    Ok(())
}
