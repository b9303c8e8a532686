//! citekit command-line interface
//!
//! ```text
//! citekit cite 10.1038/nature12373 --style all
//! citekit history --style ieee
//! citekit history --clear
//! citekit config
//! ```

use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use citekit_core::{
    CitationFetcher, CitationStyle, CitekitConfig, CitekitError, ClipboardService, FileStorage,
    HistoryStore, Osc52Clipboard, Result,
};

#[derive(Parser)]
#[command(name = "citekit", version, about = "Generate citations from DOIs via Crossref")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a DOI and print its citation
    Cite {
        /// DOI or doi.org URL
        doi: String,
        /// apa, ieee, chicago, harvard, or all
        #[arg(long, short)]
        style: Option<String>,
        /// Do not record the lookup in history
        #[arg(long)]
        no_history: bool,
        /// Copy the citation to the clipboard (OSC 52)
        #[arg(long)]
        copy: bool,
    },
    /// Show or clear past lookups
    History {
        #[arg(long, short)]
        style: Option<String>,
        #[arg(long)]
        clear: bool,
    },
    /// Print the effective configuration
    Config,
}

enum StyleChoice {
    One(CitationStyle),
    All,
}

fn parse_style(arg: Option<&str>, default: CitationStyle) -> Result<StyleChoice> {
    match arg {
        None => Ok(StyleChoice::One(default)),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(StyleChoice::All),
        Some(s) => s
            .parse()
            .map(StyleChoice::One)
            .map_err(CitekitError::InvalidArgument),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = CitekitConfig::load_default()?;

    match cli.command {
        Command::Cite {
            doi,
            style,
            no_history,
            copy,
        } => {
            let choice = parse_style(style.as_deref(), config.display.default_style)?;
            let fetcher = CitationFetcher::from_config(&config.api)?;
            let result = fetcher.fetch(&doi).await?;

            if !no_history {
                let mut history = open_history(&config)?;
                if let Err(e) = history.save_result(&result) {
                    tracing::warn!(error = %e, "Could not persist history");
                }
            }

            let text = match choice {
                StyleChoice::One(style) => result.citations.get(style).to_string(),
                StyleChoice::All => result
                    .citations
                    .iter()
                    .map(|(style, text)| format!("{}: {}", style.label(), text))
                    .collect::<Vec<_>>()
                    .join("\n"),
            };
            println!("{}", text);

            if copy {
                let mut clipboard =
                    ClipboardService::new(Osc52Clipboard, config.clipboard.ack_window());
                if !clipboard.copy(&text, "cli", Instant::now()).await {
                    tracing::warn!("Clipboard copy failed");
                }
            }
        }
        Command::History { style, clear } => {
            let mut history = open_history(&config)?;
            if clear {
                history.clear()?;
                println!("History cleared");
                return Ok(());
            }

            let choice = parse_style(style.as_deref(), config.display.default_style)?;
            if history.is_empty() {
                println!("No citations in history");
            }
            for entry in history.entries() {
                println!("{}  {}", entry.doi, entry.title);
                println!("    {} · {} · {}", entry.authors, entry.journal, entry.date);
                match choice {
                    StyleChoice::One(style) => println!("    {}", entry.citations.get(style)),
                    StyleChoice::All => {
                        for (style, text) in entry.citations.iter() {
                            println!("    {}: {}", style.label(), text);
                        }
                    }
                }
            }
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn open_history(config: &CitekitConfig) -> Result<HistoryStore<FileStorage>> {
    let storage = FileStorage::from_config(&config.history)?;
    Ok(HistoryStore::open(storage, &config.history)
        .with_max_authors(config.display.history_max_authors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style() {
        assert!(matches!(
            parse_style(None, CitationStyle::Harvard),
            Ok(StyleChoice::One(CitationStyle::Harvard))
        ));
        assert!(matches!(
            parse_style(Some("ALL"), CitationStyle::Apa),
            Ok(StyleChoice::All)
        ));
        assert!(matches!(
            parse_style(Some("mla"), CitationStyle::Apa),
            Err(CitekitError::InvalidArgument(_))
        ));
    }
}
