//! Query a Bible dataset from the command line.
//!
//! Usage: cargo run --bin versenav_query -- [--data kjv1611.json] lookup "John 3:16"

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use versenav::bible::{load_corpus, BibleIndex};
use versenav::config::Config;
use versenav::services::Session;
use versenav::types::{Position, ScopeKind};

#[derive(Parser)]
#[command(name = "versenav_query", about = "Look up, step through and search a Bible dataset", version)]
struct Cli {
    /// Dataset JSON file (overrides BIBLE_DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List books in canonical order
    Books,

    /// Print the passage at a reference such as "John 3:16"
    Lookup {
        /// Scripture reference
        reference: String,
    },

    /// Print the passage after a reference
    Next {
        /// Scripture reference
        reference: String,
    },

    /// Print the passage before a reference
    Prev {
        /// Scripture reference
        reference: String,
    },

    /// Case-insensitive substring search over passage text
    Search {
        /// Text to look for
        query: String,

        /// Where to search: corpus, book or chapter
        #[arg(long, default_value = "corpus")]
        scope: ScopeKind,

        /// Reference whose book or chapter bounds the scope
        #[arg(long, value_name = "REFERENCE")]
        at: Option<String>,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).try_init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;
    if let Some(path) = cli.data {
        config = config.with_data_path(path);
    }
    let index = load_corpus(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    match cli.command {
        Commands::Books => {
            for (key, meta) in index.books() {
                let verses: usize = meta
                    .chapters()
                    .iter()
                    .map(|&c| index.chapter_verses(key, c).count())
                    .sum();
                println!("{:<20} {:>3} chapters {:>5} verses", meta.display_name(), meta.chapters().len(), verses);
            }
        }
        Commands::Lookup { reference } => match index.lookup(&reference) {
            Ok((_, passage)) => println!("{}\n{}", passage.reference(), passage.text()),
            Err(e) => {
                eprintln!("{e}");
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Next { reference } => {
            let (position, _) = index.lookup(&reference)?;
            print_neighbour(&index, index.next(&position));
        }
        Commands::Prev { reference } => {
            let (position, _) = index.lookup(&reference)?;
            print_neighbour(&index, index.previous(&position));
        }
        Commands::Search { query, scope, at } => {
            let mut session = Session::new(Arc::new(index));
            let hits = scoped_search(&mut session, &query, scope, at.as_deref())?;
            for passage in hits.iter().filter_map(|p| session.index().passage_at(p)) {
                println!("{}: {}", passage.reference(), passage.text());
            }
            println!("{} result(s) for \"{}\"", hits.len(), query.trim());
        }
    }
    Ok(ExitCode::SUCCESS)
}

// Book and chapter scopes are anchored on `at`, as the reader anchors them on its position.
fn scoped_search(
    session: &mut Session,
    query: &str,
    scope: ScopeKind,
    at: Option<&str>,
) -> anyhow::Result<Vec<Position>> {
    match at {
        Some(reference) => {
            session.go_to_reference(reference)?;
        }
        None if scope != ScopeKind::Corpus => bail!("{} search needs --at <REFERENCE>", scope.name()),
        None => {}
    }
    Ok(session.search(query, scope).hits.clone())
}

fn print_neighbour(index: &BibleIndex, position: Option<Position>) {
    match position.as_ref().and_then(|p| index.passage_at(p)) {
        Some(passage) => println!("{}\n{}", passage.reference(), passage.text()),
        None => println!("(end of corpus)"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use versenav::bible::RawEntry;

    fn session() -> Session {
        let keys = ["Ruth 1:16", "Ruth 2:12", "Ruth 2:13", "Jonah 2:9"];
        let index = BibleIndex::build(keys.iter().map(|k| RawEntry::new(*k, format!("the lord of {k}"), Some(k))));
        Session::new(Arc::new(index))
    }

    #[test]
    fn test_search_args_parse_scope() {
        let cli = Cli::try_parse_from(["versenav_query", "search", "lord", "--scope", "Chapter", "--at", "Ruth 2:12"])
            .unwrap();
        let Commands::Search { scope, at, .. } = cli.command else {
            panic!("expected search");
        };
        assert_eq!(scope, ScopeKind::Chapter);
        assert_eq!(at.as_deref(), Some("Ruth 2:12"));

        let cli = Cli::try_parse_from(["versenav_query", "search", "lord"]).unwrap();
        assert!(matches!(cli.command, Commands::Search { scope: ScopeKind::Corpus, .. }));
        assert!(Cli::try_parse_from(["versenav_query", "search", "lord", "--scope", "verse"]).is_err());
    }

    #[test]
    fn test_scoped_search_anchors_on_reference() {
        let mut session = session();
        let hits = scoped_search(&mut session, "LORD", ScopeKind::Corpus, None).unwrap();
        assert_eq!(hits.len(), 4);

        let hits = scoped_search(&mut session, "lord", ScopeKind::Chapter, Some("Ruth 2:13")).unwrap();
        let refs: Vec<String> = hits.iter().map(ToString::to_string).collect();
        assert_eq!(refs, ["ruth 2:12", "ruth 2:13"]);

        let hits = scoped_search(&mut session, "lord", ScopeKind::Book, Some("Jonah 2:9")).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_scoped_search_needs_anchor() {
        let mut session = session();
        assert!(scoped_search(&mut session, "lord", ScopeKind::Book, None).is_err());
        assert!(scoped_search(&mut session, "lord", ScopeKind::Chapter, Some("Ruth 9:9")).is_err());
    }
}
