use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{RoundBuilder, ShuffledRoundBuilder};
use storage::csv_file::CsvSource;
use storage::repository::{EntryRepository, Storage};
use study_core::model::{NerveType, StudyEntry};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const CSV_ENV: &str = "CN_STUDY_CSV";
const SEED_ENV: &str = "CN_STUDY_SEED";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidCsvPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidCsvPath { raw } => write!(f, "invalid --csv value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    entries: Arc<dyn EntryRepository>,
    round_builder: Arc<dyn RoundBuilder>,
}

impl UiApp for DesktopApp {
    fn entries(&self) -> Arc<dyn EntryRepository> {
        Arc::clone(&self.entries)
    }

    fn round_builder(&self) -> Arc<dyn RoundBuilder> {
        Arc::clone(&self.round_builder)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    csv: Option<PathBuf>,
    seed: Option<u64>,
    log: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    [--csv <path>] [--seed <u64>] [--log <filter>]");
    eprintln!("  cargo run -p app -- check [--csv <path>] [--log <filter>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --csv   bundled cranial nerve sheet");
    eprintln!("  --seed  random per launch");
    eprintln!("  --log   {DEFAULT_LOG_FILTER} (or RUST_LOG)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {CSV_ENV}, {SEED_ENV}, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

impl Args {
    /// Parse flags, falling back to `env` for anything not given on the command line.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            csv: env(CSV_ENV)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            seed: env(SEED_ENV).and_then(|value| value.trim().parse().ok()),
            log: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--csv" => {
                    let value = require_value(args, "--csv")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidCsvPath { raw: value });
                    }
                    parsed.csv = Some(PathBuf::from(value));
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let seed = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    parsed.seed = Some(seed);
                }
                "--log" => {
                    parsed.log = Some(require_value(args, "--log")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn csv_source(&self) -> CsvSource {
        self.csv
            .clone()
            .map_or(CsvSource::Embedded, CsvSource::Path)
    }

    fn round_builder(&self) -> ShuffledRoundBuilder {
        self.seed
            .map_or_else(ShuffledRoundBuilder::new, ShuffledRoundBuilder::with_seed)
    }
}

fn init_tracing(log: Option<&str>) {
    let filter = match log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// What `check` found in the data set.
#[derive(Debug, PartialEq, Eq)]
struct CheckReport {
    total: usize,
    by_type: [(NerveType, usize); 3],
    level3_eligible: usize,
}

impl CheckReport {
    fn from_entries(entries: &[StudyEntry]) -> Self {
        let by_type = NerveType::ALL.map(|nerve_type| {
            let count = entries
                .iter()
                .filter(|entry| entry.nerve_type() == nerve_type)
                .count();
            (nerve_type, count)
        });
        Self {
            total: entries.len(),
            by_type,
            level3_eligible: entries
                .iter()
                .filter(|entry| entry.has_swallowing_role())
                .count(),
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "entries: {}", self.total)?;
        for (nerve_type, count) in self.by_type {
            writeln!(f, "  {}: {count}", nerve_type.label())?;
        }
        write!(f, "level 3 eligible: {}", self.level3_eligible)
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Launch the UI when no subcommand is given.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing(parsed.log.as_deref());
    let source = parsed.csv_source();
    tracing::info!(source = %source.describe(), ?cmd, "starting");
    let storage = Storage::csv(source);

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                entries: Arc::clone(&storage.entries),
                round_builder: Arc::new(parsed.round_builder()),
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Cranial Nerve Study Guide")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Check => {
            let rt = Runtime::new()?;
            let entries = rt.block_on(storage.entries.load_entries())?;
            let report = CheckReport::from_entries(&entries);
            if report.level3_eligible == 0 {
                tracing::warn!("no entries have a swallowing role; level 3 will be unavailable");
            }
            println!("{report}");
            Ok(())
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> impl Iterator<Item = String> {
        raw.iter().map(|arg| (*arg).to_owned()).collect::<Vec<_>>().into_iter()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn flags_override_environment() {
        let env = |key: &str| match key {
            CSV_ENV => Some("from_env.csv".to_owned()),
            SEED_ENV => Some("7".to_owned()),
            _ => None,
        };
        let parsed = Args::parse(&mut args(&["--csv", "flag.csv"]), env).unwrap();
        assert_eq!(parsed.csv, Some(PathBuf::from("flag.csv")));
        assert_eq!(parsed.seed, Some(7));
        assert_eq!(parsed.csv_source(), CsvSource::Path("flag.csv".into()));
    }

    #[test]
    fn defaults_to_embedded_sheet() {
        let parsed = Args::parse(&mut args(&[]), no_env).unwrap();
        assert_eq!(parsed, Args::default());
        assert_eq!(parsed.csv_source(), CsvSource::Embedded);
    }

    #[test]
    fn rejects_bad_flags() {
        assert_eq!(
            Args::parse(&mut args(&["--seed", "abc"]), no_env),
            Err(ArgsError::InvalidSeed { raw: "abc".into() })
        );
        assert_eq!(
            Args::parse(&mut args(&["--log"]), no_env),
            Err(ArgsError::MissingValue { flag: "--log" })
        );
        assert_eq!(
            Args::parse(&mut args(&["--deck"]), no_env),
            Err(ArgsError::UnknownArg("--deck".into()))
        );
    }

    #[test]
    fn report_counts_types_and_roles() {
        let entries = vec![
            StudyEntry::new("CN I", NerveType::Sensory, "Smell", "none", 1).unwrap(),
            StudyEntry::new("CN V", NerveType::Both, "Chewing", "Mastication", 5).unwrap(),
            StudyEntry::new("CN XII", NerveType::Motor, "Tongue", "Bolus control", 12).unwrap(),
        ];
        let report = CheckReport::from_entries(&entries);
        assert_eq!(report.total, 3);
        assert_eq!(report.level3_eligible, 2);
        assert_eq!(
            report.to_string(),
            "entries: 3\n  Sensory: 1\n  Motor: 1\n  Both: 1\nlevel 3 eligible: 2"
        );
    }
}
