use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use factorio_save_mods::{Error, ModList, SaveReader, Version, MINIMUM_VERSION};

#[derive(Parser)]
#[command(name = "factorio-save-mods")]
#[command(about = "List the mods recorded in Factorio save files")]
struct Args {
    /// Save archives (.zip) to read
    #[arg(required = true)]
    saves: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Leave the base mod out of the output
    #[arg(long)]
    skip_base: bool,

    /// Oldest save version to accept
    #[arg(long, default_value_t = MINIMUM_VERSION)]
    min_version: Version,

    /// Largest decoded level.dat to accept, in bytes
    #[arg(long)]
    max_level_dat_size: Option<u64>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Names,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn describe(err: &Error) -> String {
    match err {
        Error::InvalidFile(reason) => format!("not a valid save file ({reason})"),
        Error::UnsupportedVersion { version, minimum } => {
            format!("unsupported game version {version} (need {minimum} or newer)")
        }
        other => other.to_string(),
    }
}

fn print_text(path: &Path, mods: &ModList) {
    println!("{}:", path.display());
    for m in mods {
        println!("  {} {} {:#010x}", m.name, m.version, m.checksum);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut builder = SaveReader::builder().minimum_version(args.min_version);
    if let Some(limit) = args.max_level_dat_size {
        builder = builder.max_level_dat_size(limit);
    }
    let reader = builder.build();

    // One task per save; each owns its buffer
    let tasks: Vec<_> = args
        .saves
        .iter()
        .map(|path| {
            let reader = reader.clone();
            let path = path.clone();
            tokio::spawn(async move { reader.read_path(&path).await })
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());
    for (path, task) in args.saves.iter().zip(tasks) {
        let result = task.await.unwrap_or_else(|e| Err(e.into()));
        let result = result.map(|mods| if args.skip_base { mods.without_base() } else { mods });
        results.push((path, result));
    }

    let mut failed = false;
    let mut json_out = Vec::new();
    for (path, result) in &results {
        match result {
            Ok(mods) => match args.format {
                Format::Text => print_text(path, mods),
                Format::Names => {
                    if results.len() > 1 {
                        println!("# {}", path.display());
                    }
                    for name in mods.names() {
                        println!("{name}");
                    }
                }
                Format::Json => json_out.push(json!({
                    "path": path.display().to_string(),
                    "mods": mods,
                })),
            },
            Err(err) => {
                failed = true;
                eprintln!("{}: {}", path.display(), describe(err));
                if args.format == Format::Json {
                    json_out.push(json!({
                        "path": path.display().to_string(),
                        "error": describe(err),
                    }));
                }
            }
        }
    }

    if args.format == Format::Json {
        match serde_json::to_string_pretty(&json_out) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("failed to encode output: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
