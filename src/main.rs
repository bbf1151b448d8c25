use flatconf::file::read_source;
use flatconf::{ConfigError, ConfigTree, Lookup, ParseMode, ParseOptions};

use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Read one or more configuration files, combine them, and print the result.
#[derive(Parser)]
#[command(name = "flatconf", version, about)]
struct CliArgs {
    /// Files to read, in order. Reads stdin when none are given.
    files: Vec<PathBuf>,

    /// Combine later files with merge (accumulate) instead of load (replace).
    #[arg(short, long)]
    merge: bool,

    /// Reject malformed lines instead of keeping them as comments.
    #[arg(long)]
    strict: bool,

    /// Print the tree as JSON instead of configuration text.
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output.
    #[arg(long, requires = "json")]
    pretty: bool,

    /// Print only the value at this key (dotted paths allowed).
    #[arg(short, long)]
    get: Option<String>,

    /// Log filter, e.g. `debug` or `flatconf=trace`. Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

fn initialize_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Where a piece of input came from, for error reports.
struct Source {
    name: String,
    text: String,
}

fn read_sources(files: &[PathBuf]) -> Result<Vec<Source>, ConfigError> {
    if files.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| ConfigError::SourceUnavailable {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        return Ok(vec![Source {
            name: "<stdin>".to_string(),
            text,
        }]);
    }

    files
        .iter()
        .map(|path| {
            read_source(path).map(|text| Source {
                name: path.display().to_string(),
                text,
            })
        })
        .collect()
}

fn report(source: &Source, err: &ConfigError) {
    let Some(line_num) = err.line() else {
        eprintln!("{}: {}", source.name, err);
        return;
    };
    let line_text = source.text.lines().nth(line_num - 1).unwrap_or("");
    eprintln!("ERROR AT {}:{}:", source.name, line_num);
    eprintln!("{}", line_text);
    eprintln!("{}", err);
    eprintln!();
}

fn main() {
    let args = CliArgs::parse();
    initialize_tracing(args.log_level.as_deref());

    let options = ParseOptions {
        mode: if args.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        },
    };

    let sources = match read_sources(&args.files) {
        Ok(sources) => sources,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let mut tree = ConfigTree::new();
    for source in &sources {
        debug!(source = %source.name, merge = args.merge, "combining source");
        let result = if args.merge {
            tree.merge_text_with(&source.text, &options)
        } else {
            tree.load_text_with(&source.text, &options)
        };
        if let Err(err) = result {
            report(source, &err);
            std::process::exit(1);
        }
    }

    if let Some(key) = &args.get {
        match tree.lookup(key) {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("{}: not found", key);
                std::process::exit(2);
            }
        }
        return;
    }

    if args.json {
        if args.pretty {
            println!("{}", tree.to_json_pretty());
        } else {
            println!("{}", tree.to_json());
        }
    } else {
        print!("{}", tree.marshal());
    }
}
