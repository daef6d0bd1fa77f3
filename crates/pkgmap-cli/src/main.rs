#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use pkgmap_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pkgmap")]
#[command(author, version, about = "Inspect and resolve package exports/imports maps", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Arguments shared by the resolution commands.
#[derive(clap::Args, Debug, Clone)]
struct QueryArgs {
    /// Condition the consumer satisfies (repeatable or comma-separated)
    #[arg(
        short = 'C',
        long = "condition",
        value_name = "COND",
        value_delimiter = ',',
        env = "PKGMAP_CONDITIONS"
    )]
    conditions: Vec<String>,

    /// Include every non-null fallback target, not only the first
    #[arg(long)]
    unsafe_fallbacks: bool,

    /// Path to package.json (defaults to <cwd>/package.json)
    #[arg(short, long, value_name = "PATH")]
    manifest: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Print the flattened subpath mappings of a manifest
    Flatten {
        /// Flatten the "imports" field instead of "exports"
        #[arg(long)]
        imports: bool,

        /// Path to package.json (defaults to <cwd>/package.json)
        #[arg(short, long, value_name = "PATH")]
        manifest: Option<PathBuf>,
    },

    /// Resolve an entry point ("./feature" or "#internal") to its targets
    Resolve {
        /// Entry point to resolve; "#"-prefixed specifiers use "imports"
        entry: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Resolve a target back to the entry points that reach it
    Reverse {
        /// Target file path, e.g. "./dist/index.js"
        #[arg(required_unless_present = "null")]
        target: Option<String>,

        /// List entry points explicitly blocked (mapped to null) instead
        #[arg(long, conflicts_with = "target")]
        null: bool,

        /// Search the "imports" field instead of "exports"
        #[arg(long)]
        imports: bool,

        /// Return pattern subpaths as written instead of expanding "*"
        #[arg(long)]
        keep_asterisks: bool,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Check that every declared entry point resolves
    Check {
        /// Condition set to check, comma-separated (repeatable; default: default, types, node)
        #[arg(short = 'C', long = "conditions", value_name = "CONDS")]
        condition_sets: Vec<String>,

        /// Path to package.json (defaults to <cwd>/package.json)
        #[arg(short, long, value_name = "PATH")]
        manifest: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    // Build config
    let config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(config.json_logs),
        Some(Commands::Flatten { imports, manifest }) => {
            let span = tracing::info_span!("flatten", cmd = "flatten", cwd = %cwd.display());
            let _guard = span.enter();
            commands::flatten::run(&config, manifest.as_deref(), field(imports))
        }
        Some(Commands::Resolve { entry, query }) => {
            let span = tracing::info_span!("resolve", cmd = "resolve", cwd = %cwd.display());
            let _guard = span.enter();
            let config = config.with_conditions(query.conditions);
            commands::resolve::run_forward(
                &config,
                query.manifest.as_deref(),
                &entry,
                query.unsafe_fallbacks,
            )
        }
        Some(Commands::Reverse {
            target,
            null: _,
            imports,
            keep_asterisks,
            query,
        }) => {
            let span = tracing::info_span!("reverse", cmd = "reverse", cwd = %cwd.display());
            let _guard = span.enter();
            let config = config.with_conditions(query.conditions);
            commands::resolve::run_reverse(
                &config,
                query.manifest.as_deref(),
                commands::resolve::ReverseQuery {
                    field: field(imports),
                    target,
                    include_unsafe_fallbacks: query.unsafe_fallbacks,
                    keep_asterisks,
                },
            )
        }
        Some(Commands::Check {
            condition_sets,
            manifest,
        }) => {
            let span = tracing::info_span!("check", cmd = "check", cwd = %cwd.display());
            let _guard = span.enter();
            commands::check::run(&config, manifest.as_deref(), &condition_sets)
        }
    }
}

fn field(imports: bool) -> pkgmap_core::SubpathField {
    if imports {
        pkgmap_core::SubpathField::Imports
    } else {
        pkgmap_core::SubpathField::Exports
    }
}
