//! statuserr - CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use statuserr::runtime::status_code;
use statuserr::util::logger;
use statuserr::{check, describe, generate, resolve_config, Locale, NAME, VERSION};

/// Generate bilingual status error constructors from annotated constants
#[derive(Parser, Debug)]
#[command(name = "statuserr")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan types and write `<type>__generated.rs` next to each declaration
    Generate {
        /// Type names to scan
        #[arg(value_name = "TYPE", required = true)]
        types: Vec<String>,

        /// Source directory or file to scan
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Runtime crate path used in generated code
        #[arg(long)]
        runtime: Option<String>,

        /// Generated file marker
        #[arg(long)]
        suffix: Option<String>,

        /// Only report files that would change, without writing
        #[arg(long)]
        check: bool,
    },

    /// Print scanned status errors
    List {
        /// Type names to scan
        #[arg(value_name = "TYPE", required = true)]
        types: Vec<String>,

        /// Source directory or file to scan
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Message language (zh or en)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        logger::init_debug();
    } else {
        logger::init();
    }

    match args.command {
        Commands::Generate {
            types,
            root,
            runtime,
            suffix,
            check: check_only,
        } => {
            let config = resolve_config(&root, runtime, suffix)?;
            if check_only {
                let stale = check(&root, &types, config)
                    .with_context(|| format!("Failed to check: {}", root.display()))?;
                if !stale.is_empty() {
                    for path in &stale {
                        eprintln!("{} {}", "stale".yellow(), path.display());
                    }
                    bail!("{} generated file(s) out of date", stale.len());
                }
                eprintln!("{}", "up to date".green());
            } else {
                let written = generate(&root, &types, config)
                    .with_context(|| format!("Failed to generate: {}", root.display()))?;
                for path in written {
                    println!("{} {}", "✓".green(), path.display());
                }
            }
        }
        Commands::List { types, root, lang } => {
            let config = resolve_config(&root, None, None)?;
            let locale = Locale::parse(lang.as_deref().unwrap_or(&config.lang));
            let described = describe(&root, &types, config)
                .with_context(|| format!("Failed to scan: {}", root.display()))?;

            for (name, errors) in described {
                println!("{} ({})", name.bold(), errors.len());
                for error in errors {
                    let message = match locale {
                        Locale::Zh => &error.zh_message,
                        Locale::En => &error.en_message,
                    };
                    println!(
                        "  {} {} {} {}",
                        format!("[{}]", status_code(error.error_code)).dimmed(),
                        error.error_code.to_string().yellow(),
                        error.key.cyan(),
                        message
                    );
                }
            }
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    Ok(())
}
