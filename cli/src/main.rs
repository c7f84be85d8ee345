//! wikidown CLI - document tree to wiki markup export
//!
//! A command-line tool for converting JSON document trees to MediaWiki-style markup.

use clap::{Parser, Subcommand};
use colored::*;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wikidown::model::{Node, NodeKind};
use wikidown::render::{self, DocumentInfo, HeadlineStyle, RenderOptions};

/// Document tree to wiki markup export
#[derive(Parser)]
#[command(
    name = "wikidown",
    version,
    about = "Convert document trees to wiki markup",
    long_about = "wikidown - export parsed outline documents to MediaWiki-style markup.\n\n\
                  Reads a JSON document tree and writes wiki markup with footnotes,\n\
                  tables, lists and resolved links."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document tree to wiki markup
    Convert {
        /// Input tree (JSON)
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Options file (JSON, kebab-case keys)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Underline headlines instead of wrapping them in `=`
        #[arg(long)]
        setext: bool,

        /// CSS class for tables
        #[arg(long, conflicts_with = "no_table_class")]
        table_class: Option<String>,

        /// Emit tables without a class attribute
        #[arg(long)]
        no_table_class: bool,

        /// Use typographic quotes
        #[arg(long)]
        smart_quotes: bool,

        /// Keep line breaks inside paragraphs
        #[arg(long)]
        preserve_breaks: bool,

        /// Omit the footnotes section
        #[arg(long)]
        body_only: bool,
    },

    /// Show tree statistics
    Info {
        /// Input tree (JSON)
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // a subscriber installed by the environment wins
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            setext,
            table_class,
            no_table_class,
            smart_quotes,
            preserve_breaks,
            body_only,
        } => {
            let mut options = match config {
                Some(path) => RenderOptions::from_file(&path)?,
                None => RenderOptions::new(),
            };
            if setext {
                options = options.with_headline_style(HeadlineStyle::Setext);
            }
            if no_table_class {
                options = options.with_table_class(None::<String>);
            } else if table_class.is_some() {
                options = options.with_table_class(table_class);
            }
            if smart_quotes {
                options = options.with_smart_quotes(true);
            }
            if preserve_breaks {
                options = options.with_preserve_breaks(true);
            }

            debug!(input = %input.display(), ?options, "converting");
            let mut tree = wikidown::load_tree(&input)?;
            let wiki = if body_only {
                let prepared = render::prepare(&mut tree);
                let info = DocumentInfo::new(prepared, &options);
                render::render_body(prepared, &options, &info)
            } else {
                wikidown::to_wiki(&mut tree, &options)
            };

            write_output(output.as_deref(), &wiki)?;

            if let Some(path) = output {
                println!(
                    "{} Converted to wiki markup: {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Info { input } => {
            let tree = wikidown::load_tree(&input)?;
            print_info(&input, &tree);
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_info(input: &Path, tree: &Node) {
    let mut kinds: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut footnotes = 0;
    let mut links = 0;
    let mut headlines = 0;
    tree.walk(&mut |node| {
        *kinds.entry(node.kind.name()).or_insert(0) += 1;
        match node.kind {
            NodeKind::FootnoteReference { .. } => footnotes += 1,
            NodeKind::Link { .. } => links += 1,
            NodeKind::Headline { .. } => headlines += 1,
            _ => {}
        }
    });

    println!("{}", "Tree Information".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        input.file_name().unwrap_or_default().to_string_lossy()
    );
    println!("{}: {}", "Headlines".bold(), headlines);
    println!("{}: {}", "Links".bold(), links);
    println!("{}: {}", "Footnote references".bold(), footnotes);

    let text = tree.plain_text();
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());

    println!("\n{}", "Node Kinds".cyan().bold());
    println!("{}", "─".repeat(40));
    for (kind, count) in &kinds {
        println!("{}: {}", kind.bold(), count);
    }
}

fn print_version() {
    println!("{} {}", "wikidown".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document tree to MediaWiki-style markup export");
    println!();
    println!("Input: JSON document trees");
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write!(handle, "{}", content)?;
        }
    }
    Ok(())
}
