//! Clap argument definitions for the `stark` CLI.

use std::{env, path::PathBuf, process::exit};

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, error::ErrorKind};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "stark")]
#[command(about = "STaRK - Semi-structured knowledge bases for retrieval")]
pub struct Cli {
    /// Log progress to stderr (-v for info, -vv for debug)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `stark init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.stark.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `stark build`.
#[derive(Args, Debug, Clone)]
pub struct BuildCommand {
    /// Discard processed data and rebuild the knowledge base from the raw files
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `stark stats`.
#[derive(Args, Debug, Clone)]
pub struct StatsCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `stark doc`.
#[derive(Args, Debug, Clone)]
pub struct DocCommand {
    /// Node id
    pub id: usize,

    /// Leave out the relations section
    #[arg(long)]
    pub no_rel: bool,

    /// Flatten the document to a single line
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for `stark chunk`.
#[derive(Args, Debug, Clone)]
pub struct ChunkCommand {
    /// Node id
    pub id: usize,

    /// Attribute to render (title, brand, dimensions, weight, description, features, reviews, qa)
    pub attribute: String,
}

/// Arguments for `stark neighbors`.
#[derive(Args, Debug, Clone)]
pub struct NeighborsCommand {
    /// Node id
    pub id: usize,

    /// Only follow this relation [default: all relations]
    #[arg(short = 'r', long = "rel")]
    pub relation: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `stark search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Search queries
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Maximum results per query [default: 20]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `stark eval`.
#[derive(Args, Debug, Clone)]
pub struct EvalCommand {
    /// JSON-lines file of labeled queries
    pub file: PathBuf,

    /// Hits retrieved per query [default: 100]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Supported `stark` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize stark configuration in current directory
    Init(InitCommand),

    /// Show status and validate configuration
    Status,

    /// Show effective configuration settings
    Config,

    /// Download missing raw data files
    Fetch,

    /// Build the knowledge base and the search index
    Build(BuildCommand),

    /// Rebuild the search index if it is out of date
    Update,

    /// Show node and edge counts of the knowledge base
    Stats(StatsCommand),

    /// Print the document of a node
    Doc(DocCommand),

    /// Print one attribute of a product as prose
    Chunk(ChunkCommand),

    /// List the neighbors of a node
    Neighbors(NeighborsCommand),

    /// Search the index for candidate products
    #[command(after_help = "\
QUERY SYNTAX:
  term              Term should appear
  term1 term2       Either term, documents with both rank higher
  \"phrase\"          Exact phrase match
  +term             Term must appear
  -term             Term must NOT appear
  term1 AND term2   Both terms
  (expr)            Grouping

FIELD QUERIES:
  title:term        Search in product titles only
  body:term         Search in the full product document only

EXAMPLES:
  stark search waterproof tent
  stark search '\"camp stove\"'
  stark search 'lantern -battery'
  stark search 'title:tent coleman'
  stark search tent stove -n 5 --json")]
    Search(SearchCommand),

    /// Score the index against labeled queries
    #[command(after_help = "\
QUERY FILE:
  One JSON object per line:
    {\"id\": 0, \"query\": \"tent for four people\", \"answer_ids\": [12, 40]}

  Queries without answer ids are skipped.

METRICS:
  hit@1       Top hit is relevant
  hit@5       A relevant node is among the top five hits
  recall@20   Share of relevant nodes among the top twenty hits
  mrr         Reciprocal rank of the first relevant hit")]
    Eval(EvalCommand),
}

/// Parses CLI arguments, printing hierarchical help for top-level `--help`.
///
/// Usage errors exit with status 1 like every other failure.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp {
                let args: Vec<_> = env::args().collect();
                if args.len() <= 2 {
                    print_hierarchical_help();
                    exit(0);
                }
            }
            if e.use_stderr() {
                eprint!("{}", e.render().ansi());
                exit(1);
            }
            e.exit();
        }
    }
}

/// Prints custom help listing every subcommand.
fn print_hierarchical_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: stark [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:10} {about}");
    }

    println!(
        "  {:<10} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -v, --verbose...  Log progress to stderr (-v for info, -vv for debug)");
    println!("  -h, --help        Print help");
}
