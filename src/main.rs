#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use fastakit::config::Config;
use fastakit::io::fasta::{validate_wrap_width, CaseMode};
use fastakit::pipeline::{self, PipelineConfig};
use fastakit::transform::{DuplicatePolicy, StrandStyle};

#[derive(Parser, Debug)]
#[command(name = "fastakit", author, version, about = "FASTA reformatting and base composition statistics", arg_required_else_help = true)]
struct Cli {
    /// Only report warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reformat FASTA files: case, line width, duplicate identifiers, strand
    Process(ProcessArgs),
    /// Write per-sequence statistics (CSV) and optional plots
    Summary {
        /// Input FASTA file or directory of FASTA files
        input: PathBuf,
        /// Output CSV file (or directory when INPUT is a directory)
        #[arg(short, long)]
        output: PathBuf,
        /// Render length histogram and base-percentage box plot into this directory
        #[arg(long)]
        plots_dir: Option<PathBuf>,
        /// Fail on sequence lines found before the first header
        #[arg(long)]
        strict: bool,
    },
    /// Print an annotated sample configuration file
    SampleConfig,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Input FASTA file or directory of FASTA files
    input: PathBuf,
    /// Output FASTA file (or directory when INPUT is a directory)
    #[arg(short, long)]
    output: PathBuf,
    /// TOML configuration file; command line options take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    case: Option<CaseMode>,
    /// Residues per output line, 0 for no wrapping
    #[arg(short, long, allow_hyphen_values = true)]
    wrap: Option<String>,
    #[arg(short, long, value_enum)]
    duplicates: Option<DuplicatePolicy>,
    #[arg(short, long, value_enum)]
    strand: Option<StrandStyle>,
    /// Write <stem>_stats.csv next to the output
    #[arg(long)]
    stats: bool,
    /// Render length histogram and base-percentage box plot into this directory
    #[arg(long)]
    plots_dir: Option<PathBuf>,
    /// Fail on sequence lines found before the first header
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    // missing or malformed arguments exit with 1, help/version with 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    init_logging(cli.quiet);

    match cli.command {
        Commands::Process(args) => run_process(args),
        Commands::Summary { input, output, plots_dir, strict } => {
            let n = pipeline::summarize(&input, &output, plots_dir.as_deref(), strict)
                .with_context(|| format!("cannot summarize '{}'", input.display()))?;
            println!("sequences: {}", n);
            Ok(())
        }
        Commands::SampleConfig => {
            print!("{}", Config::generate_sample());
            Ok(())
        }
    }
}

fn init_logging(quiet: bool) {
    let level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_config(args: &ProcessArgs) -> Result<PipelineConfig> {
    let mut cfg = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("cannot load config '{}'", path.display()))?
            .to_pipeline()?,
        None => PipelineConfig::default(),
    };
    if let Some(case) = args.case {
        cfg.case = case;
    }
    if let Some(raw) = &args.wrap {
        cfg.wrap = validate_wrap_width(raw)?;
    }
    if args.duplicates.is_some() {
        cfg.duplicates = args.duplicates;
    }
    if args.strand.is_some() {
        cfg.strand = args.strand;
    }
    if args.plots_dir.is_some() {
        cfg.plots_dir = args.plots_dir.clone();
    }
    cfg.stats |= args.stats;
    cfg.strict |= args.strict;
    Ok(cfg)
}

fn run_process(args: ProcessArgs) -> Result<()> {
    let cfg = build_config(&args)?;
    info!("settings: {:?}", cfg);

    let reports = pipeline::process(&args.input, &args.output, &cfg)
        .with_context(|| format!("cannot process '{}'", args.input.display()))?;

    let total: usize = reports.iter().map(|r| r.sequences).sum();
    println!("files: {}", reports.len());
    println!("sequences: {}", total);
    Ok(())
}
