//! tex2model CLI - labeled table extraction from LaTeX model documents

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use tex2model::detect::check_file;
use tex2model::{
    render, Dialect, JsonFormat, MathMode, PairingStrategy, PandocConfig, PandocConverter,
    Reconciler, ResolveOptions, TableCollection,
};

#[derive(Parser)]
#[command(name = "tex2model")]
#[command(version)]
#[command(about = "Extract labeled tables from LaTeX model documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a LaTeX document: labels from the source, data from its HTML
    Tex {
        /// Input .tex file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// Read tables from an HTML document by position
    Html {
        /// Input .html file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Resolve a .tex or .html document, dispatching on its suffix
    Resolve {
        /// Input .tex or .html file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// Check that the converter can be run
    Check {
        #[command(flatten)]
        pandoc: PandocArgs,
    },
}

#[derive(Args)]
struct ResolveArgs {
    /// Regenerate the sibling .html even if it exists
    #[arg(long)]
    overwrite: bool,

    /// Convert each tabular separately instead of the whole document
    #[arg(long)]
    per_table: bool,

    /// Fail when a LaTeX table and its HTML counterpart differ in shape
    #[arg(long)]
    strict_order: bool,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    pandoc: PandocArgs,
}

#[derive(Args)]
struct OutputArgs {
    /// Keep only tables whose identifier matches this regex
    #[arg(long, value_name = "REGEX")]
    filter: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl OutputArgs {
    fn options(&self) -> tex2model::Result<ResolveOptions> {
        match self.filter {
            Some(ref pattern) => ResolveOptions::new().with_filter(pattern),
            None => Ok(ResolveOptions::new()),
        }
    }

    fn emit(&self, tables: &TableCollection) -> Result<(), Box<dyn std::error::Error>> {
        let rendered = render_tables(tables, self.format, self.compact)?;
        write_output(&rendered, self.output.as_deref())
    }
}

#[derive(Args)]
struct PandocArgs {
    /// Pandoc executable
    #[arg(long, env = "TEX2MODEL_PANDOC", default_value = "pandoc")]
    pandoc: PathBuf,

    /// Converter timeout in seconds
    #[arg(long, env = "TEX2MODEL_TIMEOUT", default_value = "60", value_name = "SECS")]
    timeout: u64,

    /// Math rendering mode passed to pandoc
    #[arg(long, value_enum, default_value = "mathjax")]
    math: MathArg,
}

impl PandocArgs {
    fn converter(&self) -> PandocConverter {
        PandocConverter::with_config(
            PandocConfig::new()
                .with_program(&self.pandoc)
                .with_timeout(Duration::from_secs(self.timeout))
                .with_math(self.math.into()),
        )
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Aligned plain text grids
    Text,
    /// Markdown pipe tables
    Markdown,
    /// JSON object keyed by identifier
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum MathArg {
    /// --mathjax (default)
    Mathjax,
    /// --katex
    Katex,
    /// --mathml
    Mathml,
    /// No math flag
    Plain,
}

impl From<MathArg> for MathMode {
    fn from(arg: MathArg) -> Self {
        match arg {
            MathArg::Mathjax => MathMode::MathJax,
            MathArg::Katex => MathMode::KaTeX,
            MathArg::Mathml => MathMode::MathML,
            MathArg::Plain => MathMode::Plain,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tex { input, resolve } => cmd_resolve(&input, Some(Dialect::Native), &resolve),
        Commands::Html { input, output } => cmd_html(&input, &output),
        Commands::Resolve { input, resolve } => cmd_resolve(&input, None, &resolve),
        Commands::Check { pandoc } => cmd_check(&pandoc),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_resolve(
    input: &Path,
    expected: Option<Dialect>,
    args: &ResolveArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if expected.is_some() {
        check_file(input, expected)?;
    }

    let mut options = args.output.options()?.with_overwrite(args.overwrite);
    if args.per_table {
        options = options.with_pairing(PairingStrategy::PerTable);
    }
    if args.strict_order {
        options = options.strict();
    }

    let reconciler = Reconciler::with_options(Arc::new(args.pandoc.converter()), options);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Resolving {}...", input.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let tables = reconciler.resolve(input);
    pb.finish_and_clear();
    let tables = tables?;
    log::info!("Resolved {} tables from {}", tables.len(), input.display());

    args.output.emit(&tables)
}

fn cmd_html(input: &Path, args: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.options()?;
    let mut tables = tex2model::tables_from_html(input)?;
    tables.retain(|id| options.keeps(id));
    log::info!("Read {} tables from {}", tables.len(), input.display());
    args.emit(&tables)
}

fn render_tables(
    tables: &TableCollection,
    format: Format,
    compact: bool,
) -> tex2model::Result<String> {
    match format {
        Format::Text => Ok(render::to_text(tables)),
        Format::Markdown => Ok(render::to_markdown(tables)),
        Format::Json => {
            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            render::to_json(tables, format)
        }
    }
}

fn write_output(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_check(args: &PandocArgs) -> Result<(), Box<dyn std::error::Error>> {
    let version = args.converter().check_available()?;
    println!("{} {}", "Found".green().bold(), version);
    println!("{}: {}", "Program".bold(), args.pandoc.display());
    println!("{}: {}s", "Timeout".bold(), args.timeout);
    Ok(())
}
