mod batch;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use flexpara_core::{FlexConfig, ParseOptions, SourceLocation, inspect, parse_mdast};
use flexpara_html::{RenderOptions, Renderer};

use crate::batch::{BatchOptions, output_targets, render_files};

#[derive(Parser, Debug)]
#[command(
    name = "flexpara",
    version,
    about = "Render markdown with flexible paragraph markers"
)]
struct Cli {
    /// More log output; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render markdown files (or stdin) to HTML
    Render(RenderArgs),

    /// Print the markers of a document as JSON
    Markers(MarkersArgs),
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Input files; stdin when omitted
    files: Vec<PathBuf>,

    /// JSON or YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write `<stem>.html` per input into this directory instead of stdout
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Pass raw HTML through instead of escaping it
    #[arg(long)]
    allow_raw_html: bool,

    /// Parse inputs as MDX
    #[arg(long)]
    mdx: bool,

    /// Number of worker threads
    #[arg(short, long)]
    jobs: Option<usize>,
}

#[derive(clap::Args, Debug)]
struct MarkersArgs {
    /// Input file; stdin when omitted
    file: Option<PathBuf>,

    /// JSON or YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parse input as MDX
    #[arg(long)]
    mdx: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Command::Render(args) => run_render(args),
        Command::Markers(args) => run_markers(args),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<FlexConfig> {
    match path {
        Some(path) => FlexConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(FlexConfig::default()),
    }
}

fn parse_options(mdx: bool) -> ParseOptions {
    if mdx {
        ParseOptions::mdx()
    } else {
        ParseOptions::markdown()
    }
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn run_render(args: RenderArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let render_options = RenderOptions {
        allow_raw_html: args.allow_raw_html,
    };

    if args.files.is_empty() {
        let renderer = Renderer::from_config(&config, parse_options(args.mdx), render_options)?;
        let html = renderer.render(&read_input(None)?)?;
        println!("{html}");
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(out_dir) = &args.out_dir {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
    }

    let targets = args
        .out_dir
        .as_deref()
        .map(|out_dir| output_targets(out_dir, &args.files));
    let options = BatchOptions {
        config,
        parse_options: parse_options(args.mdx),
        render_options,
        max_threads: args.jobs,
    };
    let results = render_files(args.files, &options)?;

    let mut failed = 0;
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    for (index, result) in results.into_iter().enumerate() {
        let html = match result.result {
            Ok(html) => html,
            Err(err) => {
                failed += 1;
                eprintln!("error: {err:#}");
                continue;
            }
        };

        let Some(targets) = &targets else {
            writeln!(stdout, "{html}")?;
            continue;
        };
        match &targets[index] {
            Ok(target) => {
                std::fs::write(target, format!("{html}\n"))
                    .with_context(|| format!("failed to write {}", target.display()))?;
                log::info!("{} -> {}", result.path.display(), target.display());
            }
            Err(err) => {
                failed += 1;
                eprintln!("error: {err:#}");
            }
        }
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_markers(args: MarkersArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let dictionary = config.dictionary()?;
    let input = read_input(args.file.as_deref())?;
    let root = parse_mdast(&input, &parse_options(args.mdx))?;

    let mut reports = inspect(&root, &input, &dictionary);
    if let Some(file) = &args.file {
        let file = file.display().to_string();
        for report in &mut reports {
            report.location =
                SourceLocation::with_file(file.clone(), report.location.line, report.location.column);
        }
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(ExitCode::SUCCESS)
}
