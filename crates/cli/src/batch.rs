//! Parallel rendering of input files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, anyhow};
use flexpara_core::{FlexConfig, ParseOptions};
use flexpara_html::{RenderOptions, Renderer};
use rayon::prelude::*;

/// Settings shared by every worker.
#[derive(Clone, Debug, Default)]
pub struct BatchOptions {
    /// Transform configuration; each worker builds its own transform from it.
    pub config: FlexConfig,
    /// Markdown or MDX parsing.
    pub parse_options: ParseOptions,
    /// HTML output switches.
    pub render_options: RenderOptions,
    /// Worker count; rayon's default pool when `None`.
    pub max_threads: Option<usize>,
}

/// Result for one input file.
#[derive(Debug)]
pub struct BatchResult {
    /// Input path.
    pub path: PathBuf,
    /// Rendered HTML or the failure.
    pub result: anyhow::Result<String>,
}

/// Reads and renders every file, keeping input order in the output.
pub fn render_files(
    paths: Vec<PathBuf>,
    options: &BatchOptions,
) -> anyhow::Result<Vec<BatchResult>> {
    // A bad configuration fails the whole batch.
    options.config.build().context("invalid configuration")?;

    let start = Instant::now();
    let process = || {
        paths
            .par_iter()
            .map_init(
                || {
                    Renderer::from_config(
                        &options.config,
                        options.parse_options,
                        options.render_options,
                    )
                    .map_err(|err| err.to_string())
                },
                |renderer, path| BatchResult {
                    path: path.clone(),
                    result: match renderer {
                        Ok(renderer) => render_file(renderer, path),
                        Err(message) => Err(anyhow!(message.clone())),
                    },
                },
            )
            .collect::<Vec<_>>()
    };

    let results = match options.max_threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("failed to build worker pool")?
            .install(process),
        None => process(),
    };

    let failed = results.iter().filter(|r| r.result.is_err()).count();
    log::info!(
        "rendered {} file(s), {} failed, in {:.1}ms",
        results.len(),
        failed,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(results)
}

fn render_file(renderer: &Renderer, path: &Path) -> anyhow::Result<String> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let html = renderer
        .render(&source)
        .with_context(|| format!("failed to render {}", path.display()))?;
    log::debug!("rendered {}", path.display());
    Ok(html)
}

/// Output path for `input` inside `out_dir`.
pub fn output_path(out_dir: &Path, input: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| "index".into());
    name.push(".html");
    out_dir.join(name)
}

/// Output path of every input; inputs that would write the same file get an error.
pub fn output_targets(out_dir: &Path, inputs: &[PathBuf]) -> Vec<anyhow::Result<PathBuf>> {
    let targets: Vec<PathBuf> = inputs
        .iter()
        .map(|input| output_path(out_dir, input))
        .collect();
    let mut counts: HashMap<&Path, usize> = HashMap::new();
    for target in &targets {
        *counts.entry(target.as_path()).or_default() += 1;
    }

    targets
        .iter()
        .zip(inputs)
        .map(|(target, input)| {
            if counts[target.as_path()] > 1 {
                Err(anyhow!(
                    "{} shares its output {} with another input",
                    input.display(),
                    target.display()
                ))
            } else {
                Ok(target.clone())
            }
        })
        .collect()
}
