//! Scoring pipeline: reads a headline file, embeds and classifies it, writes a dated score file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use headlines_core::{Models, ensure_input_exists, read_headlines, write_scores};
use tracing::error;

use crate::Args;

/// Run one CLI invocation end to end.
///
/// The input file is checked before the (slow) model load.
pub fn run(args: &Args) -> anyhow::Result<PathBuf> {
    ensure_input_exists(&args.input_file)?;

    println!("Loading models...");
    let models = headlines_ai::load_models(&args.model_config()).map_err(|e| {
        error!(error = %e, "model loading failed");
        anyhow::Error::new(e).context("loading models")
    })?;

    score_file(
        &models,
        &args.input_file,
        &args.source,
        &args.output_dir,
        Local::now().date_naive(),
    )
}

/// Score every headline in `input` and write `headline_scores_<source>_<date>.txt` into `output_dir`.
pub fn score_file(
    models: &Models,
    input: &Path,
    source: &str,
    output_dir: &Path,
    date: NaiveDate,
) -> anyhow::Result<PathBuf> {
    let start = Instant::now();

    let headlines = read_headlines(input)?;
    println!("Loaded {} headlines.", headlines.len());

    println!("Scoring headlines...");
    let results = models.score_pairs(headlines).map_err(|e| {
        error!(stage = %e.stage, error = %e, "scoring failed");
        anyhow::Error::new(e).context("scoring headlines")
    })?;

    let path = write_scores(output_dir, source, date, &results)
        .with_context(|| format!("writing scores for source '{source}'"))?;
    println!(
        "Results written to {} ({:.1}s)",
        path.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(path)
}
