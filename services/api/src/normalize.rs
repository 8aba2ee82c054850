use clap::Args;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use talent_rubric::config::AppConfig;
use talent_rubric::error::AppError;
use talent_rubric::rubric::{NormalizedRubric, RubricNormalizer};

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// Path to a rubric payload in any supported shape
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Derive weights from importance the way a save would
    #[arg(long)]
    pub(crate) preview: bool,
    /// Print single-line JSON instead of pretty output
    #[arg(long)]
    pub(crate) compact: bool,
}

pub(crate) fn run_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let normalizer = RubricNormalizer::new(config.rubric);
    let normalized = normalize_file(&normalizer, &args.input, args.preview)?;

    let rendered = if args.compact {
        serde_json::to_string(&normalized)?
    } else {
        serde_json::to_string_pretty(&normalized)?
    };
    println!("{rendered}");

    if normalized.awaiting_generation() {
        eprintln!(
            "note: {} carries job analysis only; no rubric has been generated yet",
            args.input.display()
        );
    }
    Ok(())
}

pub(crate) fn normalize_file(
    normalizer: &RubricNormalizer,
    path: &Path,
    preview: bool,
) -> Result<NormalizedRubric, AppError> {
    let raw = fs::read_to_string(path)?;
    let payload: Value = serde_json::from_str(&raw)?;
    let mut normalized = normalizer.normalize(payload)?;

    if preview {
        normalized.document.derive_weights();
        normalized.document.verify_weights()?;
    }
    Ok(normalized)
}
