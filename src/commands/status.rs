use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::{StatusArgs, resolve_manifest_path};
use crate::commands::extract::load_records;
use crate::model::ExtractRunManifest;

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_path = resolve_manifest_path(&args.output, args.manifest_path.clone());

    info!(output = %args.output.display(), "status requested");

    if manifest_path.exists() {
        let raw = fs::read(&manifest_path)
            .with_context(|| format!("failed to read {}", manifest_path.display()))?;
        let manifest: ExtractRunManifest = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

        info!(
            run_id = %manifest.run_id,
            generated_at = %manifest.generated_at,
            input = %manifest.paths.input_path,
            input_sha256 = %manifest.input_sha256,
            default_year = manifest.default_year,
            year_end_rollback = manifest.year_end_rollback_enabled,
            candidates = manifest.counts.candidate_count,
            validity_dropped = manifest.counts.validity_dropped,
            unresolved_dropped = manifest.counts.unresolved_dropped,
            rows = manifest.counts.row_count,
            "loaded run manifest"
        );
    } else {
        warn!(path = %manifest_path.display(), "run manifest missing");
    }

    if args.output.exists() {
        let records = load_records(&args.output)?;
        let first = records.iter().map(|record| record.date).min();
        let last = records.iter().map(|record| record.date).max();
        let likes = records.iter().map(|record| record.likes).sum::<u64>();

        info!(
            path = %args.output.display(),
            rows = records.len(),
            first_date = %first.map(|date| date.to_string()).unwrap_or_default(),
            last_date = %last.map(|date| date.to_string()).unwrap_or_default(),
            total_likes = likes,
            "output table status"
        );
    } else {
        warn!(path = %args.output.display(), "output table missing");
    }

    Ok(())
}
