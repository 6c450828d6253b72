use std::fs;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::{ExtractArgs, resolve_manifest_path};
use crate::model::{ExtractPaths, ExtractRunManifest};
use crate::util::{now_utc_string, sha256_bytes, utc_compact_string, write_json_pretty};

use super::store::write_table;
use super::{Extractor, ExtractorConfig, YearEndRollback, default_delimiters};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let config = ExtractorConfig {
        delimiters: if args.delimiters.is_empty() {
            default_delimiters()
        } else {
            args.delimiters.clone()
        },
        default_year: args.default_year,
        year_end_rollback: (!args.disable_year_end_rollback).then(YearEndRollback::default),
    };

    info!(
        input = %args.input.display(),
        run_id = %run_id,
        default_year = config.default_year,
        year_end_rollback = config.year_end_rollback.is_some(),
        "starting extraction"
    );

    let raw = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let input_sha256 = sha256_bytes(&raw);
    let contents = String::from_utf8(raw)
        .with_context(|| format!("input is not valid UTF-8: {}", args.input.display()))?;

    let extractor = Extractor::new(&config)?;
    let extraction = extractor
        .extract(&contents)
        .with_context(|| format!("failed to extract records from {}", args.input.display()))?;
    let counts = &extraction.counts;

    info!(
        segments = counts.segment_count,
        candidates = counts.candidate_count,
        validity_dropped = counts.validity_dropped,
        unresolved_dropped = counts.unresolved_dropped,
        years_inferred = counts.years_inferred,
        year_end_rollbacks = counts.year_end_rollbacks,
        rows = counts.row_count,
        "extraction finished"
    );
    if counts.row_count == 0 {
        warn!(input = %args.input.display(), "no year-progress posts found");
    }

    if args.dry_run {
        info!("dry-run complete; nothing written");
        return Ok(());
    }

    write_table(&args.output, &extraction.records)?;
    info!(path = %args.output.display(), rows = counts.row_count, "wrote output table");

    let manifest_path = resolve_manifest_path(&args.output, args.manifest_path.clone());
    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        generated_at: now_utc_string(),
        paths: ExtractPaths {
            input_path: args.input.display().to_string(),
            output_path: args.output.display().to_string(),
        },
        input_sha256,
        default_year: config.default_year,
        year_end_rollback_enabled: config.year_end_rollback.is_some(),
        delimiters: config.delimiters.clone(),
        counts: extraction.counts.clone(),
        discarded: extraction.discarded,
    };
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote run manifest");

    Ok(())
}
