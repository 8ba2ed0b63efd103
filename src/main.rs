use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use ipsc_rating::{
    args::Args,
    data::{loader::load_matches, writer::write_rankings},
    model::{division::division_statistics, ranking::in_region, rating_engine::RatingEngine}
};
use tracing::{error, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // A missing .env file is fine; everything can come from flags
    let _ = dotenv::dotenv();
    let args = Args::parse();

    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(EnvFilter::new(&args.log_level))
        .with(fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.engine_config()?;
    info!(
        starting_mu = config.starting_mu,
        starting_sigma = config.starting_sigma,
        percentile = config.percentile,
        decay = ?config.decay.strategy,
        "Engine configured"
    );

    let matches = load_matches(&args.matches_dir)
        .with_context(|| format!("Could not load matches from {}", args.matches_dir.display()))?;

    let stats = division_statistics(&matches);
    info!(
        "{} raw division labels normalized into {} divisions",
        stats.total_original_variations(),
        stats.total_normalized_divisions()
    );
    for (division, count) in &stats.normalized_divisions {
        info!("{division}: {count} results");
    }

    let mut engine = RatingEngine::from_config(config);
    let report = engine.process(&matches);

    if !report.is_clean() {
        warn!(
            "{} of {} matches were not rated, {} participants skipped",
            report.matches_skipped + report.matches_failed,
            report.total_matches(),
            report.participants_skipped
        );
    }
    if let Some(average) = report.decay.average_decay() {
        info!(
            applications = report.decay.players_affected,
            max_days_inactive = report.decay.max_days_inactive,
            "Average decay {average:.4} sigma"
        );
    }

    if args.decay_to_now {
        engine.apply_decay_as_of(Utc::now().fixed_offset());
    }

    let ranking = match &args.region {
        Some(region) => engine.ranking_filtered(in_region(region)),
        None => engine.ranking()
    };

    write_rankings(&args.output_dir, &args.output_prefix, &ranking)
        .with_context(|| format!("Could not write rankings to {}", args.output_dir.display()))?;

    info!("Ranked {} players", ranking.len());

    Ok(())
}
