pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod location;
pub mod lookup;
pub mod model;
pub mod plan;
pub mod replace;
pub mod service;
pub mod store;
pub mod table;
pub mod time_period;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, OutputFormat, TargetArgs},
    config::PlannerConfig,
    document::DocumentFormat,
    plan::ReplacementPlan,
    service::ReplacementPlanService,
    store::ReleaseStore,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("replacement_planner", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Plan(args) => handle_plan(&args),
        Commands::Check(args) => handle_check(&args),
        Commands::Replace(args) => handle_replace(&args),
    }
}

fn load_target(args: &TargetArgs) -> Result<(ReleaseStore, PlannerConfig)> {
    let config = PlannerConfig::resolve(args.config.as_deref(), args.enable_api_replacement)?;
    let store = ReleaseStore::load(&args.snapshot)?;
    Ok((store, config))
}

fn compute_plan(args: &TargetArgs, store: &ReleaseStore, config: &PlannerConfig) -> Result<ReplacementPlan> {
    info!(
        "Planning replacement of file {} in release version {}",
        args.original_file, args.release_version
    );
    let service = ReplacementPlanService::new(store, store, config);
    service
        .get_replacement_plan(args.release_version, args.original_file)
        .with_context(|| format!("Computing replacement plan for file {}", args.original_file))
}

fn handle_plan(args: &cli::PlanArgs) -> Result<()> {
    let (store, config) = load_target(&args.target)?;
    let plan = compute_plan(&args.target, &store, &config)?;
    let rendered = match args.format {
        OutputFormat::Json => DocumentFormat::Json.render(&plan)?,
        OutputFormat::Yaml => DocumentFormat::Yaml.render(&plan)?,
        OutputFormat::Table => table::render_plan_summary(&plan),
        OutputFormat::Csv => export::render_plan_csv(&plan)?,
    };
    debug!("Rendered plan as {:?}", args.format);
    document::write_output(args.output.as_deref(), &rendered)
        .with_context(|| format!("Writing replacement plan to {:?}", args.output))
}

fn handle_check(args: &cli::CheckArgs) -> Result<()> {
    let (store, config) = load_target(&args.target)?;
    let plan = compute_plan(&args.target, &store, &config)?;
    let invalid_blocks = plan.invalid_data_blocks().count();
    let invalid_footnotes = plan.invalid_footnotes().count();
    if plan.valid {
        println!(
            "valid: {} data block(s) and {} footnote(s) can be replaced",
            plan.data_blocks.len(),
            plan.footnotes.len()
        );
        return Ok(());
    }
    println!(
        "invalid: {invalid_blocks} data block(s) and {invalid_footnotes} footnote(s) need attention"
    );
    bail!(
        "Replacement of file {} is not valid",
        args.target.original_file
    )
}

fn handle_replace(args: &cli::ReplaceArgs) -> Result<()> {
    let (mut store, config) = load_target(&args.target)?;
    let outcome = {
        let service = ReplacementPlanService::new(&store, &store, &config);
        service
            .replace(args.target.release_version, args.target.original_file)
            .with_context(|| format!("Replacing file {}", args.target.original_file))?
    };
    store.apply_outcome(&outcome)?;
    let destination = args.output.as_ref().unwrap_or(&args.target.snapshot);
    store
        .save(destination)
        .with_context(|| format!("Writing updated snapshot to {destination:?}"))?;
    info!(
        "Replaced file {} with {}; snapshot written to {:?}",
        outcome.original_file_id, outcome.replacement_file_id, destination
    );
    Ok(())
}
