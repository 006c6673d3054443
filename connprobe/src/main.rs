//! Connection-string diagnostics tool.
//!
//! Loads a connection string once, reports its structural defects,
//! generates single-change variants and probes connectivity for each.
//!
//! # Security Guarantees
//! - Passwords are masked in every log line and report
//! - Probes are read-only (`ping` or `listDatabases`)
//! - Every probe is bounded by a timeout

use clap::Parser;
use connprobe::output::{emit, render_env, render_report};
use connprobe::{
    AnalyzeArgs, Cli, Command, EnvArgs, ProbeArgs, VariantsArgs, analyze, env_status,
    generate_variants, resolve_connection_string,
};
use connprobe_core::{ProbeConfig, RunReport, init_logging};
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Exit code when every probe failed.
const EXIT_ALL_PROBES_FAILED: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet, cli.global.log_format.into())?;

    match cli.command {
        Command::Analyze(args) => run_analyze(&args).await,
        Command::Variants(args) => run_variants(&args).await,
        Command::Probe(args) => run_probe(&args).await,
        Command::Env(args) => run_env(&args).await,
    }
}

async fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<ExitCode> {
    let config = args.expectations.to_config();
    config.validate()?;

    let (raw, source) = resolve_connection_string(&args.source)?;
    info!("Loaded connection string from {}", source);

    let report = analyze(&raw, &config);
    emit(&render_report(&report, args.output.format)?, &args.output).await?;
    Ok(ExitCode::SUCCESS)
}

async fn run_variants(args: &VariantsArgs) -> anyhow::Result<ExitCode> {
    let mut config = args.expectations.to_config();
    if let Some(host) = &args.alternate_host {
        config = config.with_alternate_host(host.clone());
    }
    config.validate()?;

    let (raw, source) = resolve_connection_string(&args.source)?;
    info!("Loaded connection string from {}", source);

    let variants = generate_variants(&raw, &config)?;
    info!("Generated {} variant(s)", variants.len());

    let report = RunReport::new(&raw).with_variants(&variants);
    emit(&render_report(&report, args.output.format)?, &args.output).await?;
    Ok(ExitCode::SUCCESS)
}

async fn run_probe(args: &ProbeArgs) -> anyhow::Result<ExitCode> {
    let config = args.to_config()?;

    let (raw, source) = resolve_connection_string(&args.source)?;
    info!("Loaded connection string from {}", source);

    let report = probe_report(&raw, &config, args.variants).await?;

    emit(&render_report(&report, args.output.format)?, &args.output).await?;

    if report.all_probes_failed() {
        error!("[FAIL] All {} probe(s) failed", report.probes.len());
        return Ok(ExitCode::from(EXIT_ALL_PROBES_FAILED));
    }

    info!(
        "[OK] {} of {} probe(s) succeeded",
        report.successful_probes(),
        report.probes.len()
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(feature = "mongodb")]
async fn probe_report(
    raw: &str,
    config: &ProbeConfig,
    all_variants: bool,
) -> connprobe_core::Result<RunReport> {
    let prober = connprobe_core::MongoProber::from_config(config);
    connprobe::run_probes(&prober, raw, config, all_variants).await
}

#[cfg(not(feature = "mongodb"))]
async fn probe_report(
    _raw: &str,
    _config: &ProbeConfig,
    _all_variants: bool,
) -> connprobe_core::Result<RunReport> {
    Err(connprobe_core::ConnProbeError::configuration(
        "Probing not available. Compile with --features mongodb",
    ))
}

async fn run_env(args: &EnvArgs) -> anyhow::Result<ExitCode> {
    let status = env_status(&args.expectations.to_config());
    if !status.is_set {
        warn!("{} is not set", status.variable);
    }
    emit(&render_env(&status, args.output.format)?, &args.output).await?;
    Ok(ExitCode::SUCCESS)
}
