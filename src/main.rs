//! cdn-deploy - multi-provider CDN deployment CLI
//!
//! Settings come from the environment (and `.env`), optionally overridden by
//! a YAML file. Exit code 0 on success, 1 on failure.

#![allow(missing_docs)]

use anyhow::Context;
use cdn_deploy::core::security::SecurityScanner;
use cdn_deploy::pipeline::run_build;
use cdn_deploy::utils::logging::{self, mask_secret};
use cdn_deploy::{
    AlertManager, CdnManager, Config, DeployOptions, DeployPipeline, PerformanceMonitor,
    ProviderRegistry, build_info,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "cdn-deploy", version, about = "Deploy and verify a site on a CDN")]
struct Cli {
    /// YAML override file (defaults to CDN_CONFIG, then cdn.config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build, deploy, scan, test and report
    Deploy(DeployArgs),
    /// Check configuration and provider credentials
    Validate,
    /// Run the build command only
    Build,
    /// Scan the deployed domain's security posture
    SecurityScan,
    /// Probe the deployed domain's performance once
    PerformanceTest,
    /// Health-check the primary, secondary and local fallback
    TestFallback,
    /// Monitor the domain until the duration elapses or Ctrl-C
    Monitor(MonitorArgs),
}

#[derive(Debug, Args)]
struct DeployArgs {
    /// Generate configuration without deploying (also DRY_RUN)
    #[arg(long)]
    dry_run: bool,
    /// Continue past validation and security failures (also FORCE_DEPLOY)
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Args)]
struct MonitorArgs {
    /// Interval between cycles in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Stop after this many seconds
    #[arg(long)]
    duration_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the command succeeded
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = Config::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    let build = build_info();
    info!(version = build.version, git = build.git_hash, "cdn-deploy");

    match cli.command {
        Command::Deploy(args) => deploy(config, args).await,
        Command::Validate => validate(config).await,
        Command::Build => {
            let output = run_build(&config.deployment).await.context("Build failed")?;
            println!(
                "Built {} files into {} in {}",
                output.files,
                output.output_dir.display(),
                cdn_deploy::utils::format_duration(output.duration_ms)
            );
            Ok(true)
        }
        Command::SecurityScan => {
            config.validate().context("Invalid configuration")?;
            security_scan(config).await
        }
        Command::PerformanceTest => {
            config.validate().context("Invalid configuration")?;
            performance_test(config).await
        }
        Command::TestFallback => {
            let report = manager(&config)?.test_fallback().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(report.any_available())
        }
        Command::Monitor(args) => monitor(config, args).await,
    }
}

fn manager(config: &Config) -> anyhow::Result<CdnManager> {
    let registry =
        ProviderRegistry::with_defaults(config).context("Failed to initialise providers")?;
    CdnManager::new(config.clone(), registry).context("Failed to select CDN provider")
}

async fn deploy(mut config: Config, args: DeployArgs) -> anyhow::Result<bool> {
    config.deployment.dry_run |= args.dry_run;
    config.deployment.force |= args.force;
    let options = DeployOptions {
        dry_run: config.deployment.dry_run,
        force: config.deployment.force,
    };

    let registry =
        ProviderRegistry::with_defaults(&config).context("Failed to initialise providers")?;
    let report = DeployPipeline::new(config, registry, options)
        .run()
        .await
        .context("Deployment pipeline failed")?;

    for stage in &report.stages {
        println!(
            "{:<18} {:<8} {:>7}ms  {}",
            stage.name,
            stage.status,
            stage.duration_ms,
            stage.message.as_deref().unwrap_or("")
        );
    }
    println!("{}", report.summary_text());
    Ok(report.success)
}

async fn validate(config: Config) -> anyhow::Result<bool> {
    let manager = manager(&config)?;
    let report = manager.validate_configuration().await?;

    println!("Provider: {}", manager.provider_name());
    println!("Domain:   {}", config.deployment.domain);
    if let Some(url) = &config.deployment.webhook_url {
        println!("Webhook:  {}", mask_secret(url));
    }
    for warning in &report.warnings {
        println!("warning: {}", warning);
    }
    for error in &report.errors {
        println!("error:   {}", error);
    }
    println!(
        "Configuration is {}",
        if report.valid { "valid" } else { "invalid" }
    );
    Ok(report.valid)
}

async fn security_scan(config: Config) -> anyhow::Result<bool> {
    let scanner = SecurityScanner::new(&config.deployment.domain, config.security.clone())?;
    let report = scanner.run_full_scan().await;
    let path = report.save(&config.deployment.report_dir).await?;

    for check in &report.checks {
        println!("{:<22} {:>5.1}/{:<5.1}", check.name, check.score, check.max_score);
    }
    for vulnerability in &report.vulnerabilities {
        println!("[{}] {}", vulnerability.severity, vulnerability.description);
    }
    println!(
        "Score {:.1}% (grade {}), threshold {:.1}%. Report: {}",
        report.percentage,
        report.grade,
        report.threshold,
        path.display()
    );
    Ok(report.passed)
}

async fn performance_test(config: Config) -> anyhow::Result<bool> {
    let monitor = PerformanceMonitor::new(&config.deployment.domain, config.monitoring.clone())?;
    let report = monitor.run_performance_check().await?;
    let alerts = cdn_deploy::core::performance::threshold_alerts(
        &config.deployment.domain,
        &report,
        &config.monitoring.thresholds,
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    for alert in &alerts {
        warn!("{}", alert.description);
    }
    Ok(alerts.is_empty())
}

async fn monitor(mut config: Config, args: MonitorArgs) -> anyhow::Result<bool> {
    if let Some(interval_ms) = args.interval_ms {
        config.monitoring.interval_ms = interval_ms;
    }
    if let Some(duration_secs) = args.duration_secs {
        config.monitoring.duration_secs = duration_secs;
    }
    config.validate().context("Invalid configuration")?;

    let domain = &config.deployment.domain;
    let interval = Duration::from_millis(config.monitoring.interval_ms);
    let duration = Duration::from_secs(config.monitoring.duration_secs);

    let alerts = AlertManager::with_webhook(config.deployment.webhook_url.as_deref(), domain)?;
    let monitor = Arc::new(
        PerformanceMonitor::new(domain, config.monitoring.clone())?.with_alert_manager(alerts),
    );

    monitor
        .start_monitoring(interval)
        .context("Failed to start monitoring")?;
    tokio::select! {
        _ = tokio::time::sleep(duration) => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted; stopping monitor"),
    }
    if let Some(handle) = monitor.stop_monitoring() {
        handle.await.context("Monitoring task failed")?;
    }

    let snapshot = monitor.metrics().snapshot();
    let stats = monitor.alerts().get_stats();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    println!("{} alerts raised", stats.total_alerts);
    Ok(monitor.alerts().unacknowledged().is_empty())
}
