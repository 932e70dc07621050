use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use drift_core::{render_crawl_report, render_farm_report, IssueLog};
use drift_engine::{
    analyze_farm, run_crawl, GeminiAnalyzer, RunReport, VisionAnalyzer, WebDriverSession,
    APP_PROMPT,
};
use drift_logging::drift_info;

use crate::cli::{AnalyzeArgs, Cli, Command, CrawlArgs, FarmArgs};
use crate::config::{self, FileConfig};

/// Exit status used by `--fail-on-issues` when drift was reported.
const ISSUES_FOUND: u8 = 2;

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let file_config = match &cli.config {
        Some(path) => config::load(path)?,
        None => FileConfig::default(),
    };
    match &cli.command {
        Command::Analyze(args) => analyze(&file_config, args).await,
        Command::Crawl(args) => crawl(&file_config, args).await,
        Command::Farm(args) => farm(&file_config, args).await,
    }
}

fn analyzer(file_config: &FileConfig) -> Result<GeminiAnalyzer> {
    let analyzer = GeminiAnalyzer::new(file_config.analyzer_settings()?)?;
    drift_info!("Using model {}", analyzer.model());
    Ok(analyzer)
}

async fn analyze(file_config: &FileConfig, args: &AnalyzeArgs) -> Result<ExitCode> {
    let analyzer = analyzer(file_config)?;
    let prompt = file_config.prompt(&args.prompt)?;
    let response = analyzer
        .compare(
            &args.source_image,
            &args.target_image,
            prompt.as_deref().unwrap_or(APP_PROMPT),
        )
        .await?;
    println!("{}", response.trim_end());
    Ok(ExitCode::SUCCESS)
}

async fn crawl(file_config: &FileConfig, args: &CrawlArgs) -> Result<ExitCode> {
    let analyzer = analyzer(file_config)?;
    let settings = file_config.crawl_settings(args)?;
    settings.validate()?;

    let webdriver = file_config.webdriver_settings(args);
    let server = webdriver.server_url.clone();
    let session = WebDriverSession::start(webdriver)
        .await
        .with_context(|| format!("could not start a browser session at {server}"))?;

    let outcome = run_crawl(session, &analyzer, &settings).await?;
    print!("{}", render_crawl_report(&outcome.issues, &outcome.stats));

    if let Some(path) = &args.json_report {
        let report = RunReport::for_crawl(&outcome, &settings.base_url, timestamp());
        write_report(&report, path)?;
    }
    Ok(exit_code(&outcome.issues, args.fail_on_issues))
}

async fn farm(file_config: &FileConfig, args: &FarmArgs) -> Result<ExitCode> {
    let analyzer = analyzer(file_config)?;
    let settings = file_config.farm_settings(args)?;

    let outcome = analyze_farm(&analyzer, &settings).await?;
    print!("{}", render_farm_report(&outcome.issues, &outcome.stats));

    if let Some(path) = &args.json_report {
        let report = RunReport::for_farm(&outcome, &settings.root, timestamp());
        write_report(&report, path)?;
    }
    Ok(exit_code(&outcome.issues, args.fail_on_issues))
}

fn write_report(report: &RunReport<'_>, path: &Path) -> Result<()> {
    let written = report
        .write(path)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    drift_info!("Report written to {:?}", written);
    Ok(())
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn exit_code(issues: &IssueLog, fail_on_issues: bool) -> ExitCode {
    if fail_on_issues && !issues.is_empty() {
        ExitCode::from(ISSUES_FOUND)
    } else {
        ExitCode::SUCCESS
    }
}
