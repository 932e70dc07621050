use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use drift_logging::LogDestination;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "locdrift",
    version,
    about = "Find localization drift between locale renderings of the same screen"
)]
pub struct Cli {
    #[arg(long, global = true, help = "RON file with default settings")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Also write the log to this file")]
    pub log_file: Option<PathBuf>,
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "More log output (-v, -vv)")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare a single pair of screenshots and print the raw analysis.
    Analyze(AnalyzeArgs),
    /// Crawl a live site in the source locale and compare every page per target locale.
    Crawl(CrawlArgs),
    /// Compare screenshots from a device test-farm output tree.
    Farm(FarmArgs),
}

#[derive(Args, Debug, Default)]
pub struct PromptArgs {
    #[arg(long, conflicts_with = "prompt_file", help = "Prompt replacing the default")]
    pub prompt: Option<String>,
    #[arg(long, help = "Read the prompt from a file")]
    pub prompt_file: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct LocaleArgs {
    #[arg(long = "source", help = "Source locale [default: en]")]
    pub source_locale: Option<String>,
    #[arg(
        long = "target",
        value_delimiter = ',',
        help = "Target locale; repeat or separate with commas"
    )]
    pub target_locales: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    pub source_image: PathBuf,
    pub target_image: PathBuf,
    #[command(flatten)]
    pub prompt: PromptArgs,
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Site origin without a locale segment, e.g. https://example.com
    pub base_url: String,
    #[command(flatten)]
    pub locales: LocaleArgs,
    #[arg(long, help = "Maximum number of routes to crawl")]
    pub max_pages: Option<usize>,
    #[arg(long, help = "Page load timeout in milliseconds")]
    pub timeout_ms: Option<u64>,
    #[arg(long, help = "WebDriver server URL")]
    pub webdriver: Option<String>,
    #[arg(long, value_enum, help = "Browser behind the WebDriver server")]
    pub browser: Option<BrowserArg>,
    #[arg(long, help = "Show the browser window")]
    pub headed: bool,
    #[arg(long, help = "Directory for captured screenshots")]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub prompt: PromptArgs,
    #[arg(long, help = "Write a JSON report to this path")]
    pub json_report: Option<PathBuf>,
    #[arg(long, help = "Exit with status 2 when any issue is found")]
    pub fail_on_issues: bool,
}

#[derive(Args, Debug)]
pub struct FarmArgs {
    /// Root of the test-farm screenshot tree
    pub root: PathBuf,
    #[command(flatten)]
    pub locales: LocaleArgs,
    #[command(flatten)]
    pub prompt: PromptArgs,
    #[arg(long, help = "Write a JSON report to this path")]
    pub json_report: Option<PathBuf>,
    #[arg(long, help = "Exit with status 2 when any issue is found")]
    pub fail_on_issues: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserArg {
    Chrome,
    Firefox,
}

impl From<BrowserArg> for drift_engine::BrowserKind {
    fn from(value: BrowserArg) -> Self {
        match value {
            BrowserArg::Chrome => drift_engine::BrowserKind::Chrome,
            BrowserArg::Firefox => drift_engine::BrowserKind::Firefox,
        }
    }
}
