//! Command-line entry point for uitriage.
//! Wires the persisted config into the credential store, runs one analysis
//! against the Gemini provider, and prints the triage report from the
//! view-state store.

use anyhow::{Context, Result, bail};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use uitriage::application::analysis::AnalysisClient;
use uitriage::infra::app_config::{load_config, save_config};
use uitriage::infra::gemini::GeminiProvider;
use uitriage::state::{CredentialStore, SeverityFilter, ViewStateStore};

#[derive(Parser)]
#[command(name = "uitriage", version, about = "Screenshot UI critique triage")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store the Gemini API key for later runs
    SetKey {
        key: String,
    },
    /// Analyze a screenshot and print the triage report
    Analyze {
        /// Path to a PNG screenshot
        image: PathBuf,
        /// API key for this run, overriding the stored one
        #[arg(long)]
        api_key: Option<String>,
        /// Restrict the issue list to one severity: all, critical, warning
        #[arg(long, default_value = "all")]
        severity: String,
        /// Print the raw result as JSON instead of the report
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::SetKey { key } => set_key(key),
        Command::Analyze {
            image,
            api_key,
            severity,
            json,
        } => analyze(image, api_key, &severity, json),
    }
}

fn set_key(key: String) -> Result<()> {
    let mut config = load_config();
    config.api_key = Some(key);
    save_config(&config).context("failed to save config")?;
    println!("API key saved.");
    Ok(())
}

fn analyze(image: PathBuf, api_key: Option<String>, severity: &str, json: bool) -> Result<()> {
    let filter: SeverityFilter = severity
        .parse()
        .map_err(|err: String| anyhow::anyhow!(err))?;

    let bytes = std::fs::read(&image)
        .with_context(|| format!("failed to read image {}", image.display()))?;
    let encoded = BASE64.encode(&bytes);

    let credentials = CredentialStore::new();
    if let Some(key) = api_key.or_else(|| load_config().api_key) {
        credentials.set(key);
    }
    if !credentials.is_configured() {
        bail!("no API key configured; run `uitriage set-key <KEY>` or pass --api-key");
    }

    let provider = Arc::new(GeminiProvider::new()?);
    let client = AnalysisClient::new(credentials, provider);

    let mut store = ViewStateStore::new();
    store.select_image(image.display().to_string());
    let generation = store.generation();

    log::info!("analyzing {}", image.display());
    let result = uitriage::block_on(client.analyze(&encoded))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    store.apply_result_at(generation, result);
    store.set_filter(filter);

    print_report(&store);
    Ok(())
}

fn print_report(store: &ViewStateStore) {
    let Some(result) = store.result() else {
        println!("No result.");
        return;
    };

    println!("Score: {}/100", result.overall_score);
    println!("{}", result.summary);
    println!(
        "{} critical, {} warning, {} total",
        store.critical_count(),
        store.warning_count(),
        result.issues.len()
    );

    for issue in store.filtered_issues() {
        let marker = if store.selected_issue_id() == Some(issue.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!();
        println!(
            "{marker} [{}] {} ({}): {}",
            issue.severity, issue.id, issue.category, issue.title
        );
        println!("    {}", issue.description);
        println!("    why: {}", issue.why_it_matters);
        println!(
            "    at: {:.0}%,{:.0}% {:.0}x{:.0}",
            issue.location.x, issue.location.y, issue.location.width, issue.location.height
        );
        for (surface, snippet) in issue.fix.snippets() {
            println!("    fix ({surface}): {snippet}");
        }
    }
}
