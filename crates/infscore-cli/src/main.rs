mod client;
mod error;
mod orchestrator;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};
use infscore_core::{AnalysisRecord, ScoredSection};
use tracing_subscriber::EnvFilter;

use crate::client::{RankingsPage, ServerClient, DEFAULT_SERVER_URL};
use crate::orchestrator::AnalysisReport;

#[derive(Debug, Parser)]
#[command(name = "infscore")]
#[command(about = "Influencer credibility analysis client")]
struct Cli {
    /// Base URL of the infscore server
    #[arg(long, global = true, env = "INFSCORE_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "120")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze an influencer and save the result to the leaderboard
    Analyze {
        /// Influencer name, e.g. "MrBeast"
        name: String,
        /// Platform to file the result under; detected from the analysis when omitted
        #[arg(long)]
        platform: Option<String>,
    },
    /// Show the leaderboard
    Rankings {
        /// Only show one platform
        #[arg(long)]
        platform: Option<String>,
        /// Ask the server to skip caches
        #[arg(long)]
        nocache: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let fallback_level = std::env::var("INFSCORE_LOG_LEVEL").unwrap_or_else(|_| "warn".into());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ServerClient::new(&cli.server_url, cli.timeout_secs)?;

    match cli.command {
        Commands::Analyze { name, platform } => {
            let report = orchestrator::analyze(&client, &name, platform.as_deref()).await?;
            print!("{}", render_report(&report));
        }
        Commands::Rankings { platform, nocache } => {
            let page = client.rankings(platform.as_deref(), nocache).await?;
            print!("{}", render_rankings(&page));
        }
    }

    Ok(())
}

fn fmt_score(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_string(), |s| format!("{s:.1}"))
}

fn render_section(out: &mut String, title: &str, section: &ScoredSection) {
    out.push_str(&format!("{title}: {}\n", fmt_score(section.score)));
    if !section.analysis.trim().is_empty() {
        out.push_str(&format!("  {}\n", section.analysis.trim()));
    }
}

fn render_report(report: &AnalysisReport) -> String {
    let analysis = &report.analysis;
    let mut out = format!(
        "{} ({})\nCredibility: {}\n",
        report.name,
        report.draft.platform.as_deref().unwrap_or_default(),
        fmt_score(analysis.credibility_score)
    );
    render_section(&mut out, "Audience authenticity", &analysis.audience_authenticity);
    render_section(&mut out, "Content quality", &analysis.content_quality);
    render_section(&mut out, "Brand alignment", &analysis.brand_alignment_potential);
    render_section(&mut out, "Engagement", &analysis.engagement_metrics);
    out.push_str(&format!(
        "Niche: {}  Audience: {}\n\n{}\n",
        report.draft.niche.as_deref().unwrap_or_default(),
        report.draft.audience.as_deref().unwrap_or_default(),
        analysis.overall_analysis
    ));

    match &report.receipt {
        Some(receipt) => out.push_str(&format!(
            "\n{} ({}); {} influencers tracked\n",
            receipt.message, receipt.id, receipt.current_count
        )),
        None => out.push_str("\nCould not save this analysis to the leaderboard.\n"),
    }
    if let Some(page) = &report.rankings {
        out.push('\n');
        out.push_str(&render_rankings(page));
    }
    out
}

fn render_row(rank: usize, record: &AnalysisRecord) -> String {
    format!(
        "{rank:>3}. {:<28} {:<10} {:>5}  {:<16} {}\n",
        record.name,
        record.platform,
        fmt_score(record.credibility_score),
        record.niche,
        record.audience
    )
}

fn render_rankings(page: &RankingsPage) -> String {
    if page.results.is_empty() {
        return "No ranked influencers yet.\n".to_string();
    }
    let mut out = format!(
        "Leaderboard (server up {}s)\n",
        page.server_uptime / 1000
    );
    for (index, record) in page.results.iter().enumerate() {
        out.push_str(&render_row(index + 1, record));
    }
    out
}
