use activity_reporter::credential::{self, CredentialStrategy};
use activity_reporter::{
    run_report, ActivityKind, AppConfig, GitHubClient, RepoId, ReportError, ReportRequest,
    TimeWindow,
};
use anyhow::{Context, Result};
use clap::Parser;
use console::Term;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "activity-reporter")]
#[command(
    about = "List GitHub commits, issues, or merged pull requests for a date range",
    version
)]
struct Cli {
    /// Repository as owner/repo (defaults to ACTIVITY_REPO)
    repo: Option<String>,

    /// What to list; prompted for when omitted
    #[arg(short, long, value_enum)]
    action: Option<ActivityKind>,

    /// First day of the window, YYYY-MM-DD; prompted for when omitted
    #[arg(long)]
    start: Option<String>,

    /// Last day of the window, YYYY-MM-DD; prompted for when omitted
    #[arg(long)]
    end: Option<String>,

    /// Only include activity by this GitHub user
    #[arg(long)]
    author: Option<String>,

    /// Where to read the token from (defaults to ACTIVITY_CREDENTIAL, then file)
    #[arg(long, value_enum)]
    credential: Option<CredentialStrategy>,

    /// Token used by `--credential inline`
    #[arg(long)]
    token: Option<String>,

    /// Authenticate with basic auth as this user
    #[arg(long)]
    username: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "activity_reporter=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        // Printed regardless of RUST_LOG.
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    let term = Term::stderr();

    // Everything the user typed is validated before the token is touched.
    let request = build_request(&cli, &config, &term)?;

    let strategy = cli.credential.unwrap_or(config.activity_credential);
    let credential = credential::source_for(
        strategy,
        config.github_token.clone(),
        cli.token.clone(),
        config.credential_file(),
    )
    .acquire()?;

    if cli.username.is_some() {
        config.github_username = cli.username.clone();
    }
    let client = GitHubClient::new(&config, &credential)?;

    let written = run_report(&client, &config, &request, std::io::stdout().lock()).await?;
    tracing::info!(repo = %request.repo, kind = %request.kind, written, "Done");
    Ok(())
}

fn build_request(cli: &Cli, config: &AppConfig, term: &Term) -> Result<ReportRequest> {
    let repo: RepoId = match cli.repo.as_ref().or(config.activity_repo.as_ref()) {
        Some(repo) => repo.parse()?,
        None => ask(term, "Enter repository (owner/repo): ")?.parse()?,
    };

    let kind = match cli.action {
        Some(kind) => kind,
        None => ask(term, "Select action (commits, issues, pulls): ")?.parse()?,
    };

    let start = match &cli.start {
        Some(start) => start.clone(),
        None => ask(term, "Enter start date (YYYY-MM-DD): ")?,
    };
    let end = match &cli.end {
        Some(end) => end.clone(),
        None => ask(term, "Enter end date (YYYY-MM-DD): ")?,
    };
    let window = TimeWindow::parse(&start, &end)?;

    Ok(ReportRequest {
        repo,
        kind,
        window,
        author: cli.author.clone(),
    })
}

fn ask(term: &Term, question: &str) -> Result<String, ReportError> {
    term.write_str(question)?;
    Ok(term.read_line()?.trim().to_string())
}
