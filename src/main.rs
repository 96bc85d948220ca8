use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;
use rigsheet::{
    clipboard::{export_summary, ClipboardSink, CopyOutcome, FileClipboard, NoClipboard},
    config::Config,
    fetch::{self, SectionState},
    media::PassthroughLookup,
    sections::{FormState, OrderForm, SectionKind},
    table,
};
use std::{fs, path::PathBuf, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Sheet-backed rigging site content and order quotes")]
struct Args {
    /// Section config (YAML). Defaults to the published sheet tabs.
    #[arg(long, global = true, env = "RIGSHEET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and normalize every section, print the result as JSON.
    Sections {
        /// Restrict to these sections.
        #[arg(long, value_delimiter = ',')]
        only: Vec<SectionKind>,
    },
    /// Quote an order from the form sheet and a saved form state.
    Quote {
        /// Read the form CSV from a file instead of fetching it.
        #[arg(long)]
        form_csv: Option<PathBuf>,
        /// Form state as JSON (choices / checked / values).
        #[arg(long)]
        state: Option<PathBuf>,
        /// Write the request summary to this file.
        #[arg(long)]
        copy_to: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rigsheet=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) resolve config ───────────────────────────────────────────
    let args = Args::parse();
    let config = Config::resolve(args.config.as_deref())?;
    let client = Client::new();

    match args.command {
        Command::Sections { only } => run_sections(&client, config.only(&only)).await,
        Command::Quote {
            form_csv,
            state,
            copy_to,
        } => run_quote(&client, &config, form_csv, state, copy_to).await,
    }
}

async fn run_sections(client: &Client, config: Config) -> Result<()> {
    info!(sections = config.sections.len(), "loading sections");
    let site = fetch::load_all(client, &config, Arc::new(PassthroughLookup)).await;

    for section in &site.sections {
        match &section.state {
            SectionState::Ready(_) => info!(section = %section.kind, "ready"),
            SectionState::Empty => warn!(section = %section.kind, "{}", section.kind.empty_message()),
            SectionState::Failed(reason) => {
                error!(section = %section.kind, %reason, "{}", section.kind.failure_message())
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&site)?);
    Ok(())
}

async fn run_quote(
    client: &Client,
    config: &Config,
    form_csv: Option<PathBuf>,
    state: Option<PathBuf>,
    copy_to: Option<PathBuf>,
) -> Result<()> {
    // ─── 1) form rows ────────────────────────────────────────────────
    let body = match form_csv {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("reading form csv {}", path.display()))?,
        None => {
            let Some(source) = config.source(SectionKind::Form) else {
                bail!("no form section configured");
            };
            match fetch::fetch_csv(client, &source.url).await {
                Ok(body) => body,
                Err(e) => {
                    error!(error = %e, "form init failed");
                    bail!("{}", SectionKind::Form.failure_message());
                }
            }
        }
    };
    let form = OrderForm::from_records(&table::parse(&body));
    if form.blocks.is_empty() {
        warn!("{}", SectionKind::Form.empty_message());
    }

    // ─── 2) current input ────────────────────────────────────────────
    let state: FormState = match state {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading form state {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing form state {}", path.display()))?
        }
        None => FormState::default(),
    };

    // ─── 3) quote + summary ──────────────────────────────────────────
    let quote = form.quote(&state);
    info!(total = quote.total, multiplier = quote.multiplier, "quoted");
    println!("예상 견적: {}", quote.total_display());
    for line in quote.breakdown() {
        println!("  {}: {}", line.key, line.value);
    }

    let text = form.summary(&state).to_copy_text();
    let mut sink: Box<dyn ClipboardSink> = match copy_to {
        Some(path) => Box::new(FileClipboard::new(path)),
        None => Box::new(NoClipboard),
    };
    match export_summary(sink.as_mut(), &text) {
        CopyOutcome::Copied => println!("복사 완료!"),
        CopyOutcome::Manual(text) => println!("\n아래 내용을 복사하세요:\n{}", text),
    }
    Ok(())
}
