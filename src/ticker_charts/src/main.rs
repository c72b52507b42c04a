use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{info, warn};

use ticker_charts::{
    app::{App, UiEvent},
    config::AppConfig,
    logging,
    providers::http::HttpProvider,
    view::{Page, RequestState, ViewController},
};

#[derive(Parser)]
#[command(version, about = "Interactive stock charts written to an HTML page")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Symbol loaded on start (overrides view.default_symbol).
    #[arg(long, value_name = "TICKER")]
    symbol: Option<String>,

    /// Load the initial symbol, write the page and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(symbol) = cli.symbol {
        config.view.default_symbol = symbol;
    }
    logging::init(&config.logging.level);

    let default_symbol = config.default_symbol()?;
    let quick = config.quick_tickers()?;
    let provider = HttpProvider::new(config.http_provider()?)
        .context("create HTTP provider")?;
    info!(
        base_url = %config.provider.base_url,
        endpoint = ?config.provider.endpoint,
        "starting"
    );

    let page = Page::new(&quick);
    let controller = ViewController::new(Arc::new(provider), page, quick);
    let app = App::new(controller, default_symbol);

    let (tx, rx) = mpsc::channel(16);
    if !cli.once {
        print_help(&config);
        tokio::spawn(read_commands(tx));
    } else {
        drop(tx);
    }

    let output = config.view.output.clone();
    let controller = app
        .run(rx, |controller| {
            std::fs::write(&output, controller.view().render_html())
                .with_context(|| format!("write page {}", output.display()))?;
            println!("{} [{}]", output.display(), describe(controller.state()));
            Ok(())
        })
        .await?;

    info!(state = %describe(controller.state()), "done");
    Ok(())
}

async fn read_commands(tx: mpsc::Sender<UiEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                for event in UiEvent::from_command_line(&line) {
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
            }
            Ok(None) => return,
            Err(e) => {
                warn!("stdin read failed: {e}");
                return;
            }
        }
    }
}

fn print_help(config: &AppConfig) {
    println!("Type a ticker and press Enter, or:");
    for (i, ticker) in config.view.quick_tickers.iter().enumerate() {
        println!("  :{}  {}", i + 1, ticker.trim().to_uppercase());
    }
    println!("  :submit  resubmit the current input");
    println!("  :q       quit");
}

fn describe(state: &RequestState) -> String {
    match state {
        RequestState::Idle => "idle".to_string(),
        RequestState::Loading(s) => format!("loading {s}"),
        RequestState::Loaded(s) => format!("loaded {s}"),
        RequestState::Failed(s, msg) => format!("{s}: {msg}"),
    }
}
