#![forbid(unsafe_code)]
//! Browse the most recent blocks of a running network, one page at a time.

use clap::{Parser, Subcommand};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use fondant_explorer::cache::BlockCache;
use fondant_explorer::config::{load_config, load_config_from, Config};
use fondant_explorer::display::now_millis;
use fondant_explorer::status::{status_from_config, NetworkStatus};
use fondant_explorer::{BlocksController, ControllerState, RpcChainClient, ViewState};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fondant-blocks", version, about = "Browse recent blocks of a running network")]
struct Cli {
    /// Config file [default: explorer.toml]; a missing file means defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Node JSON-RPC endpoint
    #[arg(long)]
    rpc_url: Option<String>,

    /// Launcher status endpoint
    #[arg(long)]
    status_url: Option<String>,

    #[arg(long)]
    page_size: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print one page and exit
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    /// Page through blocks interactively
    Browse,
}

type Controller = BlocksController<RpcChainClient>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let config = apply_overrides(config, &cli);
    config.validate()?;

    let client = Arc::new(RpcChainClient::from_config(&config)?);
    let controller = BlocksController::new(client, config.display.page_size)
        .with_cache(BlockCache::new(config.display.cache_capacity));
    let status = status_from_config(&config)?;

    match cli.command.unwrap_or(Command::List { page: 1 }) {
        Command::List { page } => {
            controller.go_to_page(page).await?;
            controller
                .set_network_running(status.is_running().await)
                .await;
            render(&controller.snapshot().await);
        }
        Command::Browse => browse(&controller, status.as_ref()).await?,
    }

    Ok(())
}

fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(url) = &cli.rpc_url {
        config.node.rpc_url = url.clone();
    }
    if let Some(url) = &cli.status_url {
        config.node.status_url = Some(url.clone());
    }
    if let Some(size) = cli.page_size {
        config.display.page_size = size;
    }
    config
}

async fn browse(
    controller: &Controller,
    status: &dyn NetworkStatus,
) -> Result<(), Box<dyn std::error::Error>> {
    controller
        .set_network_running(status.is_running().await)
        .await;
    render(&controller.snapshot().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "[n]ext [p]revious [r]efresh [q]uit >".bright_black());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "n" | "next" => {
                controller.next_page().await;
            }
            "p" | "prev" | "previous" => {
                controller.previous_page().await;
            }
            "r" | "refresh" => {
                let running = status.is_running().await;
                let was_running = controller.snapshot().await.network_running;
                controller.set_network_running(running).await;
                if running && was_running {
                    controller.clear_cache().await;
                    controller.refresh().await;
                }
            }
            "q" | "quit" => break,
            "" => continue,
            other => {
                println!("{}", format!("Unknown command: {}", other).yellow());
                continue;
            }
        }
        render(&controller.snapshot().await);
    }

    Ok(())
}

fn render(state: &ControllerState) {
    println!();
    match &state.view {
        ViewState::Paused => println!("{}", "Network paused".bright_black()),
        ViewState::Loading => println!("{}", "Loading blocks...".bright_black()),
        ViewState::Error(message) => {
            println!("{}", format!("Error fetching blocks: {}", message).red())
        }
        ViewState::Empty => println!("{}", "No blocks available to display".bright_black()),
        ViewState::Ready(page) => {
            let now = now_millis();
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(
                    ["Height", "Era", "Transactions", "Age", "Block Hash"]
                        .into_iter()
                        .map(|title| {
                            Cell::new(title)
                                .fg(TableColor::Cyan)
                                .add_attribute(Attribute::Bold)
                        })
                        .collect::<Vec<Cell>>(),
                );

            for block in &page.blocks {
                table.add_row(vec![
                    Cell::new(format!("#{}", block.height)).fg(TableColor::White),
                    Cell::new(block.era).fg(TableColor::White),
                    Cell::new(block.transaction_count).fg(TableColor::White),
                    Cell::new(block.age(now)).fg(TableColor::Grey),
                    Cell::new(block.short_hash()).fg(TableColor::Magenta),
                ]);
            }
            println!("{}", table);
        }
    }

    let previous = if state.page > 1 {
        "Previous".bright_white()
    } else {
        "Previous".bright_black()
    };
    let next = if state.is_last_page {
        "Next".bright_black()
    } else {
        "Next".bright_white()
    };
    println!(
        "{}  {}  {}",
        previous,
        format!("Page {}", state.page).cyan().bold(),
        next
    );
}
