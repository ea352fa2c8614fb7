mod config;
mod news;
mod open_url;
mod search;
mod ui;
mod util;

use anyhow::Result;
use console::Term;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse a minimal CLI: optional --config <path>, optional --query <q>
    let mut args = env::args().skip(1);
    let mut config_override: Option<String> = None;
    let mut one_shot_query: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if let Some(p) = args.next() {
                    config_override = Some(p);
                }
            }
            "--query" => {
                if let Some(q) = args.next() {
                    one_shot_query = Some(q);
                }
            }
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
    }

    let cfg = config::load(config_override)?;

    // One-shot mode: fetch once, print, exit. Usable outside a TTY.
    if let Some(query) = one_shot_query {
        let articles = news::search_once(&cfg, &query).await?;
        ui::print_results(&articles);
        return Ok(());
    }

    // Clear terminal at startup for a clean UI
    let _ = Term::stdout().clear_screen();
    news::run(&cfg).await
}

fn print_help() {
    println!("news-search");
    println!("Usage: news-search [--config <path>] [--query <q>]");
    println!("  --config <path>  Path to a config.toml (provider, api_key, defaults)");
    println!("  --query <q>      Fetch once for <q>, print results, and exit");
    println!();
    println!("Set {} to supply the provider API key.", config::API_KEY_ENV);
}
