mod fetch;
mod model;
mod provider;

pub use fetch::{HttpNewsSource, NewsSource};
pub use model::Article;
pub use provider::{Provider, filter_displayable};

use crate::config::RuntimeConfig;
use crate::open_url::open_url;
use crate::search::{SearchController, SearchState};
use crate::ui::{self, InputEvent};
use anyhow::Result;
use console::Term;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

/// Interactive search session against the configured provider.
pub async fn run(cfg: &RuntimeConfig) -> Result<()> {
    let source: Arc<dyn NewsSource> = Arc::new(HttpNewsSource::new(cfg)?);
    let (key_tx, key_rx) = mpsc::channel(64);
    ui::spawn_key_reader(key_tx);

    let term = Term::stdout();
    run_session(cfg, source, key_rx, |state| ui::render(&term, cfg, state)).await?;
    Ok(())
}

/// Single fetch for `--query` runs; no debounce, no screen handling.
pub async fn search_once(cfg: &RuntimeConfig, query: &str) -> Result<Vec<Article>> {
    let source = HttpNewsSource::new(cfg)?;
    source.search(query.to_string()).await
}

/// The event loop: key events, the debounce timer, and fetch completions all
/// land here, so controller state is only ever touched from one task.
/// Returns the final state for inspection.
async fn run_session(
    cfg: &RuntimeConfig,
    source: Arc<dyn NewsSource>,
    mut input: mpsc::Receiver<InputEvent>,
    mut render: impl FnMut(&SearchState),
) -> Result<SearchState> {
    let mut controller = SearchController::new(cfg.default_query.clone(), cfg.debounce);
    let (done_tx, mut done_rx) = mpsc::channel::<(u64, Result<Vec<Article>>)>(8);

    // Startup fetch with the default query, before any typing
    start_fetch(&mut controller, &source, &done_tx);
    render(controller.state());

    loop {
        let deadline = controller.deadline();
        tokio::select! {
            event = input.recv() => {
                let Some(event) = event else { break };
                match event {
                    InputEvent::Edit(c) => controller.push_char(c),
                    InputEvent::Backspace => controller.pop_char(),
                    InputEvent::Up => controller.select_prev(),
                    InputEvent::Down => controller.select_next(),
                    InputEvent::Enter => {
                        if let Some(article) = controller.selected_article() {
                            if let Err(err) = open_url(&article.url, cfg.open_command.as_deref()) {
                                eprintln!("failed to open {}: {}", article.url, err);
                            }
                        }
                    }
                    InputEvent::Quit => break,
                }
            }
            Some((seq, result)) = done_rx.recv() => {
                controller.apply_result(seq, result);
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                start_fetch(&mut controller, &source, &done_tx);
            }
        }
        render(controller.state());
    }

    Ok(controller.state().clone())
}

// In-flight fetches are not cancelled when superseded; the sequence tag lets
// the controller drop their completions instead.
fn start_fetch(
    controller: &mut SearchController,
    source: &Arc<dyn NewsSource>,
    done_tx: &mpsc::Sender<(u64, Result<Vec<Article>>)>,
) {
    let issued = controller.begin_fetch();
    let fut = source.search(issued.query);
    let tx = done_tx.clone();
    tokio::spawn(async move {
        let result = fut.await;
        let _ = tx.send((issued.seq, result)).await;
    });
}
