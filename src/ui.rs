use crate::config::RuntimeConfig;
use crate::news::Article;
use crate::search::SearchState;
use crate::util::sanitize::{sanitize_for_terminal, truncate_chars};
use console::{Key, Term, style};
use time::OffsetDateTime;
use tokio::sync::mpsc::Sender;

const DESCRIPTION_CHARS: usize = 160;

/// Key events the session loop cares about. Everything else is dropped at
/// the reader thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Edit(char),
    Backspace,
    Up,
    Down,
    Enter,
    Quit,
}

/// Read keys on a dedicated thread; `Term::read_key` blocks, so it cannot
/// live on the event loop. The thread ends when the receiver is dropped.
pub fn spawn_key_reader(tx: Sender<InputEvent>) {
    std::thread::spawn(move || {
        let term = Term::stdout();
        loop {
            let event = match term.read_key() {
                Ok(Key::Char(c)) if !c.is_control() => InputEvent::Edit(c),
                Ok(Key::Backspace) => InputEvent::Backspace,
                Ok(Key::ArrowUp) => InputEvent::Up,
                Ok(Key::ArrowDown) => InputEvent::Down,
                Ok(Key::Enter) => InputEvent::Enter,
                Ok(Key::Escape) => InputEvent::Quit,
                Ok(_) => continue,
                Err(_) => InputEvent::Quit,
            };
            let quit = event == InputEvent::Quit;
            if tx.blocking_send(event).is_err() || quit {
                break;
            }
        }
    });
}

/// Pure function of state: redraw the whole screen from `state`.
pub fn render(term: &Term, cfg: &RuntimeConfig, state: &SearchState) {
    let _ = term.clear_screen();
    if let Some(h) = &cfg.header {
        println!("{}", h);
    }
    println!(
        "Search: {}{}",
        style(&state.query).bold(),
        style("_").dim()
    );
    println!();

    if state.loading {
        println!("{}", style("Searching for latest news...").dim());
    } else if let Some(msg) = &state.error {
        println!("{} {}", style("!").red().bold(), style(msg).red());
    }

    if !state.articles.is_empty() {
        let now = OffsetDateTime::now_utc();
        for (i, article) in state.articles.iter().enumerate() {
            print_card(article, i, i == state.selected, now);
        }
    } else if !state.loading {
        if state.query.is_empty() {
            println!("{}", style("Search for news to get started").dim());
        } else {
            println!(
                "{}",
                style("No articles found. Try different keywords.").dim()
            );
        }
    }

    println!();
    println!(
        "{}",
        style("Type to search. Up/Down select, Enter opens, Esc quits.").dim()
    );
}

fn print_card(article: &Article, index: usize, selected: bool, now: OffsetDateTime) {
    let marker = if selected { ">" } else { " " };
    let title = sanitize_for_terminal(&article.title);
    let description = truncate_chars(&sanitize_for_terminal(&article.description), DESCRIPTION_CHARS);

    println!("{} {}: {}", marker, index + 1, style(title).bold());
    println!("     {}", description);

    let mut meta: Vec<String> = Vec::new();
    if let Some(source) = &article.source {
        meta.push(sanitize_for_terminal(source));
    }
    if let Some(published) = article.published_at {
        meta.push(relative_age(published, now));
    }
    meta.push(article.image.clone());
    println!("     {}", style(meta.join(" | ")).dim());
    println!("     {}", style(&article.url).underlined());
    println!();
}

/// One-shot output for `--query` runs: same cards, no screen handling.
pub fn print_results(articles: &[Article]) {
    if articles.is_empty() {
        println!("No articles found. Try different keywords.");
        return;
    }
    let now = OffsetDateTime::now_utc();
    for (i, article) in articles.iter().enumerate() {
        print_card(article, i, false, now);
    }
}

/// Coarse human age of a timestamp ("just now", "5m ago", "2d ago"); falls
/// back to the ISO date past a week.
fn relative_age(published: OffsetDateTime, now: OffsetDateTime) -> String {
    let elapsed = now - published;
    let minutes = elapsed.whole_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = elapsed.whole_hours();
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    let days = elapsed.whole_days();
    if days < 7 {
        return format!("{}d ago", days);
    }
    published.date().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    #[test]
    fn relative_age_buckets() {
        let now = datetime!(2024-03-10 12:00:00 UTC);
        assert_eq!(relative_age(now - Duration::seconds(20), now), "just now");
        assert_eq!(relative_age(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_age(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_age(now - Duration::days(2), now), "2d ago");
        assert_eq!(relative_age(now - Duration::days(30), now), "2024-02-09");
    }
}
