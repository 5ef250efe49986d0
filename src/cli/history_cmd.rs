//! History command handler

use crate::application::HistoryEntry;

use super::app::{CommandError, Services};
use super::args::HistoryAction;
use super::presenter::Presenter;

const PREVIEW_CHARS: usize = 72;

/// Handle history subcommand
pub async fn handle_history_command(
    action: HistoryAction,
    services: &Services,
    presenter: &Presenter,
) -> Result<(), CommandError> {
    match action {
        HistoryAction::List { full } => {
            let entries = services.history.list().await;
            if entries.is_empty() {
                presenter.info("No saved prompts");
                return Ok(());
            }
            for entry in &entries {
                presenter.output(&summary_line(entry));
                if full {
                    presenter.output(&entry.content);
                    presenter.output("");
                }
            }
            Ok(())
        }
        HistoryAction::Delete { id } => {
            if services.history.delete(&id).await? {
                presenter.success(&format!("Deleted {id}"));
                Ok(())
            } else {
                Err(CommandError::Failed(format!("No history entry with id '{id}'")))
            }
        }
        HistoryAction::Clear => {
            services.history.clear().await?;
            presenter.success("History cleared");
            Ok(())
        }
    }
}

fn summary_line(entry: &HistoryEntry) -> String {
    let source = if entry.fallback {
        "offline".to_string()
    } else {
        entry.vendor.clone()
    };
    format!(
        "{}  {}  [{}] {} ({source})\n    {}",
        entry.id,
        entry.generated_at.format("%Y-%m-%d %H:%M"),
        entry.category,
        entry.title,
        preview(&entry.content),
    )
}

/// First line of the prompt, cut at a char boundary
fn preview(content: &str) -> String {
    let first = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if first.chars().count() <= PREVIEW_CHARS {
        first.to_string()
    } else {
        let cut: String = first.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    }
}
