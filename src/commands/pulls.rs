use crate::app::{pull_list::PullListManager, App};
use crate::domain::{ComicSelection, PullListEntry};

use super::{loaded, CommandResult};

pub async fn list(app: &App, customer: &str) -> CommandResult {
    let mut manager = app.pull_list(customer);
    manager.load().await;
    print_pull_list(&manager)
}

pub async fn search(app: &App, customer: &str, query: &str) -> CommandResult {
    let mut manager = app.pull_list(customer);
    loaded(manager.load().await.clone())?;
    for comic in manager.search(query) {
        println!("{:>6}  {:<36} {}", comic.id, comic.label(), comic.publisher);
    }
    Ok(())
}

pub async fn add(app: &App, customer: &str, comic_id: &str) -> CommandResult {
    let mut manager = app.pull_list(customer);
    let view = loaded(manager.load().await.clone())?;
    let comic = view
        .catalog
        .iter()
        .find(|comic| comic.id == comic_id)
        .cloned()
        .ok_or_else(|| format!("comic {comic_id} is not in the catalog"))?;
    manager.add(ComicSelection::Existing(comic)).await?;
    print_pull_list(&manager)
}

pub async fn add_custom(
    app: &App,
    customer: &str,
    title: String,
    publisher: String,
) -> CommandResult {
    let mut manager = app.pull_list(customer);
    loaded(manager.load().await.clone())?;
    manager
        .add(ComicSelection::Custom { title, publisher })
        .await?;
    print_pull_list(&manager)
}

pub async fn set_quantity(
    app: &App,
    customer: &str,
    pull: &str,
    quantity: &str,
) -> CommandResult {
    let mut manager = app.pull_list(customer);
    loaded(manager.load().await.clone())?;
    manager.update_quantity(pull, quantity).await?;
    print_pull_list(&manager)
}

pub async fn remove(app: &App, customer: &str, pull: &str) -> CommandResult {
    let mut manager = app.pull_list(customer);
    loaded(manager.load().await.clone())?;
    manager.remove(pull).await?;
    print_pull_list(&manager)
}

fn print_pull_list(manager: &PullListManager) -> CommandResult {
    let view = loaded(manager.state().clone())?;
    println!("Pull list for customer {}", manager.customer_id());
    if view.entries.is_empty() {
        println!("No comics in pull list yet.");
        return Ok(());
    }
    for entry in &view.entries {
        let added = entry
            .pull
            .added_at()
            .map(|at| format!("  added {}", at.date()))
            .unwrap_or_default();
        println!(
            "{:>6}  {:<36} x{:<3} {}{}{}",
            entry.pull.id,
            entry_title(entry),
            entry.pull.quantity,
            entry.comic.publisher,
            if entry.comic.is_custom { " (Custom)" } else { "" },
            added
        );
    }
    Ok(())
}

/// Catalog label, or just the refresh hint when the comic isn't in the catalog yet.
fn entry_title(entry: &PullListEntry) -> String {
    if entry.resolved {
        entry.comic.label()
    } else {
        entry.comic.title.clone()
    }
}
