use crate::app::App;
use crate::domain::{Comic, ComicForm};
use crate::ComicFields;

use super::{loaded, CommandResult};

pub async fn list(app: &App, search: &str) -> CommandResult {
    let comics = loaded(app.comics(search).await)?;
    if comics.is_empty() {
        if search.is_empty() {
            println!("No comics yet.");
        } else {
            println!("No comics found matching your search.");
        }
        return Ok(());
    }
    for comic in &comics {
        println!(
            "{:>6}  {:<36} {:<16}{}",
            comic.id,
            comic.label(),
            comic.publisher,
            if comic.is_custom { " (Custom)" } else { "" }
        );
    }
    Ok(())
}

pub async fn show(app: &App, id: &str) -> CommandResult {
    let comic = app.client().get_comic(id).await?;
    print_comic(&comic);
    Ok(())
}

pub async fn add(app: &App, fields: ComicFields) -> CommandResult {
    let form = apply(ComicForm::default(), fields);
    let comic = app.save_comic(None, form).await?;
    print_comic(&comic);
    Ok(())
}

pub async fn edit(app: &App, id: &str, fields: ComicFields) -> CommandResult {
    let current = app.client().get_comic(id).await?;
    let form = apply(ComicForm::from(&current), fields);
    let comic = app.save_comic(Some(id), form).await?;
    print_comic(&comic);
    Ok(())
}

pub async fn delete(app: &App, id: &str) -> CommandResult {
    app.delete_comic(id).await?;
    Ok(())
}

fn apply(mut form: ComicForm, fields: ComicFields) -> ComicForm {
    if let Some(value) = fields.title {
        form.title = value;
    }
    if let Some(value) = fields.issue {
        form.issue_number = value;
    }
    if let Some(value) = fields.publisher {
        form.publisher = value;
    }
    if let Some(value) = fields.distributor {
        form.distributor = value;
    }
    if let Some(value) = fields.release_date {
        form.release_date = value;
    }
    form.is_custom |= fields.custom;
    form
}

fn print_comic(comic: &Comic) {
    println!("{} (#{})", comic.label(), comic.id);
    println!("  publisher    {}", comic.publisher);
    println!("  distributor  {}", comic.distributor);
    println!("  released     {}", comic.release_date);
    if comic.is_custom {
        println!("  custom entry");
    }
}
