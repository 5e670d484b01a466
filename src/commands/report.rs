use std::path::PathBuf;

use crate::app::{report::HoldsReport, App};

use super::{loaded, CommandResult};

pub async fn run(app: &App, out: Option<PathBuf>, search: &str) -> CommandResult {
    let customers = loaded(app.customers(search).await)?;
    let report = match out {
        Some(dir) => HoldsReport::new(app.client().clone(), app.toasts().clone(), dir),
        None => app.holds_report(),
    };
    let generated = report.generate(&customers).await?;
    println!(
        "{} customers written to {}",
        generated.rows.len(),
        generated.path.display()
    );
    Ok(())
}
