//! Pull List Manager - customers, comics and pull lists for a comic shop.
//!
//! # Usage
//!
//! ```bash
//! # Customers matching a search
//! pull-list customers list --search lee
//!
//! # A customer's pull list, then add a catalog comic and a custom one
//! pull-list pulls list 12
//! pull-list pulls add 12 c77
//! pull-list pulls add-custom 12 --title "Local Zine" --publisher "Basement Press"
//!
//! # Holds report for every customer
//! pull-list report --out ./reports
//! ```

mod app;
mod commands;
mod domain;
mod infra;
mod util;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::util::config::Settings;

#[derive(Parser)]
#[command(name = "pull-list")]
#[command(author, version, about = "Comic shop customers, comics and pull lists")]
struct Cli {
    /// Config file (defaults to ./pull-list.toml, then the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Shop API base URL, overriding the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage customers
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Manage the comic catalog
    Comics {
        #[command(subcommand)]
        action: ComicAction,
    },
    /// Manage a customer's pull list
    Pulls {
        #[command(subcommand)]
        action: PullAction,
    },
    /// Write the holds report spreadsheet
    Report {
        /// Output directory (defaults to `report_dir` from config)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Only include customers matching this search
        #[arg(short, long, default_value = "")]
        search: String,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// List customers
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show one customer
    Show { id: String },
    /// Create a customer
    Add(CustomerFields),
    /// Edit a customer; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        fields: CustomerFields,
    },
    /// Delete a customer
    Delete { id: String },
}

#[derive(Args, Default)]
pub struct CustomerFields {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub store_credit: Option<f64>,
    /// Discount percentage, 0-100
    #[arg(long)]
    pub discount: Option<f64>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
enum ComicAction {
    /// List the catalog
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show one comic
    Show { id: String },
    /// Add a comic to the catalog
    Add(ComicFields),
    /// Edit a comic; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        fields: ComicFields,
    },
    /// Delete a comic
    Delete { id: String },
}

#[derive(Args, Default)]
pub struct ComicFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub issue: Option<u32>,
    #[arg(long)]
    pub publisher: Option<String>,
    #[arg(long)]
    pub distributor: Option<String>,
    #[arg(long)]
    pub release_date: Option<String>,
    /// Mark as a shop-entered comic
    #[arg(long)]
    pub custom: bool,
}

#[derive(Subcommand)]
enum PullAction {
    /// Show a customer's pull list
    List { customer: String },
    /// Suggest catalog comics to add
    Search { customer: String, query: String },
    /// Hold a catalog comic
    Add { customer: String, comic: String },
    /// Create a custom comic and hold it
    AddCustom {
        customer: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        publisher: String,
    },
    /// Change how many copies are held
    SetQuantity {
        customer: String,
        pull: String,
        quantity: String,
    },
    /// Drop a comic from the pull list
    Remove { customer: String, pull: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings.with_api_url(cli.api_url.clone()),
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            std::process::exit(2);
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    tracing::debug!(
        api = %settings.api_base_url,
        report_dir = %settings.report_dir.display(),
        "starting"
    );

    if let Err(e) = run(cli.command, settings).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let app = app::App::new(settings)?;

    let result = match command {
        Commands::Customers { action } => match action {
            CustomerAction::List { search } => commands::customers::list(&app, &search).await,
            CustomerAction::Show { id } => commands::customers::show(&app, &id).await,
            CustomerAction::Add(fields) => commands::customers::add(&app, fields).await,
            CustomerAction::Edit { id, fields } => {
                commands::customers::edit(&app, &id, fields).await
            }
            CustomerAction::Delete { id } => commands::customers::delete(&app, &id).await,
        },
        Commands::Comics { action } => match action {
            ComicAction::List { search } => commands::comics::list(&app, &search).await,
            ComicAction::Show { id } => commands::comics::show(&app, &id).await,
            ComicAction::Add(fields) => commands::comics::add(&app, fields).await,
            ComicAction::Edit { id, fields } => commands::comics::edit(&app, &id, fields).await,
            ComicAction::Delete { id } => commands::comics::delete(&app, &id).await,
        },
        Commands::Pulls { action } => match action {
            PullAction::List { customer } => commands::pulls::list(&app, &customer).await,
            PullAction::Search { customer, query } => {
                commands::pulls::search(&app, &customer, &query).await
            }
            PullAction::Add { customer, comic } => {
                commands::pulls::add(&app, &customer, &comic).await
            }
            PullAction::AddCustom {
                customer,
                title,
                publisher,
            } => commands::pulls::add_custom(&app, &customer, title, publisher).await,
            PullAction::SetQuantity {
                customer,
                pull,
                quantity,
            } => commands::pulls::set_quantity(&app, &customer, &pull, &quantity).await,
            PullAction::Remove { customer, pull } => {
                commands::pulls::remove(&app, &customer, &pull).await
            }
        },
        Commands::Report { out, search } => commands::report::run(&app, out, &search).await,
    };

    commands::print_toasts(app.toasts());
    result
}
