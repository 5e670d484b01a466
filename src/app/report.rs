//! Holds report: every customer's pulls, resolved to titles, written to a spreadsheet.

use std::{fs, io, path::PathBuf};

use thiserror::Error;
use time::{macros::format_description, Date, OffsetDateTime};

use crate::app::toast::{ToastKind, Toasts};
use crate::domain::{build_rows, Customer, HoldsRow};
use crate::infra::{
    api::{ApiError, ShopClient},
    xlsx::write_holds_workbook,
};

const REPORT_SUFFIX: &str = "CustomerHoldsReport.xlsx";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot build holds report: {0}")]
    EmptyPrecondition(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to format report date: {0}")]
    Date(#[from] time::error::Format),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedReport {
    pub path: PathBuf,
    pub rows: Vec<HoldsRow>,
}

pub struct HoldsReport {
    client: ShopClient,
    toasts: Toasts,
    out_dir: PathBuf,
}

impl HoldsReport {
    pub fn new(client: ShopClient, toasts: Toasts, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            toasts,
            out_dir: out_dir.into(),
        }
    }

    /// Build the report for `customers`, in their order. Comics and pulls are always
    /// fetched fresh. Nothing on the server changes.
    pub async fn generate(&self, customers: &[Customer]) -> Result<GeneratedReport, ReportError> {
        match self.try_generate(customers, report_date()).await {
            Ok(report) => {
                tracing::info!(
                    path = %report.path.display(),
                    customers = report.rows.len(),
                    "holds report written"
                );
                self.toasts.push(
                    ToastKind::Success,
                    format!("Holds report saved to {}", report.path.display()),
                );
                Ok(report)
            }
            Err(err) => {
                tracing::error!(error = %err, "holds report failed");
                self.toasts
                    .push(ToastKind::Error, format!("Error generating report: {err}"));
                Err(err)
            }
        }
    }

    async fn try_generate(
        &self,
        customers: &[Customer],
        date: Date,
    ) -> Result<GeneratedReport, ReportError> {
        if customers.is_empty() {
            return Err(ReportError::EmptyPrecondition("no customers to report on"));
        }

        let catalog = self.client.fetch_comics().await?.data;
        if catalog.is_empty() {
            return Err(ReportError::EmptyPrecondition("the comic catalog is empty"));
        }
        let pulls = self.client.all_pulls().await?;
        tracing::debug!(
            customers = customers.len(),
            comics = catalog.len(),
            pulls = pulls.len(),
            "building holds report"
        );

        let rows = build_rows(customers, &pulls, &catalog);
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(report_file_name(date)?);
        write_holds_workbook(&rows, &path)?;
        Ok(GeneratedReport { path, rows })
    }
}

/// `MM-DD-YYYY-CustomerHoldsReport.xlsx`.
pub fn report_file_name(date: Date) -> Result<String, ReportError> {
    let stamp = date.format(format_description!("[month]-[day]-[year]"))?;
    Ok(format!("{stamp}-{REPORT_SUFFIX}"))
}

fn report_date() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
