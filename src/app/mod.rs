//! Application layer: the shared client and toast queue, and the actions screens trigger.

pub mod pull_list;
pub mod report;
pub mod toast;

use thiserror::Error;

use crate::domain::{
    filter_comics, filter_customers, CacheResource, Comic, ComicForm, Customer, CustomerForm,
    FormErrors, ViewState,
};
use crate::infra::api::{ApiError, ShopClient};
use crate::util::config::Settings;

use self::pull_list::PullListManager;
use self::report::HoldsReport;
use self::toast::{ToastKind, Toasts};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Form(#[from] FormErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct App {
    client: ShopClient,
    toasts: Toasts,
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, ApiError> {
        let client = ShopClient::with_options(&settings.api_base_url, settings.request_timeout())?
            .with_ttl(settings.cache_ttl());
        Ok(Self::with_client(client, settings))
    }

    pub fn with_client(client: ShopClient, settings: Settings) -> Self {
        Self {
            client,
            toasts: Toasts::default(),
            settings,
        }
    }

    pub fn client(&self) -> &ShopClient {
        &self.client
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn pull_list(&self, customer_id: &str) -> PullListManager {
        PullListManager::new(self.client.clone(), customer_id, self.toasts.clone())
    }

    pub fn holds_report(&self) -> HoldsReport {
        HoldsReport::new(
            self.client.clone(),
            self.toasts.clone(),
            self.settings.report_dir.clone(),
        )
    }

    /// Customer list screen: all customers matching `query`.
    pub async fn customers(&self, query: &str) -> ViewState<Vec<Customer>> {
        match self.client.list_customers().await {
            Ok(payload) => ViewState::Loaded(
                filter_customers(&payload.data, query)
                    .into_iter()
                    .cloned()
                    .collect(),
            ),
            Err(err) => {
                tracing::error!(error = %err, "failed to load customers");
                ViewState::Errored(format!("Error loading customers: {err}"))
            }
        }
    }

    /// Comic list screen: catalog entries matching `query`.
    pub async fn comics(&self, query: &str) -> ViewState<Vec<Comic>> {
        match self.client.list_comics().await {
            Ok(payload) => ViewState::Loaded(
                filter_comics(&payload.data, query)
                    .into_iter()
                    .cloned()
                    .collect(),
            ),
            Err(err) => {
                tracing::error!(error = %err, "failed to load comics");
                ViewState::Errored(format!("Error loading comics: {err}"))
            }
        }
    }

    /// Create (`id == None`) or update a customer from a submitted form.
    pub async fn save_customer(
        &self,
        id: Option<&str>,
        form: CustomerForm,
    ) -> Result<Customer, AppError> {
        let outcome = self.try_save_customer(id, form).await;
        let success = if id.is_some() {
            "Customer updated successfully"
        } else {
            "Customer created successfully"
        };
        self.settle(outcome, CacheResource::Customers, success).await
    }

    async fn try_save_customer(
        &self,
        id: Option<&str>,
        form: CustomerForm,
    ) -> Result<Customer, AppError> {
        let payload = form.validate()?;
        let customer = match id {
            Some(id) => self.client.update_customer(id, &payload).await?,
            None => self.client.create_customer(&payload).await?,
        };
        Ok(customer)
    }

    pub async fn delete_customer(&self, id: &str) -> Result<(), AppError> {
        let outcome = self.client.delete_customer(id).await.map_err(AppError::from);
        self.settle(outcome, CacheResource::Customers, "Customer deleted")
            .await
    }

    /// Create (`id == None`) or update a catalog comic from a submitted form.
    pub async fn save_comic(&self, id: Option<&str>, form: ComicForm) -> Result<Comic, AppError> {
        let outcome = self.try_save_comic(id, form).await;
        let success = if id.is_some() {
            "Comic updated successfully"
        } else {
            "Comic created successfully"
        };
        self.settle(outcome, CacheResource::Comics, success).await
    }

    async fn try_save_comic(&self, id: Option<&str>, form: ComicForm) -> Result<Comic, AppError> {
        let payload = form.validate()?;
        let comic = match id {
            Some(id) => self.client.update_comic(id, &payload).await?,
            None => self.client.create_comic(&payload).await?,
        };
        Ok(comic)
    }

    pub async fn delete_comic(&self, id: &str) -> Result<(), AppError> {
        let outcome = self.client.delete_comic(id).await.map_err(AppError::from);
        self.settle(outcome, CacheResource::Comics, "Comic deleted")
            .await
    }

    async fn settle<T>(
        &self,
        outcome: Result<T, AppError>,
        resource: CacheResource,
        success: &str,
    ) -> Result<T, AppError> {
        match outcome {
            Ok(value) => {
                self.client.invalidate(resource).await;
                self.toasts.push(ToastKind::Success, success);
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(%resource, error = %err, "mutation failed");
                self.toasts.push(ToastKind::Error, format!("Error: {err}"));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn app(server: &MockServer) -> App {
        let client = ShopClient::with_base_url(&server.base_url()).unwrap();
        App::with_client(client, Settings::default())
    }

    #[tokio::test]
    async fn customer_list_is_filtered() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/customers");
                then.status(200).json_body(json!([
                    { "id": "1", "first_name": "Ann", "last_name": "Lee", "email": "ann@example.com" },
                    { "id": "2", "first_name": "Bo", "last_name": "Diaz", "email": "bo@example.com" }
                ]));
            })
            .await;

        let state = app(&server).customers("diaz").await;
        let ids: Vec<_> = state.data().unwrap().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[tokio::test]
    async fn invalid_customer_form_is_rejected_before_sending() {
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/customers");
                then.status(201);
            })
            .await;

        let app = app(&server);
        let err = app
            .save_customer(None, CustomerForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Form(_)));
        create.assert_calls_async(0).await;
        assert_eq!(app.toasts().drain()[0].kind, ToastKind::Error);
    }

    #[tokio::test]
    async fn customer_update_invalidates_the_list() {
        let server = MockServer::start_async().await;
        let list = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/customers");
                then.status(200).json_body(json!([
                    { "id": "1", "first_name": "Ann", "last_name": "Lee" }
                ]));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/customers/1");
                then.status(200).json_body(json!({
                    "id": "1", "first_name": "Annie", "last_name": "Lee"
                }));
            })
            .await;

        let app = app(&server);
        let current = app.customers("").await.data().unwrap()[0].clone();
        let mut form = CustomerForm::from(&current);
        form.first_name = "Annie".into();
        form.email = "annie@example.com".into();
        form.phone_number = "555-123-4567".into();
        form.company = "Acme Comics".into();

        let saved = app.save_customer(Some("1"), form).await.unwrap();
        assert_eq!(saved.first_name, "Annie");
        update.assert_async().await;

        app.customers("").await;
        list.assert_calls_async(2).await;
    }

    #[tokio::test]
    async fn comic_list_errors_become_errored_state() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/comics");
                then.status(404);
            })
            .await;

        let state = app(&server).comics("").await;
        assert!(state
            .error()
            .is_some_and(|msg| msg.starts_with("Error loading comics")));
    }
}
