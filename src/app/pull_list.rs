//! One customer's pull list: load, search, and server-confirmed mutations.

use thiserror::Error;

use crate::app::toast::{ToastKind, Toasts};
use crate::domain::{
    join_pulls, reconcile::is_held, search_candidates, CacheResource, Comic, ComicForm,
    ComicSelection, EntityId, FormErrors, NewPull, Pull, PullListEntry, PullUpdate, Quantity,
    QuantityError, ViewState,
};
use crate::infra::api::{ApiError, ShopClient};

#[derive(Debug, Error)]
pub enum PullListError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),
    #[error("invalid custom comic: {0}")]
    InvalidComic(#[from] FormErrors),
    #[error("comic {0} is already on this pull list")]
    AlreadyPulled(EntityId),
    #[error("pull {0} is not on this pull list")]
    UnknownPull(EntityId),
}

/// What a loaded pull-list view shows, plus the catalog it was joined against.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PullListView {
    pub entries: Vec<PullListEntry>,
    pub catalog: Vec<Comic>,
}

impl PullListView {
    pub fn pulls(&self) -> Vec<Pull> {
        self.entries.iter().map(|entry| entry.pull.clone()).collect()
    }

    pub fn entry(&self, pull_id: &str) -> Option<&PullListEntry> {
        self.entries.iter().find(|entry| entry.pull.id == pull_id)
    }
}

pub struct PullListManager {
    client: ShopClient,
    customer_id: EntityId,
    toasts: Toasts,
    state: ViewState<PullListView>,
}

impl PullListManager {
    pub fn new(client: ShopClient, customer_id: impl Into<EntityId>, toasts: Toasts) -> Self {
        Self {
            client,
            customer_id: customer_id.into(),
            toasts,
            state: ViewState::Idle,
        }
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn state(&self) -> &ViewState<PullListView> {
        &self.state
    }

    /// Fetch the customer's pulls and the catalog, and join them.
    pub async fn load(&mut self) -> &ViewState<PullListView> {
        self.state = ViewState::Loading;
        self.state = match self.fetch_view().await {
            Ok(view) => {
                tracing::debug!(
                    customer_id = %self.customer_id,
                    pulls = view.entries.len(),
                    "pull list loaded"
                );
                ViewState::Loaded(view)
            }
            Err(err) => {
                tracing::error!(
                    customer_id = %self.customer_id,
                    error = %err,
                    "failed to load pull list"
                );
                ViewState::Errored(format!("Error loading pull list: {err}"))
            }
        };
        &self.state
    }

    async fn fetch_view(&self) -> Result<PullListView, ApiError> {
        let pulls = self.client.customer_pulls(&self.customer_id).await?.data;
        let catalog = self.client.list_comics().await?.data;
        Ok(PullListView {
            entries: join_pulls(&pulls, &catalog),
            catalog,
        })
    }

    /// Up to five catalog comics matching `query` that aren't already held.
    /// Nothing is suggested until the view has loaded.
    pub fn search(&self, query: &str) -> Vec<Comic> {
        match self.state.data() {
            Some(view) => search_candidates(&view.catalog, &view.pulls(), query)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Hold a comic for the customer. Custom entries are created in the catalog first.
    pub async fn add(&mut self, selection: ComicSelection) -> Result<Pull, PullListError> {
        let outcome = self.try_add(selection).await;
        self.settle(outcome, "Comic added to pull list", "Error adding comic")
            .await
    }

    async fn try_add(&self, selection: ComicSelection) -> Result<Pull, PullListError> {
        let comic = match selection {
            ComicSelection::Existing(comic) => {
                if self
                    .state
                    .data()
                    .is_some_and(|view| is_held(&view.pulls(), &comic.id))
                {
                    return Err(PullListError::AlreadyPulled(comic.id));
                }
                comic
            }
            ComicSelection::Custom { title, publisher } => {
                let payload = ComicForm::custom(title, publisher).validate()?;
                let created = self.client.create_comic(&payload).await?;
                tracing::info!(
                    comic_id = %created.id,
                    title = %created.title,
                    "custom comic created"
                );
                self.client.invalidate(CacheResource::Comics).await;
                created
            }
        };

        let pull = self
            .client
            .create_pull(&self.customer_id, &NewPull::for_comic(comic))
            .await?;
        tracing::info!(
            customer_id = %self.customer_id,
            pull_id = %pull.id,
            comic_id = %pull.comic_id,
            "pull added"
        );
        Ok(pull)
    }

    /// Replace a pull's quantity. Input that isn't a whole number of at least one is
    /// rejected before any request goes out.
    pub async fn update_quantity(
        &mut self,
        pull_id: &str,
        new_quantity: &str,
    ) -> Result<Pull, PullListError> {
        let outcome = self.try_update_quantity(pull_id, new_quantity).await;
        self.settle(outcome, "Quantity updated", "Error updating quantity")
            .await
    }

    async fn try_update_quantity(
        &self,
        pull_id: &str,
        new_quantity: &str,
    ) -> Result<Pull, PullListError> {
        let quantity: Quantity = new_quantity.parse()?;
        let entry = self
            .state
            .data()
            .and_then(|view| view.entry(pull_id))
            .ok_or_else(|| PullListError::UnknownPull(pull_id.to_string()))?;

        let body = PullUpdate {
            customer_id: entry.pull.customer_id.clone(),
            comic_id: entry.pull.comic_id.clone(),
            quantity,
        };
        let pull = self.client.update_pull(pull_id, &body).await?;
        tracing::info!(pull_id, %quantity, "pull quantity updated");
        Ok(pull)
    }

    pub async fn remove(&mut self, pull_id: &str) -> Result<(), PullListError> {
        let outcome = self
            .client
            .delete_pull(pull_id)
            .await
            .map_err(PullListError::from);
        if outcome.is_ok() {
            tracing::info!(customer_id = %self.customer_id, pull_id, "pull removed");
        }
        self.settle(outcome, "Comic removed from pull list", "Error removing comic")
            .await
    }

    /// After a mutation: on success invalidate and refetch; on failure notify and keep the view.
    async fn settle<T>(
        &mut self,
        outcome: Result<T, PullListError>,
        success: &str,
        failure: &str,
    ) -> Result<T, PullListError> {
        match outcome {
            Ok(value) => {
                self.client
                    .invalidate(CacheResource::PullList(self.customer_id.clone()))
                    .await;
                self.toasts.push(ToastKind::Success, success);
                self.load().await;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(customer_id = %self.customer_id, error = %err, "{failure}");
                self.toasts.push(ToastKind::Error, format!("{failure}: {err}"));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reconcile::MISSING_COMIC_TITLE;
    use httpmock::prelude::*;
    use serde_json::json;

    fn manager(server: &MockServer, toasts: &Toasts) -> PullListManager {
        let client = ShopClient::with_base_url(&server.base_url()).unwrap();
        PullListManager::new(client, "1", toasts.clone())
    }

    fn catalog_json() -> serde_json::Value {
        json!([
            { "id": "c1", "title": "Saga", "issue_number": 5, "publisher": "Image" },
            { "id": "c2", "title": "Saga of the Swamp Thing", "issue_number": 21, "publisher": "DC" },
            { "id": "c3", "title": "Batman", "issue_number": 130, "publisher": "DC" }
        ])
    }

    async fn mock_catalog(server: &MockServer) -> httpmock::Mock<'_> {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/comics");
                then.status(200).json_body(catalog_json());
            })
            .await
    }

    async fn mock_pulls(server: &MockServer, body: serde_json::Value) -> httpmock::Mock<'_> {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/customers/1/pulls");
                then.status(200).json_body(body.clone());
            })
            .await
    }

    #[tokio::test]
    async fn customer_without_pulls_loads_empty() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        mock_pulls(&server, json!([])).await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        assert_eq!(manager.state(), &ViewState::Idle);

        let state = manager.load().await;
        assert_eq!(state.data().map(|v| v.entries.len()), Some(0));
    }

    #[tokio::test]
    async fn unknown_comic_renders_refresh_placeholder() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        mock_pulls(
            &server,
            json!([
                { "id": "p1", "customer_id": "1", "comic_id": "c1", "quantity": 2 },
                { "id": "p2", "customer_id": "1", "comic_id": "c404", "quantity": 1 }
            ]),
        )
        .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        let view = manager.load().await.data().cloned().unwrap();
        assert_eq!(view.entries[0].comic.title, "Saga");
        assert_eq!(view.entries[0].pull.quantity.get(), 2);
        assert_eq!(view.entries[1].comic.title, MISSING_COMIC_TITLE);
    }

    #[tokio::test]
    async fn odd_stored_quantities_still_load() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        mock_pulls(
            &server,
            json!([
                { "id": "p1", "customer_id": "1", "comic_id": "c1", "quantity": 2.0 },
                { "id": "p2", "customer_id": "1", "comic_id": "c3", "quantity": null }
            ]),
        )
        .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        let view = manager.load().await.data().cloned().unwrap();
        assert_eq!(view.entries[0].pull.quantity.get(), 2);
        assert_eq!(view.entries[1].pull.quantity, Quantity::default());
    }

    #[tokio::test]
    async fn failed_query_lands_in_errored_state() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/customers/1/pulls");
                then.status(503);
            })
            .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        let state = manager.load().await;
        assert!(state
            .error()
            .is_some_and(|msg| msg.starts_with("Error loading pull list")));
    }

    #[tokio::test]
    async fn search_skips_comics_already_held() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        mock_pulls(
            &server,
            json!([{ "id": "p1", "customer_id": "1", "comic_id": "c1" }]),
        )
        .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        assert!(manager.search("saga").is_empty());

        manager.load().await;
        let ids: Vec<_> = manager.search("saga").into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["c2"]);
        assert!(manager.search("").is_empty());
    }

    #[tokio::test]
    async fn custom_comic_is_created_before_its_pull() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        let pulls = mock_pulls(&server, json!([])).await;
        let create_comic = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/comics").json_body(json!({
                    "title": "Zine",
                    "issue_number": 0,
                    "publisher": "Local Press",
                    "distributor": "",
                    "release_date": "",
                    "is_custom": true
                }));
                then.status(201).json_body(json!({
                    "id": "c77", "title": "Zine", "publisher": "Local Press", "is_custom": true
                }));
            })
            .await;
        let create_pull = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/customers/1/pulls").json_body(json!({
                    "id": "c77",
                    "title": "Zine",
                    "issue_number": 0,
                    "publisher": "Local Press",
                    "distributor": "",
                    "release_date": "",
                    "is_custom": true,
                    "comic_id": "c77",
                    "quantity": 1
                }));
                then.status(201).json_body(json!({
                    "id": "p9", "customer_id": "1", "comic_id": "c77", "quantity": 1
                }));
            })
            .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        manager.load().await;
        let pull = manager
            .add(ComicSelection::Custom {
                title: "Zine".into(),
                publisher: "Local Press".into(),
            })
            .await
            .unwrap();

        assert_eq!(pull.comic_id, "c77");
        create_comic.assert_calls_async(1).await;
        create_pull.assert_calls_async(1).await;
        // initial load plus the refetch after invalidation
        pulls.assert_calls_async(2).await;
        assert_eq!(toasts.drain()[0].kind, ToastKind::Success);
    }

    #[tokio::test]
    async fn invalid_custom_comic_sends_nothing() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        mock_pulls(&server, json!([])).await;
        let create_comic = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/comics");
                then.status(201);
            })
            .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        manager.load().await;
        let err = manager
            .add(ComicSelection::Custom {
                title: " ".into(),
                publisher: "Local Press".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PullListError::InvalidComic(_)));
        create_comic.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn adding_a_held_comic_is_rejected_locally() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        mock_pulls(
            &server,
            json!([{ "id": "p1", "customer_id": "1", "comic_id": "c1" }]),
        )
        .await;
        let create_pull = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/customers/1/pulls");
                then.status(201);
            })
            .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        let saga = manager.load().await.data().unwrap().catalog[0].clone();

        let err = manager.add(ComicSelection::Existing(saga)).await.unwrap_err();
        assert!(matches!(err, PullListError::AlreadyPulled(ref id) if id == "c1"));
        create_pull.assert_calls_async(0).await;

        let toast = &toasts.drain()[0];
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.text.starts_with("Error adding comic"));
    }

    #[tokio::test]
    async fn add_failure_keeps_the_previous_view() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        let pulls = mock_pulls(&server, json!([])).await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/customers/1/pulls");
                then.status(500);
            })
            .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        manager.load().await;
        let before = manager.state().clone();
        let batman = before.data().unwrap().catalog[2].clone();

        assert!(manager.add(ComicSelection::Existing(batman)).await.is_err());
        assert_eq!(manager.state(), &before);
        pulls.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn quantity_update_is_visible_after_refetch() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        let before = mock_pulls(
            &server,
            json!([{ "id": "p1", "customer_id": "1", "comic_id": "c1", "quantity": 1 }]),
        )
        .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        manager.load().await;
        before.delete_async().await;

        let put = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/pulls/p1")
                    .json_body(json!({ "customer_id": "1", "comic_id": "c1", "quantity": 3 }));
                then.status(200).json_body(
                    json!({ "id": "p1", "customer_id": "1", "comic_id": "c1", "quantity": 3 }),
                );
            })
            .await;
        mock_pulls(
            &server,
            json!([{ "id": "p1", "customer_id": "1", "comic_id": "c1", "quantity": "3" }]),
        )
        .await;

        manager.update_quantity("p1", "3").await.unwrap();
        put.assert_async().await;
        let entry = manager.state().data().unwrap().entry("p1").cloned().unwrap();
        assert_eq!(entry.pull.quantity.get(), 3);
    }

    #[tokio::test]
    async fn bad_quantity_never_reaches_the_server() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        mock_pulls(
            &server,
            json!([{ "id": "p1", "customer_id": "1", "comic_id": "c1" }]),
        )
        .await;
        let put = server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/pulls/p1");
                then.status(200);
            })
            .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        manager.load().await;

        for raw in ["0", "-1", "two", ""] {
            let err = manager.update_quantity("p1", raw).await.unwrap_err();
            assert!(matches!(err, PullListError::InvalidQuantity(_)), "{raw:?}");
        }
        let err = manager.update_quantity("p404", "2").await.unwrap_err();
        assert!(matches!(err, PullListError::UnknownPull(_)));
        put.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn removed_pull_is_gone_after_refetch() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        let before = mock_pulls(
            &server,
            json!([
                { "id": "p1", "customer_id": "1", "comic_id": "c1" },
                { "id": "p2", "customer_id": "1", "comic_id": "c3" }
            ]),
        )
        .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        manager.load().await;
        before.delete_async().await;

        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/pulls/p1");
                then.status(204);
            })
            .await;
        mock_pulls(
            &server,
            json!([{ "id": "p2", "customer_id": "1", "comic_id": "c3" }]),
        )
        .await;

        manager.remove("p1").await.unwrap();
        delete.assert_async().await;
        let view = manager.state().data().unwrap();
        assert!(view.entry("p1").is_none());
        assert!(view.entry("p2").is_some());
    }

    #[tokio::test]
    async fn failed_remove_leaves_item_in_view() {
        let server = MockServer::start_async().await;
        mock_catalog(&server).await;
        mock_pulls(
            &server,
            json!([{ "id": "p1", "customer_id": "1", "comic_id": "c1" }]),
        )
        .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/pulls/p1");
                then.status(500);
            })
            .await;

        let toasts = Toasts::default();
        let mut manager = manager(&server, &toasts);
        manager.load().await;

        assert!(manager.remove("p1").await.is_err());
        assert!(manager.state().data().unwrap().entry("p1").is_some());
        let toast = &toasts.drain()[0];
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.text.starts_with("Error removing comic"));
    }
}
