//! A list view bound to a REST resource.
//!
//! [`RemoteList`] drives a [`ListController`] from an [`ApiClient`]: it
//! fetches pages, re-fetches when server-side parameters change, runs bulk
//! actions and reports failures through a [`Notifier`]. All requests run in
//! the list's [`CancelScope`], so tearing the view down abandons them.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use shipdesk_list::{
    Action, BulkReport, DeleteSelectedAction, ListConfig, ListController, LoadTicket,
    PaginationMode, Page, Record, RecordId, SortState, UpdateStatusAction,
};

use crate::cancel::CancelScope;
use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::notify::Notifier;
use crate::resources::Resource;
use crate::transport::Transport;

/// A list controller fed by a REST resource.
pub struct RemoteList<T: Transport> {
    controller: ListController,
    resource: Resource,
    client: ApiClient<T>,
    scope: Arc<CancelScope>,
    notifier: Notifier,
}

impl<T: Transport> RemoteList<T> {
    /// Creates a list for `resource` with its default configuration.
    #[must_use]
    pub fn new(client: ApiClient<T>, resource: Resource) -> Self {
        let config = resource.list_config();
        Self::with_config(client, resource, config)
    }

    /// Creates a list with an explicit configuration.
    #[must_use]
    pub fn with_config(client: ApiClient<T>, resource: Resource, config: ListConfig) -> Self {
        Self {
            controller: ListController::new(config),
            resource,
            client,
            scope: Arc::new(CancelScope::new()),
            notifier: Notifier::new(),
        }
    }

    /// Returns the controller.
    #[must_use]
    pub fn controller(&self) -> &ListController {
        &self.controller
    }

    /// Returns the controller for local changes that need no fetch.
    pub fn controller_mut(&mut self) -> &mut ListController {
        &mut self.controller
    }

    /// Returns the resource.
    #[must_use]
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Returns the client.
    #[must_use]
    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    /// Returns the notices.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Returns the notices for dismissal.
    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    /// Returns the cancellation scope, e.g. to tear the view down from
    /// another task.
    #[must_use]
    pub fn scope(&self) -> Arc<CancelScope> {
        Arc::clone(&self.scope)
    }

    fn is_server_paginated(&self) -> bool {
        self.controller.config().pagination == PaginationMode::Server
    }

    /// Fetches the data set.
    ///
    /// In server mode only the current page is fetched, with the current
    /// search, sort and filters. If the data set shrank below that page, the
    /// clamped page is fetched once more. On failure the controller enters
    /// its error state and an error notice is posted.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or [`ApiError::Cancelled`] after teardown.
    pub async fn load(&mut self) -> Result<()> {
        let ticket = self.controller.begin_load();
        self.fetch_into(ticket).await
    }

    /// Loads again after a failure. Does nothing unless the last load failed.
    ///
    /// # Errors
    ///
    /// Fails like [`load`](Self::load).
    pub async fn retry(&mut self) -> Result<()> {
        let Some(ticket) = self.controller.retry() else {
            return Ok(());
        };
        self.fetch_into(ticket).await
    }

    async fn fetch_into(&mut self, ticket: LoadTicket) -> Result<()> {
        let requested = self.controller.page();
        let page = self.fetch().await;
        self.settle(ticket, page)?;

        let clamped = self.controller.page();
        if self.is_server_paginated() && clamped != requested {
            // the records on hand belong to the out-of-range page
            debug!(resource = self.resource.name, requested, clamped, "refetching clamped page");
            let ticket = self.controller.begin_load();
            let page = self.fetch().await;
            self.settle(ticket, page)?;
        }
        Ok(())
    }

    async fn fetch(&self) -> Result<Page<Record>> {
        let client = &self.client;
        let resource = &self.resource;
        if self.is_server_paginated() {
            let query = self.controller.query();
            self.scope
                .run(async move { client.list(resource, &query).await })
                .await
        } else {
            self.scope.run(client.list_all(resource)).await
        }
    }

    fn settle(&mut self, ticket: LoadTicket, page: Result<Page<Record>>) -> Result<()> {
        match page {
            Ok(_) if self.scope.is_cancelled() => {
                self.controller.cancel_load();
                Err(ApiError::Cancelled)
            }
            Ok(page) => {
                self.controller.finish_load(ticket, page);
                Ok(())
            }
            Err(ApiError::Cancelled) => {
                self.controller.cancel_load();
                Err(ApiError::Cancelled)
            }
            Err(e) => {
                warn!(resource = self.resource.name, error = %e, "list load failed");
                if self.controller.fail_load(ticket, e.user_message()) {
                    self.notifier.api_error(&e);
                }
                Err(e)
            }
        }
    }

    /// Sets the search term, re-fetching in server mode.
    ///
    /// # Errors
    ///
    /// Fails like [`load`](Self::load).
    pub async fn search(&mut self, term: &str) -> Result<()> {
        if self.controller.set_search(term) && self.is_server_paginated() {
            self.load().await?;
        }
        Ok(())
    }

    /// Sorts by `field`, re-fetching in server mode when the endpoint takes
    /// a sort order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::List`] for a column that is not sortable.
    pub async fn sort_by(&mut self, field: &str) -> Result<SortState> {
        let sort = self.controller.sort_by(field)?;
        if self.is_server_paginated() && self.resource.query_style.sends_ordering() {
            self.load().await?;
        }
        Ok(sort)
    }

    /// Sets a filter value, re-fetching in server mode.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::List`] for an unknown filter or value.
    pub async fn set_filter(&mut self, field: &str, value: &str) -> Result<()> {
        if self.controller.set_filter(field, value)? && self.is_server_paginated() {
            self.load().await?;
        }
        Ok(())
    }

    /// Moves to `page`, re-fetching in server mode. Returns the page shown,
    /// which is earlier than `page` if the data set shrank meanwhile.
    ///
    /// # Errors
    ///
    /// Fails like [`load`](Self::load).
    pub async fn go_to_page(&mut self, page: usize) -> Result<usize> {
        let before = self.controller.page();
        let page = self.controller.go_to_page(page);
        if page != before && self.is_server_paginated() {
            self.load().await?;
        }
        Ok(self.controller.page())
    }

    /// Deletes every selected record.
    ///
    /// # Errors
    ///
    /// Only [`ApiError::Cancelled`]; per-record failures land in the report.
    pub async fn bulk_delete(&mut self) -> Result<BulkReport> {
        let ids = self.controller.selected_ids();
        let client = &self.client;
        let resource = &self.resource;
        let requests = ids.iter().map(|id| client.delete(resource, id));
        let outcomes = self.scope.run(async { Ok(join_all(requests).await) }).await?;
        self.finish_bulk(&DeleteSelectedAction, &ids, outcomes).await
    }

    /// Sets the status of every selected record.
    ///
    /// # Errors
    ///
    /// Only [`ApiError::Cancelled`]; per-record failures land in the report.
    pub async fn bulk_update_status(&mut self, status: &str) -> Result<BulkReport> {
        let action = UpdateStatusAction::new(status);
        let ids = self.controller.selected_ids();
        let client = &self.client;
        let resource = &self.resource;
        let requests = ids
            .iter()
            .map(|id| client.update_status(resource, id, status));
        let outcomes = self.scope.run(async { Ok(join_all(requests).await) }).await?;
        self.finish_bulk(&action, &ids, outcomes).await
    }

    async fn finish_bulk<V>(
        &mut self,
        action: &dyn Action,
        ids: &[RecordId],
        outcomes: Vec<Result<V>>,
    ) -> Result<BulkReport> {
        let mut report = BulkReport::new(action);
        if ids.is_empty() {
            self.notifier.info("No items selected.");
            return Ok(report);
        }

        for (id, outcome) in ids.iter().zip(outcomes) {
            match outcome {
                Ok(_) => report.record_success(id.clone()),
                Err(e) => {
                    self.notifier.api_error(&e);
                    report.record_failure(id.clone(), e.user_message());
                }
            }
        }

        self.controller.apply_bulk_report(&report);
        let summary = report.summary();
        if report.is_complete() {
            info!(action = %report.action, "{summary}");
            self.notifier.success(summary);
        } else if report.is_partial() {
            warn!(action = %report.action, failed = report.failed.len(), "{summary}");
            self.notifier.warning(summary);
        } else {
            warn!(action = %report.action, "{summary}");
            self.notifier.error(summary);
        }

        if report.removes_records && !report.succeeded.is_empty() && self.is_server_paginated() {
            // refill the page from the server; load() has already posted
            // the failure notice
            if let Err(e) = self.load().await {
                warn!(resource = self.resource.name, error = %e, "refill after bulk action failed");
            }
        }
        Ok(report)
    }

    /// Cancels every request in flight and refuses new ones.
    pub fn teardown(&mut self) {
        self.scope.cancel();
        self.controller.cancel_load();
    }
}

impl<T: Transport> Drop for RemoteList<T> {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthContext;
    use crate::request::Method;
    use crate::transport::MockTransport;
    use serde_json::json;
    use shipdesk_list::LoadState;

    fn remote(mock: MockTransport) -> RemoteList<MockTransport> {
        RemoteList::new(ApiClient::new(mock, AuthContext::new()), Resource::ORDERS)
    }

    #[tokio::test]
    async fn test_load_plain_array() {
        let mock = MockTransport::new().json(
            Method::Get,
            "/buysellapi/admin/orders/",
            200,
            json!([{"id": 1}, {"id": 2}]),
        );
        let mut list = remote(mock);
        list.load().await.unwrap();
        assert_eq!(list.controller().state(), &LoadState::Ready);
        assert_eq!(list.controller().total_items(), 2);
    }

    #[tokio::test]
    async fn test_empty_selection_sends_nothing() {
        let mut list = remote(MockTransport::new());
        let report = list.bulk_delete().await.unwrap();
        assert_eq!(report.requested(), 0);
        assert_eq!(list.client().transport().request_count(), 0);
        assert_eq!(list.notifier().active().len(), 1);
    }

    #[tokio::test]
    async fn test_torn_down_list_refuses_loads() {
        let mut list = remote(MockTransport::new());
        list.teardown();
        let err = list.load().await.unwrap_err();
        assert!(matches!(err, ApiError::Cancelled));
        assert_eq!(list.controller().state(), &LoadState::Idle);
        assert!(list.notifier().active().is_empty());
    }
}
