//! The route handler for listing sale records a page at a time.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    month::{MonthFilter, MonthScope, SaleMonth},
    pagination::{PageRequest, PaginationConfig},
};

use super::query::{RecordFilter, RecordPage, list_records};

/// The state needed to list records.
#[derive(Debug, Clone)]
pub struct ListRecordsState {
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The defaults for the page number and page size.
    pub pagination_config: PaginationConfig,
    /// The years a month filter applies to.
    pub month_scope: MonthScope,
}

impl FromRef<AppState> for ListRecordsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
            month_scope: state.month_scope,
        }
    }
}

/// The raw query parameters for listing records.
///
/// The values are kept as text so that invalid numbers are reported with the
/// same JSON error body as every other validation error.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListRecordsQuery {
    /// The one-based page number.
    pub page: Option<String>,
    /// The number of records per page.
    pub limit: Option<String>,
    /// Text to look for in the title or category.
    pub search: Option<String>,
    /// The month (1-12) to restrict records to.
    pub month: Option<String>,
}

impl ListRecordsQuery {
    /// Validate the parameters and turn them into a filter and page.
    ///
    /// # Errors
    /// Returns [Error::InvalidPagination] or [Error::InvalidMonth] for invalid values.
    pub(crate) fn parse(
        &self,
        pagination_config: &PaginationConfig,
        month_scope: MonthScope,
    ) -> Result<(RecordFilter, PageRequest), Error> {
        let page = PageRequest::parse(
            self.page.as_deref(),
            self.limit.as_deref(),
            pagination_config,
        )?;

        let month = match self.month.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(month) => Some(MonthFilter::new(month.parse::<SaleMonth>()?, month_scope)),
        };

        let filter = RecordFilter {
            search: self.search.clone().unwrap_or_default(),
            month,
        };

        Ok((filter, page))
    }
}

/// A route handler for getting a page of records as JSON.
pub async fn list_records_endpoint(
    State(state): State<ListRecordsState>,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<RecordPage>, Error> {
    let (filter, page) = query.parse(&state.pagination_config, state.month_scope)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    list_records(&filter, page, &connection)
        .inspect_err(|error| tracing::error!("Could not list records: {error}"))
        .map(Json)
}
