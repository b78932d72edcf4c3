//! Route handlers for the monthly aggregate views.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    month::{MonthFilter, MonthScope, SaleMonth},
    record::{RecordFilter, SaleRecord, get_filtered_records},
};

use super::aggregation::{
    CategoryCounts, MonthlyReport, PriceHistogram, SaleStatistics, category_histogram, combined,
    price_histogram, summarize,
};

/// The state needed for the aggregate views.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The years a month filter applies to.
    pub month_scope: MonthScope,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            month_scope: state.month_scope,
        }
    }
}

/// Get the records in the month given by the path parameter `month`.
///
/// The month is validated before the database is touched.
fn get_month_records(state: &AnalyticsState, month: &str) -> Result<Vec<SaleRecord>, Error> {
    let month: SaleMonth = month.parse()?;
    let filter = RecordFilter::for_month(MonthFilter::new(month, state.month_scope));

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_filtered_records(&filter, &connection)
        .inspect_err(|error| tracing::error!("Could not get records for month {month:?}: {error}"))
}

/// A route handler for the sale statistics of a month.
pub async fn get_statistics_endpoint(
    State(state): State<AnalyticsState>,
    Path(month): Path<String>,
) -> Result<Json<SaleStatistics>, Error> {
    let records = get_month_records(&state, &month)?;

    Ok(Json(summarize(&records)))
}

/// A route handler for the price range histogram of a month.
pub async fn get_bar_chart_endpoint(
    State(state): State<AnalyticsState>,
    Path(month): Path<String>,
) -> Result<Json<PriceHistogram>, Error> {
    let records = get_month_records(&state, &month)?;

    Ok(Json(price_histogram(&records)))
}

/// A route handler for the category counts of a month.
pub async fn get_pie_chart_endpoint(
    State(state): State<AnalyticsState>,
    Path(month): Path<String>,
) -> Result<Json<CategoryCounts>, Error> {
    let records = get_month_records(&state, &month)?;

    Ok(Json(category_histogram(&records)))
}

/// A route handler for the statistics, price ranges and category counts of a month.
pub async fn get_combined_endpoint(
    State(state): State<AnalyticsState>,
    Path(month): Path<String>,
) -> Result<Json<MonthlyReport>, Error> {
    let records = get_month_records(&state, &month)?;

    Ok(Json(combined(&records)))
}
