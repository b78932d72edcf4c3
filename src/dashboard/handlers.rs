//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - State and query types used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    AppState, Error,
    analytics::{category_histogram, price_histogram, summarize},
    dashboard::{
        charts::{
            DashboardChart, ECHARTS_SCRIPT, category_chart, charts_script, charts_view,
            price_range_chart,
        },
        tables::{filter_form, pagination_view, records_table, statistics_table},
    },
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, error_view},
    month::{MonthFilter, MonthScope, SaleMonth},
    pagination::{PageRequest, PaginationConfig, PaginationIndicator, create_pagination_indicators},
    record::{RecordFilter, SaleRecord, get_filtered_records, list_records},
};

/// The month shown when the client does not pick one.
const DEFAULT_MONTH: Month = Month::March;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The page size and the number of page links to show.
    pub pagination_config: PaginationConfig,
    /// The years a month filter applies to.
    pub month_scope: MonthScope,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
            month_scope: state.month_scope,
        }
    }
}

/// The query parameters of the dashboard page.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DashboardQuery {
    pub month: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    month: SaleMonth,
    search: String,
    records: Vec<SaleRecord>,
    pagination: Vec<PaginationIndicator>,
    statistics: Markup,
    charts: [DashboardChart; 2],
}

/// Display the records table, statistics and charts for a month.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    match build_dashboard_data(&state, &query) {
        Ok(data) => dashboard_view(&data).into_response(),
        Err(error) => dashboard_error_response(error),
    }
}

fn build_dashboard_data(
    state: &DashboardState,
    query: &DashboardQuery,
) -> Result<DashboardData, Error> {
    let month = match query.month.as_deref().map(str::trim) {
        None | Some("") => SaleMonth::from(DEFAULT_MONTH),
        Some(month) => month.parse()?,
    };
    let page = PageRequest::parse(query.page.as_deref(), None, &state.pagination_config)?;
    let search = query.search.clone().unwrap_or_default();

    let month_filter = MonthFilter::new(month, state.month_scope);
    let table_filter = RecordFilter {
        search: search.clone(),
        month: Some(month_filter),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let records_page = list_records(&table_filter, page, &connection)
        .inspect_err(|error| tracing::error!("Could not list records: {error}"))?;
    let month_records = get_filtered_records(&RecordFilter::for_month(month_filter), &connection)
        .inspect_err(|error| tracing::error!("Could not get records for {month:?}: {error}"))?;

    let pagination = create_pagination_indicators(
        page.page,
        page.page_count(records_page.total),
        state.pagination_config.max_pages,
    );

    let charts = [
        DashboardChart {
            id: "price-range-chart",
            options: price_range_chart(month, &price_histogram(&month_records)).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(month, &category_histogram(&month_records)).to_string(),
        },
    ];

    Ok(DashboardData {
        month,
        search,
        records: records_page.items,
        pagination,
        statistics: statistics_table(month, &summarize(&month_records)),
        charts,
    })
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let content = html!(
        div
            id="dashboard-content"
            class={(PAGE_CONTAINER_STYLE) " max-w-screen-xl"}
        {
            h1 class="text-3xl font-bold mb-6" { "Transaction Dashboard" }

            (filter_form(data.month, &data.search))
            (records_table(&data.records))
            (pagination_view(&data.pagination, data.month, &data.search))
            (data.statistics)
            (charts_view(&data.charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&data.charts),
    ];

    base("Dashboard", &scripts, &content)
}

/// Render an HTML error page for `error`.
fn dashboard_error_response(error: Error) -> Response {
    match error {
        Error::InvalidMonth(_) | Error::InvalidPagination(_) => (
            StatusCode::BAD_REQUEST,
            error_view(
                "Bad Request",
                "400",
                &error.to_string(),
                "Pick a month between 1 and 12 and a page number of 1 or more.",
            ),
        )
            .into_response(),
        error => {
            tracing::error!("Could not render the dashboard: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_view(
                    "Internal Server Error",
                    "500",
                    "Sorry, something went wrong.",
                    "Try again later or check the server logs.",
                ),
            )
                .into_response()
        }
    }
}
