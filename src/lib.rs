//! Sales Dashboard is a small web app for exploring product sale records.
//!
//! This library provides a JSON REST API for listing, editing and seeding sale
//! records, monthly aggregate views (statistics, price ranges and categories),
//! and an HTML dashboard that renders the same data as a table and charts.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod analytics;
mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod logging;
mod month;
mod not_found;
mod pagination;
mod record;
mod routing;
mod seed;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::{MonthScope, SaleMonth};
pub use pagination::PaginationConfig;
pub use record::{NewSaleRecord, SaleRecord, insert_record};
pub use routing::build_router;
pub use seed::{DEFAULT_FEED_URL, SeedSource, import_from_feed};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The month was not an integer between 1 and 12.
    ///
    /// Holds the raw text the client sent.
    #[error("\"{0}\" is not a month between 1 and 12")]
    InvalidMonth(String),

    /// The page number or page size was not a positive integer.
    #[error("invalid pagination parameter: {0}")]
    InvalidPagination(String),

    /// A record price was negative or not a finite number.
    #[error("{0} is not a valid price, prices must be zero or greater")]
    InvalidPrice(f64),

    /// The request body could not be parsed.
    #[error("could not parse the request body: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a record that does not exist
    #[error("tried to update a record that is not in the database")]
    UpdateMissingRecord,

    /// Tried to delete a record that does not exist
    #[error("tried to delete a record that is not in the database")]
    DeleteMissingRecord,

    /// The sale feed could not be downloaded.
    #[error("could not fetch the sale feed: {0}")]
    FeedRequestError(String),

    /// The sale feed was downloaded but one of its items could not be read.
    #[error("could not parse the sale feed: {0}")]
    FeedParseError(String),

    /// The configured sale year cannot be represented as a calendar date.
    #[error("{0} is not a supported sale year")]
    InvalidYear(i32),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to the client for every error response.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            error: None,
        }
    }
}

impl Error {
    /// The status code and body for this error.
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            Error::InvalidMonth(_) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Invalid month. Please provide a month between 1 and 12."),
            ),
            Error::InvalidPagination(_) | Error::InvalidPrice(_) | Error::InvalidRequestBody(_) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: "Invalid request".to_owned(),
                    error: Some(self.to_string()),
                },
            ),
            Error::NotFound | Error::UpdateMissingRecord | Error::DeleteMissingRecord => {
                (StatusCode::NOT_FOUND, ErrorBody::new("Record not found"))
            }
            Error::FeedRequestError(_) | Error::FeedParseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    message: "Error creating records".to_owned(),
                    error: Some(self.to_string()),
                },
            ),
            // These are only logged, the details are not intended for the client.
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidYear(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("An unexpected error occurred, check the server logs for more details."),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (status, Json(body)).into_response()
    }
}
