use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{AppState, Error, record::SaleRecord};

use super::{feed::SeedSource, import::import_from_feed};

/// The state needed to seed the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection for storing records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where to download the records from.
    pub seed_source: SeedSource,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_source: state.seed_source.clone(),
        }
    }
}

/// A route handler that imports the sale feed, responds with the new records as JSON.
pub async fn seed_records_endpoint(
    State(state): State<SeedState>,
) -> Result<(StatusCode, Json<Vec<SaleRecord>>), Error> {
    let records = import_from_feed(&state.seed_source, &state.db_connection).await?;

    tracing::info!(
        "Imported {} records from {}",
        records.len(),
        state.seed_source.feed_url()
    );

    Ok((StatusCode::CREATED, Json(records)))
}
