use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, database_id::RecordId};

/// The state needed to delete a record.
#[derive(Debug, Clone)]
pub struct DeleteRecordState {
    /// The database connection for managing records.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The response body for a successful delete.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecordResponse {
    /// A confirmation for the client, always "Record deleted".
    pub message: String,
    /// The number of rows that were deleted.
    pub deleted: usize,
}

/// A route handler for deleting every record with a given ID.
pub async fn delete_record_endpoint(
    State(state): State<DeleteRecordState>,
    record_id: Result<Path<RecordId>, PathRejection>,
) -> Result<Json<DeleteRecordResponse>, Error> {
    let Path(record_id) = record_id.map_err(|rejection| {
        tracing::debug!("Invalid record ID: {}", rejection.body_text());
        Error::DeleteMissingRecord
    })?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_records(record_id, &connection) {
        Ok(0) => Err(Error::DeleteMissingRecord),
        Ok(deleted) => {
            tracing::info!("Deleted {deleted} record(s) with ID {record_id}");
            Ok(Json(DeleteRecordResponse {
                message: "Record deleted".to_owned(),
                deleted,
            }))
        }
        Err(error) => {
            tracing::error!("Could not delete record {record_id}: {error}");
            Err(error)
        }
    }
}

type RowsAffected = usize;

fn delete_records(id: RecordId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM sale_record WHERE id = :id", &[(":id", &id)])
        .map_err(|err| err.into())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        Error, initialize_db,
        record::{SaleRecord, count_records, get_record, insert_record},
    };

    use super::{DeleteRecordResponse, DeleteRecordState, delete_record_endpoint, delete_records};

    fn must_create_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        connection
    }

    #[test]
    fn deletes_every_row_with_the_id() {
        let connection = must_create_test_connection();
        insert_record(SaleRecord::build(1, "First", 1.0), &connection).unwrap();
        insert_record(SaleRecord::build(1, "Second", 1.0), &connection).unwrap();
        insert_record(SaleRecord::build(2, "Other", 1.0), &connection).unwrap();

        let rows_affected = delete_records(1, &connection).unwrap();

        assert_eq!(rows_affected, 2);
        assert_eq!(get_record(1, &connection), Err(Error::NotFound));
        assert_eq!(count_records(&connection), Ok(1));
    }

    #[tokio::test]
    async fn responds_with_deleted_count() {
        let connection = must_create_test_connection();
        insert_record(SaleRecord::build(5, "Mug", 1.0), &connection).unwrap();
        let state = DeleteRecordState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_record_endpoint(State(state), Ok(Path(5)))
            .await
            .expect("Could not delete record");

        assert_eq!(
            response.0,
            DeleteRecordResponse {
                message: "Record deleted".to_owned(),
                deleted: 1
            }
        );
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let state = DeleteRecordState {
            db_connection: Arc::new(Mutex::new(must_create_test_connection())),
        };

        let response = delete_record_endpoint(State(state), Ok(Path(5)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
