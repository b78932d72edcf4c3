use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use rusqlite::{Connection, params};
use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::{AppState, Error, database_id::RecordId};

use super::core::{SaleRecord, get_record, validate_price};

/// The state needed to edit a record.
#[derive(Debug, Clone)]
pub struct EditRecordState {
    /// The database connection for managing records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The fields to change on a record. Fields that are left out keep their value.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    /// The new product name.
    pub title: Option<String>,
    /// The new description.
    pub description: Option<String>,
    /// The new price, must be zero or greater.
    pub price: Option<f64>,
    /// The new category.
    pub category: Option<String>,
    /// The new image URL.
    pub image: Option<String>,
    /// Whether the product was sold.
    pub sold: Option<bool>,
    /// The new date of sale.
    ///
    /// `None` keeps the current date, `Some(None)` clears it. In JSON a
    /// missing key keeps the date and `null` clears it.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_sale: Option<Option<Date>>,
}

/// Wrap any value that is present in the JSON, including `null`, in `Some`.
///
/// Combined with `#[serde(default)]` this tells a missing key apart from `null`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A route handler for updating the records with a given ID, responds with
/// the updated record as JSON.
pub async fn edit_record_endpoint(
    State(state): State<EditRecordState>,
    record_id: Result<Path<RecordId>, PathRejection>,
    patch: Result<Json<RecordPatch>, JsonRejection>,
) -> Result<Json<SaleRecord>, Error> {
    // An ID that is not an integer cannot belong to any record.
    let Path(record_id) = record_id.map_err(|rejection| {
        tracing::debug!("Invalid record ID: {}", rejection.body_text());
        Error::UpdateMissingRecord
    })?;
    let Json(patch) = patch.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_record(record_id, &patch, &connection)
        .inspect_err(|error| tracing::debug!("Could not update record {record_id}: {error}"))
        .map(Json)
}

/// Apply `patch` to every record with the ID `id`.
///
/// Returns the first updated record in store order.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidPrice] if the new price is negative,
/// - [Error::UpdateMissingRecord] if no record has the ID `id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_record(
    id: RecordId,
    patch: &RecordPatch,
    connection: &Connection,
) -> Result<SaleRecord, Error> {
    if let Some(price) = patch.price {
        validate_price(price)?;
    }

    let rows_affected = connection.execute(
        "UPDATE sale_record
        SET \
            title = COALESCE(?1, title), \
            description = COALESCE(?2, description), \
            price = COALESCE(?3, price), \
            category = COALESCE(?4, category), \
            image = COALESCE(?5, image), \
            sold = COALESCE(?6, sold), \
            date_of_sale = CASE WHEN ?7 THEN ?8 ELSE date_of_sale END \
        WHERE id = ?9;",
        params![
            patch.title,
            patch.description,
            patch.price,
            patch.category,
            patch.image,
            patch.sold,
            patch.date_of_sale.is_some(),
            patch.date_of_sale.flatten(),
            id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecord);
    }

    get_record(id, connection)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::put};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        Error, endpoints,
        endpoints::format_endpoint,
        initialize_db,
        record::{SaleRecord, get_record, insert_record},
    };

    use super::{EditRecordState, RecordPatch, edit_record_endpoint, update_record};

    fn must_create_test_connection() -> Connection {
        let connection =
            Connection::open_in_memory().expect("could not create in-memory SQLite database");
        initialize_db(&connection).expect("could not initialize test DB");

        connection
    }

    fn get_test_server(connection: Connection) -> TestServer {
        let app = Router::new()
            .route(endpoints::RECORD, put(edit_record_endpoint))
            .with_state(EditRecordState {
                db_connection: Arc::new(Mutex::new(connection)),
            });

        TestServer::new(app)
    }

    #[test]
    fn updates_only_given_fields() {
        let conn = must_create_test_connection();
        insert_record(
            SaleRecord::build(1, "Backpack", 109.95)
                .category("men's clothing")
                .date_of_sale(Some(date!(2021 - 11 - 27))),
            &conn,
        )
        .unwrap();

        let updated = update_record(
            1,
            &RecordPatch {
                price: Some(99.0),
                sold: Some(true),
                ..Default::default()
            },
            &conn,
        )
        .expect("Could not update record");

        assert_eq!(updated.price, 99.0);
        assert!(updated.sold);
        assert_eq!(updated.title, "Backpack");
        assert_eq!(updated.category, "men's clothing");
        assert_eq!(updated.date_of_sale, Some(date!(2021 - 11 - 27)));
    }

    #[test]
    fn clears_date_of_sale() {
        let conn = must_create_test_connection();
        insert_record(
            SaleRecord::build(1, "Backpack", 109.95).date_of_sale(Some(date!(2021 - 11 - 27))),
            &conn,
        )
        .unwrap();

        let updated = update_record(
            1,
            &RecordPatch {
                date_of_sale: Some(None),
                ..Default::default()
            },
            &conn,
        )
        .expect("Could not update record");

        assert_eq!(updated.date_of_sale, None);
        assert_eq!(updated.title, "Backpack");
    }

    #[test]
    fn null_date_differs_from_missing_date() {
        let cleared: RecordPatch = serde_json::from_value(json!({"dateOfSale": null})).unwrap();
        let kept: RecordPatch = serde_json::from_value(json!({"sold": true})).unwrap();
        let set: RecordPatch =
            serde_json::from_value(json!({"dateOfSale": "2022-01-15"})).unwrap();

        assert_eq!(cleared.date_of_sale, Some(None));
        assert_eq!(kept.date_of_sale, None);
        assert_eq!(set.date_of_sale, Some(Some(date!(2022 - 01 - 15))));
    }

    #[tokio::test]
    async fn put_null_date_clears_it() {
        let conn = must_create_test_connection();
        insert_record(
            SaleRecord::build(3, "Mug", 5.0).date_of_sale(Some(date!(2022 - 01 - 15))),
            &conn,
        )
        .unwrap();
        let server = get_test_server(conn);

        let response = server
            .put(&format_endpoint(endpoints::RECORD, 3))
            .json(&json!({"dateOfSale": null}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["dateOfSale"], Value::Null);
    }

    #[test]
    fn updates_every_row_with_the_id() {
        let conn = must_create_test_connection();
        insert_record(SaleRecord::build(1, "First", 1.0), &conn).unwrap();
        insert_record(SaleRecord::build(1, "Second", 2.0), &conn).unwrap();
        insert_record(SaleRecord::build(2, "Other", 3.0), &conn).unwrap();

        update_record(
            1,
            &RecordPatch {
                title: Some("Renamed".to_owned()),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        let titles: Vec<String> = conn
            .prepare("SELECT title FROM sale_record ORDER BY row_key")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(titles, ["Renamed", "Renamed", "Other"]);
    }

    #[test]
    fn update_missing_record_fails() {
        let conn = must_create_test_connection();

        let result = update_record(42, &RecordPatch::default(), &conn);

        assert_eq!(result, Err(Error::UpdateMissingRecord));
    }

    #[test]
    fn update_rejects_negative_price() {
        let conn = must_create_test_connection();
        insert_record(SaleRecord::build(1, "Backpack", 10.0), &conn).unwrap();

        let result = update_record(
            1,
            &RecordPatch {
                price: Some(-5.0),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidPrice(-5.0)));
        assert_eq!(get_record(1, &conn).map(|record| record.price), Ok(10.0));
    }

    #[tokio::test]
    async fn put_returns_updated_record() {
        let conn = must_create_test_connection();
        insert_record(SaleRecord::build(3, "Mug", 5.0), &conn).unwrap();
        let server = get_test_server(conn);

        let response = server
            .put(&format_endpoint(endpoints::RECORD, 3))
            .json(&json!({"title": "Big Mug", "dateOfSale": "2022-01-15"}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["id"], 3);
        assert_eq!(body["title"], "Big Mug");
        assert_eq!(body["dateOfSale"], "2022-01-15");
        assert_eq!(body["price"], 5.0);
    }

    #[tokio::test]
    async fn put_missing_record_is_not_found() {
        let server = get_test_server(must_create_test_connection());

        let response = server
            .put(&format_endpoint(endpoints::RECORD, 42))
            .json(&json!({"sold": true}))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], "Record not found");
    }

    #[tokio::test]
    async fn put_malformed_body_is_bad_request() {
        let conn = must_create_test_connection();
        insert_record(SaleRecord::build(3, "Mug", 5.0), &conn).unwrap();
        let server = get_test_server(conn);

        let response = server
            .put(&format_endpoint(endpoints::RECORD, 3))
            .json(&json!({"price": "free"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
