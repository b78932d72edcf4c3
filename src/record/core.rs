//! Defines the core data model and database queries for sale records.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::RecordId};

// ============================================================================
// MODELS
// ============================================================================

/// A product and whether it was sold, as listed in the sale feed.
///
/// To create a new `SaleRecord`, use [SaleRecord::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// The ID given to the record by the sale feed.
    pub id: RecordId,
    /// The product name.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The price of the product, never negative.
    pub price: f64,
    /// The product category, e.g. "electronics". Empty if the product has no category.
    pub category: String,
    /// A URL to an image of the product.
    pub image: String,
    /// Whether the product was sold.
    pub sold: bool,
    /// When the product was sold or listed for sale.
    pub date_of_sale: Option<Date>,
}

impl SaleRecord {
    /// Create a new sale record.
    ///
    /// Shortcut for [NewSaleRecord] for discoverability.
    pub fn build(id: RecordId, title: &str, price: f64) -> NewSaleRecord {
        NewSaleRecord {
            id,
            title: title.to_owned(),
            description: String::new(),
            price,
            category: String::new(),
            image: String::new(),
            sold: false,
            date_of_sale: None,
        }
    }
}

/// A builder for sale records that have not been stored yet.
///
/// # Examples
///
/// ```
/// use sales_dashboard::SaleRecord;
/// use time::macros::date;
///
/// let record = SaleRecord::build(1, "Fjallraven Backpack", 109.95)
///     .category("men's clothing")
///     .sold(true)
///     .date_of_sale(Some(date!(2021 - 11 - 27)));
///
/// assert!(record.sold);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct NewSaleRecord {
    /// The ID given to the record by the sale feed.
    pub id: RecordId,
    /// The product name.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The price of the product.
    ///
    /// Negative prices are rejected when the record is inserted.
    pub price: f64,
    /// The product category.
    pub category: String,
    /// A URL to an image of the product.
    pub image: String,
    /// Whether the product was sold.
    pub sold: bool,
    /// When the product was sold or listed for sale.
    pub date_of_sale: Option<Date>,
}

impl NewSaleRecord {
    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the image URL.
    pub fn image(mut self, image: &str) -> Self {
        self.image = image.to_owned();
        self
    }

    /// Set whether the product was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }

    /// Set the date of sale.
    pub fn date_of_sale(mut self, date_of_sale: Option<Date>) -> Self {
        self.date_of_sale = date_of_sale;
        self
    }
}

/// Check that `price` is a finite number that is zero or greater.
///
/// # Errors
/// Returns [Error::InvalidPrice] otherwise.
pub(crate) fn validate_price(price: f64) -> Result<f64, Error> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(Error::InvalidPrice(price))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns of a sale record, in the order [map_record_row] expects.
pub(crate) const RECORD_COLUMNS: &str =
    "id, title, description, price, category, image, sold, date_of_sale";

/// Insert a new sale record into the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidPrice] if the price is negative,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_record(record: NewSaleRecord, connection: &Connection) -> Result<SaleRecord, Error> {
    validate_price(record.price)?;

    let record = connection
        .prepare(&format!(
            "INSERT INTO sale_record ({RECORD_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {RECORD_COLUMNS}"
        ))?
        .query_row(
            (
                record.id,
                record.title,
                record.description,
                record.price,
                record.category,
                record.image,
                record.sold,
                record.date_of_sale,
            ),
            map_record_row,
        )?;

    Ok(record)
}

/// Retrieve the first record, in store order, with the given `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a stored record,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_record(id: RecordId, connection: &Connection) -> Result<SaleRecord, Error> {
    let record = connection
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM sale_record WHERE id = :id ORDER BY row_key ASC LIMIT 1"
        ))?
        .query_one(&[(":id", &id)], map_record_row)?;

    Ok(record)
}

/// Get the total number of rows in the record table.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_records(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(row_key) FROM sale_record;", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the sale record table in the database.
///
/// Records are identified by the ID from the sale feed, which is not unique.
/// The `row_key` column gives each row its own key and defines store order.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS sale_record (
                row_key INTEGER PRIMARY KEY AUTOINCREMENT,
                id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL CHECK (price >= 0),
                category TEXT NOT NULL,
                image TEXT NOT NULL,
                sold INTEGER NOT NULL,
                date_of_sale TEXT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_sale_record_id ON sale_record(id);",
        (),
    )?;

    // Used by the month filters.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_sale_record_date ON sale_record(date_of_sale);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [SaleRecord].
///
/// The row must contain the columns in [RECORD_COLUMNS] in order.
pub fn map_record_row(row: &Row) -> Result<SaleRecord, rusqlite::Error> {
    Ok(SaleRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        sold: row.get(6)?,
        date_of_sale: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        record::{SaleRecord, count_records, get_record, insert_record},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_succeeds() {
        let conn = get_test_connection();
        let new_record = SaleRecord::build(1, "Backpack", 109.95)
            .description("Fits 15 inch laptops")
            .category("men's clothing")
            .image("https://example.com/1.jpg")
            .sold(true)
            .date_of_sale(Some(date!(2021 - 11 - 27)));

        let record = insert_record(new_record.clone(), &conn).expect("Could not insert record");

        assert_eq!(
            record,
            SaleRecord {
                id: new_record.id,
                title: new_record.title,
                description: new_record.description,
                price: new_record.price,
                category: new_record.category,
                image: new_record.image,
                sold: new_record.sold,
                date_of_sale: new_record.date_of_sale,
            }
        );
    }

    #[test]
    fn insert_without_date() {
        let conn = get_test_connection();

        let record = insert_record(SaleRecord::build(2, "Mug", 5.0), &conn)
            .expect("Could not insert record");

        assert_eq!(record.date_of_sale, None);
    }

    #[test]
    fn insert_fails_on_negative_price() {
        let conn = get_test_connection();

        let result = insert_record(SaleRecord::build(1, "Backpack", -1.0), &conn);

        assert_eq!(result, Err(Error::InvalidPrice(-1.0)));
        assert_eq!(count_records(&conn), Ok(0));
    }

    #[test]
    fn insert_allows_duplicate_ids() {
        let conn = get_test_connection();

        insert_record(SaleRecord::build(1, "First", 1.0), &conn).unwrap();
        insert_record(SaleRecord::build(1, "Second", 2.0), &conn).unwrap();

        assert_eq!(count_records(&conn), Ok(2));
    }

    #[test]
    fn get_returns_first_record_in_store_order() {
        let conn = get_test_connection();
        insert_record(SaleRecord::build(1, "First", 1.0), &conn).unwrap();
        insert_record(SaleRecord::build(1, "Second", 2.0), &conn).unwrap();

        let record = get_record(1, &conn).expect("Could not get record");

        assert_eq!(record.title, "First");
    }

    #[test]
    fn get_missing_record_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_record(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let record = SaleRecord {
            id: 7,
            title: "Ring".to_owned(),
            description: String::new(),
            price: 10.5,
            category: "jewelery".to_owned(),
            image: String::new(),
            sold: false,
            date_of_sale: Some(date!(2022 - 03 - 05)),
        };

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["dateOfSale"], "2022-03-05");
        assert_eq!(json["price"], 10.5);
    }
}
