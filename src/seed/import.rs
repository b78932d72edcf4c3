//! Writes a batch of sale records to the database.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    record::{NewSaleRecord, RECORD_COLUMNS, SaleRecord, map_record_row},
};

use super::feed::SeedSource;

/// Download the sale feed and insert every item as a new record.
///
/// Nothing is written unless every item in the feed is valid. Records are
/// not deduplicated, so importing the same feed twice stores every record twice.
///
/// The database lock is only taken once the feed has been downloaded.
///
/// # Errors
/// Returns a:
/// - [Error::FeedRequestError] or [Error::FeedParseError] if the feed cannot be read,
/// - [Error::DatabaseLockError] if the database lock is poisoned,
/// - or [Error::SqlError] if the records cannot be inserted.
pub async fn import_from_feed(
    source: &SeedSource,
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<Vec<SaleRecord>, Error> {
    let items = source.fetch().await?;

    let records = items
        .into_iter()
        .map(NewSaleRecord::try_from)
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|error| tracing::error!("Rejected sale feed: {error}"))?;

    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let tx = connection
        .unchecked_transaction()
        .inspect_err(|error| tracing::error!("could not start transaction: {error}"))?;

    let imported_records = import_record_list(records, &tx)?;

    tx.commit()
        .inspect_err(|error| tracing::error!("could not commit transaction: {error}"))?;

    Ok(imported_records)
}

/// Insert many records with a single prepared statement.
///
/// **Note**: If you want transactional integrity (all or nothing), pass in a
/// transaction for `connection`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
fn import_record_list(
    records: Vec<NewSaleRecord>,
    connection: &Connection,
) -> Result<Vec<SaleRecord>, Error> {
    let mut stmt = connection.prepare(&format!(
        "INSERT INTO sale_record ({RECORD_COLUMNS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         RETURNING {RECORD_COLUMNS}"
    ))?;

    let mut imported_records = Vec::with_capacity(records.len());

    for record in records {
        let inserted = stmt.query_row(
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

        imported_records.push(inserted);
    }

    Ok(imported_records)
}
