//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, db::initialize, month::MonthScope, pagination::PaginationConfig, seed::SeedSource,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// The years that a month filter applies to.
    pub month_scope: MonthScope,

    /// Where sale records are imported from.
    pub seed_source: SeedSource,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an [Error::InvalidYear] if `month_scope` names a year that cannot be
    /// represented as a date, or another error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        pagination_config: PaginationConfig,
        month_scope: MonthScope,
        seed_source: SeedSource,
    ) -> Result<Self, Error> {
        let month_scope = month_scope.validate()?;
        initialize(&db_connection)?;

        Ok(Self {
            pagination_config,
            month_scope,
            seed_source,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
