use std::{
    error::Error,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use sales_dashboard::{DEFAULT_FEED_URL, SeedSource, import_from_feed, initialize_db};

/// Import the sale feed into a database without starting the server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. Created if it does not exist.
    #[arg(long)]
    db_path: String,

    /// The URL of the JSON feed to import.
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    feed_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let source = SeedSource::new(&args.feed_url)?;
    let records = import_from_feed(&source, &Arc::new(Mutex::new(conn))).await?;

    tracing::info!(
        "Imported {} records from {} into {}",
        records.len(),
        source.feed_url(),
        args.db_path
    );

    Ok(())
}
