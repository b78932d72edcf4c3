//! Seeds the database with sale records from an external JSON feed.

mod create_endpoint;
mod feed;
mod import;

pub use create_endpoint::seed_records_endpoint;
pub use feed::{DEFAULT_FEED_URL, SeedSource};
pub use import::import_from_feed;
