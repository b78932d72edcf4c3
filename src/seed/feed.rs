//! Downloads and reads the external sale feed.

use std::time::Duration;

use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error,
    record::{NewSaleRecord, SaleRecord, validate_price},
};

/// The public dataset of product transactions that the database is seeded from.
pub const DEFAULT_FEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

const FEED_TIMEOUT: Duration = Duration::from_secs(30);

/// Where to download sale records from, and the HTTP client to do it with.
#[derive(Debug, Clone)]
pub struct SeedSource {
    feed_url: String,
    client: reqwest::Client,
}

impl SeedSource {
    /// Create a source that downloads the JSON array at `feed_url`.
    ///
    /// # Errors
    /// Returns [Error::FeedRequestError] if the HTTP client cannot be created.
    pub fn new(feed_url: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(FEED_TIMEOUT)
            .build()
            .map_err(|error| Error::FeedRequestError(error.to_string()))?;

        Ok(Self {
            feed_url: feed_url.to_owned(),
            client,
        })
    }

    /// The URL of the feed.
    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    /// Download every item in the feed.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::FeedRequestError] if the request fails or the response is not a success,
    /// - or [Error::FeedParseError] if the response body is not a JSON array of feed items.
    pub(crate) async fn fetch(&self) -> Result<Vec<FeedItem>, Error> {
        tracing::debug!("Fetching sale feed from {}", self.feed_url);

        let response = self
            .client
            .get(&self.feed_url)
            .header("Accept", "application/json")
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .inspect_err(|error| tracing::error!("Sale feed request failed: {error}"))
            .map_err(|error| Error::FeedRequestError(error.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|error| Error::FeedRequestError(error.to_string()))?;

        serde_json::from_str::<Vec<FeedItem>>(&body)
            .inspect_err(|error| tracing::error!("Could not parse sale feed: {error}"))
            .map_err(|error| Error::FeedParseError(error.to_string()))
    }
}

/// One product in the sale feed.
///
/// Text fields and `sold` may be missing, in which case they take their default value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeedItem {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub sold: bool,
    /// An RFC 3339 timestamp, e.g. "2021-11-27T20:29:54+05:30".
    #[serde(default)]
    pub date_of_sale: Option<String>,
}

impl TryFrom<FeedItem> for NewSaleRecord {
    type Error = Error;

    /// Convert a feed item into a record ready to be inserted.
    ///
    /// The date of sale is the calendar date in the timestamp's own offset.
    fn try_from(item: FeedItem) -> Result<Self, Self::Error> {
        let id = item.id;

        validate_price(item.price)
            .map_err(|error| Error::FeedParseError(format!("item {id}: {error}")))?;

        let date_of_sale = item
            .date_of_sale
            .as_deref()
            .map(|text| {
                OffsetDateTime::parse(text, &Rfc3339)
                    .map(OffsetDateTime::date)
                    .map_err(|error| {
                        Error::FeedParseError(format!(
                            "item {id}: invalid dateOfSale \"{text}\": {error}"
                        ))
                    })
            })
            .transpose()?;

        Ok(
            SaleRecord::build(id, &item.title.unwrap_or_default(), item.price)
                .description(&item.description.unwrap_or_default())
                .category(&item.category.unwrap_or_default())
                .image(&item.image.unwrap_or_default())
                .sold(item.sold)
                .date_of_sale(date_of_sale),
        )
    }
}
