//! Database queries for searching and paging sale records.

use rusqlite::{Connection, named_params};
use serde::Serialize;
use time::Date;

use crate::{Error, month::MonthFilter, pagination::PageRequest};

use super::core::{RECORD_COLUMNS, SaleRecord, map_record_row};

/// Criteria for selecting sale records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Text that must appear in the title or the category, ignoring ASCII case.
    ///
    /// An empty string matches every record.
    pub search: String,
    /// Restricts records to a single month.
    pub month: Option<MonthFilter>,
}

impl RecordFilter {
    /// A filter that selects every record in `month`.
    pub fn for_month(month: MonthFilter) -> Self {
        Self {
            search: String::new(),
            month: Some(month),
        }
    }
}

/// One page of records and the number of records across all pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPage {
    /// The number of records matching the filter before paging.
    pub total: u64,
    /// The records on the requested page, in store order.
    pub items: Vec<SaleRecord>,
}

// The date range and month-of-year checks are skipped when their parameters are NULL.
const FILTER_CLAUSE: &str = "(title LIKE :pattern ESCAPE '\\' OR category LIKE :pattern ESCAPE '\\') \
    AND (:start IS NULL OR (date_of_sale >= :start AND date_of_sale < :end)) \
    AND (:month IS NULL OR CAST(strftime('%m', date_of_sale) AS INTEGER) = :month)";

/// The values bound to the parameters in [FILTER_CLAUSE].
struct FilterParams {
    pattern: String,
    start: Option<Date>,
    end: Option<Date>,
    month: Option<u8>,
}

impl FilterParams {
    fn new(filter: &RecordFilter) -> Result<Self, Error> {
        let pattern = format!("%{}%", escape_like_pattern(&filter.search));

        let params = match filter.month {
            None => Self {
                pattern,
                start: None,
                end: None,
                month: None,
            },
            Some(month_filter) => match month_filter.window()? {
                Some(window) => Self {
                    pattern,
                    start: Some(window.start),
                    end: Some(window.end),
                    month: None,
                },
                None => Self {
                    pattern,
                    start: None,
                    end: None,
                    month: Some(month_filter.month.number()),
                },
            },
        };

        Ok(params)
    }
}

/// Escape the wildcards in `text` so `LIKE` matches it literally.
fn escape_like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for character in text.chars() {
        if matches!(character, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(character);
    }

    escaped
}

/// Get one page of the records matching `filter`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn list_records(
    filter: &RecordFilter,
    page: PageRequest,
    connection: &Connection,
) -> Result<RecordPage, Error> {
    let params = FilterParams::new(filter)?;

    let total: i64 = connection
        .prepare(&format!(
            "SELECT COUNT(row_key) FROM sale_record WHERE {FILTER_CLAUSE}"
        ))?
        .query_row(
            named_params! {
                ":pattern": params.pattern,
                ":start": params.start,
                ":end": params.end,
                ":month": params.month,
            },
            |row| row.get(0),
        )?;

    let items = connection
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM sale_record WHERE {FILTER_CLAUSE} \
            ORDER BY row_key ASC LIMIT :limit OFFSET :offset"
        ))?
        .query_map(
            named_params! {
                ":pattern": params.pattern,
                ":start": params.start,
                ":end": params.end,
                ":month": params.month,
                ":limit": i64::try_from(page.limit).unwrap_or(i64::MAX),
                ":offset": i64::try_from(page.offset()).unwrap_or(i64::MAX),
            },
            map_record_row,
        )?
        .map(|record_result| record_result.map_err(Error::SqlError))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecordPage {
        total: u64::try_from(total).unwrap_or_default(),
        items,
    })
}

/// Get every record matching `filter`, in store order.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn get_filtered_records(
    filter: &RecordFilter,
    connection: &Connection,
) -> Result<Vec<SaleRecord>, Error> {
    let params = FilterParams::new(filter)?;

    connection
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM sale_record WHERE {FILTER_CLAUSE} ORDER BY row_key ASC"
        ))?
        .query_map(
            named_params! {
                ":pattern": params.pattern,
                ":start": params.start,
                ":end": params.end,
                ":month": params.month,
            },
            map_record_row,
        )?
        .map(|record_result| record_result.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Month, macros::date};

    use crate::{
        db::initialize,
        month::{MonthFilter, MonthScope, SaleMonth},
        pagination::PageRequest,
        record::{SaleRecord, insert_record},
    };

    use super::{RecordFilter, escape_like_pattern, get_filtered_records, list_records};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn march(scope: MonthScope) -> Option<MonthFilter> {
        Some(MonthFilter::new(SaleMonth::from(Month::March), scope))
    }

    fn search(text: &str) -> RecordFilter {
        RecordFilter {
            search: text.to_owned(),
            month: None,
        }
    }

    #[test]
    fn second_page_holds_the_remainder() {
        let conn = get_test_connection();
        for i in 1..=15 {
            insert_record(SaleRecord::build(i, &format!("record #{i}"), i as f64), &conn).unwrap();
        }

        let got = list_records(
            &RecordFilter::default(),
            PageRequest { page: 2, limit: 10 },
            &conn,
        )
        .expect("Could not list records");

        assert_eq!(got.total, 15);
        assert_eq!(got.items.len(), 5);
        let ids: Vec<_> = got.items.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![11, 12, 13, 14, 15]);
    }

    #[test]
    fn page_past_the_end_is_empty_with_total() {
        let conn = get_test_connection();
        for i in 1..=3 {
            insert_record(SaleRecord::build(i, "record", 1.0), &conn).unwrap();
        }

        let got = list_records(
            &RecordFilter::default(),
            PageRequest { page: 5, limit: 10 },
            &conn,
        )
        .unwrap();

        assert_eq!(got.total, 3);
        assert!(got.items.is_empty());
    }

    #[test]
    fn search_matches_title_or_category_ignoring_case() {
        let conn = get_test_connection();
        insert_record(
            SaleRecord::build(1, "Mens Casual Slim Fit", 15.99).category("men's clothing"),
            &conn,
        )
        .unwrap();
        insert_record(
            SaleRecord::build(2, "Solid Gold Petite Micropave", 168.0).category("jewelery"),
            &conn,
        )
        .unwrap();
        insert_record(
            SaleRecord::build(3, "WD 2TB Elements", 64.0).category("electronics"),
            &conn,
        )
        .unwrap();

        let by_title = list_records(&search("slim"), PageRequest { page: 1, limit: 10 }, &conn)
            .unwrap();
        let by_category =
            list_records(&search("JEWEL"), PageRequest { page: 1, limit: 10 }, &conn).unwrap();

        assert_eq!(by_title.total, 1);
        assert_eq!(by_title.items[0].id, 1);
        assert_eq!(by_category.total, 1);
        assert_eq!(by_category.items[0].id, 2);
    }

    #[test]
    fn search_does_not_match_description() {
        let conn = get_test_connection();
        insert_record(
            SaleRecord::build(1, "Backpack", 109.95).description("fits a laptop"),
            &conn,
        )
        .unwrap();

        let got = get_filtered_records(&search("laptop"), &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let conn = get_test_connection();
        insert_record(SaleRecord::build(1, "100% cotton", 10.0), &conn).unwrap();
        insert_record(SaleRecord::build(2, "1000 cotton buds", 10.0), &conn).unwrap();

        let got = get_filtered_records(&search("0%"), &conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, 1);
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like_pattern(r"50%_off\"), r"50\%\_off\\");
    }

    #[test]
    fn month_in_any_year() {
        let conn = get_test_connection();
        let dates = [
            date!(2021 - 03 - 01),
            date!(2021 - 03 - 31),
            date!(2021 - 04 - 01),
            date!(2022 - 03 - 15),
            date!(2022 - 02 - 28),
        ];
        for (i, date) in dates.into_iter().enumerate() {
            insert_record(
                SaleRecord::build(i as i64, "record", 1.0).date_of_sale(Some(date)),
                &conn,
            )
            .unwrap();
        }
        insert_record(SaleRecord::build(99, "undated", 1.0), &conn).unwrap();

        let filter = RecordFilter {
            search: String::new(),
            month: march(MonthScope::AnyYear),
        };
        let got = get_filtered_records(&filter, &conn).unwrap();

        let ids: Vec<_> = got.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![0, 1, 3]);
    }

    #[test]
    fn month_in_a_single_year() {
        let conn = get_test_connection();
        let dates = [
            date!(2021 - 02 - 28),
            date!(2021 - 03 - 01),
            date!(2021 - 03 - 31),
            date!(2021 - 04 - 01),
            date!(2022 - 03 - 15),
        ];
        for (i, date) in dates.into_iter().enumerate() {
            insert_record(
                SaleRecord::build(i as i64, "record", 1.0).date_of_sale(Some(date)),
                &conn,
            )
            .unwrap();
        }

        let filter = RecordFilter {
            search: String::new(),
            month: march(MonthScope::Year(2021)),
        };
        let got = get_filtered_records(&filter, &conn).unwrap();

        let ids: Vec<_> = got.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn search_and_month_combine() {
        let conn = get_test_connection();
        insert_record(
            SaleRecord::build(1, "Jacket", 50.0).date_of_sale(Some(date!(2021 - 03 - 10))),
            &conn,
        )
        .unwrap();
        insert_record(
            SaleRecord::build(2, "Jacket", 50.0).date_of_sale(Some(date!(2021 - 05 - 10))),
            &conn,
        )
        .unwrap();
        insert_record(
            SaleRecord::build(3, "Ring", 50.0).date_of_sale(Some(date!(2021 - 03 - 10))),
            &conn,
        )
        .unwrap();

        let filter = RecordFilter {
            search: "jacket".to_owned(),
            month: march(MonthScope::AnyYear),
        };
        let got = list_records(&filter, PageRequest { page: 1, limit: 10 }, &conn).unwrap();

        assert_eq!(got.total, 1);
        assert_eq!(got.items[0].id, 1);
    }
}
