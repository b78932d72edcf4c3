//! Month filters for selecting the sale records of one calendar month.

use std::str::FromStr;

use time::{Date, Month};

use crate::Error;

/// A calendar month selected by a client, parsed from an integer between 1 and 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleMonth(Month);

impl SaleMonth {
    /// The month number, 1 for January through 12 for December.
    pub fn number(self) -> u8 {
        u8::from(self.0)
    }

    /// The English name of the month, e.g. "March".
    pub fn name(self) -> String {
        self.0.to_string()
    }

    /// All twelve months in calendar order.
    pub fn all() -> impl Iterator<Item = SaleMonth> {
        (1..=12u8).filter_map(|number| Month::try_from(number).ok().map(SaleMonth))
    }
}

impl From<Month> for SaleMonth {
    fn from(month: Month) -> Self {
        Self(month)
    }
}

impl FromStr for SaleMonth {
    type Err = Error;

    /// Parse a month number.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `text` is not an integer between 1 and 12.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.trim()
            .parse::<u8>()
            .ok()
            .and_then(|number| Month::try_from(number).ok())
            .map(SaleMonth)
            .ok_or_else(|| Error::InvalidMonth(text.to_owned()))
    }
}

/// Which years a month filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthScope {
    /// Match the month in every year, e.g. March 2021 and March 2022.
    #[default]
    AnyYear,
    /// Match the month in a single year only.
    Year(i32),
}

impl MonthScope {
    /// Check that every month of the configured year can be turned into a date range.
    ///
    /// # Errors
    /// Returns [Error::InvalidYear] if the year, or the year after it, cannot be
    /// represented as a date.
    pub fn validate(self) -> Result<Self, Error> {
        for month in [Month::January, Month::December] {
            MonthFilter::new(SaleMonth::from(month), self).window()?;
        }

        Ok(self)
    }
}

/// A half-open date range, `start <= date < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// The first day of the month.
    pub start: Date,
    /// The first day of the following month.
    pub end: Date,
}

/// Restricts records to a single calendar month.
///
/// Listing, statistics, charts and the dashboard all use the same filter so
/// they always agree on which records belong to a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFilter {
    /// The selected month.
    pub month: SaleMonth,
    /// The years the month applies to.
    pub scope: MonthScope,
}

impl MonthFilter {
    /// Create a filter for `month` in `scope`.
    pub fn new(month: SaleMonth, scope: MonthScope) -> Self {
        Self { month, scope }
    }

    /// The date range covered by the filter, or `None` if the filter matches
    /// the month in any year.
    ///
    /// The range for December ends on the first of January of the next year.
    ///
    /// # Errors
    /// Returns [Error::InvalidYear] if the configured year cannot be represented as a date.
    pub fn window(&self) -> Result<Option<MonthWindow>, Error> {
        let year = match self.scope {
            MonthScope::AnyYear => return Ok(None),
            MonthScope::Year(year) => year,
        };

        let month = self.month.0;
        let (end_year, end_month) = match month {
            Month::December => (
                year.checked_add(1).ok_or(Error::InvalidYear(year))?,
                Month::January,
            ),
            month => (year, month.next()),
        };

        let start =
            Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidYear(year))?;
        let end = Date::from_calendar_date(end_year, end_month, 1)
            .map_err(|_| Error::InvalidYear(end_year))?;

        Ok(Some(MonthWindow { start, end }))
    }
}
