//! Monthly statistics, price ranges and category counts for sale records.

mod aggregation;
mod handlers;

pub use aggregation::{
    PriceHistogram, SaleStatistics, category_histogram, price_histogram, summarize,
};
pub use handlers::{
    get_bar_chart_endpoint, get_combined_endpoint, get_pie_chart_endpoint,
    get_statistics_endpoint,
};
