//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/records/{record_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page with the records table, statistics and charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to list records and to seed the database from the sale feed.
pub const RECORDS_API: &str = "/api/records";
/// The route to update or delete the records with a given ID.
pub const RECORD: &str = "/api/records/{record_id}";
/// The route for the sale statistics of a month.
pub const STATISTICS: &str = "/api/records/statistics/{month}";
/// The route for the price range histogram of a month.
pub const BAR_CHART: &str = "/api/records/bar-chart/{month}";
/// The route for the category counts of a month.
pub const PIE_CHART: &str = "/api/records/pie-chart/{month}";
/// The route for the statistics, price ranges and category counts of a month.
pub const COMBINED: &str = "/api/records/combined/{month}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g.
/// '{record_id}' in '/api/records/{record_id}'. Only the first parameter is
/// replaced. A parameter without a closing brace runs to the end of the path.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::RECORDS_API);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::RECORD, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::STATISTICS, 3));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::BAR_CHART, 3));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::PIE_CHART, 3));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::COMBINED, 3));
    }

    #[test]
    fn formats_month_routes() {
        assert_eq!(
            format_endpoint(endpoints::STATISTICS, 11),
            "/api/records/statistics/11"
        );
        assert_eq!(format_endpoint(endpoints::RECORD, 42), "/api/records/42");
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
