use std::net::SocketAddr;

use axum::{Router, body::Body, http::StatusCode, response::Response};
use tokio::net::TcpListener;

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

/// Serve `app` on an ephemeral local port, e.g. to stand in for the sale feed.
pub(crate) async fn spawn_feed_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind feed server");
    let address = listener
        .local_addr()
        .expect("Could not get feed server address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Feed server stopped unexpectedly");
    });

    address
}
