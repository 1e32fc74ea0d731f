use axum::{
    body::Body,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static"]
struct Asset;

fn embedded(path: &str) -> Option<Response> {
    Asset::get(path).map(|content| {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        (
            [(header::CONTENT_TYPE, mime.as_ref())],
            Body::from(content.data),
        )
            .into_response()
    })
}

/// `GET /index`: the dashboard page.
pub async fn index_page() -> Response {
    embedded("index.html").unwrap_or_else(|| (StatusCode::NOT_FOUND, "404 Not Found").into_response())
}

/// `GET /static/{*path}`: scripts and styles used by the dashboard page.
pub async fn serve_asset(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches("/static/");

    embedded(path).unwrap_or_else(|| (StatusCode::NOT_FOUND, "404 Not Found").into_response())
}
