use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::handlers;
use crate::state::{ImageSource, SharedState};

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .expect("header names and values are plain ASCII")
}

fn bytes_with_status(status: u16, body: Vec<u8>, content_type: &str) -> Response<Cursor<Vec<u8>>> {
    let len = body.len();
    Response::new(
        StatusCode(status),
        vec![
            header("Content-Type", content_type),
            header("Cache-Control", "no-store"),
        ],
        Cursor::new(body),
        Some(len),
        None,
    )
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    bytes_with_status(200, body.into_bytes(), "text/html; charset=utf-8")
}

pub fn json_response(body: String) -> Response<Cursor<Vec<u8>>> {
    bytes_with_status(200, body.into_bytes(), "application/json")
}

pub fn bytes_response(body: Vec<u8>, content_type: &str) -> Response<Cursor<Vec<u8>>> {
    bytes_with_status(200, body, content_type)
}

pub fn redirect(location: &str) -> Response<Cursor<Vec<u8>>> {
    Response::new(
        StatusCode(303),
        vec![
            header("Location", location),
            header("Content-Length", "0"),
        ],
        Cursor::new(Vec::new()),
        Some(0),
        None,
    )
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    bytes_with_status(404, b"404 Not Found".to_vec(), "text/plain")
}

pub fn server_error() -> Response<Cursor<Vec<u8>>> {
    bytes_with_status(500, b"500 Internal Server Error".to_vec(), "text/plain")
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler and responds.
pub fn dispatch(mut request: Request, state: SharedState) {
    let url = request.url().to_owned();
    let response = route(&mut request, state);

    if let Err(e) = request.respond(response) {
        log::warn!("failed to send response for {}: {}", url, e);
    }
}

/// Picks the handler for a request and returns its response unsent.
pub fn route(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let path   = url.split('?').next().unwrap_or("");

    log::debug!("{} {}", method, url);

    match (method, path) {
        (Method::Get,  "/")            => handlers::screen::handle_get(state),
        (Method::Get,  "/image")       => handlers::screen::handle_image(state),
        (Method::Get,  "/result.json") => handlers::screen::handle_result_json(state),

        // ── Activity results ─────────────────────────────────────────────
        (Method::Post, "/capture") => handlers::upload::handle(request, state, ImageSource::Capture),
        (Method::Post, "/pick")    => handlers::upload::handle(request, state, ImageSource::Pick),

        _ => not_found(),
    }
}
