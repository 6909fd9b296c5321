use std::io::Cursor;
use tiny_http::Response;

use crate::render::{render_screen, ModelSummary};
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let (width, height) = state.classifier.input_dims();
    let summary = ModelSummary {
        labels: state.classifier.labels().to_vec(),
        width,
        height,
    };

    let mut screen = state.screen();
    let flash = screen.take_flash();
    let page = render_screen(&screen, flash.as_ref(), &summary);
    drop(screen);

    crate::routes::html_response(page)
}

// ---------------------------------------------------------------------------
// GET /image
// ---------------------------------------------------------------------------

pub fn handle_image(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let shown = state.screen().image.clone();
    match shown {
        Some(img) => crate::routes::bytes_response(img.bytes, img.mime),
        None => crate::routes::not_found(),
    }
}

// ---------------------------------------------------------------------------
// GET /result.json
// ---------------------------------------------------------------------------

pub fn handle_result_json(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let screen = state.screen();
    let body = match &screen.prediction {
        Some(p) => serde_json::to_string_pretty(p),
        None => serde_json::to_string(&serde_json::Value::Null),
    };
    drop(screen);

    match body {
        Ok(json) => crate::routes::json_response(json),
        Err(e) => {
            log::error!("could not serialize result: {}", e);
            crate::routes::server_error()
        }
    }
}
