use tracing::{error, info};
use warp::http::{Response, StatusCode};
use warp::{Rejection, Reply};

use crate::log_bridge;
use crate::resources::{INDEX_PAGE, Resources};
use crate::state::AppState;
use crate::view::ViewState;
use crate::web::models::{
    ConsoleResponse, ErrorResponse, RecolorRequest, UploadRequest, ViewResponse,
};

fn render_view(
    view: &ViewState,
    resources: &Resources,
) -> Result<ViewResponse, crate::error::SvgtintError> {
    let display = match &view.content {
        Some(content) => Some(resources.render_display(content)?),
        None => None,
    };
    Ok(ViewResponse {
        filename: view.filename.clone(),
        display,
        colors: view.colors.clone(),
    })
}

fn json_error(message: &str, status: StatusCode) -> impl Reply {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error: message.to_string(),
        }),
        status,
    )
}

pub async fn index_handler(state: AppState) -> Result<impl Reply, Rejection> {
    match state.resources.read(INDEX_PAGE) {
        Ok(html) => Ok(warp::reply::with_status(
            warp::reply::html(html),
            StatusCode::OK,
        )),
        Err(e) => {
            error!("failed to load index page: {}", e);
            Ok(warp::reply::with_status(
                warp::reply::html("index page unavailable".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

pub async fn upload_handler(body: UploadRequest, state: AppState) -> Result<impl Reply, Rejection> {
    info!("file changed: {}", body.filename);
    let mut view = state.view.lock().await;
    let next = view.with_upload(body.filename, body.content);
    info!(
        "updated last file in session state ({} colors)",
        next.colors.len()
    );
    *view = next;
    match render_view(&view, &state.resources) {
        Ok(resp) => Ok(warp::reply::with_status(
            warp::reply::json(&resp),
            StatusCode::OK,
        )),
        Err(e) => {
            error!("failed to render display template: {}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorResponse {
                    error: e.to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

pub async fn recolor_handler(
    body: RecolorRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let mut view = state.view.lock().await;
    let Some(next) = view.with_recolor(&body.edits) else {
        return Ok(json_error("no file uploaded yet", StatusCode::CONFLICT).into_response());
    };
    info!("recolored with {} edit(s)", body.edits.len());
    *view = next;
    match render_view(&view, &state.resources) {
        Ok(resp) => Ok(warp::reply::with_status(
            warp::reply::json(&resp),
            StatusCode::OK,
        )
        .into_response()),
        Err(e) => {
            error!("failed to render display template: {}", e);
            Ok(
                json_error(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response(),
            )
        }
    }
}

pub async fn download_handler(state: AppState) -> Result<impl Reply, Rejection> {
    let view = state.view.lock().await;
    let built = match &view.content {
        Some(content) => {
            let filename = view
                .filename
                .clone()
                .unwrap_or_else(|| "image.svg".to_string());
            Response::builder()
                .status(StatusCode::OK)
                .header("content-type", "image/svg+xml")
                .header(
                    "content-disposition",
                    format!("attachment; filename=\"{}\"", filename.replace('"', "")),
                )
                .body(content.clone())
        }
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body("no file uploaded yet".to_string()),
    };
    built.map_err(|e| {
        error!("failed to build download response: {}", e);
        warp::reject()
    })
}

/// One drain pass over the log queue, then the full accumulated console.
///
/// The paced drain only holds the console lock; the view lock is taken
/// briefly afterwards so uploads and recolors are never stalled behind it.
pub async fn console_handler(state: AppState) -> Result<impl Reply, Rejection> {
    let mut drained = Vec::new();
    {
        let mut rx = state.console.lock().await;
        log_bridge::drain_console(&mut rx, &mut drained).await;
    }
    let mut view = state.view.lock().await;
    let mut messages = view.messages.clone();
    messages.extend(drained);
    *view = view.with_messages(messages.clone());
    Ok(warp::reply::json(&ConsoleResponse { messages }))
}

pub async fn clear_console_handler(state: AppState) -> Result<impl Reply, Rejection> {
    let mut view = state.view.lock().await;
    *view = view.with_cleared_console();
    Ok(warp::reply::json(&ConsoleResponse {
        messages: Vec::new(),
    }))
}
