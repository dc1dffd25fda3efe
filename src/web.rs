pub mod handlers;
pub mod models;

use std::convert::Infallible;
use std::net::SocketAddr;

use tracing::info;
use warp::{Filter, Rejection, Reply};

use crate::state::AppState;

fn with_state(
    state: AppState,
) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

pub fn routes(
    state: AppState,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::index_handler);

    let upload = warp::path!("api" / "upload")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::upload_handler);

    let recolor = warp::path!("api" / "recolor")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::recolor_handler);

    let download = warp::path!("api" / "download")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::download_handler);

    let console = warp::path!("api" / "console")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::console_handler);

    let clear = warp::path!("api" / "console" / "clear")
        .and(warp::post())
        .and(with_state(state))
        .and_then(handlers::clear_console_handler);

    index
        .or(upload)
        .or(recolor)
        .or(download)
        .or(clear)
        .or(console)
        .recover(handle_rejection)
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let status = if err.is_not_found() {
        warp::http::StatusCode::NOT_FOUND
    } else {
        warp::http::StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok(warp::reply::with_status(status.to_string(), status))
}

pub async fn serve(state: AppState, addr: SocketAddr) {
    info!("serving on http://{}", addr);
    warp::serve(routes(state)).run(addr).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_bridge::console_channel;
    use crate::resources::{DISPLAY_TEMPLATE, INDEX_PAGE, Resources};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    const SAMPLE_SVG: &str = r##"<svg><rect fill="#FF0000"/><rect fill="#00FF00"/></svg>"##;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(INDEX_PAGE), "<html>svgtint</html>").unwrap();
        fs::write(
            dir.path().join(DISPLAY_TEMPLATE),
            "<div class=\"display\">%SVG%</div>",
        )
        .unwrap();
        let (_tx, rx) = console_channel();
        (AppState::new(Resources::new(dir.path()), rx), dir)
    }

    #[tokio::test]
    async fn upload_then_recolor_then_download() {
        let (state, _dir) = test_state();
        let api = routes(state);

        let resp = warp::test::request()
            .method("POST")
            .path("/api/upload")
            .json(&serde_json::json!({
                "filename": "icon.svg",
                "content": SAMPLE_SVG,
            }))
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["colors"][0], "#FF0000");
        assert!(body["display"].as_str().unwrap().contains(SAMPLE_SVG));

        let resp = warp::test::request()
            .method("POST")
            .path("/api/recolor")
            .json(&serde_json::json!({
                "edits": [["#FF0000", "#0000FF"]],
            }))
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["colors"][0], "#0000FF");

        let resp = warp::test::request()
            .method("GET")
            .path("/api/download")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 200);
        assert!(
            std::str::from_utf8(resp.body())
                .unwrap()
                .contains("#0000FF")
        );
        assert!(
            resp.headers()["content-disposition"]
                .to_str()
                .unwrap()
                .contains("icon.svg")
        );
    }

    #[tokio::test]
    async fn recolor_before_upload_is_conflict() {
        let (state, _dir) = test_state();
        let api = routes(state);
        let resp = warp::test::request()
            .method("POST")
            .path("/api/recolor")
            .json(&serde_json::json!({ "edits": [["#FF0000", "#0000FF"]] }))
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 409);
    }

    #[tokio::test]
    async fn download_before_upload_is_not_found() {
        let (state, _dir) = test_state();
        let api = routes(state);
        let resp = warp::test::request()
            .method("GET")
            .path("/api/download")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn unknown_route_is_recovered_as_not_found() {
        let (state, _dir) = test_state();
        let api = routes(state);
        let resp = warp::test::request()
            .method("GET")
            .path("/api/missing")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn console_drain_does_not_stall_other_requests() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(INDEX_PAGE), "x").unwrap();
        fs::write(dir.path().join(DISPLAY_TEMPLATE), "%SVG%").unwrap();
        let (tx, rx) = console_channel();
        let state = AppState::new(Resources::new(dir.path()), rx);
        for i in 0..4 {
            tx.try_send(format!("line {}", i)).unwrap();
        }
        let api = routes(state);

        // the drain paces itself per retrieved line, so this request keeps
        // the console lock busy for several hundred milliseconds
        let console_api = api.clone();
        let console_task = tokio::spawn(async move {
            warp::test::request()
                .method("GET")
                .path("/api/console")
                .reply(&console_api)
                .await
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let upload = tokio::time::timeout(
            Duration::from_millis(250),
            warp::test::request()
                .method("POST")
                .path("/api/upload")
                .json(&serde_json::json!({
                    "filename": "icon.svg",
                    "content": SAMPLE_SVG,
                }))
                .reply(&api),
        )
        .await
        .expect("upload must not wait for the console drain");
        assert_eq!(upload.status(), 200);

        let resp = console_task.await.unwrap();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn console_drains_queue_into_messages() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(INDEX_PAGE), "x").unwrap();
        fs::write(dir.path().join(DISPLAY_TEMPLATE), "%SVG%").unwrap();
        let (tx, rx) = console_channel();
        let state = AppState::new(Resources::new(dir.path()), rx);
        tx.try_send("one".to_string()).unwrap();
        tx.try_send("two".to_string()).unwrap();
        let api = routes(state);

        let resp = warp::test::request()
            .method("GET")
            .path("/api/console")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["messages"], serde_json::json!(["one", "two"]));

        let resp = warp::test::request()
            .method("POST")
            .path("/api/console/clear")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["messages"], serde_json::json!([]));
    }
}
