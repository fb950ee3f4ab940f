//! Static file serving for the build output.
//!
//! Serves the `dist/` directory with clean-URL resolution: `/guide/`
//! and `/guide` both map to `dist/guide/index.html`. HTML responses
//! get the live reload script injected.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;

use crate::reload;
use crate::state::AppState;

/// Serves a file from the output directory.
pub(crate) async fn serve_site(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let Some(file_path) = resolve(&state.output_dir, req.uri().path()) else {
        return not_found();
    };

    let Ok(bytes) = tokio::fs::read(&file_path).await else {
        return not_found();
    };

    if file_path.extension().is_some_and(|ext| ext == "html") {
        let html = String::from_utf8_lossy(&bytes);
        let body = reload::inject_reload_script(&html);
        return Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(Body::from(body))
            .unwrap();
    }

    let mime = mime_guess::from_path(&file_path).first_or_octet_stream();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(bytes))
        .unwrap()
}

/// Maps a request path to a file under `output_dir`.
///
/// Segments are percent-decoded before the traversal check so an
/// encoded `..` cannot slip through and files with spaces or
/// non-ASCII names resolve. Directories (and extensionless paths)
/// resolve to their `index.html`.
fn resolve(output_dir: &Path, uri_path: &str) -> Option<PathBuf> {
    let mut path = output_dir.to_path_buf();
    for segment in uri_path.split('/') {
        let segment = percent_decode_str(segment).decode_utf8_lossy();
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            return None;
        }
        path.push(segment.as_ref());
    }

    if path.is_dir() {
        path.push("index.html");
    }
    if path.is_file() {
        return Some(path);
    }
    // Clean URL without a trailing slash.
    if path.extension().is_none() {
        let with_index = path.join("index.html");
        if with_index.is_file() {
            return Some(with_index);
        }
    }
    None
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("guide")).unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        std::fs::write(dir.path().join("guide/index.html"), "<html></html>").unwrap();
        std::fs::write(dir.path().join("style.css"), "body {}").unwrap();
        dir
    }

    #[test]
    fn test_resolve_root() {
        let dir = site();
        assert_eq!(
            resolve(dir.path(), "/"),
            Some(dir.path().join("index.html"))
        );
    }

    #[test]
    fn test_resolve_clean_url_with_and_without_slash() {
        let dir = site();
        let expected = Some(dir.path().join("guide/index.html"));
        assert_eq!(resolve(dir.path(), "/guide/"), expected.clone());
        assert_eq!(resolve(dir.path(), "/guide"), expected);
    }

    #[test]
    fn test_resolve_plain_file() {
        let dir = site();
        assert_eq!(
            resolve(dir.path(), "/style.css"),
            Some(dir.path().join("style.css"))
        );
    }

    #[test]
    fn test_resolve_missing_is_none() {
        let dir = site();
        assert_eq!(resolve(dir.path(), "/nope/"), None);
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = site();
        assert_eq!(resolve(dir.path(), "/../secrets"), None);
        assert_eq!(resolve(dir.path(), "/guide/../../etc/passwd"), None);
        assert_eq!(resolve(dir.path(), "/%2e%2e/secrets"), None);
    }

    #[test]
    fn test_resolve_percent_encoded_names() {
        let dir = site();
        std::fs::write(dir.path().join("my file.txt"), "x").unwrap();
        std::fs::write(dir.path().join("日本語.html"), "<html></html>").unwrap();

        assert_eq!(
            resolve(dir.path(), "/my%20file.txt"),
            Some(dir.path().join("my file.txt"))
        );
        assert_eq!(
            resolve(dir.path(), "/%E6%97%A5%E6%9C%AC%E8%AA%9E.html"),
            Some(dir.path().join("日本語.html"))
        );
    }
}
