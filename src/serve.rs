use std::io;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Router,
};
use tokio::signal;
use tower_http::compression::CompressionLayer;

use crate::content;
use crate::html;
use crate::site;
use crate::web_assets;

/// Maximum number of consecutive ports to try before giving up.
const MAX_PORT_ATTEMPTS: u16 = 100;

/// Maximum file size that will be read and served (16 MiB).
pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Command-line settings for `folio serve`.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Content file; `None` serves the built-in sample.
    pub content: Option<PathBuf>,
    /// Explicit public directory. Defaults to `public/` next to the content
    /// file when that exists.
    pub public: Option<PathBuf>,
    pub bind: String,
    pub port: u16,
}

/// Shared application state passed to all request handlers via `Arc<AppState>`.
pub struct AppState {
    /// Content file, re-read on every page request so edits show on reload.
    pub content_path: Option<PathBuf>,
    /// Canonicalized public directory used for symlink-safe containment
    /// checks. `None` disables static files.
    pub public_root: Option<PathBuf>,
}

/// Attempt to bind a TCP listener on `bind_addr` starting at `start_port`.
///
/// On `EADDRINUSE` the port is incremented by one and the attempt is retried up
/// to `MAX_PORT_ATTEMPTS` times. Any other OS error causes an immediate failure
/// without further retries.
pub fn bind_with_retry(bind_addr: &str, start_port: u16) -> Result<(TcpListener, u16), String> {
    let mut port = start_port;
    tracing::debug!(port, "binding");
    for _ in 0..MAX_PORT_ATTEMPTS {
        let addr = format!("{}:{}", bind_addr, port);
        match TcpListener::bind(&addr) {
            Ok(listener) => {
                tracing::debug!(port, "bound");
                return Ok((listener, port));
            }
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                let next = port.wrapping_add(1);
                tracing::info!(port, next, "port in use, trying next");
                port = next;
            }
            Err(e) => {
                return Err(format!("bind {}:{} failed: {}", bind_addr, port, e));
            }
        }
    }
    Err(format!(
        "exhausted {} port candidates starting at {}; all ports in use",
        MAX_PORT_ATTEMPTS, start_port,
    ))
}

// ---------------------------------------------------------------------------
// Path resolution helpers
// ---------------------------------------------------------------------------

/// Percent-decode a URL path byte-by-byte (RFC 3986 §2.1).
///
/// Returns `Err(())` if the encoding is malformed (truncated `%XX` sequence or
/// non-hex digit) or if the decoded byte sequence is not valid UTF-8.
pub fn percent_decode(encoded: &str) -> Result<String, ()> {
    let bytes = encoded.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len() {
                return Err(());
            }
            let hi = hex_digit(bytes[i + 1])?;
            let lo = hex_digit(bytes[i + 2])?;
            out.push((hi << 4) | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| ())
}

fn hex_digit(b: u8) -> Result<u8, ()> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(()),
    }
}

/// Normalize a decoded URL path, stripping `.` and `..` components.
///
/// Returns `None` if a `..` would escape the root, which signals a
/// path-traversal attempt.
pub fn normalize_path(decoded: &str) -> Option<PathBuf> {
    let mut parts: Vec<&str> = Vec::new();
    for component in decoded.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            name => parts.push(name),
        }
    }
    Some(parts.iter().collect())
}

/// Derive the `Content-Type` value from a file extension (case-insensitive).
///
/// Returns `application/octet-stream` for any unrecognised extension so that
/// browsers never perform MIME sniffing on unknown types.
pub fn mime_for_ext(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Resolve a candidate path to an existing file: the file itself, or
/// `index.html` inside a directory.
async fn resolve_candidate(candidate: &Path) -> Option<(PathBuf, &'static str)> {
    match tokio::fs::metadata(candidate).await {
        Ok(meta) if meta.is_file() => Some((candidate.to_path_buf(), "exact")),
        Ok(meta) if meta.is_dir() => {
            let index = candidate.join("index.html");
            match tokio::fs::metadata(&index).await {
                Ok(m) if m.is_file() => Some((index, "index")),
                _ => None,
            }
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Conditional requests
// ---------------------------------------------------------------------------

/// Strong validator from file size and modification time.
pub fn etag_for(size: u64, modified: Option<SystemTime>) -> String {
    let nanos = modified
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("\"{size:x}-{nanos:x}\"")
}

/// Drop sub-second precision; HTTP dates carry whole seconds.
fn whole_seconds(t: SystemTime) -> SystemTime {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => UNIX_EPOCH + Duration::from_secs(d.as_secs()),
        Err(_) => t,
    }
}

/// Whether the request's validators match the current file.
///
/// `If-None-Match` takes precedence; `If-Modified-Since` is only consulted
/// when it is absent.
pub fn is_not_modified(headers: &HeaderMap, etag: &str, modified: Option<SystemTime>) -> bool {
    if let Some(inm) = headers.get(header::IF_NONE_MATCH) {
        let Ok(inm) = inm.to_str() else {
            return false;
        };
        return inm.split(',').map(str::trim).any(|tag| {
            tag == "*" || tag == etag || tag.strip_prefix("W/") == Some(etag)
        });
    }
    let since = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| httpdate::parse_http_date(v).ok());
    match (since, modified) {
        (Some(since), Some(modified)) => whole_seconds(modified) <= since,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Plain-text response with mandatory security headers.
fn text_response(status: StatusCode, body: String) -> Response {
    let mut resp = Response::new(Body::from(body));
    *resp.status_mut() = status;
    let headers = resp.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    resp
}

fn not_found_response() -> Response {
    text_response(StatusCode::NOT_FOUND, "Not Found".to_owned())
}

/// 413 Content Too Large.
fn too_large_response(norm_path: &str, size: u64) -> Response {
    text_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        format!(
            "Content Too Large: {} ({} bytes exceeds {} byte limit)",
            norm_path, size, MAX_FILE_SIZE
        ),
    )
}

/// 200 response for generated or embedded bodies.
fn ok_response(content_type: &'static str, body: impl Into<Body>) -> Response {
    let mut resp = Response::new(body.into());
    let headers = resp.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static(content_type),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-cache"),
    );
    resp
}

// ---------------------------------------------------------------------------
// Axum request handlers
// ---------------------------------------------------------------------------

/// The page, rendered from the content file on every request.
async fn page_response(state: &AppState) -> Response {
    match content::load_async(state.content_path.as_deref()).await {
        Ok(portfolio) => {
            tracing::debug!(path = "/", mode = "rendered", "request");
            ok_response("text/html; charset=utf-8", html::build_page(&portfolio))
        }
        Err(e) => {
            tracing::error!(error = %e, "cannot render page");
            text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Content error: {e}\n"),
            )
        }
    }
}

/// The validated content as JSON.
async fn content_json_response(state: &AppState) -> Response {
    let portfolio = match content::load_async(state.content_path.as_deref()).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "cannot load content");
            return text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Content error: {e}\n"),
            );
        }
    };
    match serde_json::to_string_pretty(&portfolio) {
        Ok(json) => ok_response("application/json", json),
        Err(e) => {
            tracing::error!(error = %e, "cannot serialize content");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{e}\n"))
        }
    }
}

/// Secure static-file pipeline for the public directory.
///
/// 1. Percent-decode the raw request path (before any normalisation).
/// 2. Reject NUL bytes; normalise `.`/`..`, rejecting traversal above root.
/// 3. Resolve the candidate (exact file or directory `index.html`).
/// 4. Canonicalise and re-verify containment in the public root.
/// 5. Reject files over `MAX_FILE_SIZE` with 413.
/// 6. Answer conditional requests with 304, else send the bytes.
async fn static_file_response(state: &AppState, raw_path: &str, headers: &HeaderMap) -> Response {
    let Some(root) = state.public_root.as_deref() else {
        tracing::debug!(path = raw_path, reason = "no-public-dir", "denied");
        return not_found_response();
    };

    let decoded = match percent_decode(raw_path) {
        Ok(d) => d,
        Err(_) => {
            tracing::debug!(path = raw_path, reason = "invalid-percent-encoding", "denied");
            return not_found_response();
        }
    };

    if decoded.contains('\0') {
        tracing::debug!(path = raw_path, reason = "null-byte", "denied");
        return not_found_response();
    }

    let Some(normalized) = normalize_path(&decoded) else {
        tracing::warn!(path = raw_path, reason = "path-traversal", "denied");
        return not_found_response();
    };
    let norm_display = normalized.display().to_string();

    let candidate = root.join(&normalized);
    let Some((resolved, branch)) = resolve_candidate(&candidate).await else {
        tracing::debug!(path = %norm_display, reason = "not-found", "denied");
        return not_found_response();
    };

    let canonical = match tokio::fs::canonicalize(&resolved).await {
        Ok(c) => c,
        Err(_) => {
            tracing::debug!(path = %norm_display, reason = "canonicalize-failed", "denied");
            return not_found_response();
        }
    };
    if !canonical.starts_with(root) {
        tracing::warn!(
            path = %norm_display,
            canonical = %canonical.display(),
            reason = "outside-root",
            "denied"
        );
        return not_found_response();
    }

    let meta = match tokio::fs::metadata(&canonical).await {
        Ok(m) => m,
        Err(_) => {
            tracing::debug!(path = %norm_display, reason = "metadata-failed", "denied");
            return not_found_response();
        }
    };
    let size = meta.len();
    if size > MAX_FILE_SIZE {
        tracing::warn!(path = %norm_display, size, reason = "too-large", "denied");
        return too_large_response(&norm_display, size);
    }

    let modified = meta.modified().ok();
    let etag = etag_for(size, modified);
    if is_not_modified(headers, &etag, modified) {
        tracing::debug!(path = %norm_display, "not modified");
        let mut resp = Response::new(Body::empty());
        *resp.status_mut() = StatusCode::NOT_MODIFIED;
        let h = resp.headers_mut();
        if let Ok(v) = header::HeaderValue::from_str(&etag) {
            h.insert(header::ETAG, v);
        }
        h.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            header::HeaderValue::from_static("nosniff"),
        );
        return resp;
    }

    let bytes = match tokio::fs::read(&canonical).await {
        Ok(b) => b,
        Err(_) => return not_found_response(),
    };
    tracing::debug!(path = %norm_display, branch, size, "static");

    let ext = canonical
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let mut resp = Response::new(Body::from(bytes));
    let h = resp.headers_mut();
    h.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static(mime_for_ext(ext)),
    );
    h.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    if let Ok(v) = header::HeaderValue::from_str(&etag) {
        h.insert(header::ETAG, v);
    }
    if let Some(modified) = modified {
        if let Ok(v) = header::HeaderValue::from_str(&httpdate::fmt_http_date(modified)) {
            h.insert(header::LAST_MODIFIED, v);
        }
    }
    resp
}

/// Main request handler.
///
/// `/` and `/index.html` render the page, `/content.json` dumps the content,
/// `/assets/*` are the embedded assets; everything else comes from the
/// public directory. All responses include `X-Content-Type-Options: nosniff`.
async fn serve_handler(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let raw_path = req.uri().path().to_owned();

    match raw_path.as_str() {
        "/" | "/index.html" => return page_response(&state).await,
        "/content.json" => return content_json_response(&state).await,
        _ => {}
    }

    for (path, body) in web_assets::ASSETS {
        if raw_path.strip_prefix('/') == Some(path) {
            let content_type = if path.ends_with(".css") {
                "text/css; charset=utf-8"
            } else {
                "text/javascript; charset=utf-8"
            };
            tracing::debug!(path = %raw_path, mode = "asset", "request");
            return ok_response(content_type, body);
        }
    }

    static_file_response(&state, &raw_path, req.headers()).await
}

/// Router with compression applied to every response.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(serve_handler)
        .layer(CompressionLayer::new())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the HTTP server.
///
/// The content file is validated once up front so a broken file fails fast;
/// afterwards it is re-read per request. The server shuts down cleanly when
/// SIGINT (Ctrl+C) is received.
pub async fn run_serve(opts: ServeOptions) -> io::Result<()> {
    let portfolio = content::load_async(opts.content.as_deref()).await?;
    tracing::info!(
        name = %portfolio.profile.name,
        sections = crate::nav::SECTION_ORDER
            .iter()
            .filter(|id| portfolio.has_section(**id))
            .count(),
        "content loaded"
    );

    let public_root = site::resolve_public_dir(opts.public.as_deref(), opts.content.as_deref())?;

    let state = Arc::new(AppState {
        content_path: opts.content.clone(),
        public_root: public_root.clone(),
    });

    let (std_listener, bound_port) = bind_with_retry(&opts.bind, opts.port)
        .map_err(|msg| io::Error::new(io::ErrorKind::AddrInUse, msg))?;

    std_listener.set_nonblocking(true)?;
    let listener = tokio::net::TcpListener::from_std(std_listener)?;

    let url = format!("http://{}:{}", opts.bind, bound_port);
    println!("folio serve");
    println!(
        "content: {}",
        opts.content
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in sample)".to_owned())
    );
    println!(
        "public:  {}",
        public_root
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_owned())
    );
    println!("url:     {url}");
    tracing::info!(%url, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(error = %e, "cannot install SIGINT handler");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutdown complete");
        })
        .await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    // --- percent_decode ---

    #[test]
    fn decode_plain_ascii() {
        assert_eq!(percent_decode("/docs/cv.pdf").unwrap(), "/docs/cv.pdf");
    }

    #[test]
    fn decode_dot_dot_either_case() {
        assert_eq!(percent_decode("%2e%2e").unwrap(), "..");
        assert_eq!(percent_decode("%2E%2E").unwrap(), "..");
    }

    #[test]
    fn decode_encoded_slash() {
        assert_eq!(percent_decode("%2f").unwrap(), "/");
        assert_eq!(percent_decode("%2e%2e%2f").unwrap(), "../");
    }

    #[test]
    fn decode_truncated_sequence_is_error() {
        assert!(percent_decode("%2").is_err());
        assert!(percent_decode("%").is_err());
    }

    #[test]
    fn decode_invalid_hex_is_error() {
        assert!(percent_decode("%zz").is_err());
    }

    #[test]
    fn decode_invalid_utf8_sequence_is_error() {
        // %80 is a lone continuation byte.
        assert!(percent_decode("%80").is_err());
    }

    // --- normalize_path ---

    #[test]
    fn normalize_simple_path() {
        assert_eq!(normalize_path("/img/me.png").unwrap(), PathBuf::from("img/me.png"));
    }

    #[test]
    fn normalize_root_gives_empty() {
        assert_eq!(normalize_path("/").unwrap(), PathBuf::new());
    }

    #[test]
    fn normalize_dot_and_inner_dotdot() {
        assert_eq!(normalize_path("/a/./b").unwrap(), PathBuf::from("a/b"));
        assert_eq!(normalize_path("/a/b/../c").unwrap(), PathBuf::from("a/c"));
        assert_eq!(normalize_path("/docs/").unwrap(), PathBuf::from("docs"));
    }

    #[test]
    fn normalize_traversal_above_root_rejected() {
        assert!(normalize_path("/../etc/passwd").is_none());
        assert!(normalize_path("/../../etc/passwd").is_none());
        assert!(normalize_path("/a/../../etc/passwd").is_none());
    }

    #[test]
    fn normalize_encoded_traversal_after_decode() {
        let decoded = percent_decode("/%2e%2e%2fetc%2fpasswd").unwrap();
        assert!(normalize_path(&decoded).is_none());
    }

    // --- mime_for_ext ---

    #[test]
    fn mime_known_types() {
        assert_eq!(mime_for_ext("html"), "text/html; charset=utf-8");
        assert_eq!(mime_for_ext("css"), "text/css");
        assert_eq!(mime_for_ext("pdf"), "application/pdf");
        assert_eq!(mime_for_ext("PNG"), "image/png");
        assert_eq!(mime_for_ext("webp"), "image/webp");
    }

    #[test]
    fn mime_unknown_extension_is_octet_stream() {
        assert_eq!(mime_for_ext("md"), "application/octet-stream");
        assert_eq!(mime_for_ext(""), "application/octet-stream");
    }

    // --- conditional requests ---

    #[test]
    fn etag_is_quoted_and_changes_with_size() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let a = etag_for(10, Some(t));
        assert!(a.starts_with('"') && a.ends_with('"'));
        assert_ne!(a, etag_for(11, Some(t)));
        assert_ne!(a, etag_for(10, Some(t + Duration::from_secs(1))));
    }

    #[test]
    fn if_none_match_wins() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let etag = etag_for(10, Some(t));
        let mut h = HeaderMap::new();
        h.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&etag).unwrap());
        assert!(is_not_modified(&h, &etag, Some(t)));

        h.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"other\""));
        // A future If-Modified-Since is ignored once If-None-Match is present.
        h.insert(
            header::IF_MODIFIED_SINCE,
            HeaderValue::from_str(&httpdate::fmt_http_date(t + Duration::from_secs(60))).unwrap(),
        );
        assert!(!is_not_modified(&h, &etag, Some(t)));
    }

    #[test]
    fn if_none_match_accepts_lists_weak_and_star() {
        let etag = "\"a-b\"";
        let mut h = HeaderMap::new();
        h.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"x\", W/\"a-b\""));
        assert!(is_not_modified(&h, etag, None));
        h.insert(header::IF_NONE_MATCH, HeaderValue::from_static("*"));
        assert!(is_not_modified(&h, etag, None));
    }

    #[test]
    fn if_modified_since_compares_whole_seconds() {
        let t = UNIX_EPOCH + Duration::from_millis(1_700_000_000_500);
        let mut h = HeaderMap::new();
        h.insert(
            header::IF_MODIFIED_SINCE,
            HeaderValue::from_str(&httpdate::fmt_http_date(t)).unwrap(),
        );
        assert!(is_not_modified(&h, "\"e\"", Some(t)));

        h.insert(
            header::IF_MODIFIED_SINCE,
            HeaderValue::from_static("Thu, 01 Jan 1970 00:00:00 GMT"),
        );
        assert!(!is_not_modified(&h, "\"e\"", Some(t)));
    }

    #[test]
    fn no_validators_means_modified() {
        assert!(!is_not_modified(&HeaderMap::new(), "\"e\"", Some(SystemTime::now())));
    }

    // --- resolve_candidate ---

    #[tokio::test]
    async fn resolve_exact_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("resume.pdf"), b"%PDF").unwrap();
        let candidate = dir.path().join("resume.pdf");
        let (path, branch) = resolve_candidate(&candidate).await.unwrap();
        assert_eq!(branch, "exact");
        assert_eq!(path, candidate);
    }

    #[tokio::test]
    async fn resolve_directory_index() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("talks");
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(sub.join("index.html"), b"<p>talks</p>").unwrap();
        let (path, branch) = resolve_candidate(&sub).await.unwrap();
        assert_eq!(branch, "index");
        assert_eq!(path, sub.join("index.html"));
    }

    #[tokio::test]
    async fn resolve_directory_without_index_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_candidate(dir.path()).await.is_none());
        assert!(resolve_candidate(&dir.path().join("missing")).await.is_none());
    }

    // --- handler ---

    async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, HeaderMap, String) {
        let req = axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let resp = serve_handler(State(state), req).await;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8_lossy(&bytes).into_owned())
    }

    fn state_with_public(public: Option<&Path>) -> Arc<AppState> {
        Arc::new(AppState {
            content_path: None,
            public_root: public.map(|p| std::fs::canonicalize(p).unwrap()),
        })
    }

    #[tokio::test]
    async fn root_renders_builtin_page() {
        let (status, headers, body) = get(state_with_public(None), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert!(body.contains("<section id=\"about\""));
    }

    #[tokio::test]
    async fn content_json_is_served() {
        let (status, headers, body) = get(state_with_public(None), "/content.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["profile"]["name"], "Alex Morgan");
    }

    #[tokio::test]
    async fn embedded_assets_are_served() {
        let (status, headers, body) = get(state_with_public(None), "/assets/folio.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/javascript"));
        assert_eq!(body, web_assets::JS);
    }

    #[tokio::test]
    async fn broken_content_is_a_500() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.yml");
        std::fs::write(&path, "profile: [").unwrap();
        let state = Arc::new(AppState {
            content_path: Some(path),
            public_root: None,
        });
        let (status, headers, body) = get(state, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert!(body.contains("portfolio.yml"), "{body}");
    }

    #[tokio::test]
    async fn static_files_need_a_public_dir() {
        let (status, _, _) = get(state_with_public(None), "/resume.pdf").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn static_file_carries_validators() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("resume.pdf"), b"%PDF-1.4").unwrap();
        let (status, headers, body) =
            get(state_with_public(Some(dir.path())), "/resume.pdf").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert!(headers.contains_key(header::ETAG));
        assert!(headers.contains_key(header::LAST_MODIFIED));
        assert_eq!(body, "%PDF-1.4");
    }

    #[tokio::test]
    async fn encoded_traversal_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("public");
        std::fs::create_dir_all(&public).unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"secret").unwrap();
        let (status, _, _) =
            get(state_with_public(Some(&public)), "/%2e%2e/secret.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn nul_byte_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, _) = get(state_with_public(Some(dir.path())), "/a%00b").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_outside_root_is_denied() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("public");
        std::fs::create_dir_all(&public).unwrap();
        let outside = dir.path().join("outside.txt");
        std::fs::write(&outside, b"secret").unwrap();
        symlink(&outside, public.join("evil.txt")).unwrap();

        let (status, _, body) = get(state_with_public(Some(&public)), "/evil.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!body.contains("secret"));
    }
}
