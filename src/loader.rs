//! Feed loading over HTTP(S) or from the local filesystem.
//!
//! Every source location is resolved against a base URL. `http(s)` targets
//! go through `reqwest` with caching disabled; `file` targets are read with
//! `tokio::fs`. One attempt per call, no retry.

use crate::error::FeedError;
use crate::models::{FeedPayload, RawPayload, SourceDescriptor};
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA, USER_AGENT};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Something that can load a brand's feed.
pub trait LoadFeed {
    async fn load(&self, source: &SourceDescriptor) -> Result<FeedPayload, FeedError>;
}

/// Turn a `--base` argument into a directory URL.
///
/// `http`, `https` and `file` URLs are taken as-is; anything else is a
/// filesystem path relative to the working directory. A trailing slash is
/// added so relative locations join beneath the base instead of beside it.
pub fn base_url(base: &str) -> Result<Url, FeedError> {
    let invalid = |source| FeedError::Location {
        location: base.to_string(),
        source,
    };

    let mut url = if ["http://", "https://", "file://"]
        .iter()
        .any(|scheme| base.starts_with(scheme))
    {
        Url::parse(base).map_err(invalid)?
    } else {
        let path = std::path::absolute(Path::new(base)).map_err(|source| FeedError::Io {
            location: base.to_string(),
            source,
        })?;
        Url::from_directory_path(&path).map_err(|_| invalid(url::ParseError::RelativeUrlWithoutBase))?
    };

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Resolve a source location against the base.
pub fn resolve(base: &Url, location: &str) -> Result<Url, FeedError> {
    match Url::parse(location) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            base.join(location).map_err(|source| FeedError::Location {
                location: location.to_string(),
                source,
            })
        }
        Err(source) => Err(FeedError::Location {
            location: location.to_string(),
            source,
        }),
    }
}

/// Decode a feed body into a payload.
pub fn decode(body: &[u8], location: &str) -> Result<FeedPayload, FeedError> {
    match serde_json::from_slice::<RawPayload>(body) {
        Ok(raw) => Ok(raw.into_payload()),
        Err(source) => {
            let preview = String::from_utf8_lossy(&body[..body.len().min(120)]);
            debug!(%location, %preview, "Feed body is not a feed document");
            Err(FeedError::Parse {
                location: location.to_string(),
                source,
            })
        }
    }
}

/// [`LoadFeed`] backed by `reqwest` and the local filesystem.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: Client,
    base: Url,
}

impl HttpLoader {
    /// Build a loader. `timeout` is unset unless explicitly configured.
    pub fn new(base: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("press_release_board/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    async fn fetch_http(&self, url: &Url, location: &str) -> Result<Vec<u8>, FeedError> {
        let transport = |source| FeedError::Transport {
            location: location.to_string(),
            source,
        };

        let res = self.client.get(url.clone()).send().await.map_err(transport)?;
        let status = res.status();
        if !status.is_success() {
            return Err(FeedError::Load {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(res.bytes().await.map_err(transport)?.to_vec())
    }

    async fn read_file(&self, url: &Url, location: &str) -> Result<Vec<u8>, FeedError> {
        let path = url.to_file_path().map_err(|_| FeedError::UnsupportedScheme {
            location: location.to_string(),
        })?;
        tokio::fs::read(&path).await.map_err(|source| FeedError::Io {
            location: location.to_string(),
            source,
        })
    }
}

impl LoadFeed for HttpLoader {
    #[instrument(level = "info", skip_all, fields(brand = %source.key, location = %source.location))]
    async fn load(&self, source: &SourceDescriptor) -> Result<FeedPayload, FeedError> {
        let t0 = Instant::now();
        let url = resolve(&self.base, &source.location)?;

        let body = match url.scheme() {
            "http" | "https" => self.fetch_http(&url, &source.location).await,
            "file" => self.read_file(&url, &source.location).await,
            _ => Err(FeedError::UnsupportedScheme {
                location: source.location.clone(),
            }),
        };

        let result = body.and_then(|body| decode(&body, &source.location));
        let elapsed_ms = t0.elapsed().as_millis();
        match &result {
            Ok(_) => info!(%url, elapsed_ms, "Loaded feed"),
            Err(e) => warn!(%url, elapsed_ms, error = %e, "Feed load failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("prb-loader-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(dir.join("data")).unwrap();
        dir
    }

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(response: String) -> (Url, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(String::from_utf8_lossy(&request).to_string());
        });

        (Url::parse(&format!("http://{addr}/")).unwrap(), rx)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let base = Url::parse("https://board.example.com/site/").unwrap();
        assert_eq!(
            resolve(&base, "./data/vodafone.json").unwrap().as_str(),
            "https://board.example.com/site/data/vodafone.json"
        );
        assert_eq!(
            resolve(&base, "https://cdn.example.com/ee.json").unwrap().as_str(),
            "https://cdn.example.com/ee.json"
        );
    }

    #[test]
    fn test_base_url_adds_trailing_slash() {
        let base = base_url("https://board.example.com/site").unwrap();
        assert_eq!(base.as_str(), "https://board.example.com/site/");

        let local = base_url(".").unwrap();
        assert_eq!(local.scheme(), "file");
        assert!(local.path().ends_with('/'));
    }

    #[test]
    fn test_decode_invalid_json_is_parse_error() {
        let err = decode(b"<html>oops</html>", "feed.json").unwrap_err();
        assert!(matches!(err, FeedError::Parse { ref location, .. } if location == "feed.json"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = temp_dir("ok");
        std::fs::write(
            dir.join("data/ee.json"),
            r#"{"status":"ok","generated_at":"2024-06-01T00:00:00Z","items":[{"title":"T","url":"https://e.com"}]}"#,
        )
        .unwrap();

        let loader = HttpLoader::new(base_url(dir.to_str().unwrap()).unwrap(), None).unwrap();
        let payload = loader
            .load(&SourceDescriptor::new("ee", "EE", "./data/ee.json"))
            .await
            .unwrap();

        assert_eq!(payload.generated_at(), Some("2024-06-01T00:00:00Z"));
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let dir = temp_dir("missing");
        let loader = HttpLoader::new(base_url(dir.to_str().unwrap()).unwrap(), None).unwrap();
        let err = loader
            .load(&SourceDescriptor::new("ee", "EE", "./data/nope.json"))
            .await
            .unwrap_err();

        assert!(matches!(err, FeedError::Io { .. }));
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_parse_error() {
        let dir = temp_dir("malformed");
        std::fs::write(dir.join("data/bad.json"), "{\"status\": ").unwrap();
        let loader = HttpLoader::new(base_url(dir.to_str().unwrap()).unwrap(), None).unwrap();
        let err = loader
            .load(&SourceDescriptor::new("bad", "Bad", "./data/bad.json"))
            .await
            .unwrap_err();

        assert!(matches!(err, FeedError::Parse { .. }));
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_http_non_success_is_load_error() {
        let (base, request) = serve_once(http_response("404 Not Found", "")).await;
        let loader = HttpLoader::new(base, None).unwrap();
        let err = loader
            .load(&SourceDescriptor::new("vodafone", "Vodafone", "./data/vodafone.json"))
            .await
            .unwrap_err();

        match err {
            FeedError::Load { location, status } => {
                assert_eq!(location, "./data/vodafone.json");
                assert_eq!(status, 404);
            }
            other => panic!("expected load error, got {other:?}"),
        }

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /data/vodafone.json "));
        assert!(request.contains("cache-control: no-cache"));
        assert!(request.contains("pragma: no-cache"));
    }

    #[tokio::test]
    async fn test_http_success_decodes_payload() {
        let body = r#"{"status":"error","error":"upstream blocked"}"#;
        let (base, _request) = serve_once(http_response("200 OK", body)).await;
        let loader = HttpLoader::new(base, None).unwrap();
        let payload = loader
            .load(&SourceDescriptor::new("o2", "O2", "o2.json"))
            .await
            .unwrap();

        assert_eq!(payload, FeedPayload::failed("upstream blocked"));
    }
}
