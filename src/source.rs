use crate::models::{decode_snapshot, DecodeError, RangeSnapshot};
use crate::range::RangeId;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::{sync::Arc, time::Duration};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream answered {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Where range snapshots come from.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, range: RangeId) -> Result<RangeSnapshot, FetchError>;
}

#[async_trait]
impl<T: SnapshotSource + ?Sized> SnapshotSource for Arc<T> {
    async fn fetch(&self, range: RangeId) -> Result<RangeSnapshot, FetchError> {
        (**self).fetch(range).await
    }
}

/// Fetches snapshots with `GET <endpoint>?tab=<range>`.
pub struct HttpSnapshotSource {
    client: Client,
    endpoint: String,
    cookie: Option<String>,
}

impl HttpSnapshotSource {
    pub fn new(
        base_url: &str,
        path: &str,
        cookie: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: join_url(base_url, path),
            cookie,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self, range: RangeId) -> Result<RangeSnapshot, FetchError> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("tab", range.as_str())]);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        debug!(%range, bytes = body.len(), "timescale payload received");
        Ok(decode_snapshot(&body, range)?)
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    // Answers with the request's Cookie header as the only chart label.
    async fn echo_cookie(
        Query(query): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> String {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("none");
        let mut chart = serde_json::Map::new();
        chart.insert(cookie.to_string(), serde_json::json!(100.0));
        let mut root = serde_json::Map::new();
        root.insert(
            query.get("tab").cloned().unwrap_or_default(),
            serde_json::json!({ "gain_loss": 1.5, "chart_data": chart }),
        );
        serde_json::Value::Object(root).to_string()
    }

    #[test]
    fn joins_base_and_path_with_one_slash() {
        assert_eq!(join_url("http://host:5000/", "/timescale"), "http://host:5000/timescale");
        assert_eq!(join_url("http://host", "get_data"), "http://host/get_data");
    }

    #[test]
    fn builds_endpoint_from_parts() {
        let source = HttpSnapshotSource::new(
            "http://127.0.0.1:5000",
            "/get_data",
            None,
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(source.endpoint(), "http://127.0.0.1:5000/get_data");
    }

    #[tokio::test]
    async fn slow_backend_times_out_as_transport_error() {
        let app = Router::new().route(
            "/timescale",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let base = serve(app).await;
        let source =
            HttpSnapshotSource::new(&base, "/timescale", None, Duration::from_millis(100)).unwrap();

        let err = source.fetch(RangeId::OneDay).await.unwrap_err();
        assert!(matches!(&err, FetchError::Transport(inner) if inner.is_timeout()), "{err:?}");
    }

    #[tokio::test]
    async fn forwards_cookie_and_tab() {
        let base = serve(Router::new().route("/get_data", get(echo_cookie))).await;

        let source = HttpSnapshotSource::new(
            &base,
            "/get_data",
            Some("session=abc123".to_string()),
            Duration::from_secs(2),
        )
        .unwrap();
        let snapshot = source.fetch(RangeId::OneMonth).await.unwrap();
        assert_eq!(snapshot.gain_loss, 1.5);
        assert_eq!(snapshot.labels(), vec!["session=abc123"]);

        let anonymous = HttpSnapshotSource::new(&base, "/get_data", None, Duration::from_secs(2)).unwrap();
        let snapshot = anonymous.fetch(RangeId::YearToDate).await.unwrap();
        assert_eq!(snapshot.labels(), vec!["none"]);
    }
}
