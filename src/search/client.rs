//! Mapbox Search Box HTTP client.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::{FutureExt, LocalBoxFuture};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use super::{parse_features, PlaceSearch, SearchRequest};
use crate::error::SearchError;
use crate::models::PlaceResult;

pub const DEFAULT_ENDPOINT: &str = "https://api.mapbox.com/search/searchbox/v1/forward";

/// Forward search against the Search Box API, biased by proximity
pub struct SearchBoxClient {
    client: Client,
    endpoint: Url,
    access_token: String,
}

impl SearchBoxClient {
    pub fn new(endpoint: &str, access_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("locmap/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Self::with_client(client, endpoint, access_token)
    }

    /// Use a preconfigured HTTP client (proxy, TLS, timeout settings)
    pub fn with_client(client: Client, endpoint: &str, access_token: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).context("Invalid search endpoint")?;
        if access_token.trim().is_empty() {
            anyhow::bail!("Search access token is empty");
        }

        Ok(Self {
            client,
            endpoint,
            access_token: access_token.to_string(),
        })
    }

    /// Full request URL: `?q=<query>&proximity=<lng>,<lat>&access_token=<token>`
    pub fn search_url(&self, request: &SearchRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", &request.query)
            .append_pair("proximity", &request.anchor.proximity())
            .append_pair("access_token", &self.access_token);
        url
    }

    async fn execute(&self, request: &SearchRequest) -> Result<Vec<PlaceResult>, SearchError> {
        debug!(
            "Searching {:?} near {} via {}",
            request.query,
            request.anchor,
            self.endpoint
        );

        let response = self
            .client
            .get(self.search_url(request))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Search service returned status {}", status);
            return Err(SearchError::Status(status));
        }

        let body = response.text().await.map_err(classify)?;
        let places = parse_features(&body)?;

        info!("Search {:?} returned {} places", request.query, places.len());
        Ok(places)
    }
}

impl PlaceSearch for SearchBoxClient {
    fn search<'a>(
        &'a self,
        request: &'a SearchRequest,
    ) -> LocalBoxFuture<'a, Result<Vec<PlaceResult>, SearchError>> {
        self.execute(request).boxed_local()
    }
}

fn classify(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Transport(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one connection: read the request, wait `delay`, send `response`
    async fn serve_once(response: String, delay: Duration) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let _ = socket.read(&mut buf).await;
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        addr
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    fn local_client(addr: SocketAddr, timeout: Duration) -> SearchBoxClient {
        let client = Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .unwrap();
        SearchBoxClient::with_client(client, &format!("http://{}/forward", addr), "pk.test")
            .unwrap()
    }

    #[tokio::test]
    async fn test_search_parses_features() {
        let body = r#"{"features": [{"geometry": {"coordinates": [77.2, 28.6]},
            "properties": {"name": "Refill Station", "poi_category": ["shopping"]}}]}"#;
        let addr = serve_once(http_response("200 OK", body), Duration::ZERO).await;
        let client = local_client(addr, Duration::from_secs(5));

        let places = client.search(&request("plastic")).await.unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Refill Station");
        assert_eq!(places[0].categories, vec!["shopping"]);
    }

    #[tokio::test]
    async fn test_error_status() {
        let addr = serve_once(
            http_response("502 Bad Gateway", r#"{"message": "upstream"}"#),
            Duration::ZERO,
        )
        .await;
        let client = local_client(addr, Duration::from_secs(5));

        match client.search(&request("plastic")).await {
            Err(SearchError::Status(status)) => {
                assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY)
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let addr = serve_once(http_response("200 OK", "<html>oops</html>"), Duration::ZERO).await;
        let client = local_client(addr, Duration::from_secs(5));

        let err = client.search(&request("plastic")).await.unwrap_err();
        assert!(err.is_parse(), "expected parse error, got {:?}", err);
    }

    #[tokio::test]
    async fn test_stalled_response_times_out() {
        let addr = serve_once(
            http_response("200 OK", r#"{"features": []}"#),
            Duration::from_secs(5),
        )
        .await;
        let client = local_client(addr, Duration::from_millis(200));

        let err = client.search(&request("plastic")).await.unwrap_err();
        assert!(
            matches!(err, SearchError::Timeout),
            "expected timeout, got {:?}",
            err
        );
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            anchor: Coordinate::new(77.21, 28.61).unwrap(),
        }
    }

    #[test]
    fn test_search_url() {
        let client =
            SearchBoxClient::new(DEFAULT_ENDPOINT, "pk.test", Duration::from_secs(10)).unwrap();
        let url = client.search_url(&request("reusable cups"));

        assert_eq!(url.path(), "/search/searchbox/v1/forward");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "reusable cups".to_string()),
                ("proximity".to_string(), "77.21,28.61".to_string()),
                ("access_token".to_string(), "pk.test".to_string()),
            ]
        );
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(SearchBoxClient::new("not a url", "pk.test", Duration::from_secs(1)).is_err());
        assert!(SearchBoxClient::new(DEFAULT_ENDPOINT, " ", Duration::from_secs(1)).is_err());
    }
}
