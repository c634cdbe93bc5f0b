use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::domain::{BoundingBox, DomainError, RetryConfig, TileCoord, TrafficProvider};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_TOMTOM_BASE_URL: &str = "https://api.tomtom.com";
const DEFAULT_LANGUAGE: &str = "ro-RO";

const FLOW_TILE_PATH: &str = "/traffic/map/4/tile/flow/relative";
const INCIDENTS_PATH: &str = "/traffic/services/5/incidentDetails";
const FLOW_SEGMENT_PATH: &str = "/traffic/services/4/flowSegmentData/absolute/10/json";

/// Projection requested from the incident details endpoint
pub const INCIDENT_FIELDS: &str = "{incidents{type,geometry{type,coordinates},properties{id,iconCategory,magnitudeOfDelay,events{description,code,iconCategory},startTime,endTime,from,to,length,delay,roadNumbers,aci{probabilityOfOccurrence,numberOfReports,lastReportTime}}}}";

/// Traffic model id: "latest available"
const TRAFFIC_MODEL_ID: &str = "1111111111";

/// TomTom Traffic API provider
#[derive(Debug)]
pub struct TomTomProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    language: String,
    retry: RetryConfig,
}

impl<C: HttpClientTrait> TomTomProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_TOMTOM_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            api_key: api_key.into(),
            base_url,
            language: DEFAULT_LANGUAGE.to_string(),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn flow_tile_url(&self, tile: TileCoord) -> String {
        format!(
            "{}{}/{}/{}/{}.pbf",
            self.base_url, FLOW_TILE_PATH, tile.z, tile.x, tile.y
        )
    }

    fn incidents_url(&self) -> String {
        format!("{}{}", self.base_url, INCIDENTS_PATH)
    }

    fn flow_segment_url(&self) -> String {
        format!("{}{}", self.base_url, FLOW_SEGMENT_PATH)
    }
}

#[async_trait]
impl<C: HttpClientTrait> TrafficProvider for TomTomProvider<C> {
    async fn flow_tile(&self, tile: TileCoord) -> Result<Bytes, DomainError> {
        let url = self.flow_tile_url(tile);
        debug!("Fetching flow tile {}", tile);

        let query = [("key", self.api_key.as_str())];
        self.retry
            .run(&format!("flow tile {}", tile), || self.client.get_bytes(&url, &query))
            .await
    }

    async fn incidents(&self, bbox: &BoundingBox) -> Result<serde_json::Value, DomainError> {
        let url = self.incidents_url();
        let bbox_param = bbox.to_query_param();
        debug!("Fetching incidents for bbox {}", bbox_param);

        let query = [
            ("key", self.api_key.as_str()),
            ("bbox", bbox_param.as_str()),
            ("fields", INCIDENT_FIELDS),
            ("language", self.language.as_str()),
            ("t", TRAFFIC_MODEL_ID),
        ];
        self.retry
            .run("incident details", || self.client.get_json(&url, &query))
            .await
    }

    async fn flow_segment(&self, lat: f64, lon: f64) -> Result<serde_json::Value, DomainError> {
        let url = self.flow_segment_url();
        let point = format!("{},{}", lat, lon);
        debug!("Fetching flow segment at {}", point);

        let query = [("key", self.api_key.as_str()), ("point", point.as_str())];
        self.retry
            .run(&format!("flow segment {}", point), || {
                self.client.get_json(&url, &query)
            })
            .await
    }

    fn provider_name(&self) -> &'static str {
        "tomtom"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const TILE_URL: &str =
        "https://api.tomtom.com/traffic/map/4/tile/flow/relative/15/18896/11504.pbf";
    const INCIDENTS_URL: &str = "https://api.tomtom.com/traffic/services/5/incidentDetails";
    const SEGMENT_URL: &str =
        "https://api.tomtom.com/traffic/services/4/flowSegmentData/absolute/10/json";

    fn fast_retry() -> RetryConfig {
        RetryConfig::new(2).with_initial_delay(1).with_max_delay(1)
    }

    #[tokio::test]
    async fn test_flow_tile_url_and_key() {
        let client = MockHttpClient::new().with_bytes(TILE_URL, vec![1u8, 2, 3]);
        let provider = TomTomProvider::new(client, "test-key");

        let bytes = provider
            .flow_tile(TileCoord::new(15, 18896, 11504))
            .await
            .unwrap();

        assert_eq!(bytes.as_ref(), &[1, 2, 3]);
        let requests = provider.client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].param("key"), Some("test-key"));
    }

    #[tokio::test]
    async fn test_incidents_query_params() {
        let client = MockHttpClient::new()
            .with_json(INCIDENTS_URL, serde_json::json!({"incidents": []}));
        let provider = TomTomProvider::new(client, "test-key");

        provider.incidents(&BoundingBox::iasi()).await.unwrap();

        let request = &provider.client.requests()[0];
        assert_eq!(request.param("bbox"), Some("27.52,47.1,27.66,47.22"));
        assert_eq!(request.param("fields"), Some(INCIDENT_FIELDS));
        assert_eq!(request.param("language"), Some("ro-RO"));
        assert_eq!(request.param("t"), Some("1111111111"));
    }

    #[tokio::test]
    async fn test_custom_language() {
        let client = MockHttpClient::new()
            .with_json(INCIDENTS_URL, serde_json::json!({"incidents": []}));
        let provider = TomTomProvider::new(client, "k").with_language("en-GB");

        provider.incidents(&BoundingBox::iasi()).await.unwrap();
        assert_eq!(provider.client.requests()[0].param("language"), Some("en-GB"));
    }

    #[tokio::test]
    async fn test_flow_segment_point_is_lat_lon() {
        let client = MockHttpClient::new().with_json(
            SEGMENT_URL,
            serde_json::json!({"flowSegmentData": {"currentSpeed": 40}}),
        );
        let provider = TomTomProvider::new(client, "k");

        let response = provider.flow_segment(47.16, 27.58).await.unwrap();

        assert_eq!(response["flowSegmentData"]["currentSpeed"], 40);
        assert_eq!(provider.client.requests()[0].param("point"), Some("47.16,27.58"));
    }

    #[tokio::test]
    async fn test_custom_base_url_trims_slash() {
        let custom = "http://localhost:9000/traffic/services/5/incidentDetails";
        let client = MockHttpClient::new().with_json(custom, serde_json::json!({}));
        let provider = TomTomProvider::with_base_url(client, "k", "http://localhost:9000/");

        assert!(provider.incidents(&BoundingBox::iasi()).await.is_ok());
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let client = MockHttpClient::new().with_error(TILE_URL, "connection reset");
        let provider = TomTomProvider::new(client, "k").with_retry(fast_retry());

        let result = provider.flow_tile(TileCoord::new(15, 18896, 11504)).await;

        assert!(result.is_err());
        assert_eq!(provider.client.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_forbidden_is_not_retried() {
        let client = MockHttpClient::new().with_status_error(SEGMENT_URL, 403);
        let provider = TomTomProvider::new(client, "k").with_retry(fast_retry());

        let result = provider.flow_segment(47.0, 27.0).await;

        assert!(result.is_err());
        assert_eq!(provider.client.requests().len(), 1);
    }

    #[test]
    fn test_provider_name() {
        let provider = TomTomProvider::new(MockHttpClient::new(), "k");
        assert_eq!(provider.provider_name(), "tomtom");
    }

    #[tokio::test]
    async fn test_malformed_segment_body_is_not_retried() {
        use crate::infrastructure::HttpClient;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/traffic/services/4/flowSegmentData/absolute/10/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let provider = TomTomProvider::with_base_url(HttpClient::new(), "test-key", &server.uri())
            .with_retry(fast_retry());
        let err = provider.flow_segment(47.16, 27.58).await.unwrap_err();

        assert!(matches!(err, DomainError::Decode { .. }));
    }
}
