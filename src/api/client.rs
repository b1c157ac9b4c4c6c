use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;

use super::error::ClientError;
use super::types::*;
use crate::config::Config;

/// Client for the tracker service. Every call is attempted once; failures surface as
/// [`ClientError`].
pub struct TrackerClient {
    client: Client,
    base_url: String,
}

impl TrackerClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            client,
            base_url: config.tracker_url.clone(),
        })
    }

    fn request(&self, method: Method, endpoint: &str) -> (String, RequestBuilder) {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%method, %url, "tracker request");
        let builder = self
            .client
            .request(method, url.as_str())
            .header(header::ACCEPT, "application/json");
        (url, builder)
    }

    async fn send(url: &str, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::Unreachable {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        Ok(response)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        let (url, builder) = self.request(Method::GET, endpoint);
        let response = Self::send(&url, builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode { url, source })
    }

    async fn post(&self, endpoint: &str) -> Result<(), ClientError> {
        let (url, builder) = self.request(Method::POST, endpoint);
        Self::send(&url, builder).await?;
        Ok(())
    }

    async fn put<B: serde::Serialize>(&self, endpoint: &str, body: &B) -> Result<(), ClientError> {
        let (url, builder) = self.request(Method::PUT, endpoint);
        let builder = builder
            .header(header::CONTENT_TYPE, "application/json")
            .json(body);
        Self::send(&url, builder).await?;
        Ok(())
    }

    async fn delete(&self, endpoint: &str) -> Result<(), ClientError> {
        let (url, builder) = self.request(Method::DELETE, endpoint);
        Self::send(&url, builder).await?;
        Ok(())
    }

    /// List all trackers in the order the service keeps them
    pub async fn list_trackers(&self) -> Result<Vec<Tracker>, ClientError> {
        self.get("/trackers").await
    }

    /// Total duration across all trackers, already formatted
    pub async fn sum(&self) -> Result<String, ClientError> {
        let response: SumResponse = self.get("/sum").await?;
        Ok(response.duration)
    }

    /// Fetch trackers and the total. Either call failing fails the snapshot.
    pub async fn snapshot(&self) -> Result<Snapshot, ClientError> {
        let trackers = self.list_trackers().await?;
        let total_duration = self.sum().await?;
        Ok(Snapshot {
            trackers,
            total_duration,
        })
    }

    /// The running tracker, or `None` when the service reports nothing running
    pub async fn current(&self) -> Result<Option<Tracker>, ClientError> {
        match self.get("/tracker").await {
            Ok(tracker) => Ok(Some(tracker)),
            Err(ClientError::Status { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a tracker for `key` and start it
    pub async fn create(&self, key: &str) -> Result<(), ClientError> {
        self.post(&tracker_path(key)).await
    }

    /// Start an existing tracker, pausing whichever one is running
    pub async fn start(&self, key: &str) -> Result<(), ClientError> {
        self.post(&format!("{}/start", tracker_path(key))).await
    }

    pub async fn pause(&self) -> Result<(), ClientError> {
        self.post("/tracker/pause").await
    }

    pub async fn delete_tracker(&self, key: &str) -> Result<(), ClientError> {
        self.delete(&tracker_path(key)).await
    }

    /// Replace the description; an empty string clears it
    pub async fn set_description(&self, key: &str, description: &str) -> Result<(), ClientError> {
        let body = DescriptionBody {
            description: description.to_string(),
        };
        self.put(&tracker_path(key), &body).await
    }

    /// Submit all trackers. Filtering short entries is up to the service.
    pub async fn submit(&self) -> Result<(), ClientError> {
        self.post("/submit").await
    }
}

fn tracker_path(key: &str) -> String {
    format!("/trackers/{}", urlencoding::encode(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TrackerClient {
        let config = Config {
            tracker_url: server.uri(),
            ..Config::default()
        };
        TrackerClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn snapshot_reads_trackers_and_sum() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trackers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"key": "AB-1", "running": true, "duration": "1h 2m"},
                {"key": "AB-2", "running": false, "duration": "5m", "description": "notes"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sum"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"duration": "1h 7m"})))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = client_for(&server).snapshot().await.unwrap();
        let keys: Vec<&str> = snapshot.trackers.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["AB-1", "AB-2"]);
        assert_eq!(snapshot.total_duration, "1h 7m");
        assert_eq!(snapshot.trackers[1].description.as_deref(), Some("notes"));
    }

    #[tokio::test]
    async fn snapshot_fails_when_sum_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trackers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sum"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server).snapshot().await.unwrap_err();
        match err {
            ClientError::Status { status, body, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trackers"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_trackers().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_service() {
        let config = Config {
            tracker_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..Config::default()
        };
        let err = TrackerClient::new(&config)
            .unwrap()
            .list_trackers()
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Unreachable { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn current_maps_not_found_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tracker"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn current_returns_running_tracker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tracker"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"key": "AB-1", "running": true, "duration": "3m"})),
            )
            .mount(&server)
            .await;

        let tracker = client_for(&server).current().await.unwrap().unwrap();
        assert_eq!(tracker.key, "AB-1");
        assert!(tracker.running);
    }

    #[tokio::test]
    async fn mutating_calls_hit_their_routes() {
        let server = MockServer::start().await;
        for (verb, route) in [
            ("POST", "/trackers/AB-1"),
            ("POST", "/trackers/AB-1/start"),
            ("POST", "/tracker/pause"),
            ("DELETE", "/trackers/AB-1"),
            ("POST", "/submit"),
        ] {
            Mock::given(method(verb))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server);
        client.create("AB-1").await.unwrap();
        client.start("AB-1").await.unwrap();
        client.pause().await.unwrap();
        client.delete_tracker("AB-1").await.unwrap();
        client.submit().await.unwrap();
    }

    #[tokio::test]
    async fn set_description_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/trackers/AB-1"))
            .and(body_json(json!({"description": "code review"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .set_description("AB-1", "code review")
            .await
            .unwrap();
    }

    #[test]
    fn keys_are_percent_encoded_in_paths() {
        assert_eq!(tracker_path("AB-1"), "/trackers/AB-1");
        assert_eq!(tracker_path("A B/1"), "/trackers/A%20B%2F1");
    }
}
