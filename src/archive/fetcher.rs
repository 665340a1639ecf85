use crate::archive::error::FetchError;
use crate::types::query::ArchiveQuery;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Issues the archive GET request and hands back the raw body.
pub struct ArchiveFetcher {
    endpoint: String,
    client: Client,
}

impl ArchiveFetcher {
    /// Creates a fetcher with a fresh HTTP client.
    ///
    /// Without a `timeout` a stalled server blocks the request forever.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<ArchiveFetcher, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetchError::ClientBuild)?;
        Ok(Self::with_client(endpoint, client))
    }

    pub fn with_client(endpoint: &str, client: Client) -> ArchiveFetcher {
        ArchiveFetcher {
            endpoint: endpoint.to_string(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one GET with the query's parameters and returns the response body.
    ///
    /// The HTTP status is only logged. An error status from the archive still
    /// carries a JSON body, which is returned like any other so that the caller
    /// fails on its contents instead.
    pub async fn fetch(&self, query: &ArchiveQuery) -> Result<String, FetchError> {
        let pairs = query.to_query_pairs();
        debug!("Archive query parameters: {:?}", pairs);

        let request = self
            .client
            .get(&self.endpoint)
            .query(&pairs)
            .build()
            .map_err(|e| FetchError::NetworkRequest(self.endpoint.clone(), e))?;
        let url = request.url().to_string();
        info!("Requesting archive data from {}", url);

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Archive responded with HTTP {} for {}", status, url);
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::BodyRead(url.clone(), e))?;
        info!("Received {} bytes (HTTP {})", body.len(), status.as_u16());
        Ok(body)
    }
}

pub fn parse_response(body: &str) -> Result<Value, FetchError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_server::{local_client, serve_once};
    use crate::types::query::{ArchiveQuery, TemperatureUnit};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_fetch_sends_repeated_daily_keys() -> Result<(), Box<dyn std::error::Error>> {
        let (endpoint, server) = serve_once("HTTP/1.1 200 OK", r#"{"daily":{}}"#).await?;
        let fetcher = ArchiveFetcher::with_client(&endpoint, local_client()?);

        let body = fetcher.fetch(&ArchiveQuery::default()).await?;
        assert_eq!(body, r#"{"daily":{}}"#);

        let request = server.await?;
        let request_line = request.lines().next().unwrap_or_default();
        assert!(request_line.starts_with("GET /v1/archive?"));
        assert!(request_line.contains("latitude=38.5816"));
        assert!(request_line.contains("longitude=-121.4944"));
        assert!(request_line.contains("start_date=1940-01-01"));
        assert!(request_line.contains("end_date=2024-12-31"));
        assert!(request_line.contains(
            "daily=weather_code&daily=temperature_2m_max&daily=temperature_2m_min&daily=temperature_2m_mean"
        ));
        assert!(request_line.contains("temperature_unit=fahrenheit"));
        assert!(request_line.contains("timezone=America%2FLos_Angeles"));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_passes_error_status_body_through() -> Result<(), Box<dyn std::error::Error>>
    {
        let error_body = r#"{"error":true,"reason":"Parameter 'start_date' is out of allowed range"}"#;
        let (endpoint, server) = serve_once("HTTP/1.1 400 Bad Request", error_body).await?;
        let fetcher = ArchiveFetcher::with_client(&endpoint, local_client()?);

        let query = ArchiveQuery::builder()
            .start_date(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap())
            .temperature_unit(TemperatureUnit::Celsius)
            .build();
        let body = fetcher.fetch(&query).await?;
        assert_eq!(body, error_body);

        let request = server.await?;
        assert!(request.contains("start_date=1900-01-01"));
        assert!(request.contains("temperature_unit=celsius"));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() -> Result<(), Box<dyn std::error::Error>> {
        // Bind and drop to get a port nothing listens on.
        let port = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
            listener.local_addr()?.port()
        };
        let fetcher =
            ArchiveFetcher::with_client(&format!("http://127.0.0.1:{port}/v1/archive"), local_client()?);

        let result = fetcher.fetch(&ArchiveQuery::default()).await;
        assert!(matches!(result, Err(FetchError::NetworkRequest(..))));
        Ok(())
    }

    #[test]
    fn test_new_with_timeout() -> Result<(), FetchError> {
        let fetcher = ArchiveFetcher::new(ARCHIVE_URL, Some(Duration::from_secs(30)))?;
        assert_eq!(fetcher.endpoint(), ARCHIVE_URL);
        Ok(())
    }

    #[test]
    fn test_parse_response_rejects_invalid_json() {
        assert!(matches!(parse_response(""), Err(FetchError::JsonParse(_))));
        assert!(matches!(
            parse_response("<html>502 Bad Gateway</html>"),
            Err(FetchError::JsonParse(_))
        ));
    }

    #[test]
    fn test_parse_response_keeps_key_order() -> Result<(), FetchError> {
        let body = r#"{"latitude":38.6,"longitude":-121.5,"daily_units":{"time":"iso8601"},"daily":{}}"#;
        let parsed = parse_response(body)?;
        let keys: Vec<&str> = parsed
            .as_object()
            .map(|object| object.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["latitude", "longitude", "daily_units", "daily"]);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires network access to archive-api.open-meteo.com"]
    async fn test_fetch_live_archive() -> Result<(), Box<dyn std::error::Error>> {
        let fetcher = ArchiveFetcher::new(ARCHIVE_URL, Some(Duration::from_secs(60)))?;
        let query = ArchiveQuery::builder()
            .start_date(NaiveDate::from_ymd_opt(2024, 12, 28).unwrap())
            .build();
        let parsed = parse_response(&fetcher.fetch(&query).await?)?;
        let time = parsed["daily"]["time"].as_array().map(Vec::len);
        assert_eq!(time, Some(4));
        Ok(())
    }
}
