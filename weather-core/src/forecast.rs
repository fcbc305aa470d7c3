use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::debug;

use crate::{
    error::{NotifierError, truncate_body},
    model::ForecastPeriod,
};

#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    /// Ordered forecast periods for a coordinate, soonest first.
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastPeriod>, NotifierError>;
}

/// api.weather.gov client.
///
/// Coordinates resolve to a gridpoint (`/points/{lat},{lon}`), whose document names the
/// forecast URL; there is no single-call shortcut.
#[derive(Debug, Clone)]
pub struct NwsForecastSource {
    http: Client,
    base_url: String,
}

impl NwsForecastSource {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn points_url(&self, latitude: f64, longitude: f64) -> String {
        // The API redirects on more than four decimal places.
        format!("{}/points/{:.4},{:.4}", self.base_url, latitude, longitude)
    }

    async fn get_text(&self, url: &str, what: &str) -> Result<String, NotifierError> {
        let res = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/geo+json")
            .send()
            .await
            .map_err(|e| NotifierError::Upstream(format!("failed to request {what}: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| NotifierError::Upstream(format!("failed to read {what} body: {e}")))?;

        if !status.is_success() {
            return Err(NotifierError::Upstream(format!(
                "{what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl ForecastSource for NwsForecastSource {
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastPeriod>, NotifierError> {
        let points_url = self.points_url(latitude, longitude);
        debug!(url = %points_url, "resolving gridpoint");
        let points = self.get_text(&points_url, "points").await?;
        let forecast_url = parse_forecast_url(&points)?;

        debug!(url = %forecast_url, "fetching forecast");
        let forecast = self.get_text(&forecast_url, "forecast").await?;
        let periods = parse_periods(&forecast)?;

        debug!(count = periods.len(), "forecast periods received");
        Ok(periods)
    }
}

#[derive(Debug, Deserialize)]
struct PointsProperties {
    forecast: String,
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

/// Extract `properties.forecast` from a points document.
pub fn parse_forecast_url(body: &str) -> Result<String, NotifierError> {
    let parsed: PointsResponse = serde_json::from_str(body)
        .map_err(|e| NotifierError::Upstream(format!("malformed points document: {e}")))?;

    if parsed.properties.forecast.is_empty() {
        return Err(NotifierError::Upstream(
            "points document has an empty forecast URL".to_string(),
        ));
    }

    Ok(parsed.properties.forecast)
}

/// Extract `properties.periods` from a forecast document, preserving order.
pub fn parse_periods(body: &str) -> Result<Vec<ForecastPeriod>, NotifierError> {
    let parsed: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| NotifierError::Upstream(format!("malformed forecast document: {e}")))?;

    Ok(parsed.properties.periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{self, TestServer};

    #[test]
    fn points_url_uses_four_decimals() {
        let src = NwsForecastSource::new(Client::new(), "https://api.weather.gov/");
        assert_eq!(
            src.points_url(40.5142, -88.9906),
            "https://api.weather.gov/points/40.5142,-88.9906"
        );
        assert_eq!(
            src.points_url(40.123456, -88.0),
            "https://api.weather.gov/points/40.1235,-88.0000"
        );
    }

    #[test]
    fn forecast_url_is_extracted() {
        let body = r#"{
            "properties": {
                "gridId": "ILX",
                "forecast": "https://api.weather.gov/gridpoints/ILX/74,84/forecast"
            }
        }"#;
        assert_eq!(
            parse_forecast_url(body).unwrap(),
            "https://api.weather.gov/gridpoints/ILX/74,84/forecast"
        );
    }

    #[test]
    fn missing_forecast_url_is_upstream_error() {
        let err = parse_forecast_url(r#"{"properties": {}}"#).unwrap_err();
        assert!(matches!(err, NotifierError::Upstream(_)));
    }

    #[test]
    fn non_json_points_is_upstream_error() {
        let err = parse_forecast_url("<html>bad gateway</html>").unwrap_err();
        assert!(err.to_string().contains("malformed points document"));
    }

    #[test]
    fn periods_keep_upstream_order() {
        let body = r#"{
            "properties": {
                "periods": [
                    {"number": 1, "name": "Tonight", "temperature": 58, "temperatureUnit": "F",
                     "shortForecast": "Clear", "detailedForecast": "Clear overnight"},
                    {"number": 2, "name": "Saturday", "temperature": 75, "temperatureUnit": "F",
                     "shortForecast": "Sunny", "detailedForecast": "Sunny, high near 75."}
                ]
            }
        }"#;
        let periods = parse_periods(body).unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].name, "Tonight");
        assert_eq!(periods[1].name, "Saturday");
        assert_eq!(periods[1].detailed_forecast, "Sunny, high near 75.");
    }

    #[test]
    fn period_missing_field_is_upstream_error() {
        let body = r#"{"properties": {"periods": [{"name": "Today", "temperature": 70}]}}"#;
        let err = parse_periods(body).unwrap_err();
        assert!(matches!(err, NotifierError::Upstream(_)));
    }

    #[test]
    fn empty_period_list_is_accepted() {
        let periods = parse_periods(r#"{"properties": {"periods": []}}"#).unwrap();
        assert!(periods.is_empty());
    }

    const POINTS_PATH: &str = "/points/40.5142,-88.9906";
    const FORECAST_PATH: &str = "/gridpoints/ILX/74,84/forecast";

    #[tokio::test]
    async fn fetch_follows_points_to_forecast_url() {
        let server = TestServer::start().await;
        server.route(
            POINTS_PATH,
            200,
            format!(r#"{{"properties": {{"forecast": "{}"}}}}"#, server.url(FORECAST_PATH)),
        );
        server.route(
            FORECAST_PATH,
            200,
            r#"{"properties": {"periods": [
                {"name": "Today", "temperature": 72, "temperatureUnit": "F",
                 "shortForecast": "Sunny", "detailedForecast": "Clear skies all day"},
                {"name": "Tonight", "temperature": 58, "temperatureUnit": "F",
                 "shortForecast": "Clear", "detailedForecast": "Clear overnight"}
            ]}}"#,
        );

        let src = NwsForecastSource::new(test_server::client(), server.base_url.clone());
        let periods = src.fetch_forecast(40.5142, -88.9906).await.unwrap();

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].name, "Today");
        assert_eq!(periods[1].detailed_forecast, "Clear overnight");

        let paths: Vec<_> = server.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec![POINTS_PATH, FORECAST_PATH]);
    }

    #[tokio::test]
    async fn points_failure_stops_before_forecast_hop() {
        let server = TestServer::start().await;
        server.route(POINTS_PATH, 503, r#"{"title": "Service Unavailable"}"#);

        let src = NwsForecastSource::new(test_server::client(), server.base_url.clone());
        let err = src.fetch_forecast(40.5142, -88.9906).await.unwrap_err();

        assert!(matches!(err, NotifierError::Upstream(_)));
        assert!(err.to_string().contains("503"));
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn forecast_failure_is_upstream_error() {
        let server = TestServer::start().await;
        server.route(
            POINTS_PATH,
            200,
            format!(r#"{{"properties": {{"forecast": "{}"}}}}"#, server.url(FORECAST_PATH)),
        );
        server.route(FORECAST_PATH, 500, r#"{"title": "Unexpected Problem"}"#);

        let src = NwsForecastSource::new(test_server::client(), server.base_url.clone());
        let err = src.fetch_forecast(40.5142, -88.9906).await.unwrap_err();

        assert!(matches!(err, NotifierError::Upstream(ref m) if m.contains("forecast")));
        assert_eq!(server.requests().len(), 2);
    }
}
