//! Current conditions from OpenWeatherMap

use crate::lookup::{get_json, LookupError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Temperature and conditions at lookup time; never persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    /// Degrees Celsius
    pub temperature: f64,
    pub description: String,
}

pub struct WeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl WeatherClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>, base_url: &str) -> Self {
        Self {
            http,
            api_key: api_key.filter(|k| !k.is_empty()),
            endpoint: format!("{}/data/2.5/weather", base_url.trim_end_matches('/')),
        }
    }

    pub async fn current(&self, city: &str) -> Result<WeatherSnapshot, LookupError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LookupError::MissingKey("OpenWeatherMap"))?;

        let body: CurrentWeather = get_json(
            &self.http,
            &self.endpoint,
            &[("q", city), ("appid", api_key), ("units", "metric")],
        )
        .await?;

        let description = body
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| LookupError::Malformed("empty weather array".to_string()))?;

        Ok(WeatherSnapshot {
            temperature: body.main.temp,
            description,
        })
    }

    /// Lookup collapsed to absence, logged at debug level.
    pub async fn current_or_none(&self, city: &str) -> Option<WeatherSnapshot> {
        match self.current(city).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::debug!(city, error = %e, "No weather data");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainReading,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReading {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spawn_stub;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    fn client(base: &str, key: Option<&str>) -> WeatherClient {
        let http = crate::lookup::http_client(Duration::from_secs(5)).unwrap();
        WeatherClient::new(http, key.map(str::to_string), base)
    }

    #[tokio::test]
    async fn test_parses_temperature_and_description() {
        let app = Router::new().route(
            "/data/2.5/weather",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q["q"], "Paris");
                assert_eq!(q["appid"], "secret");
                assert_eq!(q["units"], "metric");
                Json(json!({
                    "main": {"temp": 18.25, "humidity": 60},
                    "weather": [{"main": "Clouds", "description": "broken clouds"}]
                }))
            }),
        );
        let base = spawn_stub(app).await;

        let snapshot = client(&base, Some("secret")).current("Paris").await.unwrap();
        assert_eq!(
            snapshot,
            WeatherSnapshot {
                temperature: 18.25,
                description: "broken clouds".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_absence() {
        let weather = client("http://127.0.0.1:9", None);
        assert!(matches!(
            weather.current("Paris").await,
            Err(LookupError::MissingKey(_))
        ));
        assert!(weather.current_or_none("Paris").await.is_none());
    }

    #[tokio::test]
    async fn test_empty_key_counts_as_missing() {
        let weather = client("http://127.0.0.1:9", Some(""));
        assert!(matches!(
            weather.current("Paris").await,
            Err(LookupError::MissingKey(_))
        ));
    }

    #[tokio::test]
    async fn test_network_error_is_absence() {
        let weather = client("http://127.0.0.1:9", Some("secret"));
        assert!(matches!(
            weather.current("Paris").await,
            Err(LookupError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_non_200_is_absence() {
        let app = Router::new().route(
            "/data/2.5/weather",
            get(|| async {
                let body = json!({"cod": "404", "message": "city not found"});
                (StatusCode::NOT_FOUND, Json(body))
            }),
        );
        let base = spawn_stub(app).await;

        assert!(matches!(
            client(&base, Some("secret")).current("Atlantis").await,
            Err(LookupError::Status(404))
        ));
    }

    #[tokio::test]
    async fn test_malformed_json_is_absence() {
        let app = Router::new().route(
            "/data/2.5/weather",
            get(|| async { "<html>oops</html>" }),
        );
        let base = spawn_stub(app).await;

        assert!(matches!(
            client(&base, Some("secret")).current("Paris").await,
            Err(LookupError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_fields_is_absence() {
        let app = Router::new().route(
            "/data/2.5/weather",
            get(|| async { Json(json!({"main": {"temp": 3.0}, "weather": []})) }),
        );
        let base = spawn_stub(app).await;

        assert!(matches!(
            client(&base, Some("secret")).current("Oslo").await,
            Err(LookupError::Malformed(_))
        ));
    }
}
