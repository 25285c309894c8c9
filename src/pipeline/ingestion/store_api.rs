use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{rows_from_json_objects, TableSource};
use crate::domain::Table;
use crate::error::{EtlError, Result};

const API_KEY_HEADER: &str = "x-api-key";

/// Aggregates the per-store records served by the stores API
pub struct StoreApiSource {
    client: Client,
    base_url: String,
    api_key_env: String,
}

#[derive(Debug, Deserialize)]
struct StoreCount {
    number_stores: u64,
}

impl StoreApiSource {
    pub fn new(base_url: impl Into<String>, api_key_env: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key_env: api_key_env.into(),
        }
    }

    fn number_stores_url(&self) -> String {
        format!("{}/number_stores", self.base_url)
    }

    fn store_details_url(&self, index: u64) -> String {
        format!("{}/store_details/{}", self.base_url, index)
    }

    async fn get_json(&self, url: &str, api_key: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn number_of_stores(&self, api_key: &str) -> Result<u64> {
        let body = self.get_json(&self.number_stores_url(), api_key).await?;
        let count: StoreCount = serde_json::from_value(body)?;
        Ok(count.number_stores)
    }
}

#[async_trait]
impl TableSource for StoreApiSource {
    async fn fetch(&self) -> Result<Table> {
        let api_key = std::env::var(&self.api_key_env)?;
        let count = self.number_of_stores(&api_key).await?;
        info!(count, "Fetching store details");

        let mut stores: Vec<Map<String, Value>> = Vec::with_capacity(count as usize);
        for index in 0..count {
            let body = self.get_json(&self.store_details_url(index), &api_key).await?;
            match body {
                Value::Object(store) => stores.push(store),
                other => {
                    return Err(EtlError::Source {
                        source_name: self.describe(),
                        message: format!("store {} is not a JSON object: {}", index, other),
                    })
                }
            }
            debug!(index, "Fetched store details");
        }

        rows_from_json_objects(&stores)
    }

    fn describe(&self) -> String {
        format!("store api {}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_endpoint_urls() {
        let source = StoreApiSource::new("https://api.example.test/prod/", "STORE_API_KEY");
        assert_eq!(source.number_stores_url(), "https://api.example.test/prod/number_stores");
        assert_eq!(source.store_details_url(7), "https://api.example.test/prod/store_details/7");
    }

    #[test]
    fn test_parses_store_count() {
        let body = serde_json::json!({"statusCode": 200, "number_stores": 451});
        let count: StoreCount = serde_json::from_value(body).unwrap();
        assert_eq!(count.number_stores, 451);
    }

    #[tokio::test]
    async fn test_missing_api_key_variable_fails_before_any_request() {
        let source = StoreApiSource::new("http://127.0.0.1:9", "SALES_ETL_TEST_UNSET_KEY");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, EtlError::Env(_)));
    }
}
