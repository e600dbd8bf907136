//! Calorie lookup backed by the OpenFoodFacts public API.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const SEARCH_URL: &str = "https://world.openfoodfacts.org/cgi/search.pl";

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub products: Vec<ProductData>,
}

#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub product_name: Option<String>,
    pub nutriments: Option<Nutriments>,
}

#[derive(Debug, Deserialize)]
pub struct Nutriments {
    #[serde(rename = "energy-kcal_100g")]
    pub energy_kcal_100g: Option<f64>,
}

/// Calorie estimate for a food name, per 100g
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieEstimate {
    /// Product name as known to OpenFoodFacts
    pub name: String,
    pub calories_per_100g: f64,
}

/// Pick the first search result carrying both a name and a kcal figure
#[must_use]
pub fn best_match(products: Vec<ProductData>) -> Option<CalorieEstimate> {
    products.into_iter().find_map(|p| {
        let name = p.product_name.filter(|n| !n.is_empty())?;
        let calories = p.nutriments?.energy_kcal_100g?;
        Some(CalorieEstimate {
            name,
            calories_per_100g: calories,
        })
    })
}

/// HTTP client for OpenFoodFacts searches
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    client: reqwest::Client,
}

impl OpenFoodFactsClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "lifemon-server/{} (health tracker)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self { client }
    }

    /// Look up a calorie estimate for a food name
    pub async fn estimate_calories(&self, query: &str) -> Result<Option<CalorieEstimate>> {
        let resp = self
            .client
            .get(SEARCH_URL)
            .query(&[("search_terms", query), ("json", "1"), ("page_size", "5")])
            .send()
            .await
            .context("Failed to reach OpenFoodFacts API")?;

        let data: SearchResponse = resp
            .json()
            .await
            .context("Failed to parse OpenFoodFacts search response")?;

        Ok(best_match(data.products))
    }
}

impl Default for OpenFoodFactsClient {
    fn default() -> Self {
        Self::new()
    }
}
