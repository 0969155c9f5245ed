use chrono::NaiveDate;
use markdown_engine_core::{Engine, EngineConfig, Product};
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ProductRequest {
    product: Product,
    reference_date: Option<NaiveDate>,
    #[serde(default)]
    config: Option<EngineConfig>,
}

#[derive(Deserialize)]
struct CatalogRequest {
    products: Vec<Product>,
    reference_date: Option<NaiveDate>,
    #[serde(default)]
    config: Option<EngineConfig>,
}

fn engine(config: Option<EngineConfig>) -> NapiResult<Engine> {
    Engine::new(config.unwrap_or_default()).map_err(to_napi_error)
}

fn reference_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| chrono::Local::now().date_naive())
}

// ---------------------------------------------------------------------------
// Single product
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_discount(input_json: String) -> NapiResult<String> {
    let req: ProductRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine(req.config)?
        .discount_recommendation(&req.product, reference_date(req.reference_date))
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn performance_metrics(input_json: String) -> NapiResult<String> {
    let req: ProductRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine(req.config)?
        .performance_metrics(&req.product, reference_date(req.reference_date))
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn restock_recommendation(input_json: String) -> NapiResult<String> {
    let req: ProductRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine(req.config)?
        .restock_recommendation(&req.product)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_portfolio(input_json: String) -> NapiResult<String> {
    let req: CatalogRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine(req.config)?
        .analyze_portfolio(&req.products, reference_date(req.reference_date))
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn category_insights(input_json: String) -> NapiResult<String> {
    let req: CatalogRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine(req.config)?
        .category_insights(&req.products, reference_date(req.reference_date))
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn catalog_stats(input_json: String) -> NapiResult<String> {
    let req: CatalogRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine(req.config)?.catalog_stats(&req.products);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Built-in engine configuration, for display and as a template.
#[napi]
pub fn default_config() -> NapiResult<String> {
    serde_json::to_string(&EngineConfig::default()).map_err(to_napi_error)
}
