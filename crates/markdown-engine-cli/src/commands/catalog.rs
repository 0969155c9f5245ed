use chrono::NaiveDate;
use clap::Args;
use markdown_engine_core::{Engine, Product};
use serde_json::Value;

use crate::input;

/// Arguments for catalog-wide commands
#[derive(Args)]
pub struct CatalogArgs {
    /// Path to a JSON file holding an array of products (or {"products": [...]})
    #[arg(long)]
    pub input: Option<String>,

    /// Keep only the N most urgent products in the ranked list
    #[arg(long)]
    pub top: Option<usize>,
}

pub fn run_portfolio(
    engine: &Engine,
    args: CatalogArgs,
    date: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let products = read_catalog(&args)?;
    let mut output = engine.analyze_portfolio(&products, date)?;
    if let Some(n) = args.top {
        output.result.products.truncate(n);
    }
    Ok(serde_json::to_value(output)?)
}

pub fn run_categories(
    engine: &Engine,
    args: CatalogArgs,
    date: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let products = read_catalog(&args)?;
    let output = engine.category_insights(&products, date)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_stats(engine: &Engine, args: CatalogArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let products = read_catalog(&args)?;
    Ok(serde_json::to_value(engine.catalog_stats(&products))?)
}

fn read_catalog(args: &CatalogArgs) -> Result<Vec<Product>, Box<dyn std::error::Error>> {
    let data = if let Some(ref path) = args.input {
        input::file::read_json_value(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("Provide --input file or pipe a product array as JSON via stdin".into());
    };

    let products = match data {
        Value::Array(_) => data,
        Value::Object(mut obj) => match obj.remove("products") {
            Some(list @ Value::Array(_)) => list,
            _ => return Err("JSON object must contain a 'products' array".into()),
        },
        _ => return Err("Expected a JSON array of products or object with 'products' key".into()),
    };
    let products: Vec<Product> = serde_json::from_value(products)?;
    tracing::debug!(count = products.len(), "catalog loaded");
    Ok(products)
}
