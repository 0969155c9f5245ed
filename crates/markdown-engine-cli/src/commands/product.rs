use chrono::NaiveDate;
use clap::Args;
use markdown_engine_core::{Engine, Product};
use serde_json::Value;

use crate::input;

/// Arguments for single-product commands
#[derive(Args)]
pub struct ProductArgs {
    /// Path to a JSON file holding one product
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_discount(
    engine: &Engine,
    args: ProductArgs,
    date: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let product = read_product(&args)?;
    let result = engine.discount_recommendation(&product, date)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_metrics(
    engine: &Engine,
    args: ProductArgs,
    date: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let product = read_product(&args)?;
    let result = engine.performance_metrics(&product, date)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_restock(engine: &Engine, args: ProductArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let product = read_product(&args)?;
    let result = engine.restock_recommendation(&product)?;
    Ok(serde_json::to_value(result)?)
}

/// Accepts a bare product object or `{"product": {...}}`.
fn read_product(args: &ProductArgs) -> Result<Product, Box<dyn std::error::Error>> {
    let data = if let Some(ref path) = args.input {
        input::file::read_json_value(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("Provide --input file or pipe a product as JSON via stdin".into());
    };

    let data = match data {
        Value::Object(mut obj) if obj.contains_key("product") => obj
            .remove("product")
            .unwrap_or(Value::Null),
        other => other,
    };
    Ok(serde_json::from_value(data)?)
}
