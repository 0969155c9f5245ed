use serde_json::{Map, Value};

/// Flatten a ranked product list into one row per product for tabular
/// formats. Returns None when the result carries no product list.
pub fn product_rows(result: &Value) -> Option<Vec<Value>> {
    let products = result.get("products")?.as_array()?;
    Some(products.iter().map(product_row).collect())
}

fn product_row(metrics: &Value) -> Value {
    let mut row = Map::new();
    let mut copy = |key: &str, value: Option<&Value>| {
        row.insert(key.to_string(), value.cloned().unwrap_or(Value::Null));
    };

    copy("product_id", metrics.get("product_id"));
    copy("name", metrics.get("name"));
    copy("category", metrics.get("category"));
    copy("days_to_expiry", metrics.get("days_to_expiry"));
    copy("urgency", metrics.pointer("/recommendation/urgency"));
    copy("action", metrics.pointer("/recommendation/action"));
    copy("discount", metrics.pointer("/recommendation/discount"));
    copy("potential_loss", metrics.pointer("/financials/potential_loss"));
    copy("stock_status", metrics.pointer("/restock/stock_status"));
    copy("performance_score", metrics.get("performance_score"));

    Value::Object(row)
}

/// Category rollups keyed by name become one row each.
pub fn category_rows(result: &Value) -> Option<Vec<Value>> {
    let map = result.as_object()?;
    let rows: Vec<Value> = map
        .values()
        .filter(|v| v.get("product_count").is_some())
        .cloned()
        .collect();
    if rows.is_empty() || rows.len() != map.len() {
        return None;
    }
    Some(rows)
}
