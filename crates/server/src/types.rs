//! Request bodies.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Every JSON endpoint wraps its payload in `data`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct QuestionPayload {
    pub question: String,
    #[serde(default, deserialize_with = "lenient_selector")]
    pub scenario: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TextPayload {
    pub text: String,
}

/// Accept a number or a numeric string; anything else means "not given".
fn lenient_selector<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
