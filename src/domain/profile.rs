use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::confidence::Confidence;

pub const UNKNOWN_NAME: &str = "Unknown Name";
pub const COMPANY_PLACEHOLDER: &str = "LinkedIn Profile";

/// One candidate lead pulled out of a search result.
///
/// Clients send these back for enrichment, so reading one never fails on a null or
/// oddly typed field, and fields this struct doesn't know are carried in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    #[serde(deserialize_with = "lenient_number")]
    pub id: u32,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(deserialize_with = "lenient_string")]
    pub industry: String,
    #[serde(deserialize_with = "lenient_string")]
    pub profile_url: String,
    #[serde(deserialize_with = "lenient_optional_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_optional_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_optional_string")]
    pub snippet: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub confidence: Confidence,
    #[serde(deserialize_with = "lenient_number")]
    pub relevance_score: u8,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + Default,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(number.and_then(|n| T::try_from(n).ok()).unwrap_or_default())
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(T::deserialize(Value::deserialize(deserializer)?).unwrap_or_default())
}

impl Profile {
    /// Company worth sending to a lookup, i.e. not the placeholder.
    pub fn known_company(&self) -> Option<&str> {
        let company = self.company.trim();
        match company.is_empty() || company == COMPANY_PLACEHOLDER {
            true => None,
            false => Some(company),
        }
    }

    /// First token and the remainder of the name.
    pub fn split_name(&self) -> (&str, &str) {
        match self.name.trim().split_once(' ') {
            Some((first, last)) => (first, last.trim()),
            None => (self.name.trim(), ""),
        }
    }
}
