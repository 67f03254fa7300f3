// Wire types for the product REST API.
//
// The API emits numeric ids, but nothing downstream relies on that:
// `ProductId` accepts numbers or strings and is opaque to callers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Server-assigned product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.trim().to_owned())
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<u64> for ProductId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self::from(n),
            RawId::Text(s) => Self::from(s),
        })
    }
}

/// Product as returned by every read and write endpoint.
///
/// Create/update responses echo only the submitted fields plus `id`,
/// so everything except `id` tolerates absence.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Option<RatingResponse>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RatingResponse {
    pub rate: f64,
    pub count: u32,
}

/// Request body for `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductBody {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_decode_to_the_same_value() {
        let a: ProductId = serde_json::from_str("7").unwrap();
        let b: ProductId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "7");
    }

    #[test]
    fn sparse_create_response_decodes() {
        let resp: ProductResponse =
            serde_json::from_str(r#"{"id":21,"title":"Lamp","price":9.5}"#).unwrap();
        assert_eq!(resp.id.as_str(), "21");
        assert_eq!(resp.title, "Lamp");
        assert!(resp.category.is_empty());
        assert!(resp.rating.is_none());
    }
}
