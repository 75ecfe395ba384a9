use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// A recorded user action on a product, the raw signal for preference.
///
/// `interaction_type` is kept as the raw stored string: the write path only
/// accepts the known types, but the trainer must tolerate whatever historical
/// rows contain (unknown types are weighted 1.0, not dropped).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub product_id: String,
    pub interaction_type: String,
    pub created_at: DateTime<Utc>,
}

/// Interaction types accepted by the record endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    View,
    Cart,
    Purchase,
}

impl InteractionType {
    /// Strict parse used for request validation. Unknown strings are rejected
    /// here even though the trainer would tolerate them in stored rows.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "view" => Some(Self::View),
            "cart" => Some(Self::Cart),
            "purchase" => Some(Self::Purchase),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Cart => "cart",
            Self::Purchase => "purchase",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog row as stored. `is_collected = true` marks a product that is no
/// longer available and must never be recommended.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: f64,
    pub is_collected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Display attributes returned by the recommendation queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub price: f64,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            price: product.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_type_parse() {
        assert_eq!(InteractionType::parse("view"), Some(InteractionType::View));
        assert_eq!(InteractionType::parse("cart"), Some(InteractionType::Cart));
        assert_eq!(
            InteractionType::parse("purchase"),
            Some(InteractionType::Purchase)
        );
        assert_eq!(InteractionType::parse("click"), None);
        assert_eq!(InteractionType::parse(""), None);
    }

    #[test]
    fn test_interaction_type_round_trip() {
        for kind in [
            InteractionType::View,
            InteractionType::Cart,
            InteractionType::Purchase,
        ] {
            assert_eq!(InteractionType::parse(kind.as_str()), Some(kind));
        }
    }
}
