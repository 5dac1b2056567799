//! Catalog models: categories and products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use techhub_core::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub category_name: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category row annotated with its live product count, for the list endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    pub id: CategoryId,
    pub category_name: String,
    pub images: Vec<String>,
    pub product_count: i64,
}

/// Allow-listed category create/update payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryInput {
    pub category_name: String,
    /// Uploaded image filenames; empty on update means "keep existing".
    #[serde(default)]
    pub images: Vec<String>,
}

/// Structured product specifications.
///
/// An explicit field set rather than free-form JSON, so nothing a client
/// sends can land in the document unreviewed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Specifications {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connectivity: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
}

/// A catalog product.
///
/// `price` is the selling price after any discount was applied at write time;
/// `old_price` keeps the list price for display while a discount is active.
/// `rating`/`review_count` are maintained by the review workflow and never
/// written by catalog endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    pub description: Option<String>,
    pub category_id: CategoryId,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub old_price: Option<Decimal>,
    pub discount: i32,
    pub brand: String,
    pub model: Option<String>,
    pub specifications: Json<Specifications>,
    pub in_stock: i32,
    pub total_sold: i32,
    pub images: Vec<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub rating: Decimal,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Allow-listed product create/update payload.
///
/// `price` here is the list price; the stored selling price is derived from
/// it and `discount` on every write.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductInput {
    pub product_name: String,
    pub description: Option<String>,
    pub category: CategoryId,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(default)]
    pub discount: u32,
    pub brand: String,
    pub model: Option<String>,
    #[serde(default)]
    pub specifications: Specifications,
    #[serde(default)]
    pub in_stock: i32,
    /// Uploaded image filenames; empty on update means "keep existing".
    #[serde(default)]
    pub images: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_specifications_reject_unknown_fields() {
        let err = serde_json::from_str::<Specifications>(r#"{"gpu": "RTX 4060"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_specifications_camel_case_wire_form() {
        let specs: Specifications = serde_json::from_str(
            r#"{"processor": "Ryzen 7", "operatingSystem": "Windows 11", "connectivity": ["WiFi 6", "BT 5.3"]}"#,
        )
        .unwrap();
        assert_eq!(specs.processor.as_deref(), Some("Ryzen 7"));
        assert_eq!(specs.operating_system.as_deref(), Some("Windows 11"));
        assert_eq!(specs.connectivity.len(), 2);

        let json = serde_json::to_value(&specs).unwrap();
        assert!(json.get("operatingSystem").is_some());
        // Unset fields stay out of the document entirely
        assert!(json.get("memory").is_none());
    }

    #[test]
    fn test_product_input_rejects_stray_fields() {
        // A client must not be able to smuggle aggregate fields into a write
        let err = serde_json::from_str::<ProductInput>(
            r#"{"productName": "X", "category": 1, "price": "10", "brand": "Acme", "rating": "5.0"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_product_input_minimal() {
        let input: ProductInput = serde_json::from_str(
            r#"{"productName": "Mouse", "category": 2, "price": "24.99", "brand": "Logi"}"#,
        )
        .unwrap();
        assert_eq!(input.discount, 0);
        assert_eq!(input.in_stock, 0);
        assert!(input.images.is_empty());
        assert_eq!(input.specifications, Specifications::default());
    }
}
