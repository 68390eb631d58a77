use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use super::resource::{Resource, ResourceKind};
use crate::validation::{positive_number, required_string, ValidationError};

/// Normalized payload accepted by product create and replace operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Display name, already trimmed and never blank.
    pub name: String,
    /// Unit price, strictly positive.
    pub price: f64,
}

/// Represents a product as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Product {
    type Input = ProductInput;

    const KIND: ResourceKind = ResourceKind::Product;

    fn id(&self) -> i32 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    /// `name` is checked before `price`, so a body failing both reports the name.
    fn validate(body: &Value) -> Result<ProductInput, ValidationError> {
        let name = required_string(body, "name")?;
        let price = positive_number(body, "price")?;
        Ok(ProductInput { name, price })
    }

    fn from_input(id: i32, input: ProductInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            price: input.price,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, input: ProductInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.price = input.price;
        self.updated_at = now;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_product_validation_normalizes() {
        let input = Product::validate(&json!({ "name": "  iPhone 15 Pro ", "price": 1199.99 })).unwrap();
        assert_eq!(
            input,
            ProductInput {
                name: "iPhone 15 Pro".to_string(),
                price: 1199.99
            }
        );
    }

    #[test]
    fn test_product_validation_failures() {
        assert_eq!(
            Product::validate(&json!({ "price": 10 })),
            Err(ValidationError::MissingOrEmptyField("name"))
        );
        assert_eq!(
            Product::validate(&json!({ "name": "   ", "price": 10 })),
            Err(ValidationError::MissingOrEmptyField("name"))
        );
        assert_eq!(
            Product::validate(&json!({ "name": "Casque", "price": 0 })),
            Err(ValidationError::InvalidPositiveNumber("price"))
        );
        assert_eq!(
            Product::validate(&json!({ "name": "Casque", "price": "19.99" })),
            Err(ValidationError::InvalidPositiveNumber("price"))
        );
        // Name is reported first when both fields are wrong.
        assert_eq!(
            Product::validate(&json!({ "name": "", "price": -1 })),
            Err(ValidationError::MissingOrEmptyField("name"))
        );
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let now = Utc::now();
        let product = Product::from_input(
            7,
            ProductInput {
                name: "MacBook Air M2".to_string(),
                price: 1299.99,
            },
            now,
        );
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["price"], 1299.99);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
