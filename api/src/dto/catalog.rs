use serde::{Deserialize, Serialize};
use validator::Validate;

use mp_core::domain::entities::{NewProduct, ProductPatch};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(max = 200))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    #[validate(range(min = 1, max = 100000000000i64))]
    pub price_cents: i64,

    #[validate(range(min = 0, max = 1000000))]
    pub stock: i32,

    #[validate(length(max = 512))]
    pub image_url: Option<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        NewProduct {
            name: request.name,
            description: request.description,
            price_cents: request.price_cents,
            stock: request.stock,
            image_url: request.image_url,
        }
    }
}

/// Partial update; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 100000000000i64))]
    pub price_cents: Option<i64>,

    #[validate(range(min = 0, max = 1000000))]
    pub stock: Option<i32>,

    #[validate(length(max = 512))]
    pub image_url: Option<String>,

    pub is_active: Option<bool>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(request: UpdateProductRequest) -> Self {
        ProductPatch {
            name: request.name,
            description: request.description,
            price_cents: request.price_cents,
            stock: request.stock,
            image_url: request.image_url,
            is_active: request.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use mp_core::domain::entities::{MAX_PRICE_CENTS, MAX_STOCK};

    use super::*;

    #[test]
    fn test_create_product_request_is_camel_case() {
        let request: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "name": "Taza",
            "priceCents": 1250,
            "stock": 4
        }))
        .unwrap();
        let product = NewProduct::from(request);
        assert_eq!(product.price_cents, 1250);
        assert!(product.description.is_empty());
        assert!(product.image_url.is_none());
    }

    #[test]
    fn test_update_request_maps_only_present_fields() {
        let request: UpdateProductRequest =
            serde_json::from_value(serde_json::json!({ "isActive": false })).unwrap();
        let patch = ProductPatch::from(request);
        assert_eq!(patch.is_active, Some(false));
        assert!(patch.name.is_none());
        assert!(patch.price_cents.is_none());
    }

    #[test]
    fn test_price_and_stock_ranges() {
        let request: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "name": "Taza",
            "priceCents": MAX_PRICE_CENTS,
            "stock": MAX_STOCK
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let request: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "name": "Taza",
            "priceCents": i64::MAX / 2,
            "stock": 10
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: UpdateProductRequest =
            serde_json::from_value(serde_json::json!({ "stock": MAX_STOCK + 1 })).unwrap();
        assert!(request.validate().is_err());
    }
}
