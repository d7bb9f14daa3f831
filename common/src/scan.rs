use serde::{Deserialize, Serialize};

use crate::format::{format_date_from_seconds, format_price, shorten_address};
use crate::product::{Product, ProductId};
use crate::status::{classify, DisplayStatus};

/// The JSON document encoded into a product's QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanPayload {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<u64>,
}

impl ScanPayload {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            ingredients: product.ingredients.clone(),
            manufacture_date: product.manufacture_date,
            expiry_date: product.expiry_date,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("scan payload serialization cannot fail")
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// What a consumer sees after scanning a product's QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCard {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub status: DisplayStatus,
    pub created: String,
    pub manufactured: String,
    pub expires: String,
    pub owner: String,
    pub description: Option<String>,
    pub ingredients: Option<String>,
}

impl ScanCard {
    pub fn new(product: &Product, now_secs: u64) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: format_price(product.price),
            status: classify(product, now_secs),
            created: format_date_from_seconds(Some(product.created_at)),
            manufactured: format_date_from_seconds(product.manufacture_date),
            expires: format_date_from_seconds(product.expiry_date),
            owner: shorten_address(&product.owner.to_string()),
            description: product.description.clone(),
            ingredients: product.ingredients.clone(),
        }
    }
}
