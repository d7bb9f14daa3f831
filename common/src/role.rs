use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::product::Product;

/// How the connected wallet relates to the product being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewerRole {
    /// No wallet connected.
    Viewer,
    /// Connected wallet holds the product.
    Owner,
    /// Connected wallet does not hold the product.
    Consumer,
}

/// Action offered on a product detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductAction {
    View,
    Transfer,
    Edit,
    Verify,
    OpenQr,
    Back,
}

impl ViewerRole {
    pub fn for_product(connected: Option<&Address>, product: &Product) -> Self {
        match connected {
            None => ViewerRole::Viewer,
            Some(addr) if product.is_owned_by(addr) => ViewerRole::Owner,
            Some(_) => ViewerRole::Consumer,
        }
    }

    pub fn actions(&self) -> &'static [ProductAction] {
        match self {
            ViewerRole::Viewer => &[ProductAction::View],
            ViewerRole::Owner => &[ProductAction::Transfer, ProductAction::Edit],
            ViewerRole::Consumer => &[
                ProductAction::Verify,
                ProductAction::OpenQr,
                ProductAction::Back,
            ],
        }
    }
}
