use serde::{Deserialize, Serialize};

use crate::address::{Address, AddressError};
use crate::product::{Product, ProductId};

/// A validated request to hand a product to a new owner.
///
/// Applying it only touches the local snapshot; nothing is written on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub product_id: ProductId,
    pub new_owner: Address,
    pub location: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("no product selected")]
    MissingProduct,
    #[error("new owner address is required")]
    MissingOwner,
    #[error("invalid new owner address: {0}")]
    InvalidOwner(#[from] AddressError),
    #[error("product #{0} is not in the current snapshot")]
    UnknownProduct(ProductId),
}

impl TransferRequest {
    /// Validate raw form input.
    pub fn parse(
        product_id: Option<ProductId>,
        new_owner: &str,
        location: &str,
        note: &str,
    ) -> Result<Self, TransferError> {
        let product_id = product_id.ok_or(TransferError::MissingProduct)?;
        let new_owner = new_owner.trim();
        if new_owner.is_empty() {
            return Err(TransferError::MissingOwner);
        }
        let new_owner: Address = new_owner.parse()?;
        Ok(Self {
            product_id,
            new_owner,
            location: trimmed(location),
            note: trimmed(note),
        })
    }
}

fn trimmed(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Reassign the owner of the matching product in place.
pub fn apply_transfer(
    products: &mut [Product],
    request: &TransferRequest,
) -> Result<(), TransferError> {
    let product = products
        .iter_mut()
        .find(|p| p.id == request.product_id)
        .ok_or(TransferError::UnknownProduct(request.product_id))?;
    product.owner = request.new_owner;
    Ok(())
}
