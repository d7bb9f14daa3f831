//! Fixed positional schema of the registry contract.
//!
//! `products(uint256)` returns
//! `(uint256 id, string name, string description, string ingredients,
//!   uint256 manufactureDate, uint256 expiryDate, uint256 price,
//!   address owner, uint8 status, uint256 createdAt)`
//! and `getProductHistory(uint256)` returns
//! `(uint8 action, address actor, string location, string note, uint256 timestamp)[]`.

use tracechain_common::address::Address;
use tracechain_common::history::{HistoryAction, HistoryEvent};
use tracechain_common::product::{non_empty, non_zero, Product, ProductId};

use crate::abi::{ParamKind, Token};
use crate::error::DecodeError;

/// `productCounter()`
pub const PRODUCT_COUNTER_SELECTOR: [u8; 4] = [0x1f, 0x16, 0x65, 0x3b];
/// `products(uint256)`
pub const PRODUCTS_SELECTOR: [u8; 4] = [0x7a, 0xcc, 0x0b, 0x20];
/// `getProductHistory(uint256)`
pub const PRODUCT_HISTORY_SELECTOR: [u8; 4] = [0x57, 0xa0, 0x96, 0xa1];

pub const PRODUCT_FIELDS: [&str; 10] = [
    "id",
    "name",
    "description",
    "ingredients",
    "manufactureDate",
    "expiryDate",
    "price",
    "owner",
    "status",
    "createdAt",
];

const HISTORY_FIELDS: [&str; 5] = ["action", "actor", "location", "note", "timestamp"];

/// Raw positional values of one record, before schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTuple(pub Vec<Token>);

pub fn product_return_kinds() -> Vec<ParamKind> {
    vec![
        ParamKind::Uint(256),
        ParamKind::String,
        ParamKind::String,
        ParamKind::String,
        ParamKind::Uint(256),
        ParamKind::Uint(256),
        ParamKind::Uint(256),
        ParamKind::Address,
        ParamKind::Uint(8),
        ParamKind::Uint(256),
    ]
}

pub fn history_entry_kind() -> ParamKind {
    ParamKind::Tuple(vec![
        ParamKind::Uint(8),
        ParamKind::Address,
        ParamKind::String,
        ParamKind::String,
        ParamKind::Uint(256),
    ])
}

pub fn history_return_kinds() -> Vec<ParamKind> {
    vec![ParamKind::Array(Box::new(history_entry_kind()))]
}

/// Decode a product tuple, checking arity and every position's kind first.
pub fn decode_product(tuple: &RecordTuple) -> Result<Product, DecodeError> {
    let fields = Fields::new(&tuple.0, &PRODUCT_FIELDS)?;
    Ok(Product {
        id: ProductId(fields.u64(0)?),
        name: fields.string(1)?,
        description: non_empty(fields.string(2)?),
        ingredients: non_empty(fields.string(3)?),
        manufacture_date: non_zero(fields.u64(4)?),
        expiry_date: non_zero(fields.u64(5)?),
        price: fields.u64(6)?,
        owner: fields.address(7)?,
        status: fields.u8(8)?,
        created_at: fields.u64(9)?,
    })
}

pub fn decode_history_event(tuple: &RecordTuple) -> Result<HistoryEvent, DecodeError> {
    let fields = Fields::new(&tuple.0, &HISTORY_FIELDS)?;
    Ok(HistoryEvent {
        action: HistoryAction::from_code(fields.u8(0)?),
        actor: fields.address(1)?,
        location: non_empty(fields.string(2)?),
        note: non_empty(fields.string(3)?),
        timestamp: fields.u64(4)?,
    })
}

/// Build the tuple the contract would return for `product`.
pub fn product_tuple(product: &Product) -> RecordTuple {
    RecordTuple(vec![
        Token::uint(product.id.0),
        Token::String(product.name.clone()),
        Token::String(product.description.clone().unwrap_or_default()),
        Token::String(product.ingredients.clone().unwrap_or_default()),
        Token::uint(product.manufacture_date.unwrap_or(0)),
        Token::uint(product.expiry_date.unwrap_or(0)),
        Token::uint(product.price),
        Token::Address(product.owner),
        Token::uint(u64::from(product.status)),
        Token::uint(product.created_at),
    ])
}

/// What the contract's mapping returns for an id that was never assigned.
pub fn vacant_tuple() -> RecordTuple {
    RecordTuple(vec![
        Token::uint(0),
        Token::String(String::new()),
        Token::String(String::new()),
        Token::String(String::new()),
        Token::uint(0),
        Token::uint(0),
        Token::uint(0),
        Token::Address(Address::ZERO),
        Token::uint(0),
        Token::uint(0),
    ])
}

pub fn history_tuple(event: &HistoryEvent) -> RecordTuple {
    RecordTuple(vec![
        Token::uint(u64::from(event.action.code())),
        Token::Address(event.actor),
        Token::String(event.location.clone().unwrap_or_default()),
        Token::String(event.note.clone().unwrap_or_default()),
        Token::uint(event.timestamp),
    ])
}

struct Fields<'a> {
    tokens: &'a [Token],
    names: &'static [&'static str],
}

impl<'a> Fields<'a> {
    fn new(tokens: &'a [Token], names: &'static [&'static str]) -> Result<Self, DecodeError> {
        if tokens.len() != names.len() {
            return Err(DecodeError::Arity {
                expected: names.len(),
                found: tokens.len(),
            });
        }
        Ok(Self { tokens, names })
    }

    fn mismatch(&self, position: usize, expected: &'static str) -> DecodeError {
        DecodeError::Kind {
            position,
            field: self.names[position],
            expected,
            found: self.tokens[position].kind_name(),
        }
    }

    fn u64(&self, position: usize) -> Result<u64, DecodeError> {
        match &self.tokens[position] {
            Token::Uint(word) => word.to_u64().ok_or(DecodeError::Overflow {
                field: self.names[position],
            }),
            _ => Err(self.mismatch(position, "uint")),
        }
    }

    fn u8(&self, position: usize) -> Result<u8, DecodeError> {
        let value = self.u64(position)?;
        u8::try_from(value).map_err(|_| DecodeError::Overflow {
            field: self.names[position],
        })
    }

    fn string(&self, position: usize) -> Result<String, DecodeError> {
        match &self.tokens[position] {
            Token::String(s) => Ok(s.clone()),
            _ => Err(self.mismatch(position, "string")),
        }
    }

    fn address(&self, position: usize) -> Result<Address, DecodeError> {
        match &self.tokens[position] {
            Token::Address(addr) => Ok(*addr),
            _ => Err(self.mismatch(position, "address")),
        }
    }
}
