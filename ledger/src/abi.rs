//! Contract ABI word codec.
//!
//! Covers the subset the registry contract uses: unsigned integers, addresses,
//! strings, dynamic arrays and tuples. Values are 32-byte big-endian words;
//! dynamic values sit in the tail and are referenced by an offset in the head.

use tracechain_common::address::Address;

pub const WORD: usize = 32;

/// One raw 32-byte ABI word (big-endian).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Word(pub [u8; WORD]);

impl Word {
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; WORD];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Word(bytes)
    }

    /// `None` when the value needs more than 64 bits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(low))
    }

    fn fits_bits(&self, bits: u16) -> bool {
        let zero_prefix = (256 - usize::from(bits).min(256)) / 8;
        self.0[..zero_prefix].iter().all(|b| *b == 0)
    }
}

/// Declared type of a parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// `uintN`, N a multiple of 8 up to 256.
    Uint(u16),
    Address,
    String,
    Array(Box<ParamKind>),
    Tuple(Vec<ParamKind>),
}

impl ParamKind {
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamKind::String | ParamKind::Array(_) => true,
            ParamKind::Tuple(kinds) => kinds.iter().any(ParamKind::is_dynamic),
            ParamKind::Uint(_) | ParamKind::Address => false,
        }
    }

    fn head_len(&self) -> usize {
        match self {
            ParamKind::Tuple(kinds) if !self.is_dynamic() => {
                kinds.iter().map(ParamKind::head_len).sum()
            }
            _ => WORD,
        }
    }
}

/// A decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Uint(Word),
    Address(Address),
    String(String),
    Array(Vec<Token>),
    Tuple(Vec<Token>),
}

impl Token {
    pub fn uint(value: u64) -> Self {
        Token::Uint(Word::from_u64(value))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Uint(_) => "uint",
            Token::Address(_) => "address",
            Token::String(_) => "string",
            Token::Array(_) => "array",
            Token::Tuple(_) => "tuple",
        }
    }

    fn is_dynamic(&self) -> bool {
        match self {
            Token::String(_) | Token::Array(_) => true,
            Token::Tuple(items) => items.iter().any(Token::is_dynamic),
            Token::Uint(_) | Token::Address(_) => false,
        }
    }

    fn head_len(&self) -> usize {
        match self {
            Token::Tuple(items) if !self.is_dynamic() => items.iter().map(Token::head_len).sum(),
            _ => WORD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    #[error("data too short: need {needed} bytes at offset {offset}, have {len}")]
    ShortBuffer {
        offset: usize,
        needed: usize,
        len: usize,
    },
    #[error("offset or length at byte {at} points outside the data")]
    BadOffset { at: usize },
    #[error("value at byte {at} does not fit uint{bits}")]
    UintRange { at: usize, bits: u16 },
    #[error("address at byte {at} has non-zero padding")]
    AddressPadding { at: usize },
    #[error("string at byte {at} is not valid UTF-8")]
    InvalidUtf8 { at: usize },
}

/// Decode a top-level parameter list (a function's return values).
pub fn decode(kinds: &[ParamKind], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode_tuple(kinds, data, 0)
}

fn decode_tuple(kinds: &[ParamKind], data: &[u8], base: usize) -> Result<Vec<Token>, AbiError> {
    let mut head = base;
    let mut tokens = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let token = if kind.is_dynamic() {
            let offset = usize_at(data, head)?;
            let pos = base
                .checked_add(offset)
                .ok_or(AbiError::BadOffset { at: head })?;
            decode_at(kind, data, pos)?
        } else {
            decode_at(kind, data, head)?
        };
        head += kind.head_len();
        tokens.push(token);
    }
    Ok(tokens)
}

fn decode_at(kind: &ParamKind, data: &[u8], pos: usize) -> Result<Token, AbiError> {
    match kind {
        ParamKind::Uint(bits) => {
            let word = word_at(data, pos)?;
            if !word.fits_bits(*bits) {
                return Err(AbiError::UintRange { at: pos, bits: *bits });
            }
            Ok(Token::Uint(word))
        }
        ParamKind::Address => {
            let word = word_at(data, pos)?;
            if word.0[..12].iter().any(|b| *b != 0) {
                return Err(AbiError::AddressPadding { at: pos });
            }
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(&word.0[12..]);
            Ok(Token::Address(Address(bytes)))
        }
        ParamKind::String => {
            let len = usize_at(data, pos)?;
            let start = pos + WORD;
            let bytes = start
                .checked_add(len)
                .and_then(|end| data.get(start..end))
                .ok_or(AbiError::ShortBuffer {
                    offset: start,
                    needed: len,
                    len: data.len(),
                })?;
            String::from_utf8(bytes.to_vec())
                .map(Token::String)
                .map_err(|_| AbiError::InvalidUtf8 { at: pos })
        }
        ParamKind::Array(inner) => {
            let len = usize_at(data, pos)?;
            if len > data.len() / WORD {
                return Err(AbiError::BadOffset { at: pos });
            }
            let kinds = vec![(**inner).clone(); len];
            decode_tuple(&kinds, data, pos + WORD).map(Token::Array)
        }
        ParamKind::Tuple(kinds) => decode_tuple(kinds, data, pos).map(Token::Tuple),
    }
}

fn word_at(data: &[u8], pos: usize) -> Result<Word, AbiError> {
    let bytes = pos
        .checked_add(WORD)
        .and_then(|end| data.get(pos..end))
        .ok_or(AbiError::ShortBuffer {
            offset: pos,
            needed: WORD,
            len: data.len(),
        })?;
    let mut word = [0u8; WORD];
    word.copy_from_slice(bytes);
    Ok(Word(word))
}

/// Read a word used as an offset or length; it must land inside `data`.
fn usize_at(data: &[u8], pos: usize) -> Result<usize, AbiError> {
    word_at(data, pos)?
        .to_u64()
        .and_then(|v| usize::try_from(v).ok())
        .filter(|v| *v <= data.len())
        .ok_or(AbiError::BadOffset { at: pos })
}

/// Encode a top-level parameter list.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    encode_tuple(tokens)
}

/// Calldata for a function call: 4-byte selector followed by the arguments.
pub fn encode_call(selector: [u8; 4], args: &[Token]) -> Vec<u8> {
    let mut out = selector.to_vec();
    out.extend(encode(args));
    out
}

fn encode_tuple(tokens: &[Token]) -> Vec<u8> {
    let head_len: usize = tokens.iter().map(Token::head_len).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for token in tokens {
        if token.is_dynamic() {
            head.extend(Word::from_u64((head_len + tail.len()) as u64).0);
            tail.extend(encode_token(token));
        } else {
            head.extend(encode_token(token));
        }
    }
    head.extend(tail);
    head
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Uint(word) => word.0.to_vec(),
        Token::Address(addr) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(addr.as_bytes());
            word.to_vec()
        }
        Token::String(s) => {
            let mut out = Word::from_u64(s.len() as u64).0.to_vec();
            out.extend(s.as_bytes());
            let padding = (WORD - s.len() % WORD) % WORD;
            out.resize(out.len() + padding, 0);
            out
        }
        Token::Array(items) => {
            let mut out = Word::from_u64(items.len() as u64).0.to_vec();
            out.extend(encode_tuple(items));
            out
        }
        Token::Tuple(items) => encode_tuple(items),
    }
}
