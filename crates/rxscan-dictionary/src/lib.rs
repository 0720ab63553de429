#![deny(unsafe_code)]

pub mod error;
pub mod index;
pub mod record;

pub use crate::error::DictionaryError;
pub use crate::index::{DictionaryIndex, looks_like_product_code};
pub use crate::record::parse_record;
