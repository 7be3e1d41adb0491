// file: src/utils/mod.rs
// version: 1.0.0
// guid: 4ba3ea96-309b-4da3-96f4-04582ba2291a

//! Utility modules for hashing and text layout

pub mod crypto;
pub mod table;

pub use crypto::CryptoUtils;
pub use table::KeyValue;
