//! Dictionary nodes

pub mod keys;

pub use keys::DictionaryKeysNodeFactory;
