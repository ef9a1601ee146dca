//! Message extraction from template syntax trees.
//!
//! Walks parsed templates depth-first and records every translatable
//! literal into a [`MessageCatalog`](crate::core::data::MessageCatalog),
//! keyed by domain.

mod extractor;

pub use extractor::{
    DEFAULT_DOMAIN, DEFAULT_MAX_DEPTH, DEFAULT_PREFIX, ExtractOptions, MessageExtractor,
    TRANS_FILTER, extract_domain, extract_message,
};
