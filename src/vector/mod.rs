//! In-process vector storage
//!
//! Reference provider and brute-force index used when no external vector
//! database is wired in.

mod config;
mod error;
mod index;
mod provider;

#[cfg(test)]
mod tests;

pub use config::{Distance, InMemoryProviderConfig};
pub use error::VectorError;
pub use index::{cosine_similarity, dot_product, euclidean_similarity, InMemoryIndex, VectorResult};
pub use provider::InMemoryVectorIoProvider;
