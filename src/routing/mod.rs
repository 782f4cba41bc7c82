//! Routing table and provider seams
//!
//! The router depends only on these traits. `InMemoryRoutingTable` is a
//! reference implementation for embedding the router and for tests.

mod memory;
mod provider;
mod table;


pub use memory::InMemoryRoutingTable;
pub use provider::{EmbeddingIndex, VectorIoProvider};
pub use table::{ObjectKind, RoutableObject, RoutingTable};
