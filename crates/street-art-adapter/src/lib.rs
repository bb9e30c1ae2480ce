/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Supabase adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod gateway;
pub mod http;
pub mod memory;
pub mod types;

// Re-export the gateway capabilities
pub use gateway::{BlobStoreGateway, PersistenceGateway};

// Re-export commonly used types from http
pub use http::{AdapterError, ClientConfig, Result, SupabaseClient};

pub use memory::{InMemoryGateway, StoredObject};

// Re-export all types
pub use types::*;
