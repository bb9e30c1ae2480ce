/*
[INPUT]:  HTTP client configuration and Supabase endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST and Storage communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod rest;
pub mod storage;

pub use error::{AdapterError, Result};

pub use client::{ClientConfig, SupabaseClient};
