//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Content generators (OpenAI, mock)
//! - `http` - axum REST surface
//! - `postgres` - PostgreSQL survey store
//! - `storage` - In-memory and YAML file survey stores

pub mod ai;
pub mod http;
pub mod postgres;
pub mod storage;
