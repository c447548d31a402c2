//! # Repository Module
//!
//! SQL lives here and nowhere else.
//!
//! - [`KeyValueRepository`](kv::KeyValueRepository) - the `kv_store` table

pub mod kv;
