//! Core repository components
//!
//! The building blocks an operating repository is assembled from:
//!
//! - `object_store`: Append-only content-addressed object storage
//! - `ref_table`: The authoritative name-to-tip mapping
//! - `repository`: High-level coordination and shared state
//! - `workspace`: Working-state materialization on checkout

pub mod object_store;
pub mod ref_table;
pub mod repository;
pub mod workspace;
