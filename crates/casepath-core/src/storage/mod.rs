//! # Storage Module
//!
//! Disk-backed session storage using redb.

mod redb_store;

pub use redb_store::RedbStore;
