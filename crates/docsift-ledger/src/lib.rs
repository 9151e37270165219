//! Docsift Cleanup Ledger
//!
//! Durable bookkeeping for every upload: which backend holds the file, when
//! it expires, and whether the garbage collector has reclaimed it. Backed by
//! a single embedded SQLite database file created on first use.

pub mod ledger;

pub use ledger::CleanupLedger;
