//! Utility modules.

/// Per-domain locking used by registration and sync.
pub mod keyed_locks;
