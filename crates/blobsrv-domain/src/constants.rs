//! Domain constants

/// Declared-type prefix that forces resolution against the storage table
pub const STORAGE_TYPE_PREFIX: &str = "storage-";

/// Separator used when rendering construction chains
pub const CHAIN_SEPARATOR: &str = " -> ";
