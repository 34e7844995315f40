//! Provider Constants

// ============================================================================
// BLOB REFERENCE CONSTANTS
// ============================================================================

/// Longest blob reference accepted by the engines
pub const BLOB_REF_MAX_LEN: usize = 255;

// ============================================================================
// STORAGE ENGINE CONSTANTS
// ============================================================================

/// File extension of a stored blob in the filesystem engine
pub const FILESYSTEM_BLOB_EXTENSION: &str = "dat";

/// File extension of a blob being written in the filesystem engine
pub const FILESYSTEM_PARTIAL_EXTENSION: &str = "partial";

// ============================================================================
// HANDLER CONSTANTS
// ============================================================================

/// Handler type the root handler advertises for synchronisation
pub const SYNC_HANDLER_TYPE: &str = "sync";
