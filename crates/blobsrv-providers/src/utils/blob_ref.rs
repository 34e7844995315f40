//! Blob reference validation
//!
//! Engines map blob references onto keys and file names, so only a
//! conservative character set is accepted.

use blobsrv_domain::error::{Error, Result};

use crate::constants::BLOB_REF_MAX_LEN;

/// Reject blob references that are empty, too long, start with a dot or
/// contain anything but ASCII alphanumerics, `-`, `_` and `.`.
///
/// ```
/// use blobsrv_providers::utils::validate_blob_ref;
///
/// assert!(validate_blob_ref("sha1-0beec7b5ea3f0fdbc95d0dd47f3c5bc275da8a33").is_ok());
/// assert!(validate_blob_ref("../etc/passwd").is_err());
/// ```
pub fn validate_blob_ref(blob_ref: &str) -> Result<()> {
    if blob_ref.is_empty() || blob_ref.len() > BLOB_REF_MAX_LEN {
        return Err(Error::generic(format!(
            "invalid blob reference length: {}",
            blob_ref.len()
        )));
    }
    if blob_ref.starts_with('.') {
        return Err(Error::generic(format!("invalid blob reference \"{blob_ref}\"")));
    }
    let valid = blob_ref
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid {
        return Err(Error::generic(format!("invalid blob reference \"{blob_ref}\"")));
    }
    Ok(())
}
