//! Content fingerprinting for pipeline configs.
//!
//! The token is the MD5 digest of the raw bytes rendered as 32 lowercase hex
//! characters. It only detects change; it is not a security primitive.

use pipeline_resource_core::VersionToken;

/// Fingerprint raw pipeline configuration bytes.
pub fn fingerprint(bytes: &[u8]) -> VersionToken {
    VersionToken(format!("{:x}", md5::compute(bytes)))
}
