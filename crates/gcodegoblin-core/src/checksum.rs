//! Content checksums for rewritten toolpaths
//!
//! Printers verify the toolpath inside a project archive against an MD5
//! sidecar entry holding the bare lowercase hex digest.

use std::fmt;

/// MD5 digest of a toolpath's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 16]);

impl Checksum {
    /// Compute the checksum of `content`, encoded as UTF-8
    pub fn of(content: &str) -> Self {
        Self(md5::compute(content.as_bytes()).0)
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex encoding (32 characters)
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Name of the sidecar entry for `entry_name`
pub fn sidecar_name(entry_name: &str, checksum_extension: &str) -> String {
    format!("{}.{}", entry_name, checksum_extension)
}
