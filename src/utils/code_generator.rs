//! Short id generation.
//!
//! Ids only need to be unique, not secret: a few random bytes from the OS
//! entropy source, rendered as fixed-length lowercase hex. Collisions are
//! possible and are handled by the registry's retry loop.

/// Number of random bytes per generated id (two hex characters each).
pub const DEFAULT_CODE_BYTES: usize = 3;

/// Source of candidate short ids.
///
/// Implementations need not guarantee uniqueness; the registry checks each
/// candidate against its entry set.
pub trait CodeGenerator: Send + Sync {
    /// Produces the next candidate id.
    ///
    /// # Errors
    ///
    /// Returns an error if the entropy source is unavailable.
    fn generate(&self) -> Result<String, getrandom::Error>;
}

/// Random lowercase-hex id generator backed by `getrandom`.
#[derive(Debug, Clone, Copy)]
pub struct RandomHexGenerator {
    bytes: usize,
}

impl RandomHexGenerator {
    /// Creates a generator producing `bytes` random bytes (`2 * bytes` hex characters).
    pub fn new(bytes: usize) -> Self {
        Self { bytes }
    }
}

impl Default for RandomHexGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_BYTES)
    }
}

impl CodeGenerator for RandomHexGenerator {
    fn generate(&self) -> Result<String, getrandom::Error> {
        let mut buffer = vec![0u8; self.bytes];
        getrandom::fill(&mut buffer)?;
        Ok(hex::encode(buffer))
    }
}
