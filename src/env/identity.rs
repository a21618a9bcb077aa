//! Identity generation strategies.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::RngCore;

/// Default identity length in characters.
pub const TOKEN_LENGTH: usize = 16;

/// Source of new document ids.
pub trait IdentityGenerator: Send + Sync {
    /// Generate an id of the given length.
    fn generate_len(&self, length: usize) -> String;

    /// Generate an id of the default length.
    fn generate(&self) -> String {
        self.generate_len(TOKEN_LENGTH)
    }

    /// Restart the sequence, for strategies that have one.
    fn reset(&self) {}
}

/// Cryptographically random lowercase hex tokens.
///
/// Odd lengths are rounded down, since each byte encodes as two characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdentity;

impl RandomIdentity {
    pub fn new() -> Self {
        RandomIdentity
    }
}

impl IdentityGenerator for RandomIdentity {
    fn generate_len(&self, length: usize) -> String {
        let mut bytes = vec![0u8; length / 2];
        rand::thread_rng().fill_bytes(&mut bytes);
        let mut token = String::with_capacity(bytes.len() * 2);
        for byte in &bytes {
            let _ = write!(token, "{:02x}", byte);
        }
        log::debug!("generated random identity of length {}", token.len());
        token
    }
}

/// Zero-padded sequential ids for deterministic fixtures.
///
/// The counter is shared by every caller holding this generator and only
/// goes back to zero through [`IdentityGenerator::reset`].
#[derive(Debug, Default)]
pub struct SequentialIdentity {
    last: AtomicU64,
}

impl SequentialIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently issued sequence number.
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

impl IdentityGenerator for SequentialIdentity {
    fn generate_len(&self, length: usize) -> String {
        let next = self.last.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{:0width$}", next, width = length)
    }

    fn reset(&self) {
        self.last.store(0, Ordering::SeqCst);
    }
}
