//! Payload authentication.
//!
//! The shipped scheme is an XOR checksum seeded with a shared secret byte.
//! It detects accidental corruption and naive spoofing only; it is not a
//! MAC in the cryptographic sense and is kept for compatibility with
//! existing senders. A keyed digest can replace it behind [`Authenticator`].

/// Computes and checks the one-byte tag carried after the critical payload.
pub trait Authenticator: Send + Sync {
    /// Tag for `base`. Infallible and deterministic.
    fn tag(&self, base: &[u8]) -> u8;

    /// True iff `candidate` equals `tag(base)`.
    fn verify(&self, base: &[u8], candidate: u8) -> bool {
        self.tag(base) == candidate
    }
}

/// XOR-fold checksum seeded with a shared secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorChecksum {
    secret: u8,
}

impl XorChecksum {
    pub const fn new(secret: u8) -> Self {
        Self { secret }
    }
}

impl Authenticator for XorChecksum {
    fn tag(&self, base: &[u8]) -> u8 {
        base.iter().fold(self.secret, |acc, b| acc ^ b)
    }
}
