//! Short code generators.
//!
//! [`RandomCodeGenerator`] is the production source: 8 characters drawn
//! independently and uniformly from `A-Z a-z 0-9` using the thread-local
//! CSPRNG. [`SequenceCodeGenerator`] replays a fixed list for deterministic tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use crate::domain::code_generator::CodeGenerator;

/// Base62 alphabet used for generated codes.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated codes.
pub const CODE_LENGTH: usize = 8;

/// Generates a cryptographically random short code.
///
/// # Format
///
/// - Length: 8 characters
/// - Character set: A-Z, a-z, 0-9
/// - Entropy: ~47.6 bits
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Returns true if `code` has the shape of a generated code.
pub fn is_generated_format(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
}

/// Production generator backed by [`generate_code`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl RandomCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Deterministic generator that cycles through a fixed list of codes.
///
/// Wraps around once the list is exhausted, which makes collision paths easy to
/// reproduce in tests.
#[derive(Debug)]
pub struct SequenceCodeGenerator {
    codes: Vec<String>,
    next: AtomicUsize,
}

impl SequenceCodeGenerator {
    /// Creates a generator replaying `codes` in order.
    ///
    /// # Panics
    ///
    /// Panics if `codes` is empty.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        assert!(!codes.is_empty(), "SequenceCodeGenerator needs at least one code");

        Self {
            codes,
            next: AtomicUsize::new(0),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> String {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.codes.len();
        self.codes[idx].clone()
    }
}
