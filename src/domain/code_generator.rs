//! Short code generation capability.

/// Source of candidate short codes.
///
/// Implementations are pure generators and never touch storage; uniqueness is
/// checked by the caller against the repository. Passed into
/// [`crate::application::services::LinkService`] so tests can substitute a
/// deterministic sequence.
///
/// # Implementations
///
/// - [`crate::utils::code_generator::RandomCodeGenerator`] - 8 random base62 characters
/// - [`crate::utils::code_generator::SequenceCodeGenerator`] - fixed sequence for tests
pub trait CodeGenerator: Send + Sync {
    /// Produces the next candidate code.
    fn generate(&self) -> String;
}
