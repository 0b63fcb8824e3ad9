//! Error types for gravel-variants.

/// Errors produced by compression-result construction and lookup.
///
/// All of these are structural invariant violations: they indicate the
/// caller broke a precondition and are surfaced immediately, never retried.
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    /// A compression result was constructed with a variant mapped to a
    /// suffix that has no registered target description.
    #[error("variant {variant} maps to suffix {suffix:?} which has no registered target")]
    SuffixNotRegistered { variant: String, suffix: String },

    /// A compression result was constructed with a description registered
    /// under a suffix missing from the suffix set.
    #[error("target description registered under undeclared suffix {suffix:?}")]
    UndeclaredSuffix { suffix: String },

    /// Two distinct targets produced the same suffix after kebab-casing,
    /// e.g. a variant named `freeDebug` alongside a literal `free-debug`.
    #[error("{first} and {second} both map to target suffix {suffix:?}")]
    SuffixCollision {
        suffix: String,
        first: String,
        second: String,
    },

    /// A lookup asked for a suffix that was never registered.
    #[error("no target registered under suffix {suffix:?}")]
    UnknownSuffix { suffix: String },

    /// A lookup asked for a variant that was never registered.
    #[error("variant {variant} was never registered")]
    UnknownVariant { variant: String },
}
