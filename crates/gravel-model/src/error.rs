//! Error types for gravel-model.

/// Errors produced when constructing model values from host input.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Variant settings failed TOML parsing.
    #[error("invalid variant settings: {source}")]
    SettingsParse { source: toml::de::Error },

    /// Variant settings parsed but violate a structural constraint.
    #[error("invalid variant settings: {reason}")]
    InvalidSettings { reason: String },
}
