//! Shared value types for the gravel variant-graph core.

pub mod description;
pub mod error;
pub mod module;
pub mod reference;
pub mod settings;
pub mod variant;

pub use description::{BuildConfigField, ModuleBuildDescription};
pub use error::ModelError;
pub use module::ModulePath;
pub use reference::DependencyReference;
pub use settings::VariantSettings;
pub use variant::{ConfigurationCategory, VariantKey, DEFAULT_VARIANT};
