//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (KioskConfig::default)
//!     → loader.rs (optional TOML overlay)
//!     → CLI overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → KioskConfig (validated, immutable)
//!     → shared via Arc to dispatcher, responders and passthrough
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, ConfigError};
pub use schema::{BareConfig, KioskConfig, ListenerConfig, ObservabilityConfig, ToolkitConfig};
pub use validation::{validate_config, ValidationError};
