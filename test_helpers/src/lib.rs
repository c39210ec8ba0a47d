//! Test helpers shared across the ref-config workspace.
//!
//! - [`env`]: guards that set or remove process environment variables and
//!   restore them on drop, including the module search path variable.
//! - [`jail`]: `figment::Jail` wrappers that lay out configuration
//!   documents in an isolated directory.

pub mod env;
pub mod jail;
