//! Conversion of foreign errors into [`RefResult`].
//!
//! Saves repeating `.map_err(|e| Arc::new(e.into()))` wherever a
//! `figment::Error` or another convertible error crosses into this crate.
//!
//! ```
//! use ref_config::{RefResult, RefResultExt};
//! use figment::{Figment, providers::Serialized};
//!
//! fn port() -> RefResult<u16> {
//!     Figment::from(Serialized::default("port", 8080)).extract_inner("port").into_ref()
//! }
//! assert_eq!(port().ok(), Some(8080));
//! ```

use std::sync::Arc;

use crate::{RefConfigError, RefResult};

/// Maps `Result<T, E>` into [`RefResult<T>`] for any `E` convertible into
/// [`RefConfigError`].
pub trait RefResultExt<T> {
    /// Convert the error side into a shared [`RefConfigError`].
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion.
    fn into_ref(self) -> RefResult<T>;
}

impl<T, E> RefResultExt<T> for Result<T, E>
where
    E: Into<RefConfigError>,
{
    fn into_ref(self) -> RefResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
