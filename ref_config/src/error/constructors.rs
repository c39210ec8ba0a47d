//! Constructors and inspection helpers for `RefConfigError`.

use figment::Error as FigmentError;

use super::RefConfigError;

impl RefConfigError {
    /// Construct an extraction error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ref_config::RefConfigError;
    /// let e = RefConfigError::extract(figment::Error::from("boom"));
    /// assert!(matches!(e, RefConfigError::Extract(_)));
    /// ```
    #[must_use]
    pub fn extract(source: FigmentError) -> Self {
        Self::Extract(Box::new(source))
    }

    /// Returns `true` when the error reports a missing document.
    ///
    /// # Examples
    ///
    /// ```
    /// use ref_config::RefConfigError;
    /// let err = RefConfigError::File {
    ///     path: "missing.yaml".into(),
    ///     source: Box::new(std::io::Error::from(std::io::ErrorKind::NotFound)),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        let Self::File { source, .. } = self else {
            return false;
        };
        source
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
    }

    /// Path of the document involved in a file or parse failure, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::File { path, .. } | Self::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<FigmentError> for RefConfigError {
    fn from(e: FigmentError) -> Self {
        Self::extract(e)
    }
}
