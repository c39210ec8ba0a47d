//! Shared helpers for file module tests along with focused submodules.

use anyhow::{Result, anyhow};

pub(super) mod path_tests;

pub(super) fn to_anyhow<T>(result: crate::RefResult<T>) -> Result<T> {
    result.map_err(|err| anyhow!(err.to_string()))
}

pub(super) fn with_jail<F>(f: F) -> Result<()>
where
    F: FnOnce(&mut figment::Jail) -> Result<()>,
{
    figment::Jail::try_with(|j| {
        // figment::Error only implements `From<String>`, so stringify the source.
        f(j).map_err(|err| figment::Error::from(err.to_string()))
    })
    .map_err(|err| anyhow!(err.to_string()))
}
