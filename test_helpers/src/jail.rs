//! `figment::Jail` wrappers for laying out configuration documents.
//!
//! A jail runs its closure in a fresh temporary working directory and
//! restores the environment afterwards, which suits tests that follow
//! `$ref` chains across several files.

use anyhow::{Result, anyhow};
use camino::Utf8Path;

/// Run `f` inside a [`figment::Jail`], bridging errors through `anyhow`.
///
/// # Errors
///
/// Returns the closure's error, stringified, or a jail setup failure.
///
/// # Examples
///
/// ```
/// use test_helpers::jail;
///
/// let text = jail::with_jail(|j| {
///     jail::write_documents(j, &[("conf/app.yaml", "name: demo\n")])?;
///     Ok(std::fs::read_to_string("conf/app.yaml")?)
/// })?;
/// assert_eq!(text, "name: demo\n");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j).map_err(|err| figment::Error::from(err.to_string()))?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Create each `(relative path, contents)` document inside the jail,
/// creating parent directories as needed.
///
/// # Errors
///
/// Fails when a path escapes the jail or a file cannot be written.
pub fn write_documents(jail: &figment::Jail, documents: &[(&str, &str)]) -> Result<()> {
    for (name, contents) in documents {
        let path = Utf8Path::new(name);
        if path.is_absolute() || path.components().any(|c| c.as_str() == "..") {
            return Err(anyhow!("document path {name} must stay inside the jail"));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            jail.create_dir(parent.as_std_path())
                .map_err(|err| anyhow!(err.to_string()))?;
        }
        jail.create_file(path.as_std_path(), contents)
            .map_err(|err| anyhow!(err.to_string()))?;
    }
    Ok(())
}
