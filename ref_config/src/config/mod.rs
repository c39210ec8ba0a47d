//! Resolved configuration objects and their construction entry points.

mod builder;

use std::ops::{Deref, Index};
use std::path::Path;
use std::sync::Arc;

use figment::Figment;
use figment::providers::Serialized;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::tree::kind_name;
use crate::{RefConfigError, RefResult, RefResultExt};

pub use builder::ResolvedConfigBuilder;

static NULL: Value = Value::Null;

/// A fully resolved configuration mapping.
///
/// Every `$ref` has been replaced by the data it points to, every `$env.`
/// placeholder by its value and every document-relative path by an absolute
/// one. The top-level keys are available through [`Deref`] to the
/// underlying [`Map`], through indexing, or as typed values via
/// [`ResolvedConfig::extract`].
///
/// # Examples
///
/// ```
/// use ref_config::ResolvedConfig;
/// use serde_json::json;
///
/// let config = ResolvedConfig::from_json_str(
///     r#"{"defaults": {"port": 80}, "server": {"$ref": "$defaults", "host": "a"}}"#,
/// )?;
/// assert_eq!(config["server"], json!({"port": 80, "host": "a"}));
/// assert_eq!(config.find("server.port"), Some(&json!(80)));
/// assert!(config["missing"].is_null());
/// # Ok::<(), std::sync::Arc<ref_config::RefConfigError>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    values: Map<String, Value>,
}

impl ResolvedConfig {
    /// Start configuring how a configuration is resolved.
    #[must_use]
    pub fn builder() -> ResolvedConfigBuilder {
        ResolvedConfigBuilder::new()
    }

    /// Resolve an in-memory mapping against the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error when a reference cannot be followed.
    pub fn from_properties(properties: Map<String, Value>) -> RefResult<Self> {
        Self::builder().from_properties(properties)
    }

    /// Load and resolve the document at `path`.
    ///
    /// Relative paths inside the document resolve against its directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the document or anything it references cannot
    /// be read, parsed or resolved, or when its root is a scalar.
    pub fn from_file(path: impl AsRef<Path>) -> RefResult<Self> {
        Self::builder().from_file(path)
    }

    /// Load the document at `path`, replace its top-level keys with
    /// `properties`, then resolve the merged tree against the document's
    /// directory.
    ///
    /// # Errors
    ///
    /// See [`ResolvedConfig::from_file`].
    pub fn from_properties_and_file(
        properties: Map<String, Value>,
        path: impl AsRef<Path>,
    ) -> RefResult<Self> {
        Self::builder().from_properties_and_file(properties, path)
    }

    /// Parse `text` as JSON and resolve it against the current working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error when `text` is malformed or a reference cannot be
    /// followed.
    pub fn from_json_str(text: &str) -> RefResult<Self> {
        Self::builder().from_json_str(text)
    }

    /// Parse `text` as YAML and resolve it against the current working
    /// directory.
    ///
    /// # Errors
    ///
    /// See [`ResolvedConfig::from_json_str`].
    pub fn from_yaml_str(text: &str) -> RefResult<Self> {
        Self::builder().from_yaml_str(text)
    }

    /// Load `path` as JSON whatever its extension.
    ///
    /// # Errors
    ///
    /// See [`ResolvedConfig::from_file`].
    pub fn from_json_file(path: impl AsRef<Path>) -> RefResult<Self> {
        Self::builder().from_json_file(path)
    }

    /// Load `path` as YAML whatever its extension.
    ///
    /// # Errors
    ///
    /// See [`ResolvedConfig::from_file`].
    pub fn from_yaml_file(path: impl AsRef<Path>) -> RefResult<Self> {
        Self::builder().from_yaml_file(path)
    }

    /// Wrap a resolved root value.
    ///
    /// A `null` root gives an empty configuration and a sequence is keyed by
    /// index. Scalars cannot be flattened into keys.
    pub(crate) fn from_root(root: Value, document: &str) -> RefResult<Self> {
        let values = match root {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            scalar => {
                return Err(Arc::new(RefConfigError::NotAMapping {
                    document: document.to_owned(),
                    found: kind_name(&scalar),
                }));
            }
        };
        Ok(Self { values })
    }

    /// Borrow the top-level mapping.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Convert into a plain [`Value::Object`].
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    /// Look up a value by dotted path.
    ///
    /// Each segment names a mapping key; a numeric segment indexes into a
    /// sequence. An empty path or a path through a scalar yields `None`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next().filter(|s| !s.is_empty())?;
        segments.try_fold(self.values.get(first)?, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    fn figment(&self) -> Figment {
        Figment::from(Serialized::defaults(&self.values))
    }

    /// Deserialize the whole configuration into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RefConfigError::Extract`] when the values do not fit `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> RefResult<T> {
        self.figment().extract().into_ref()
    }

    /// Deserialize the value at the dotted `path` into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RefConfigError::Extract`] when the path is missing or the
    /// value does not fit `T`.
    pub fn extract_inner<T: DeserializeOwned>(&self, path: &str) -> RefResult<T> {
        self.figment().extract_inner(path).into_ref()
    }
}

impl Deref for ResolvedConfig {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

/// Missing keys index to `null`.
impl Index<&str> for ResolvedConfig {
    type Output = Value;

    fn index(&self, key: &str) -> &Self::Output {
        self.values.get(key).unwrap_or(&NULL)
    }
}

impl From<ResolvedConfig> for Value {
    fn from(config: ResolvedConfig) -> Self {
        config.into_value()
    }
}
