//! The recursive `$ref` resolution pass.
//!
//! Resolution walks the tree depth-first. Every composite node first has the
//! `$env.` placeholders among its direct children substituted. Mappings that
//! carry a `$ref` key are then replaced by the data the reference points to,
//! with the remaining keys of the mapping merged over it.

mod guard;
mod location;
mod options;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::env::{expand_entries, expand_items};
use crate::file::{
    DocumentFormat, canonicalise, expand_relative, file_error, is_relative_specifier,
    normalise_cycle_key, parent_dir, read_document_as,
};
use crate::merge::{MergeStrategy, merge_mappings};
use crate::module::resolve_reference_path;
use crate::tree::{REF_KEY, kind_name};
use crate::{RefConfigError, RefResult};

use guard::ReferenceStack;
use location::Location;

pub use options::{DEFAULT_MAX_DEPTH, ResolveOptions};

/// Document name used in diagnostics for trees passed in directly.
const PROPERTIES_DOCUMENT: &str = "<properties>";

/// Resolves `$ref` and `$env.` constructs in configuration trees.
///
/// A `Resolver` holds no state between calls; each call reads referenced
/// documents afresh.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    options: ResolveOptions,
}

impl Resolver {
    /// Create a resolver using `options`.
    #[must_use]
    pub const fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    /// Options this resolver applies.
    #[must_use]
    pub const fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve an in-memory tree, treating relative paths as relative to
    /// `base`.
    ///
    /// A root that resolves to an absent value is returned as `null`.
    ///
    /// # Errors
    ///
    /// Fails when a referenced document cannot be read or parsed, when a
    /// `$ref` value is not a non-empty string, or when references form a
    /// cycle or nest deeper than the configured limit.
    pub fn resolve(&self, tree: Value, base: &Path) -> RefResult<Value> {
        let absolute = std::path::absolute(base).map_err(|e| file_error(base, e))?;
        let mut pass = Walk::new(&self.options);
        let root = Context {
            base: &absolute,
            scope: None,
            location: Location::root(PROPERTIES_DOCUMENT),
        };
        Ok(pass.resolve_node(tree, &root)?.unwrap_or(Value::Null))
    }

    /// Read the document at `path` and resolve it against its own directory.
    ///
    /// # Errors
    ///
    /// As for [`Resolver::resolve`], and additionally when `path` itself
    /// cannot be read or parsed.
    pub fn resolve_file(&self, path: &Path) -> RefResult<Value> {
        self.resolve_document(path, None, Map::new())
    }

    /// Like [`Resolver::resolve_file`], but parse the document as `format`
    /// regardless of its extension.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve_file`].
    pub fn resolve_file_as(&self, path: &Path, format: DocumentFormat) -> RefResult<Value> {
        self.resolve_document(path, Some(format), Map::new())
    }

    /// Read the document at `path`, replace its top-level keys with those in
    /// `overlay`, then resolve the result against the document's directory.
    ///
    /// # Errors
    ///
    /// As for [`Resolver::resolve_file`]. A non-empty `overlay` also fails
    /// with [`RefConfigError::NotAMapping`] when the document root is a
    /// sequence or scalar.
    pub fn resolve_file_with(
        &self,
        path: &Path,
        overlay: Map<String, Value>,
    ) -> RefResult<Value> {
        self.resolve_document(path, None, overlay)
    }

    /// Load `path` (as `format`, or by extension), overlay `overlay` on its
    /// top-level keys and resolve it against the document's directory.
    pub(crate) fn resolve_document(
        &self,
        path: &Path,
        format: Option<DocumentFormat>,
        overlay: Map<String, Value>,
    ) -> RefResult<Value> {
        let canonical = canonicalise(path)?;
        let document = canonical.display().to_string();
        let parse_as = format.unwrap_or_else(|| DocumentFormat::from_path(&canonical));
        let base = parent_dir(&canonical);
        let mut pass = Walk::new(&self.options);
        pass.within(file_key(&canonical), |walk| {
            let loaded = read_document_as(&canonical, parse_as)?;
            let tree = overlay_properties(loaded, overlay, &document)?;
            let root = Context {
                base: &base,
                scope: None,
                location: Location::root(document.as_str()),
            };
            walk.resolve_node(tree, &root)
        })
        .map(|resolved| resolved.unwrap_or(Value::Null))
    }
}

/// Resolve `tree` against `base` with default options.
///
/// # Examples
///
/// ```
/// use ref_config::resolve_references;
/// use serde_json::json;
/// use std::path::Path;
///
/// let tree = json!({
///     "defaults": {"retries": 3, "timeout": 10},
///     "service": {"$ref": "$defaults", "timeout": 30},
///     "data": "./data"
/// });
/// let resolved = resolve_references(tree, Path::new("/srv"))?;
/// assert_eq!(resolved["service"], json!({"retries": 3, "timeout": 30}));
/// assert_eq!(resolved["data"], json!("/srv/data"));
/// # Ok::<(), std::sync::Arc<ref_config::RefConfigError>>(())
/// ```
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub fn resolve_references(tree: Value, base: &Path) -> RefResult<Value> {
    Resolver::default().resolve(tree, base)
}

fn file_key(canonical: &Path) -> String {
    format!("{}#", normalise_cycle_key(canonical))
}

fn overlay_properties(
    loaded: Value,
    overlay: Map<String, Value>,
    document: &str,
) -> RefResult<Value> {
    if overlay.is_empty() {
        return Ok(loaded);
    }
    match loaded {
        Value::Object(map) => Ok(Value::Object(merge_mappings(
            map,
            overlay,
            MergeStrategy::Shallow,
        ))),
        Value::Null => Ok(Value::Object(overlay)),
        other => Err(Arc::new(RefConfigError::NotAMapping {
            document: document.to_owned(),
            found: kind_name(&other),
        })),
    }
}

/// Pre-resolution snapshot of a mapping, used to look up back-references.
#[derive(Debug)]
struct Scope {
    entries: Map<String, Value>,
    location: Location,
}

/// Where a node sits while it is being resolved.
struct Context<'a> {
    base: &'a Path,
    scope: Option<&'a Scope>,
    location: Location,
}

/// Referenced data ready to have the reference node's siblings merged over
/// it.
enum Target {
    /// Mapping entries with placeholders substituted but otherwise
    /// unresolved. `guard` is the reference stack key held while they
    /// resolve.
    Entries {
        entries: Map<String, Value>,
        guard: String,
    },
    /// A fully resolved value. `None` when the target is absent.
    Resolved(Option<Value>),
}

/// Sibling keys of a reference node merged over referenced entries.
struct Overrides<'a> {
    keys: BTreeSet<String>,
    guard: &'a str,
    location: &'a Location,
}

struct Walk<'o> {
    options: &'o ResolveOptions,
    references: ReferenceStack,
}

impl<'o> Walk<'o> {
    fn new(options: &'o ResolveOptions) -> Self {
        Self {
            options,
            references: ReferenceStack::new(options.detect_cycles(), options.max_depth()),
        }
    }

    /// Run `operation` with `key` pushed on the reference stack.
    fn within<T, F>(&mut self, key: String, operation: F) -> RefResult<T>
    where
        F: FnOnce(&mut Self) -> RefResult<T>,
    {
        self.references.enter(key)?;
        let result = operation(self);
        self.references.leave();
        result
    }

    /// Resolve one node. `None` means the node is absent.
    fn resolve_node(&mut self, node: Value, ctx: &Context<'_>) -> RefResult<Option<Value>> {
        match node {
            Value::Object(map) => self.resolve_mapping(map, ctx),
            Value::Array(items) => self.resolve_sequence(items, ctx).map(Some),
            Value::String(text) if is_relative_specifier(&text) => Ok(Some(Value::String(
                expand_relative(&text, ctx.base).into_owned(),
            ))),
            scalar => Ok(Some(scalar)),
        }
    }

    fn resolve_sequence(&mut self, items: Vec<Value>, ctx: &Context<'_>) -> RefResult<Value> {
        let expanded = expand_items(items, self.options.env());
        let mut resolved = Vec::with_capacity(expanded.len());
        for (index, item) in expanded.into_iter().enumerate() {
            let item_ctx = Context {
                base: ctx.base,
                scope: ctx.scope,
                location: ctx.location.index(index),
            };
            resolved.push(self.resolve_node(item, &item_ctx)?.unwrap_or(Value::Null));
        }
        Ok(Value::Array(resolved))
    }

    /// Substitute the placeholders among a mapping's entries. A `$ref` that
    /// is null afterwards is dropped and the mapping stays plain.
    fn expand_mapping(&self, map: Map<String, Value>) -> Map<String, Value> {
        let mut entries = expand_entries(map, self.options.env());
        if entries.get(REF_KEY).is_some_and(Value::is_null) {
            entries.remove(REF_KEY);
        }
        entries
    }

    fn resolve_mapping(
        &mut self,
        map: Map<String, Value>,
        ctx: &Context<'_>,
    ) -> RefResult<Option<Value>> {
        let expanded = self.expand_mapping(map);
        if expanded.contains_key(REF_KEY) {
            self.resolve_reference(expanded, ctx)
        } else {
            self.resolve_entries(expanded, ctx, None)
                .map(|entries| Some(Value::Object(entries)))
        }
    }

    /// Resolve every entry of a mapping against `home.base`. The mapping is
    /// the scope of its entries.
    ///
    /// Entries named in `overrides` sit at the reference node's location.
    /// The rest came from referenced data and resolve with the override
    /// guard held, so a cycle through them is caught.
    fn resolve_entries(
        &mut self,
        entries: Map<String, Value>,
        home: &Context<'_>,
        overrides: Option<&Overrides<'_>>,
    ) -> RefResult<Map<String, Value>> {
        let scope = Scope {
            entries: entries.clone(),
            location: home.location.clone(),
        };
        let mut resolved = Map::new();
        for (key, child) in entries {
            let overriding = overrides.filter(|o| o.keys.contains(&key));
            let location = overriding
                .map_or(&home.location, |o| o.location)
                .child(&key);
            let guard = overrides
                .filter(|_| overriding.is_none())
                .map(|o| o.guard);
            let child_ctx = Context {
                base: home.base,
                scope: Some(&scope),
                location,
            };
            let value = self.guarded(guard, |walk| walk.resolve_node(child, &child_ctx))?;
            if let Some(value) = value {
                resolved.insert(key, value);
            }
        }
        Ok(resolved)
    }

    /// Like `within`, but only pushes a key when one is given.
    fn guarded<T, F>(&mut self, key: Option<&str>, operation: F) -> RefResult<T>
    where
        F: FnOnce(&mut Self) -> RefResult<T>,
    {
        let Some(key) = key else {
            return operation(self);
        };
        self.within(key.to_owned(), operation)
    }

    fn resolve_reference(
        &mut self,
        mut siblings: Map<String, Value>,
        ctx: &Context<'_>,
    ) -> RefResult<Option<Value>> {
        let target = match siblings.remove(REF_KEY) {
            Some(Value::String(reference)) if !reference.is_empty() => reference,
            Some(Value::String(_)) => {
                return Err(invalid_reference(&ctx.location, "reference is empty"));
            }
            other => {
                let found = other.as_ref().map_or("nothing", kind_name);
                return Err(invalid_reference(
                    &ctx.location,
                    format!("expected a string, found {found}"),
                ));
            }
        };

        if target.starts_with('$') {
            let name = target.get(1..).unwrap_or_default();
            self.follow_back_reference(name, siblings, ctx)
        } else {
            self.follow_file_reference(&target, siblings, ctx)
        }
    }

    /// Prepare referenced `data` found at `home`. Mappings keep their
    /// entries unresolved so siblings can replace them first. Anything else,
    /// including a mapping that is itself a reference, resolves in full.
    fn settle(&mut self, data: Value, home: &Context<'_>, guard: String) -> RefResult<Target> {
        match data {
            Value::Object(map) => {
                let entries = self.expand_mapping(map);
                if entries.contains_key(REF_KEY) {
                    self.resolve_reference(entries, home).map(Target::Resolved)
                } else {
                    Ok(Target::Entries { entries, guard })
                }
            }
            other => self.resolve_node(other, home).map(Target::Resolved),
        }
    }

    /// Merge the reference node's `siblings` over `target` and resolve the
    /// result against the base of the referenced data.
    fn merge_siblings(
        &mut self,
        target: Target,
        siblings: Map<String, Value>,
        home: &Context<'_>,
        node: &Location,
    ) -> RefResult<Option<Value>> {
        match target {
            Target::Entries { entries, guard } => {
                let overrides = Overrides {
                    keys: siblings.keys().cloned().collect(),
                    guard: &guard,
                    location: node,
                };
                let merged = merge_mappings(entries, siblings, self.options.merge_strategy());
                self.resolve_entries(merged, home, Some(&overrides))
                    .map(|entries| Some(Value::Object(entries)))
            }
            Target::Resolved(Some(Value::Array(items))) => {
                if !siblings.is_empty() {
                    tracing::debug!(
                        location = %node,
                        "referenced sequence replaces node; sibling keys ignored"
                    );
                }
                Ok(Some(Value::Array(items)))
            }
            Target::Resolved(resolved) if siblings.is_empty() => Ok(resolved),
            Target::Resolved(resolved) => {
                let sibling_home = Context {
                    base: home.base,
                    scope: None,
                    location: node.clone(),
                };
                let overrides = self.resolve_entries(siblings, &sibling_home, None)?;
                let merged = match resolved {
                    Some(Value::Object(data)) => {
                        merge_mappings(data, overrides, self.options.merge_strategy())
                    }
                    _ => overrides,
                };
                Ok(Some(Value::Object(merged)))
            }
        }
    }

    /// Look `name` up in the enclosing mapping. At the root the reference
    /// node's own keys are searched.
    fn follow_back_reference(
        &mut self,
        name: &str,
        siblings: Map<String, Value>,
        ctx: &Context<'_>,
    ) -> RefResult<Option<Value>> {
        let own_scope = ctx.scope.is_none().then(|| Scope {
            entries: siblings.clone(),
            location: ctx.location.clone(),
        });
        let found = ctx
            .scope
            .or(own_scope.as_ref())
            .and_then(|scope| scope.entries.get(name).cloned().map(|data| (scope, data)));
        let Some((scope, data)) = found else {
            tracing::debug!(reference = name, location = %ctx.location, "back-reference target is absent");
            return self.merge_siblings(Target::Resolved(None), siblings, ctx, &ctx.location);
        };
        let home = Context {
            base: ctx.base,
            scope: Some(scope),
            location: scope.location.child(name),
        };
        tracing::debug!(reference = name, target = %home.location, "following back-reference");
        let key = home.location.cycle_key();
        let target = self.within(key.clone(), |walk| walk.settle(data, &home, key))?;
        self.merge_siblings(target, siblings, &home, &ctx.location)
    }

    fn follow_file_reference(
        &mut self,
        reference: &str,
        siblings: Map<String, Value>,
        ctx: &Context<'_>,
    ) -> RefResult<Option<Value>> {
        let path = resolve_reference_path(reference, ctx.base, self.options.modules());
        let canonical = canonicalise(&path)?;
        tracing::debug!(reference, path = %canonical.display(), "following file reference");
        let base: PathBuf = parent_dir(&canonical);
        let home = Context {
            base: &base,
            scope: None,
            location: Location::root(canonical.display().to_string()),
        };
        let key = file_key(&canonical);
        let target = self.within(key.clone(), |walk| {
            let data = read_document_as(&canonical, DocumentFormat::from_path(&canonical))?;
            walk.settle(data, &home, key)
        })?;
        self.merge_siblings(target, siblings, &home, &ctx.location)
    }
}

fn invalid_reference(location: &Location, message: impl Into<String>) -> Arc<RefConfigError> {
    Arc::new(RefConfigError::InvalidReference {
        location: location.to_string(),
        message: message.into(),
    })
}
