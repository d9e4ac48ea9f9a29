//! Layered configuration for dolfin.
//!
//! A [`Config`] is one resolved configuration snapshot built from:
//! - an optional JSON (or YAML) file,
//! - explicit overrides supplied by the caller,
//! - defaults registered on its [`ConfigSchema`], resolved lazily.
//!
//! ## Configuration Layers
//!
//! Configuration values are resolved in this priority order:
//! 1. Explicit overrides
//! 2. Values loaded from file
//! 3. Static defaults registered with `register_defaults`
//! 4. Function defaults registered with `register_func_default`
//!
//! A key present in both default registries resolves from the static
//! defaults. Resolved defaults are cached into the config, so a default
//! function runs at most once per key and instance.
//!
//! ## Meta Block
//!
//! Every config carries a `meta` mapping whose `name` and `path` entries
//! record the base name and absolute containing directory of the source
//! file. Both are `null` when the config was not built from a file.
//!
//! ## Example
//!
//! ```no_run
//! use dolfin_core::config::{Config, ConfigSchema};
//!
//! let schema = ConfigSchema::new("app");
//! schema.register_defaults([("color", "red")]);
//!
//! let mut config = Config::load(&schema, Some("app.json"), [("debug", true)])?;
//! assert_eq!(config.get("color").and_then(|v| v.as_str()), Some("red"));
//! # Ok::<(), dolfin_core::DolfinError>(())
//! ```
//!
//! ## Threading
//!
//! Registries are shared by every clone of a schema and sit behind a lock,
//! but registration is expected to happen once during startup. Lazy
//! resolution needs `&mut Config`; wrap a config in a lock of your own to
//! share it between threads.

use crate::storage::{Storage, Value};
use crate::util::data::load_document_file;
use dolfin_types::{DolfinError, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use std::env;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Key of the reserved meta block.
pub const META_KEY: &str = "meta";

/// A function producing the default for a missing key.
pub type DefaultFn = Arc<dyn Fn(&Config, &str) -> Value + Send + Sync>;

#[derive(Default)]
struct Registry {
    defaults: IndexMap<String, Value>,
    func_defaults: IndexMap<String, DefaultFn>,
}

/// Default policy shared by every config of one kind.
///
/// Cloning a schema yields another handle to the same registries.
/// Registration is additive; there is no way to unregister a default.
#[derive(Clone)]
pub struct ConfigSchema {
    name: Arc<str>,
    registry: Arc<RwLock<Registry>>,
}

impl ConfigSchema {
    /// Create a schema with empty registries.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            registry: Arc::default(),
        }
    }

    /// Name of this schema.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Merge static defaults into the registry.
    ///
    /// JSON objects are stored as [`Storage`] trees.
    pub fn register_defaults<I, K, V>(&self, defaults: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut registry = self.registry.write();
        for (key, value) in defaults {
            registry.defaults.insert(key.into(), value.into());
        }
    }

    /// Bind `key` to a default-producing function, replacing any previous
    /// binding for that key.
    pub fn register_func_default<F, V>(&self, key: impl Into<String>, func: F)
    where
        F: Fn(&Config, &str) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        let func: DefaultFn =
            Arc::new(move |config: &Config, key: &str| -> Value { func(config, key).into() });
        self.registry.write().func_defaults.insert(key.into(), func);
    }

    /// Whether either registry has an entry for `key`.
    pub fn has_default(&self, key: &str) -> bool {
        let registry = self.registry.read();
        registry.defaults.contains_key(key) || registry.func_defaults.contains_key(key)
    }

    /// Produce the default for `key`, static defaults first.
    ///
    /// The registry lock is released before a default function runs, so the
    /// function may read the config and trigger further resolution.
    fn resolve(&self, config: &Config, key: &str) -> Option<Value> {
        let func = {
            let registry = self.registry.read();
            if let Some(value) = registry.defaults.get(key) {
                return Some(value.clone());
            }
            registry.func_defaults.get(key).cloned()
        }?;
        Some(func(config, key))
    }
}

impl fmt::Debug for ConfigSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.read();
        f.debug_struct("ConfigSchema")
            .field("name", &self.name)
            .field("defaults", &registry.defaults.keys().collect::<Vec<_>>())
            .field("func_defaults", &registry.func_defaults.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ConfigSchema {
    fn default() -> Self {
        Self::new("config")
    }
}

/// A resolved configuration snapshot.
#[derive(Clone, Debug)]
pub struct Config {
    data: Storage,
    schema: ConfigSchema,
}

impl Config {
    /// Create a configuration that was not loaded from a file.
    pub fn new(schema: &ConfigSchema) -> Self {
        let mut data = Storage::new();
        inject_meta(&mut data, None);
        Self {
            data,
            schema: schema.clone(),
        }
    }

    /// Load a configuration from a file with no overrides.
    pub fn open(schema: &ConfigSchema, path: impl AsRef<Path>) -> Result<Self> {
        Self::load(schema, Some(path), Storage::new())
    }

    /// Build a configuration from an optional file and explicit overrides.
    ///
    /// Each override replaces the file's value for the same key outright;
    /// nested mappings are not merged.
    ///
    /// # Errors
    ///
    /// - `DolfinError::ConfigNotFound` if `path` does not exist
    /// - `DolfinError::Json` / `DolfinError::Yaml` if the file is malformed
    /// - `DolfinError::InvalidArgument` if the document is not a mapping
    pub fn load<P, I, K, V>(schema: &ConfigSchema, path: Option<P>, overrides: I) -> Result<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let source = match &path {
            Some(path) => Some(SourceFile::locate(path.as_ref())?),
            None => None,
        };

        let mut data = match &source {
            Some(source) => {
                let document = load_document_file(&source.path)?;
                Storage::try_from(document)?
            }
            None => Storage::new(),
        };
        data.extend(overrides);
        inject_meta(&mut data, source.as_ref());

        debug!(
            schema = schema.name(),
            file = ?source.as_ref().map(|s| &s.path),
            keys = data.len(),
            "loaded config"
        );

        Ok(Self {
            data,
            schema: schema.clone(),
        })
    }

    /// Get the value for `key`, resolving a registered default if the key
    /// is unbound. Returns `None` when no default exists either.
    pub fn get(&mut self, key: &str) -> Option<&Value> {
        if !self.data.contains_key(key) {
            let value = self.schema.resolve(&*self, key)?;
            debug!(schema = self.schema.name(), key, "resolved default");
            self.data.set(key, value);
        }
        self.data.get(key)
    }

    /// Get the value for `key` without consulting defaults.
    pub fn peek(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Walk a dotted key path. Only the first segment resolves defaults.
    pub fn get_path(&mut self, path: &str) -> Option<&Value> {
        match path.split_once('.') {
            Some((head, rest)) => self.get(head)?.as_storage()?.get_path(rest),
            None => self.get(path),
        }
    }

    /// Bind `key` to `value`, returning the previous value if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.set(key, value)
    }

    /// Remove `key`. Removing an unbound key is a no-op.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Base name of the source file, if loaded from one.
    pub fn meta_name(&self) -> Option<&str> {
        self.data.get_path("meta.name").and_then(Value::as_str)
    }

    /// Absolute containing directory of the source file, if loaded from one.
    pub fn meta_path(&self) -> Option<&str> {
        self.data.get_path("meta.path").and_then(Value::as_str)
    }

    /// The schema this config resolves defaults from.
    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }

    /// The underlying storage, without default resolution.
    pub fn storage(&self) -> &Storage {
        &self.data
    }

    /// Consume the config, keeping only its storage.
    pub fn into_storage(self) -> Storage {
        self.data
    }

    /// Export a plain mapping snapshot of the values resolved so far.
    pub fn to_value(&self) -> JsonValue {
        self.data.to_value()
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

/// A config file that is known to exist.
struct SourceFile {
    path: PathBuf,
    name: String,
    dir: PathBuf,
}

impl SourceFile {
    fn locate(path: &Path) -> Result<Self> {
        let absolute = normalize(&absolute(path)?);
        let name = absolute
            .file_name()
            .or_else(|| path.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let dir = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| absolute.clone());

        if !path.exists() {
            return Err(DolfinError::ConfigNotFound {
                file: name,
                location: describe_location(&dir)?,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            name,
            dir,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `path` expressed relative to `base`, walking up with `..` past the
/// common prefix. Both paths must be absolute and normalized.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path: Vec<Component> = path.components().collect();
    let base: Vec<Component> = base.components().collect();
    let common = path
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base.len() {
        out.push("..");
    }
    for component in &path[common..] {
        out.push(component.as_os_str());
    }
    out
}

/// `current directory`, or `directory '<dir>'` with `dir` relative to the
/// cwd.
fn describe_location(dir: &Path) -> Result<String> {
    let cwd = normalize(&env::current_dir()?);
    let relative = relative_to(&normalize(dir), &cwd);
    if relative.as_os_str().is_empty() {
        return Ok("current directory".to_string());
    }
    Ok(format!("directory '{}'", relative.display()))
}

/// Force `meta.name`/`meta.path` from the source file, keeping any other
/// entries already placed under `meta`.
fn inject_meta(data: &mut Storage, source: Option<&SourceFile>) {
    if !matches!(data.get(META_KEY), Some(Value::Mapping(_))) {
        data.set(META_KEY, Storage::new());
    }
    if let Some(meta) = data.get_mut(META_KEY).and_then(Value::as_storage_mut) {
        meta.set("name", source.map(|s| s.name.clone()));
        meta.set("path", source.map(|s| s.dir.to_string_lossy().into_owned()));
    }
}
