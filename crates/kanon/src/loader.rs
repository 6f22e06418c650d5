//! Descriptor loader
//!
//! Reads [`SchemaDocument`]s from strings or files, checks their references
//! and registers every definition in a shared [`SchemaRegistry`].

use crate::descriptor::{Descriptor, SchemaDocument, SchemaSpec};
use crate::registry::SchemaRegistry;
use crate::schema::Schema;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Descriptor file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorFormat {
    #[default]
    Json,
    Yaml,
}

impl DescriptorFormat {
    /// Format implied by a file extension, if recognised
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Some(DescriptorFormat::Json),
            Some("yaml" | "yml") => Some(DescriptorFormat::Yaml),
            _ => None,
        }
    }

    fn parse(self, text: &str) -> Result<SchemaDocument> {
        match self {
            DescriptorFormat::Json => Ok(serde_json::from_str(text)?),
            DescriptorFormat::Yaml => Ok(serde_yaml::from_str(text)?),
        }
    }
}

/// Loader settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directories searched by [`SchemaLoader::load`]
    pub search_paths: Vec<PathBuf>,
    /// Format for files without a recognised extension
    pub default_format: DescriptorFormat,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from(".")],
            default_format: DescriptorFormat::Json,
        }
    }
}

/// Loads descriptor documents into a registry
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    registry: SchemaRegistry,
    config: LoaderConfig,
}

impl SchemaLoader {
    /// Create a loader with its own registry
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            registry: SchemaRegistry::new(),
            config,
        }
    }

    /// Create a loader sharing an existing registry
    #[must_use]
    pub fn with_registry(registry: SchemaRegistry, config: LoaderConfig) -> Self {
        Self { registry, config }
    }

    /// The registry definitions are loaded into
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Add a search path
    pub fn add_path(&mut self, path: impl Into<PathBuf>) {
        self.config.search_paths.push(path.into());
    }

    /// Load a document from text.
    ///
    /// Definitions are registered under their names. Returns the compiled
    /// root schema.
    ///
    /// # Errors
    ///
    /// Fails on malformed text, on a document without a root schema, on
    /// references to unknown names, on reference cycles that never consume
    /// input, and on rules that do not compile.
    pub fn load_str(&self, text: &str, format: DescriptorFormat) -> Result<Schema> {
        let document = format.parse(text)?;
        self.compile_document(&document)
    }

    /// Load a document from a file, picking the format by extension
    ///
    /// # Errors
    ///
    /// See [`SchemaLoader::load_str`]; also fails if the file cannot be read.
    pub fn load_file(&self, path: &Path) -> Result<Schema> {
        trace!(path = %path.display(), "Loading schema descriptor");
        let content = std::fs::read_to_string(path)?;
        let format = DescriptorFormat::from_path(path).unwrap_or(self.config.default_format);
        self.load_str(&content, format)
    }

    /// Load `name` from the search paths, or return it from the registry
    /// if it is already there.
    ///
    /// Looks for `name.json`, `name.yaml` and `name.yml` in each search path,
    /// in order. The root of the file is registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no search path has a matching file.
    pub fn load(&self, name: &str) -> Result<Schema> {
        if let Some(cached) = self.registry.get(name) {
            debug!(name, "Cache hit for schema");
            return Ok(cached);
        }
        trace!(name, "Cache miss for schema");

        let variations = [
            format!("{name}.json"),
            format!("{name}.yaml"),
            format!("{name}.yml"),
        ];
        for dir in &self.config.search_paths {
            for variation in &variations {
                let path = dir.join(variation);
                if path.exists() {
                    trace!(path = %path.display(), "Found schema file");
                    let schema = self.load_file(&path)?;
                    self.registry.register(name, schema.clone());
                    return Ok(schema);
                }
            }
        }

        Err(Error::NotFound(format!(
            "{name} not found in search paths: {:?}",
            self.config.search_paths
        )))
    }

    /// Check, register and compile a parsed document
    ///
    /// # Errors
    ///
    /// See [`SchemaLoader::load_str`].
    pub fn compile_document(&self, document: &SchemaDocument) -> Result<Schema> {
        let root = document
            .schema
            .as_ref()
            .ok_or_else(|| Error::Descriptor("document has no root schema".to_string()))?;

        self.check_references(document, root)?;
        detect_alias_cycle(&document.definitions)?;

        for (name, spec) in &document.definitions {
            let schema = spec.compile(&self.registry)?;
            self.registry.register(name.as_str(), schema);
        }
        let schema = root.compile(&self.registry)?;

        info!(
            definitions = document.definitions.len(),
            root = %schema.tag(),
            "Loaded schema document"
        );
        Ok(schema)
    }

    fn check_references(&self, document: &SchemaDocument, root: &SchemaSpec) -> Result<()> {
        let specs = document.definitions.values().chain(std::iter::once(root));
        for spec in specs {
            for name in spec.references() {
                if !document.definitions.contains_key(name) && !self.registry.contains(name) {
                    return Err(Error::Descriptor(format!("unresolved reference '{name}'")));
                }
            }
        }
        Ok(())
    }
}

/// References reached without consuming any input: the ref itself and the
/// branches of unions and intersections.
fn unguarded_references<'a>(spec: &'a SchemaSpec, names: &mut Vec<&'a str>) {
    match &spec.descriptor {
        Descriptor::Ref { name } => names.push(name),
        Descriptor::Union { branches } | Descriptor::Intersection { branches } => {
            for branch in branches {
                unguarded_references(branch, names);
            }
        }
        _ => {}
    }
}

/// Reject definitions that reach themselves through refs alone, which would
/// recurse forever during validation.
fn detect_alias_cycle(definitions: &IndexMap<String, SchemaSpec>) -> Result<()> {
    let edges: IndexMap<&str, Vec<&str>> = definitions
        .iter()
        .map(|(name, spec)| {
            let mut targets = Vec::new();
            unguarded_references(spec, &mut targets);
            (name.as_str(), targets)
        })
        .collect();

    for start in edges.keys() {
        let mut to_visit: Vec<&str> = edges.get(start).cloned().unwrap_or_default();
        let mut visited = HashSet::new();
        while let Some(current) = to_visit.pop() {
            if current == *start {
                return Err(Error::Descriptor(format!(
                    "circular reference detected involving '{start}'"
                )));
            }
            if visited.insert(current) {
                if let Some(next) = edges.get(current) {
                    to_visit.extend(next.iter().copied());
                }
            }
        }
    }
    Ok(())
}
