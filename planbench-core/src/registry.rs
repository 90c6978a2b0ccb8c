//! Backend Registry
//!
//! Loading backends is the environment's job; the benchmark receives the
//! result as a registry. Iteration is always in lexicographic name order so
//! that two runs over the same registry visit backends identically.

use crate::backend::PlannerBackend;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name and algorithms of one registered backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Registry name
    pub name: String,
    /// Declared algorithm ids
    pub algorithms: Vec<String>,
}

/// Name-ordered collection of loaded backends
#[derive(Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Box<dyn PlannerBackend>>,
}

impl BackendRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend, replacing any previous one with the same name
    pub fn insert(&mut self, name: impl Into<String>, backend: Box<dyn PlannerBackend>) {
        let name = name.into();
        if self.backends.insert(name.clone(), backend).is_some() {
            tracing::warn!(backend = %name, "replacing previously registered backend");
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_backend(
        mut self,
        name: impl Into<String>,
        backend: impl PlannerBackend + 'static,
    ) -> Self {
        self.insert(name, Box::new(backend));
        self
    }

    /// Look up a backend by name
    pub fn get(&self, name: &str) -> Option<&dyn PlannerBackend> {
        self.backends.get(name).map(|b| b.as_ref())
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    /// Registered names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    /// `(name, backend)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn PlannerBackend)> {
        self.backends
            .iter()
            .map(|(name, backend)| (name.as_str(), backend.as_ref()))
    }

    /// Number of registered backends
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Every backend with its declared algorithms
    pub fn describe_all(&self) -> Vec<BackendInfo> {
        self.iter()
            .map(|(name, backend)| BackendInfo {
                name: name.to_string(),
                algorithms: backend.algorithms(),
            })
            .collect()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.backends.keys()).finish()
    }
}
