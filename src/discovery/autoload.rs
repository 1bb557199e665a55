//! Filesystem autoloading.
//!
//! # Responsibilities
//! - Walk a category directory recursively
//! - Derive a namespace for every module file (extension-stripped path
//!   relative to the category root)
//! - Resolve each namespace against the compiled-in module registry
//!
//! # Design Decisions
//! - Deterministic walk order (lexicographic per directory level)
//! - Dotfiles are skipped
//! - A file on disk with no registry entry is a load failure, not a skip:
//!   the directory convention is the source of truth for what the
//!   application expects to run

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for autoloading.
#[derive(Debug, Error)]
pub enum AutoloadError {
    #[error("failed to read module directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("module {namespace:?} was found at {path} but is not registered")]
    Unregistered { namespace: String, path: PathBuf },
}

/// A namespaced mapping of discovered modules for one category.
#[derive(Clone, Debug)]
pub struct ModuleTree<T> {
    /// namespace → module.
    pub app: BTreeMap<String, T>,

    /// Namespaces in discovery order.
    pub namespaces: Vec<String>,
}

impl<T> ModuleTree<T> {
    pub fn empty() -> Self {
        Self {
            app: BTreeMap::new(),
            namespaces: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn get(&self, namespace: &str) -> Option<&T> {
        self.app.get(namespace)
    }
}

impl<T> Default for ModuleTree<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Loads one category directory into a [`ModuleTree`].
pub struct Autoloader {
    path: PathBuf,
}

impl Autoloader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Walk the directory and resolve every discovered namespace through
    /// `resolve`.
    pub fn load<T>(
        &self,
        resolve: impl Fn(&str) -> Option<T>,
    ) -> Result<ModuleTree<T>, AutoloadError> {
        let mut found = Vec::new();
        walk(&self.path, &self.path, &mut found)?;

        let mut tree = ModuleTree::empty();
        for (namespace, path) in found {
            let module = resolve(&namespace).ok_or_else(|| AutoloadError::Unregistered {
                namespace: namespace.clone(),
                path,
            })?;
            tree.app.insert(namespace.clone(), module);
            tree.namespaces.push(namespace);
        }
        tracing::debug!(
            path = %self.path.display(),
            modules = tree.len(),
            "Category loaded"
        );
        Ok(tree)
    }
}

fn walk(dir: &Path, root: &Path, found: &mut Vec<(String, PathBuf)>) -> Result<(), AutoloadError> {
    let read = fs::read_dir(dir).map_err(|source| AutoloadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut entries: Vec<_> = read
        .collect::<Result<_, _>>()
        .map_err(|source| AutoloadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type().map_err(|source| AutoloadError::Io {
            path: path.clone(),
            source,
        })?;
        if file_type.is_dir() {
            walk(&path, root, found)?;
        } else {
            found.push((namespace_of(&path, root), path));
        }
    }
    Ok(())
}

/// Extension-stripped path relative to the category root, slash-separated.
fn namespace_of(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::File::create(path).unwrap();
    }

    #[test]
    fn test_namespaces_are_relative_and_extension_stripped() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("tcp/index.rs"));
        touch(&dir.path().join("udp/index.rs"));

        let tree = Autoloader::new(dir.path())
            .load(|ns| Some(ns.to_string()))
            .unwrap();
        assert_eq!(tree.namespaces, vec!["tcp/index", "udp/index"]);
        assert_eq!(tree.get("tcp/index"), Some(&"tcp/index".to_string()));
    }

    #[test]
    fn test_walk_order_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.rs"));
        touch(&dir.path().join("a.rs"));
        touch(&dir.path().join("nested/c.rs"));

        let tree = Autoloader::new(dir.path()).load(|_| Some(())).unwrap();
        assert_eq!(tree.namespaces, vec!["a", "b", "nested/c"]);
    }

    #[test]
    fn test_dotfiles_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(".hidden.rs"));
        touch(&dir.path().join("visible.rs"));

        let tree = Autoloader::new(dir.path()).load(|_| Some(())).unwrap();
        assert_eq!(tree.namespaces, vec!["visible"]);
    }

    #[test]
    fn test_unregistered_module_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("orphan.rs"));

        let err = Autoloader::new(dir.path())
            .load(|_| None::<()>)
            .unwrap_err();
        assert!(matches!(err, AutoloadError::Unregistered { namespace, .. } if namespace == "orphan"));
    }
}
