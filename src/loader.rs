//! Module source loading
//!
//! `import` asks a [`ModuleLoader`] for the source of a module by name. The
//! filesystem loader looks for `<name>.eva` in each search directory in
//! order; the in-memory loader serves sources registered by the host.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::diagnostics::{EvalResult, RuntimeError, SourceFile};

/// File extension of Eva module sources
pub const MODULE_EXTENSION: &str = "eva";

/// Default module directory, relative to the working directory
pub const DEFAULT_MODULE_DIR: &str = "modules";

/// Resolves a module name to its source text
pub trait ModuleLoader {
    fn load(&self, name: &str) -> EvalResult<SourceFile>;
}

/// Loads `<dir>/<name>.eva` from an ordered list of directories
#[derive(Debug, Clone)]
pub struct FsModuleLoader {
    search_paths: Vec<PathBuf>,
}

impl FsModuleLoader {
    pub fn new(search_paths: impl IntoIterator<Item = PathBuf>) -> Self {
        FsModuleLoader {
            search_paths: search_paths.into_iter().collect(),
        }
    }

    fn candidate(dir: &Path, name: &str) -> PathBuf {
        dir.join(name).with_extension(MODULE_EXTENSION)
    }
}

impl Default for FsModuleLoader {
    fn default() -> Self {
        FsModuleLoader::new([PathBuf::from(DEFAULT_MODULE_DIR)])
    }
}

impl ModuleLoader for FsModuleLoader {
    fn load(&self, name: &str) -> EvalResult<SourceFile> {
        for dir in &self.search_paths {
            let path = Self::candidate(dir, name);
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    tracing::debug!("Resolved module {} to {}", name, path.display());
                    return Ok(SourceFile::new(path.display().to_string(), content));
                }
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    tracing::trace!("Module {} not at {}", name, path.display());
                }
                Err(source) => {
                    return Err(RuntimeError::ModuleIo {
                        name: name.to_string(),
                        path,
                        source,
                    });
                }
            }
        }

        let searched = self
            .search_paths
            .iter()
            .map(|dir| Self::candidate(dir, name).display().to_string())
            .collect::<Vec<_>>();
        Err(RuntimeError::ModuleNotFound {
            name: name.to_string(),
            help: Some(if searched.is_empty() {
                "no module search paths are configured".to_string()
            } else {
                format!("searched: {}", searched.join(", "))
            }),
        })
    }
}

/// Serves module sources registered in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryModuleLoader {
    modules: IndexMap<String, String>,
}

impl MemoryModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the source of module `name`
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.modules.insert(name.into(), source.into());
        self
    }

    pub fn with_module(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }
}

impl ModuleLoader for MemoryModuleLoader {
    fn load(&self, name: &str) -> EvalResult<SourceFile> {
        match self.modules.get(name) {
            Some(source) => Ok(SourceFile::new(format!("<module {}>", name), source.clone())),
            None => Err(RuntimeError::ModuleNotFound {
                name: name.to_string(),
                help: (!self.modules.is_empty()).then(|| {
                    let known = self.modules.keys().cloned().collect::<Vec<_>>();
                    format!("available modules: {}", known.join(", "))
                }),
            }),
        }
    }
}
