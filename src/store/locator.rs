//! Resolution of the orders directory across deployment layouts.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::error::StoreError;

/// Name of the orders directory in every default candidate.
pub const ORDERS_DIR_NAME: &str = "orders";

/// One entry in the ordered search list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A fixed path.
    Explicit(PathBuf),
    /// A path relative to the directory holding the running executable.
    ExeRelative(PathBuf),
    /// A path relative to the current working directory.
    CwdRelative(PathBuf),
}

impl Candidate {
    /// Resolve to an absolute path, if the anchor is available.
    pub fn resolve(&self) -> Option<PathBuf> {
        match self {
            Candidate::Explicit(path) => {
                if path.is_absolute() {
                    Some(path.clone())
                } else {
                    std::env::current_dir().ok().map(|cwd| cwd.join(path))
                }
            }
            Candidate::ExeRelative(rel) => {
                let exe = std::env::current_exe().ok()?;
                exe.parent().map(|dir| dir.join(rel))
            }
            Candidate::CwdRelative(rel) => std::env::current_dir().ok().map(|cwd| cwd.join(rel)),
        }
    }
}

/// Ordered list of candidate directories with a create-first fallback.
#[derive(Debug, Clone)]
pub struct StoreLocator {
    candidates: Vec<Candidate>,
}

impl Default for StoreLocator {
    fn default() -> Self {
        Self::new(default_candidates())
    }
}

/// The search order used when no override is configured.
///
/// The first entry is where the directory gets created if none exist.
pub fn default_candidates() -> Vec<Candidate> {
    vec![
        Candidate::ExeRelative(Path::new("..").join(ORDERS_DIR_NAME)),
        Candidate::ExeRelative(Path::new("..").join("..").join(ORDERS_DIR_NAME)),
        Candidate::CwdRelative(Path::new("backend").join(ORDERS_DIR_NAME)),
        Candidate::CwdRelative(PathBuf::from(ORDERS_DIR_NAME)),
    ]
}

impl StoreLocator {
    /// Create a locator over an explicit candidate list.
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Locator that only considers the given directory.
    pub fn with_override(dir: impl Into<PathBuf>) -> Self {
        Self::new(vec![Candidate::Explicit(dir.into())])
    }

    /// Locator from an optional override, falling back to the default search order.
    pub fn from_override(dir: Option<PathBuf>) -> Self {
        match dir {
            Some(dir) => Self::with_override(dir),
            None => Self::default(),
        }
    }

    /// Candidates in priority order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Return the first existing candidate directory, or create the first
    /// resolvable one.
    #[instrument(skip(self), fields(candidates = self.candidates.len()))]
    pub fn resolve(&self) -> Result<PathBuf, StoreError> {
        let resolved: Vec<PathBuf> = self.candidates.iter().filter_map(Candidate::resolve).collect();

        for path in &resolved {
            debug!(path = %path.display(), "Checking orders directory candidate");
            if path.is_dir() {
                info!(path = %path.display(), "Found orders directory");
                return Ok(path.clone());
            }
        }

        let fallback = resolved.into_iter().next().ok_or(StoreError::NoCandidate)?;
        fs::create_dir_all(&fallback).map_err(|source| StoreError::Startup {
            path: fallback.clone(),
            source,
        })?;
        info!(path = %fallback.display(), "Created orders directory");

        Ok(fallback)
    }
}
