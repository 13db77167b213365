use derive_more::Display;
use thiserror::Error;

/// The path of a group or dataset inside a container.
///
/// A path always starts with `/`. Member names are non-empty, may hold any Unicode and never
/// contain `/`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[display("{_0}")]
pub struct ContainerPath(String);

/// An invalid container path.
#[derive(Debug, Error)]
#[error("invalid container path {0}")]
pub struct ContainerPathError(String);

impl ContainerPath {
    /// Create a new container path from `path`.
    ///
    /// # Errors
    /// Returns [`ContainerPathError`] if `path` is not valid according to [`ContainerPath::validate`()].
    pub fn new(path: &str) -> Result<Self, ContainerPathError> {
        if Self::validate(path) {
            Ok(Self(path.to_string()))
        } else {
            Err(ContainerPathError(path.to_string()))
        }
    }

    /// The root group.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Extracts a string slice containing the path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the root group.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Returns the name of the last member of the path, or an empty string for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Returns the parent path, or [`None`] for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(index) => Some(Self(self.0[..index].to_string())),
            None => None,
        }
    }

    /// Returns the path of the member `name` of this group.
    ///
    /// # Errors
    /// Returns [`ContainerPathError`] if `name` is empty or contains `/`.
    pub fn join(&self, name: &str) -> Result<Self, ContainerPathError> {
        if name.is_empty() || name.contains('/') {
            return Err(ContainerPathError(format!("{self} + {name}")));
        }
        if self.is_root() {
            Ok(Self(format!("/{name}")))
        } else {
            Ok(Self(format!("{}/{name}", self.0)))
        }
    }

    /// Validates a path:
    /// - a path always starts with `/`, and
    /// - a non-root path cannot end with `/`, and
    /// - member names are non-empty (there is no `//` substring).
    #[must_use]
    pub fn validate(path: &str) -> bool {
        path.eq("/") || (path.starts_with('/') && !path.ends_with('/') && !path.contains("//"))
    }
}

impl TryFrom<&str> for ContainerPath {
    type Error = ContainerPathError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}
