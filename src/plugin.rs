//! Encoding plugin utilities.
//!
//! A [`Plugin`] creates objects from [`EncodingMetadata`] (an `encoding-type` / `encoding-version` pair and the layout of the node carrying it).
//! It is used to implement the element decoders of the [`encoding`](crate::encoding) registry.
//!
//! Plugins are registered at compile time using the [inventory] crate.
//! At runtime, a name matching function is applied to identify which registered plugin is associated with the metadata.
//! If a match is found, the plugin is created from the metadata.

use thiserror::Error;

use crate::encoding::EncodingMetadata;

/// A plugin.
pub struct Plugin<TPlugin> {
    /// the identifier of the plugin.
    identifier: &'static str,
    /// Tests if the name is a match for this plugin.
    match_name_fn: fn(name: &str) -> bool,
    /// Create an implementation of this plugin from metadata.
    create_fn: fn(metadata: &EncodingMetadata) -> Result<TPlugin, PluginCreateError>,
}

/// An unsupported plugin error.
#[derive(Debug, Error)]
#[error("{plugin_type} {name} version {version} is not supported")]
pub struct PluginUnsupportedError {
    name: String,
    version: String,
    plugin_type: String,
}

impl PluginUnsupportedError {
    /// Create a new [`PluginUnsupportedError`].
    #[must_use]
    pub fn new(name: String, version: String, plugin_type: String) -> Self {
        Self {
            name,
            version,
            plugin_type,
        }
    }

    /// Returns the unsupported name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the version of the unsupported name.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// A plugin version mismatch error.
///
/// The version differs from the implemented version and the node layout is not compatible.
#[derive(Debug, Error)]
#[error("{identifier} version {version} is not compatible with implemented version {implemented}: {reason}")]
pub struct PluginVersionMismatchError {
    identifier: &'static str,
    version: String,
    implemented: &'static str,
    reason: String,
}

impl PluginVersionMismatchError {
    /// Create a new [`PluginVersionMismatchError`].
    #[must_use]
    pub fn new(
        identifier: &'static str,
        version: String,
        implemented: &'static str,
        reason: String,
    ) -> Self {
        Self {
            identifier,
            version,
            implemented,
            reason,
        }
    }

    /// Returns the identifier of the plugin.
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// Returns the declared version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the implemented version.
    #[must_use]
    pub const fn implemented(&self) -> &'static str {
        self.implemented
    }

    /// Returns the layout incompatibility.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A plugin creation error.
#[derive(Error, Debug)]
pub enum PluginCreateError {
    /// An unsupported plugin.
    #[error(transparent)]
    Unsupported(#[from] PluginUnsupportedError),
    /// An incompatible version.
    #[error(transparent)]
    VersionMismatch(#[from] PluginVersionMismatchError),
    /// Other
    #[error("{_0}")]
    Other(String),
}

impl From<&str> for PluginCreateError {
    fn from(err_string: &str) -> Self {
        Self::Other(err_string.to_string())
    }
}

impl From<String> for PluginCreateError {
    fn from(err_string: String) -> Self {
        Self::Other(err_string)
    }
}

impl<TPlugin> Plugin<TPlugin> {
    /// Create a new plugin for registration.
    pub const fn new(
        identifier: &'static str,
        match_name_fn: fn(name: &str) -> bool,
        create_fn: fn(metadata: &EncodingMetadata) -> Result<TPlugin, PluginCreateError>,
    ) -> Self {
        Self {
            identifier,
            match_name_fn,
            create_fn,
        }
    }

    /// Create a `TPlugin` plugin from `metadata`.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginCreateError`] if plugin creation fails due to either:
    ///  - the version being incompatible with the node layout, or
    ///  - some other reason specific to the plugin.
    pub fn create(&self, metadata: &EncodingMetadata) -> Result<TPlugin, PluginCreateError> {
        (self.create_fn)(metadata)
    }

    /// Returns true if this plugin is associated with `name`.
    #[must_use]
    pub fn match_name(&self, name: &str) -> bool {
        (self.match_name_fn)(name)
    }

    /// Returns the identifier of the plugin.
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        self.identifier
    }
}

#[cfg(test)]
mod tests {
    use crate::{container::NodeKind, encoding::NodeLayout};

    use super::*;

    struct TestPlugin;

    fn is_test(name: &str) -> bool {
        name == "test"
    }

    fn create_test(metadata: &EncodingMetadata) -> Result<TestPlugin, PluginCreateError> {
        if metadata.encoding_type() == "test" {
            Ok(TestPlugin)
        } else {
            Err(PluginCreateError::from("invalid name".to_string()))
        }
    }

    #[test]
    fn plugin() {
        let layout = NodeLayout::new(NodeKind::Group, vec![], vec![], None);
        let plugin = Plugin::new("test", is_test, create_test);
        assert!(!plugin.match_name("fail"));
        assert!(plugin.match_name("test"));
        assert_eq!(plugin.identifier(), "test");
        assert!(plugin
            .create(&EncodingMetadata::new("test", Some("0.1.0"), layout.clone()))
            .is_ok());
        assert!(plugin
            .create(&EncodingMetadata::new("fail", None, layout))
            .is_err());
    }

    #[test]
    fn plugin_errors() {
        let err = PluginCreateError::from(PluginUnsupportedError::new(
            "awkward-array".to_string(),
            "0.1.0".to_string(),
            "encoding".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "encoding awkward-array version 0.1.0 is not supported"
        );
        let err = PluginVersionMismatchError::new(
            "csr_matrix",
            "0.2.0".to_string(),
            "0.1.0",
            "missing member indptr".to_string(),
        );
        assert_eq!(err.implemented(), "0.1.0");
        assert_eq!(
            err.to_string(),
            "csr_matrix version 0.2.0 is not compatible with implemented version 0.1.0: missing member indptr"
        );
    }
}
