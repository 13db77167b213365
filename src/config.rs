//! Global configuration options and per-decode options.

use std::sync::OnceLock;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Global configuration options for the h5ad crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
/// The global configuration provides the defaults of [`DecodeOptions`], which can override any option for a single decode.
///
/// ## Validate Sparse Indices
///  > default: [`true`]
///
/// If enabled, the `indptr` of a sparse matrix must be non-decreasing and every entry of `indices` must be less than the inner dimension.
/// Structural checks (array lengths, `indptr` bounds) are always applied.
/// Disabling this skips a full pass over `indices` for trusted inputs.
///
/// ## Warn Duplicate Index Labels
///  > default: [`true`]
///
/// If enabled, a dataframe index holding duplicate labels is logged as a warning.
/// Duplicate labels are never an error.
///
/// ## Skip Unsupported Uns Entries
///  > default: [`false`]
///
/// If enabled, members of `uns` with an unsupported or mismatched encoding are logged and skipped, instead of failing the decode.
/// This applies to nested `uns` mappings, but never to `obs`, `var`, `X` or the aligned collections.
#[derive(Debug)]
pub struct Config {
    validate_sparse_indices: bool,
    warn_duplicate_index_labels: bool,
    skip_unsupported_uns_entries: bool,
}

#[allow(clippy::derivable_impls)]
impl Default for Config {
    fn default() -> Self {
        Config {
            validate_sparse_indices: true,
            warn_duplicate_index_labels: true,
            skip_unsupported_uns_entries: false,
        }
    }
}

impl Config {
    /// Get the [validate sparse indices](#validate-sparse-indices) configuration.
    #[must_use]
    pub fn validate_sparse_indices(&self) -> bool {
        self.validate_sparse_indices
    }

    /// Set the [validate sparse indices](#validate-sparse-indices) configuration.
    pub fn set_validate_sparse_indices(&mut self, validate_sparse_indices: bool) -> &mut Self {
        self.validate_sparse_indices = validate_sparse_indices;
        self
    }

    /// Get the [warn duplicate index labels](#warn-duplicate-index-labels) configuration.
    #[must_use]
    pub fn warn_duplicate_index_labels(&self) -> bool {
        self.warn_duplicate_index_labels
    }

    /// Set the [warn duplicate index labels](#warn-duplicate-index-labels) configuration.
    pub fn set_warn_duplicate_index_labels(
        &mut self,
        warn_duplicate_index_labels: bool,
    ) -> &mut Self {
        self.warn_duplicate_index_labels = warn_duplicate_index_labels;
        self
    }

    /// Get the [skip unsupported uns entries](#skip-unsupported-uns-entries) configuration.
    #[must_use]
    pub fn skip_unsupported_uns_entries(&self) -> bool {
        self.skip_unsupported_uns_entries
    }

    /// Set the [skip unsupported uns entries](#skip-unsupported-uns-entries) configuration.
    pub fn set_skip_unsupported_uns_entries(
        &mut self,
        skip_unsupported_uns_entries: bool,
    ) -> &mut Self {
        self.skip_unsupported_uns_entries = skip_unsupported_uns_entries;
        self
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global h5ad configuration.
///
/// This function might deadlock if the global config is already mutably held by the current thread.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default())).read()
}

/// Returns a mutable reference to the global h5ad configuration.
///
/// This function might deadlock if the global config is already held by the current thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default())).write()
}

/// Options for a single decode.
///
/// The defaults are taken from the [global configuration](global_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    validate_sparse_indices: bool,
    warn_duplicate_index_labels: bool,
    skip_unsupported_uns_entries: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        let config = global_config();
        Self {
            validate_sparse_indices: config.validate_sparse_indices(),
            warn_duplicate_index_labels: config.warn_duplicate_index_labels(),
            skip_unsupported_uns_entries: config.skip_unsupported_uns_entries(),
        }
    }
}

impl DecodeOptions {
    /// Return the validate sparse indices option.
    #[must_use]
    pub fn validate_sparse_indices(&self) -> bool {
        self.validate_sparse_indices
    }

    /// Set whether to validate sparse matrix indices.
    pub fn set_validate_sparse_indices(&mut self, validate_sparse_indices: bool) {
        self.validate_sparse_indices = validate_sparse_indices;
    }

    /// Set whether to validate sparse matrix indices.
    #[must_use]
    pub fn with_validate_sparse_indices(mut self, validate_sparse_indices: bool) -> Self {
        self.validate_sparse_indices = validate_sparse_indices;
        self
    }

    /// Return the warn duplicate index labels option.
    #[must_use]
    pub fn warn_duplicate_index_labels(&self) -> bool {
        self.warn_duplicate_index_labels
    }

    /// Set whether to warn on duplicate dataframe index labels.
    #[must_use]
    pub fn with_warn_duplicate_index_labels(mut self, warn_duplicate_index_labels: bool) -> Self {
        self.warn_duplicate_index_labels = warn_duplicate_index_labels;
        self
    }

    /// Return the skip unsupported uns entries option.
    #[must_use]
    pub fn skip_unsupported_uns_entries(&self) -> bool {
        self.skip_unsupported_uns_entries
    }

    /// Set whether to skip `uns` entries with an unsupported encoding.
    #[must_use]
    pub fn with_skip_unsupported_uns_entries(mut self, skip_unsupported_uns_entries: bool) -> Self {
        self.skip_unsupported_uns_entries = skip_unsupported_uns_entries;
        self
    }
}
