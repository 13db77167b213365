//! The annotated data matrix.
//!
//! [`AnnData::from_container`] assembles an [`AnnData`] from any [container](crate::container) in a
//! single top-down pass. [`read_h5ad`] opens an `.h5ad` file and decodes it (requires the `hdf5` feature).

mod axis_arrays;

pub use axis_arrays::{decode_aligned_elements, decode_aligned_matrices, Alignment};

use std::{collections::BTreeMap, fmt};

#[cfg(feature = "hdf5")]
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::{
    config::DecodeOptions,
    container::{ContainerPath, NodeKind, ReadableListableContainerTraits},
    dataframe::DataFrame,
    element::{ContainerResultExt, DecodeError, Element},
    encoding::{decode_element, member_path, EncodingMetadata, ANNDATA, ENCODING_TYPE},
    matrix::Matrix,
    plugin::PluginUnsupportedError,
};

const IMPLEMENTED_VERSION: &str = "0.1.0";

/// An annotated data matrix.
///
/// Every member is aligned with the dataset dimensions:
///  - `obsm` members have `n_obs` rows and `varm` members `n_vars` rows,
///  - `obsp` members are `n_obs × n_obs` and `varp` members `n_vars × n_vars`,
///  - `X` and `layers` members are `n_obs × n_vars`.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnData {
    n_obs: usize,
    n_vars: usize,
    x: Option<Matrix>,
    obs: DataFrame,
    var: DataFrame,
    obsm: BTreeMap<String, Element>,
    varm: BTreeMap<String, Element>,
    obsp: BTreeMap<String, Matrix>,
    varp: BTreeMap<String, Matrix>,
    layers: BTreeMap<String, Matrix>,
    uns: BTreeMap<String, Element>,
}

impl AnnData {
    /// Decode an [`AnnData`] from the root group of `container`.
    ///
    /// The dataset dimensions are the lengths of the `obs` and `var` indexes.
    /// A missing `X`, or an `X` group without a `data` member, decodes to [`None`].
    /// Missing `obsm`, `varm`, `obsp`, `varp`, `layers` and `uns` groups decode to empty collections.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] if `obs` or `var` is missing, any element cannot be decoded, or any member is misaligned with the dataset dimensions.
    /// No partially decoded [`AnnData`] is returned.
    pub fn from_container(
        container: &dyn ReadableListableContainerTraits,
        options: &DecodeOptions,
    ) -> Result<Self, DecodeError> {
        let _span = tracing::debug_span!("decode_anndata").entered();
        let root = ContainerPath::root();
        check_root_encoding(container, &root)?;

        // skipping unsupported entries only applies below uns
        let strict = options.with_skip_unsupported_uns_entries(false);
        let obs = decode_axis_dataframe(container, &root, "obs", &strict)?;
        let var = decode_axis_dataframe(container, &root, "var", &strict)?;
        let (n_obs, n_vars) = (obs.n_rows(), var.n_rows());
        tracing::debug!(n_obs, n_vars, "decoded dataset dimensions");

        let x = decode_x(container, &root, &strict)?;
        if let Some(x) = &x {
            Alignment::Exact(n_obs, n_vars).check("X", "X", &x.shape())?;
        }

        let obsm = decode_aligned_elements(container, "obsm", Alignment::Leading(n_obs), &strict)?;
        let varm = decode_aligned_elements(container, "varm", Alignment::Leading(n_vars), &strict)?;
        let obsp = decode_aligned_matrices(container, "obsp", Alignment::Square(n_obs), &strict)?;
        let varp = decode_aligned_matrices(container, "varp", Alignment::Square(n_vars), &strict)?;
        let layers = decode_aligned_matrices(
            container,
            "layers",
            Alignment::Exact(n_obs, n_vars),
            &strict,
        )?;

        let uns_path = member_path(&root, "uns")?;
        let uns = if container.exists(&uns_path).with_path(&uns_path)? {
            match decode_element(container, &uns_path, options)? {
                Element::Mapping(uns) => uns,
                other => {
                    return Err(DecodeError::invalid(
                        &uns_path,
                        format!("expected a mapping, found a {}", other.kind()),
                    ))
                }
            }
        } else {
            BTreeMap::new()
        };

        if container.exists(&member_path(&root, "raw")?).with_path(&root)? {
            tracing::trace!("skipping raw");
        }

        Ok(Self {
            n_obs,
            n_vars,
            x,
            obs,
            var,
            obsm,
            varm,
            obsp,
            varp,
            layers,
            uns,
        })
    }

    /// Returns the number of observations (rows).
    #[must_use]
    pub const fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// Returns the number of variables (columns).
    #[must_use]
    pub const fn n_vars(&self) -> usize {
        self.n_vars
    }

    /// Returns the dataset dimensions `(n_obs, n_vars)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.n_obs, self.n_vars)
    }

    /// Returns the primary matrix, or [`None`] if it is absent.
    #[must_use]
    pub const fn x(&self) -> Option<&Matrix> {
        self.x.as_ref()
    }

    /// Returns the observation annotations.
    #[must_use]
    pub const fn obs(&self) -> &DataFrame {
        &self.obs
    }

    /// Returns the variable annotations.
    #[must_use]
    pub const fn var(&self) -> &DataFrame {
        &self.var
    }

    /// Returns the observation names.
    #[must_use]
    pub fn obs_names(&self) -> Vec<String> {
        index_names(&self.obs)
    }

    /// Returns the variable names.
    #[must_use]
    pub fn var_names(&self) -> Vec<String> {
        index_names(&self.var)
    }

    /// Returns the observation-aligned arrays and tables.
    #[must_use]
    pub const fn obsm(&self) -> &BTreeMap<String, Element> {
        &self.obsm
    }

    /// Returns the variable-aligned arrays and tables.
    #[must_use]
    pub const fn varm(&self) -> &BTreeMap<String, Element> {
        &self.varm
    }

    /// Returns the pairwise observation matrices.
    #[must_use]
    pub const fn obsp(&self) -> &BTreeMap<String, Matrix> {
        &self.obsp
    }

    /// Returns the pairwise variable matrices.
    #[must_use]
    pub const fn varp(&self) -> &BTreeMap<String, Matrix> {
        &self.varp
    }

    /// Returns the alternate matrices sharing the shape of `X`.
    #[must_use]
    pub const fn layers(&self) -> &BTreeMap<String, Matrix> {
        &self.layers
    }

    /// Returns the unstructured annotations.
    #[must_use]
    pub const fn uns(&self) -> &BTreeMap<String, Element> {
        &self.uns
    }
}

fn index_names(df: &DataFrame) -> Vec<String> {
    (0..df.n_rows())
        .filter_map(|i| df.index().label(i))
        .map(|label| label.to_string())
        .collect()
}

fn check_root_encoding(
    container: &dyn ReadableListableContainerTraits,
    root: &ContainerPath,
) -> Result<(), DecodeError> {
    let metadata = EncodingMetadata::read(container, root)?;
    if metadata.encoding_type() == ANNDATA {
        metadata
            .check_version(ANNDATA, IMPLEMENTED_VERSION, |layout| {
                layout.require_children(&["obs", "var"])
            })
            .map_err(|err| DecodeError::from_plugin(root, &metadata, err))
    } else if metadata.layout().has_attribute(ENCODING_TYPE) {
        Err(DecodeError::from_plugin(
            root,
            &metadata,
            PluginUnsupportedError::new(
                metadata.encoding_type().to_string(),
                metadata.encoding_version().unwrap_or("unspecified").to_string(),
                "root encoding".to_string(),
            )
            .into(),
        ))
    } else {
        // containers written before encoding attributes existed
        Ok(())
    }
}

fn decode_axis_dataframe(
    container: &dyn ReadableListableContainerTraits,
    root: &ContainerPath,
    axis: &str,
    options: &DecodeOptions,
) -> Result<DataFrame, DecodeError> {
    let path = member_path(root, axis)?;
    match decode_element(container, &path, options)? {
        Element::DataFrame(df) => Ok(df),
        other => Err(DecodeError::invalid(
            &path,
            format!("expected a dataframe, found a {}", other.kind()),
        )),
    }
}

fn decode_x(
    container: &dyn ReadableListableContainerTraits,
    root: &ContainerPath,
    options: &DecodeOptions,
) -> Result<Option<Matrix>, DecodeError> {
    let path = member_path(root, "X")?;
    let metadata = match EncodingMetadata::read(container, &path) {
        Ok(metadata) => metadata,
        Err(DecodeError::NotFound { .. }) => return Ok(None),
        Err(err) => return Err(err),
    };
    let layout = metadata.layout();
    if layout.kind() == NodeKind::Group && !layout.has_child("data") {
        tracing::debug!("X is an empty group");
        return Ok(None);
    }
    let element = decode_element(container, &path, options)?;
    Matrix::try_from_element(element, &path).map(Some)
}

impl fmt::Display for AnnData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn quoted<'a>(names: impl Iterator<Item = &'a str>) -> String {
            names.map(|name| format!("'{name}'")).join(", ")
        }
        write!(
            f,
            "AnnData object with n_obs × n_vars = {} × {}",
            self.n_obs, self.n_vars
        )?;
        let fields = [
            ("obs", quoted(self.obs.column_names())),
            ("var", quoted(self.var.column_names())),
            ("uns", quoted(self.uns.keys().map(String::as_str))),
            ("obsm", quoted(self.obsm.keys().map(String::as_str))),
            ("varm", quoted(self.varm.keys().map(String::as_str))),
            ("layers", quoted(self.layers.keys().map(String::as_str))),
            ("obsp", quoted(self.obsp.keys().map(String::as_str))),
            ("varp", quoted(self.varp.keys().map(String::as_str))),
        ];
        for (field, names) in fields {
            if !names.is_empty() {
                write!(f, "\n    {field}: {names}")?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "hdf5")]
/// An error reading an `.h5ad` file.
#[derive(Debug, thiserror::Error)]
#[error("unable to read {}: {source}", path.display())]
pub struct AnnDataReadError {
    path: PathBuf,
    #[source]
    source: DecodeError,
}

#[cfg(feature = "hdf5")]
impl AnnDataReadError {
    /// Returns the path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the decode error.
    #[must_use]
    pub const fn error(&self) -> &DecodeError {
        &self.source
    }
}

#[cfg(feature = "hdf5")]
/// Read the `.h5ad` file at `path` with the default [`DecodeOptions`].
///
/// # Errors
/// Returns an [`AnnDataReadError`] if the file cannot be opened or decoded.
pub fn read_h5ad(path: impl AsRef<Path>) -> Result<AnnData, AnnDataReadError> {
    read_h5ad_with_options(path, &DecodeOptions::default())
}

#[cfg(feature = "hdf5")]
/// Read the `.h5ad` file at `path` with `options`.
///
/// The file is held open for the duration of the decode and closed on return.
///
/// # Errors
/// Returns an [`AnnDataReadError`] if the file cannot be opened or decoded.
pub fn read_h5ad_with_options(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<AnnData, AnnDataReadError> {
    use crate::container::{store::Hdf5Container, ContainerHandle};

    let path = path.as_ref();
    let read_error = |source| AnnDataReadError {
        path: path.to_path_buf(),
        source,
    };
    let container = Hdf5Container::open(path).map_err(|source| {
        read_error(DecodeError::ContainerOpen {
            path: ContainerPath::root(),
            source,
        })
    })?;
    let handle = ContainerHandle::new(path.display().to_string(), Box::new(container));
    AnnData::from_container(&handle, options).map_err(read_error)
}
