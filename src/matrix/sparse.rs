//! Compressed sparse row and column matrices.

use derive_more::Display;

use crate::{
    array::{ArrayData, ScalarValue},
    config::DecodeOptions,
    container::{ContainerPath, ReadableListableContainerTraits},
    element::{ContainerResultExt, DecodeError, Element},
    encoding::{
        member_path, ElementDecoder, ElementDecoderTraits, EncodingMetadata, EncodingPlugin,
        NodeLayout, CSC_MATRIX, CSR_MATRIX,
    },
    plugin::PluginCreateError,
};

const IMPLEMENTED_VERSION: &str = "0.1.0";

// Register the sparse matrix decoders.
inventory::submit! {
    EncodingPlugin::new(CSR_MATRIX, is_name_csr_matrix, create_decoder_csr_matrix)
}
inventory::submit! {
    EncodingPlugin::new(CSC_MATRIX, is_name_csc_matrix, create_decoder_csc_matrix)
}

fn is_name_csr_matrix(name: &str) -> bool {
    name.eq(CSR_MATRIX)
}

fn is_name_csc_matrix(name: &str) -> bool {
    name.eq(CSC_MATRIX)
}

fn sparse_layout(layout: &NodeLayout) -> Result<(), String> {
    layout.require_children(&["data", "indices", "indptr"])?;
    if layout.has_attribute("shape") {
        Ok(())
    } else {
        Err("missing attribute shape".to_string())
    }
}

fn create_decoder_csr_matrix(metadata: &EncodingMetadata) -> Result<ElementDecoder, PluginCreateError> {
    metadata.check_version(CSR_MATRIX, IMPLEMENTED_VERSION, sparse_layout)?;
    Ok(Box::new(SparseMatrixDecoder::new(SparseFormat::Csr)))
}

fn create_decoder_csc_matrix(metadata: &EncodingMetadata) -> Result<ElementDecoder, PluginCreateError> {
    metadata.check_version(CSC_MATRIX, IMPLEMENTED_VERSION, sparse_layout)?;
    Ok(Box::new(SparseMatrixDecoder::new(SparseFormat::Csc)))
}

/// The compression axis of a sparse matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum SparseFormat {
    /// Compressed sparse row: `indptr` runs over rows, `indices` are column indices.
    #[display("csr")]
    Csr,
    /// Compressed sparse column: `indptr` runs over columns, `indices` are row indices.
    #[display("csc")]
    Csc,
}

/// A compressed sparse matrix.
///
/// The non-zero elements of outer index `i` (a row for CSR, a column for CSC) are
/// `data[indptr[i]..indptr[i + 1]]` at inner indices `indices[indptr[i]..indptr[i + 1]]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix {
    format: SparseFormat,
    shape: [usize; 2],
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: ArrayData,
}

impl SparseMatrix {
    /// Create a new sparse matrix, validating its structure.
    ///
    /// The lengths of `indptr`, `indices` and `data` and the bounds of `indptr` are always checked.
    /// If `validate_indices` is true, `indptr` must also be non-decreasing and every index must be within the inner dimension.
    ///
    /// # Errors
    /// Returns a description of the first violated constraint.
    pub fn new(
        format: SparseFormat,
        shape: [usize; 2],
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: ArrayData,
        validate_indices: bool,
    ) -> Result<Self, String> {
        let matrix = Self {
            format,
            shape,
            indptr,
            indices,
            data,
        };
        matrix.validate(validate_indices)?;
        Ok(matrix)
    }

    fn validate(&self, validate_indices: bool) -> Result<(), String> {
        let (outer, inner) = (self.outer_dim(), self.inner_dim());
        let indptr_len = outer.checked_add(1).ok_or_else(|| {
            format!(
                "{} shape {:?} is too large to be indexed",
                self.format, self.shape
            )
        })?;
        if self.indptr.len() != indptr_len {
            return Err(format!(
                "indptr has length {}, expected {indptr_len} for {} shape {:?}",
                self.indptr.len(),
                self.format,
                self.shape
            ));
        }
        if self.indices.len() != self.data.len() {
            return Err(format!(
                "indices has length {}, but data has length {}",
                self.indices.len(),
                self.data.len()
            ));
        }
        if self.indptr.first() != Some(&0) {
            return Err("indptr does not start at 0".to_string());
        }
        if self.indptr.last() != Some(&self.data.len()) {
            return Err(format!(
                "indptr ends at {:?}, expected the number of stored elements {}",
                self.indptr.last(),
                self.data.len()
            ));
        }
        if validate_indices {
            if let Some(position) = self.indptr.windows(2).position(|w| w[0] > w[1]) {
                return Err(format!("indptr decreases at position {}", position + 1));
            }
            if let Some(index) = self.indices.iter().find(|index| **index >= inner) {
                return Err(format!(
                    "index {index} is out of bounds for inner dimension {inner}"
                ));
            }
        }
        Ok(())
    }

    /// Returns the format.
    #[must_use]
    pub const fn format(&self) -> SparseFormat {
        self.format
    }

    /// Returns the shape `[rows, columns]`.
    #[must_use]
    pub const fn shape(&self) -> [usize; 2] {
        self.shape
    }

    /// Returns the number of stored elements.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Returns the index pointers.
    #[must_use]
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    /// Returns the inner indices of the stored elements.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the stored elements.
    #[must_use]
    pub const fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Returns the length of the compressed axis.
    #[must_use]
    pub const fn outer_dim(&self) -> usize {
        match self.format {
            SparseFormat::Csr => self.shape[0],
            SparseFormat::Csc => self.shape[1],
        }
    }

    /// Returns the length of the indexed axis.
    #[must_use]
    pub const fn inner_dim(&self) -> usize {
        match self.format {
            SparseFormat::Csr => self.shape[1],
            SparseFormat::Csc => self.shape[0],
        }
    }

    /// Returns the position in [`data`](SparseMatrix::data) of the element at (`row`, `col`), or [`None`] if it is not stored.
    fn position(&self, row: usize, col: usize) -> Option<usize> {
        let (outer, inner) = match self.format {
            SparseFormat::Csr => (row, col),
            SparseFormat::Csc => (col, row),
        };
        let start = *self.indptr.get(outer)?;
        let end = *self.indptr.get(outer + 1)?;
        self.indices
            .get(start..end)?
            .iter()
            .position(|index| *index == inner)
            .map(|offset| start + offset)
    }

    /// Returns the element at (`row`, `col`).
    ///
    /// Elements that are not stored are zero. Returns [`None`] if (`row`, `col`) is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<ScalarValue> {
        if row >= self.shape[0] || col >= self.shape[1] {
            return None;
        }
        match self.position(row, col) {
            Some(position) => self.data.get(position),
            None => Some(zero_of(&self.data)),
        }
    }

    /// Returns the matrix as a dense row-major `f64` vector.
    ///
    /// Returns [`None`] if the elements are not numeric, the dense size overflows or cannot be allocated,
    /// or a stored element lies outside the shape (possible if index validation was skipped).
    #[must_use]
    pub fn to_dense_f64(&self) -> Option<Vec<f64>> {
        let values = self.data.to_f64_vec()?;
        let [rows, cols] = self.shape;
        let len = rows.checked_mul(cols)?;
        let mut dense = Vec::new();
        dense.try_reserve_exact(len).ok()?;
        dense.resize(len, 0.0);
        for (outer, bounds) in self.indptr.windows(2).enumerate() {
            for position in bounds[0]..bounds[1] {
                let inner = *self.indices.get(position)?;
                let (row, col) = match self.format {
                    SparseFormat::Csr => (outer, inner),
                    SparseFormat::Csc => (inner, outer),
                };
                if row >= rows || col >= cols {
                    return None;
                }
                dense[row * cols + col] += values.get(position)?;
            }
        }
        Some(dense)
    }
}

fn zero_of(data: &ArrayData) -> ScalarValue {
    match data {
        ArrayData::Bool(_) => ScalarValue::Bool(false),
        ArrayData::Int8(_) | ArrayData::Int16(_) | ArrayData::Int32(_) | ArrayData::Int64(_) => {
            ScalarValue::Int(0)
        }
        ArrayData::UInt8(_)
        | ArrayData::UInt16(_)
        | ArrayData::UInt32(_)
        | ArrayData::UInt64(_) => ScalarValue::UInt(0),
        _ => ScalarValue::Float(0.0),
    }
}

/// The decoder of `csr_matrix` and `csc_matrix` groups.
#[derive(Debug)]
struct SparseMatrixDecoder {
    format: SparseFormat,
}

impl SparseMatrixDecoder {
    const fn new(format: SparseFormat) -> Self {
        Self { format }
    }
}

impl ElementDecoderTraits for SparseMatrixDecoder {
    fn decode(
        &self,
        container: &dyn ReadableListableContainerTraits,
        path: &ContainerPath,
        options: &DecodeOptions,
    ) -> Result<Element, DecodeError> {
        decode_sparse_matrix(container, path, self.format, options).map(Element::Sparse)
    }
}

/// Decode the sparse matrix group at `path`.
///
/// # Errors
/// Returns [`DecodeError::MalformedSparseMatrix`] if the matrix is structurally invalid, or another [`DecodeError`] if a member is missing or cannot be read.
pub fn decode_sparse_matrix(
    container: &dyn ReadableListableContainerTraits,
    path: &ContainerPath,
    format: SparseFormat,
    options: &DecodeOptions,
) -> Result<SparseMatrix, DecodeError> {
    let malformed = |reason: String| DecodeError::MalformedSparseMatrix {
        path: path.clone(),
        reason,
    };

    let shape = container
        .attribute(path, "shape")
        .with_path(path)?
        .ok_or_else(|| malformed("missing shape attribute".to_string()))?;
    let shape = match shape.data().to_usize_vec().as_deref() {
        Some(&[rows, cols]) => [rows, cols],
        _ => {
            return Err(malformed(format!(
                "shape attribute {} is not two non-negative integers",
                shape.data().preview(4)
            )))
        }
    };

    let read_member = |name: &str| -> Result<ArrayData, DecodeError> {
        let member = member_path(path, name)?;
        let value = container.read_dataset(&member).with_path(&member)?;
        if value.ndim() == 1 {
            Ok(value.into_data())
        } else {
            Err(malformed(format!(
                "{name} has {} dimensions, expected 1",
                value.ndim()
            )))
        }
    };
    let indptr = read_member("indptr")?
        .to_usize_vec()
        .ok_or_else(|| malformed("indptr is not non-negative integers".to_string()))?;
    let indices = read_member("indices")?
        .to_usize_vec()
        .ok_or_else(|| malformed("indices is not non-negative integers".to_string()))?;
    let data = read_member("data")?;

    SparseMatrix::new(
        format,
        shape,
        indptr,
        indices,
        data,
        options.validate_sparse_indices(),
    )
    .map_err(malformed)
}
