//! The matrix decoder.
//!
//! A [`Matrix`] is the primary matrix `X`, a layer, or a pairwise matrix (`obsp`, `varp`).
//! It is either a dense two-dimensional array or a compressed [`SparseMatrix`].

mod dense;
mod sparse;

pub use sparse::{decode_sparse_matrix, SparseFormat, SparseMatrix};

use crate::{
    array::{ArrayValue, DataType, ScalarValue},
    container::ContainerPath,
    element::{DecodeError, Element},
};

/// A dense or sparse two-dimensional matrix.
#[derive(Clone, Debug, PartialEq)]
pub enum Matrix {
    /// A row-major dense matrix.
    Dense(ArrayValue),
    /// A compressed sparse matrix.
    Sparse(SparseMatrix),
}

impl Matrix {
    /// Create a matrix from a decoded element.
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidElement`] if `element` is not a two-dimensional array or a sparse matrix.
    pub fn try_from_element(element: Element, path: &ContainerPath) -> Result<Self, DecodeError> {
        match element {
            Element::Array(array) if array.ndim() == 2 => Ok(Self::Dense(array)),
            Element::Array(array) => Err(DecodeError::invalid(
                path,
                format!("expected a matrix, found an array of shape {:?}", array.shape()),
            )),
            Element::Sparse(matrix) => Ok(Self::Sparse(matrix)),
            other => Err(DecodeError::invalid(
                path,
                format!("expected a matrix, found a {}", other.kind()),
            )),
        }
    }

    /// Returns the shape `[rows, columns]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 2] {
        match self {
            Self::Dense(array) => match array.shape() {
                &[rows, cols] => [rows, cols],
                _ => [0, 0],
            },
            Self::Sparse(matrix) => matrix.shape(),
        }
    }

    /// Returns the data type of the elements.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Dense(array) => array.data_type(),
            Self::Sparse(matrix) => matrix.data().data_type(),
        }
    }

    /// Returns true if the matrix is sparse.
    #[must_use]
    pub const fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }

    /// Returns the element at (`row`, `col`), or [`None`] if out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<ScalarValue> {
        match self {
            Self::Dense(array) => array.get(&[row, col]),
            Self::Sparse(matrix) => matrix.get(row, col),
        }
    }

    /// Returns the matrix as a dense row-major `f64` vector.
    ///
    /// Returns [`None`] if the elements are not numeric or a sparse matrix cannot be densified (see [`SparseMatrix::to_dense_f64`]).
    #[must_use]
    pub fn to_dense_f64(&self) -> Option<Vec<f64>> {
        match self {
            Self::Dense(array) => array.data().to_f64_vec(),
            Self::Sparse(matrix) => matrix.to_dense_f64(),
        }
    }

    #[cfg(feature = "ndarray")]
    /// Returns the matrix as a dense [`ndarray::Array2`], or [`None`] if [`to_dense_f64`](Matrix::to_dense_f64) does.
    #[must_use]
    pub fn to_ndarray(&self) -> Option<ndarray::Array2<f64>> {
        let [rows, cols] = self.shape();
        ndarray::Array2::from_shape_vec((rows, cols), self.to_dense_f64()?).ok()
    }
}

impl From<Matrix> for Element {
    fn from(matrix: Matrix) -> Self {
        match matrix {
            Matrix::Dense(array) => Self::Array(array),
            Matrix::Sparse(matrix) => Self::Sparse(matrix),
        }
    }
}
