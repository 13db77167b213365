use std::collections::BTreeMap;

use derive_more::Display;

use crate::{
    config::DecodeOptions,
    container::{ContainerPath, ReadableListableContainerTraits},
    element::{ContainerResultExt, DecodeError, Element},
    encoding::{decode_element, member_path},
    matrix::Matrix,
};

/// The shape required of every member of an aligned collection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum Alignment {
    /// The leading dimension equals the axis length (`obsm`, `varm`).
    #[display("({_0}, *)")]
    Leading(usize),
    /// A square matrix with the side equal to the axis length (`obsp`, `varp`).
    #[display("({_0}, {_0})")]
    Square(usize),
    /// An exact two-dimensional shape (`X`, `layers`).
    #[display("({_0}, {_1})")]
    Exact(usize, usize),
}

impl Alignment {
    /// Returns true if `shape` satisfies the alignment.
    #[must_use]
    pub fn accepts(&self, shape: &[usize]) -> bool {
        match *self {
            Self::Leading(n) => shape.first() == Some(&n),
            Self::Square(n) => shape == [n, n],
            Self::Exact(rows, cols) => shape == [rows, cols],
        }
    }

    /// Check that member `member` of `collection` has an accepted `shape`.
    ///
    /// # Errors
    /// Returns [`DecodeError::ShapeMismatch`] if it does not.
    pub fn check(&self, collection: &str, member: &str, shape: &[usize]) -> Result<(), DecodeError> {
        if self.accepts(shape) {
            Ok(())
        } else {
            Err(DecodeError::ShapeMismatch {
                collection: collection.to_string(),
                member: member.to_string(),
                expected: self.to_string(),
                found: shape.to_vec(),
            })
        }
    }
}

fn decode_members(
    container: &dyn ReadableListableContainerTraits,
    collection: &str,
    options: &DecodeOptions,
    mut decode: impl FnMut(String, ContainerPath, Element) -> Result<(), DecodeError>,
) -> Result<(), DecodeError> {
    let path = member_path(&ContainerPath::root(), collection)?;
    if !container.exists(&path).with_path(&path)? {
        tracing::trace!(collection, "collection is absent");
        return Ok(());
    }
    for name in container.children(&path).with_path(&path)? {
        let member = member_path(&path, &name)?;
        let element = decode_element(container, &member, options)?;
        decode(name, member, element)?;
    }
    Ok(())
}

/// Decode the members of the root group `collection`, checking each against `alignment`.
///
/// An absent collection is empty.
///
/// # Errors
/// Returns [`DecodeError::ShapeMismatch`] if a member is misaligned, or another [`DecodeError`] if a member cannot be decoded.
pub fn decode_aligned_elements(
    container: &dyn ReadableListableContainerTraits,
    collection: &str,
    alignment: Alignment,
    options: &DecodeOptions,
) -> Result<BTreeMap<String, Element>, DecodeError> {
    let mut elements = BTreeMap::new();
    decode_members(container, collection, options, |name, _, element| {
        alignment.check(collection, &name, &element.shape().unwrap_or_default())?;
        elements.insert(name, element);
        Ok(())
    })?;
    Ok(elements)
}

/// Decode the matrices of the root group `collection`, checking each against `alignment`.
///
/// An absent collection is empty.
///
/// # Errors
/// Returns [`DecodeError::ShapeMismatch`] if a member is misaligned, or another [`DecodeError`] if a member is not a matrix.
pub fn decode_aligned_matrices(
    container: &dyn ReadableListableContainerTraits,
    collection: &str,
    alignment: Alignment,
    options: &DecodeOptions,
) -> Result<BTreeMap<String, Matrix>, DecodeError> {
    let mut matrices = BTreeMap::new();
    decode_members(container, collection, options, |name, member, element| {
        alignment.check(collection, &name, &element.shape().unwrap_or_default())?;
        matrices.insert(name, Matrix::try_from_element(element, &member)?);
        Ok(())
    })?;
    Ok(matrices)
}
