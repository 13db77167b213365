//! The dataframe decoder.
//!
//! A `dataframe` group holds one dataset per column and an index dataset of row labels.
//! Its attributes name the index dataset (`_index`) and order the columns (`column-order`).
//! Columns are decoded through the [encoding registry](crate::encoding), so any column may itself be
//! a `categorical` or nullable array.
//!
//! Legacy containers store categorical columns as integer codes with the categories in a
//! `__categories/<column>` dataset. These are decoded into [`Categorical`] columns.

mod categorical;
mod column;
mod index;
mod nullable;

pub use categorical::Categorical;
pub use column::Column;
pub use index::DataFrameIndex;
pub use nullable::{NullableArray, NullableKind};

use crate::{
    config::DecodeOptions,
    container::{string_attribute, ContainerPath, NodeKind, ReadableListableContainerTraits},
    element::{ContainerResultExt, DecodeError, Element},
    encoding::{
        decode_element, member_path, ElementDecoder, ElementDecoderTraits, EncodingMetadata,
        EncodingPlugin, NodeLayout, DATAFRAME,
    },
    plugin::PluginCreateError,
};

const IMPLEMENTED_VERSION: &str = "0.2.0";

/// The default name of the index dataset.
pub const DEFAULT_INDEX: &str = "_index";

const LEGACY_CATEGORIES: &str = "__categories";

// Register the dataframe decoder.
inventory::submit! {
    EncodingPlugin::new(DATAFRAME, is_name_dataframe, create_decoder_dataframe)
}

fn is_name_dataframe(name: &str) -> bool {
    name.eq(DATAFRAME)
}

fn dataframe_layout(layout: &NodeLayout) -> Result<(), String> {
    layout.require_kind(NodeKind::Group)?;
    if layout.has_attribute("_index") {
        Ok(())
    } else {
        Err("missing attribute _index".to_string())
    }
}

fn create_decoder_dataframe(
    metadata: &EncodingMetadata,
) -> Result<ElementDecoder, PluginCreateError> {
    metadata.check_version(DATAFRAME, IMPLEMENTED_VERSION, dataframe_layout)?;
    metadata.layout().require_kind(NodeKind::Group)?;
    Ok(Box::new(DataFrameDecoder))
}

/// A table of named columns sharing a row index.
#[derive(Clone, Debug, PartialEq)]
pub struct DataFrame {
    index: DataFrameIndex,
    columns: Vec<(String, Column)>,
}

impl DataFrame {
    /// Create a new dataframe.
    ///
    /// # Errors
    /// Returns the name and length of the first column whose length differs from the index length.
    pub fn new(
        index: DataFrameIndex,
        columns: Vec<(String, Column)>,
    ) -> Result<Self, (String, usize)> {
        if let Some((name, column)) = columns
            .iter()
            .find(|(_, column)| column.len() != index.len())
        {
            return Err((name.clone(), column.len()));
        }
        Ok(Self { index, columns })
    }

    /// Returns the index.
    #[must_use]
    pub const fn index(&self) -> &DataFrameIndex {
        &self.index
    }

    /// Returns the columns in order.
    #[must_use]
    pub fn columns(&self) -> &[(String, Column)] {
        &self.columns
    }

    /// Returns the column `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find_map(|(column_name, column)| (column_name == name).then_some(column))
    }

    /// Returns the column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}

/// The decoder of `dataframe` groups.
#[derive(Debug)]
struct DataFrameDecoder;

impl ElementDecoderTraits for DataFrameDecoder {
    fn decode(
        &self,
        container: &dyn ReadableListableContainerTraits,
        path: &ContainerPath,
        options: &DecodeOptions,
    ) -> Result<Element, DecodeError> {
        decode_dataframe(container, path, options).map(Element::DataFrame)
    }
}

/// Decode the dataframe group at `path`.
///
/// # Errors
/// Returns
///  - [`DecodeError::MissingIndex`] if the index dataset does not exist,
///  - [`DecodeError::ColumnLengthMismatch`] if a column length differs from the index length, or
///  - another [`DecodeError`] if a declared column is missing or cannot be decoded.
pub fn decode_dataframe(
    container: &dyn ReadableListableContainerTraits,
    path: &ContainerPath,
    options: &DecodeOptions,
) -> Result<DataFrame, DecodeError> {
    let children = container.children(path).with_path(path)?;

    let index_attribute = string_attribute(container, path, "_index").with_path(path)?;
    let index_dataset = index_attribute.as_deref().unwrap_or(DEFAULT_INDEX);
    let index_name = index_attribute
        .as_deref()
        .filter(|name| *name != DEFAULT_INDEX)
        .map(str::to_string);

    let column_order = match container.attribute(path, "column-order").with_path(path)? {
        Some(column_order) => column_order.to_string_list().ok_or_else(|| {
            DecodeError::invalid(
                path,
                format!(
                    "column-order has data type {}, expected strings",
                    column_order.data_type()
                ),
            )
        })?,
        None => children
            .iter()
            .filter(|child| *child != index_dataset && *child != LEGACY_CATEGORIES)
            .cloned()
            .collect(),
    };

    if !children.iter().any(|child| child == index_dataset) {
        return Err(DecodeError::MissingIndex {
            path: path.clone(),
            index: index_dataset.to_string(),
        });
    }
    let index_path = member_path(path, index_dataset)?;
    let labels = match decode_element(container, &index_path, options)? {
        Element::Array(array) if array.ndim() == 1 => array.into_data(),
        other => {
            return Err(DecodeError::invalid(
                &index_path,
                format!("expected one-dimensional index labels, found a {}", other.kind()),
            ))
        }
    };
    let index = DataFrameIndex::new(index_name, labels)
        .map_err(|reason| DecodeError::invalid(&index_path, reason))?;
    if options.warn_duplicate_index_labels() {
        let duplicates = index.duplicate_labels();
        if !duplicates.is_empty() {
            tracing::warn!(
                path = %path,
                count = duplicates.len(),
                first = %duplicates[0],
                "dataframe index has duplicate labels"
            );
        }
    }

    let legacy_categories = if children.iter().any(|child| child == LEGACY_CATEGORIES) {
        Some(member_path(path, LEGACY_CATEGORIES)?)
    } else {
        None
    };

    let mut columns = Vec::with_capacity(column_order.len());
    for name in column_order {
        let column_path = member_path(path, &name)?;
        let categories_path = match &legacy_categories {
            Some(categories) => Some(member_path(categories, &name)?),
            None => None,
        };
        let column = match categories_path {
            Some(categories_path)
                if container
                    .exists(&categories_path)
                    .with_path(&categories_path)? =>
            {
                decode_legacy_categorical(container, &column_path, &categories_path)?
            }
            _ => Column::try_from_element(
                decode_element(container, &column_path, options)?,
                &column_path,
            )?,
        };
        columns.push((name, column));
    }

    let n_rows = index.len();
    DataFrame::new(index, columns).map_err(|(column, found)| DecodeError::ColumnLengthMismatch {
        path: path.clone(),
        column,
        expected: n_rows,
        found,
    })
}

fn decode_legacy_categorical(
    container: &dyn ReadableListableContainerTraits,
    codes_path: &ContainerPath,
    categories_path: &ContainerPath,
) -> Result<Column, DecodeError> {
    tracing::trace!(path = %codes_path, "decoding legacy categorical column");
    let codes = container.read_dataset(codes_path).with_path(codes_path)?;
    let codes = codes.data().to_i64_vec().ok_or_else(|| {
        DecodeError::invalid(
            codes_path,
            format!("categorical codes have data type {}", codes.data_type()),
        )
    })?;
    let categories = container
        .read_dataset(categories_path)
        .with_path(categories_path)?
        .into_data();
    let ordered = container
        .attribute(categories_path, "ordered")
        .with_path(categories_path)?
        .and_then(|ordered| ordered.as_scalar())
        .and_then(|ordered| ordered.as_bool())
        .unwrap_or(false);
    Categorical::new(codes, categories, ordered)
        .map(Column::Categorical)
        .map_err(|reason| DecodeError::invalid(codes_path, reason))
}
