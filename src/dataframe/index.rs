use itertools::Itertools;

use crate::array::{ArrayData, DataType, ScalarValue};

/// The row labels of a dataframe.
#[derive(Clone, Debug, PartialEq)]
pub struct DataFrameIndex {
    name: Option<String>,
    labels: ArrayData,
}

impl DataFrameIndex {
    /// Create a new index.
    ///
    /// An empty index of any data type is stored as an empty string index.
    ///
    /// # Errors
    /// Returns a description of the problem if the labels are neither strings nor integers.
    pub fn new(name: Option<String>, labels: ArrayData) -> Result<Self, String> {
        let labels = match labels.data_type() {
            DataType::String => labels,
            data_type if data_type.is_integer() => labels,
            _ if labels.is_empty() => ArrayData::String(vec![]),
            data_type => return Err(format!("index labels have data type {data_type}")),
        };
        Ok(Self { name, labels })
    }

    /// Returns the index name, or [`None`] if the index is unnamed.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the labels.
    #[must_use]
    pub const fn labels(&self) -> &ArrayData {
        &self.labels
    }

    /// Returns the number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns label `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<ScalarValue> {
        self.labels.get(index)
    }

    /// Returns the position of the first label equal to `label`.
    #[must_use]
    pub fn position(&self, label: &ScalarValue) -> Option<usize> {
        (0..self.len()).find(|i| self.label(*i).as_ref() == Some(label))
    }

    /// Returns true if any label equals `label`.
    #[must_use]
    pub fn contains(&self, label: impl Into<ScalarValue>) -> bool {
        self.position(&label.into()).is_some()
    }

    /// Returns the distinct labels in order of first appearance.
    #[must_use]
    pub fn unique(&self) -> Vec<ScalarValue> {
        (0..self.len())
            .filter_map(|i| self.label(i))
            .unique_by(ScalarValue::key)
            .collect()
    }

    /// Returns the number of distinct labels.
    #[must_use]
    pub fn n_unique(&self) -> usize {
        self.unique().len()
    }

    /// Returns the labels that appear more than once, in order of their second appearance.
    #[must_use]
    pub fn duplicate_labels(&self) -> Vec<String> {
        (0..self.len())
            .filter_map(|i| self.label(i))
            .map(|label| label.to_string())
            .duplicates()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_labels() {
        let index = DataFrameIndex::new(
            Some("cell_id".to_string()),
            ArrayData::from(vec!["c0".to_string(), "c1".to_string(), "c0".to_string()]),
        )
        .unwrap();
        assert_eq!(index.name(), Some("cell_id"));
        assert_eq!(index.len(), 3);
        assert_eq!(index.position(&ScalarValue::from("c1")), Some(1));
        assert_eq!(index.duplicate_labels(), vec!["c0".to_string()]);
        assert!(index.contains("c1"));
        assert!(!index.contains("c2"));
        assert_eq!(
            index.unique(),
            vec![ScalarValue::from("c0"), ScalarValue::from("c1")]
        );
        assert_eq!(index.n_unique(), 2);
    }

    #[test]
    fn index_integer_labels() {
        let index = DataFrameIndex::new(None, ArrayData::from(vec![3i64, 1, 3, 2])).unwrap();
        assert!(index.contains(2i64));
        assert!(!index.contains("2"));
        assert_eq!(index.n_unique(), 3);
        assert_eq!(
            index.unique(),
            vec![ScalarValue::Int(3), ScalarValue::Int(1), ScalarValue::Int(2)]
        );
    }

    #[test]
    fn index_data_types() {
        assert!(DataFrameIndex::new(None, ArrayData::from(vec![0i64, 1])).is_ok());
        assert!(DataFrameIndex::new(None, ArrayData::from(vec![0.5f64])).is_err());
        let empty = DataFrameIndex::new(None, ArrayData::from(Vec::<f64>::new())).unwrap();
        assert_eq!(empty.labels(), &ArrayData::String(vec![]));
        assert!(empty.duplicate_labels().is_empty());
        assert!(empty.unique().is_empty());
        assert!(!empty.contains(""));
    }
}
