#![allow(dead_code)]

//! Builders for in-memory `.h5ad` containers laid out the way `anndata` writes them.

use h5ad::{
    array::{ArrayData, ArrayValue, CompoundData, ScalarValue},
    container::{
        store::MemoryContainer, ContainerPath, DatasetFilter, WritableContainerTraits,
    },
    matrix::SparseFormat,
};

pub const N_OBS: usize = 20;
pub const N_VARS: usize = 10;

pub fn path(path: &str) -> ContainerPath {
    ContainerPath::new(path).unwrap()
}

pub fn names(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}_{i}")).collect()
}

/// Cycle through `options`, with a different phase per `seed`.
pub fn choice(options: &[&str], n: usize, seed: usize) -> Vec<String> {
    (0..n)
        .map(|i| options[(i * 7 + seed) % options.len()].to_string())
        .collect()
}

/// Deterministic values in `[0, 1)`.
pub fn dense_values(len: usize, seed: usize) -> Vec<f32> {
    (0..len)
        .map(|i| ((i * 31 + seed * 17) % 97) as f32 / 97.0)
        .collect()
}

/// Deterministic values in `[0, 1)` where roughly one in `sparsity` elements is non-zero.
pub fn sparse_values(len: usize, seed: usize, sparsity: usize) -> Vec<f32> {
    dense_values(len, seed)
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            if (i * 13 + seed) % sparsity == 0 {
                v + 0.5
            } else {
                0.0
            }
        })
        .collect()
}

pub fn no_columns() -> Vec<(&'static str, ColumnData)> {
    vec![]
}

/// A dataframe column to write.
pub enum ColumnData {
    Array(ArrayData),
    Categorical {
        codes: Vec<i8>,
        categories: Vec<String>,
        ordered: bool,
    },
    Nullable {
        encoding_type: &'static str,
        values: ArrayData,
        mask: Vec<bool>,
    },
}

impl ColumnData {
    /// A categorical column with categories in order of first appearance, like `pd.Categorical` sorted.
    pub fn categorical(labels: &[String], ordered_categories: Option<&[&str]>) -> Self {
        let categories: Vec<String> = match ordered_categories {
            Some(categories) => categories.iter().map(ToString::to_string).collect(),
            None => {
                let mut categories = labels.to_vec();
                categories.sort();
                categories.dedup();
                categories
            }
        };
        let codes = labels
            .iter()
            .map(|label| {
                i8::try_from(categories.iter().position(|c| c == label).unwrap()).unwrap()
            })
            .collect();
        Self::Categorical {
            codes,
            categories,
            ordered: ordered_categories.is_some(),
        }
    }
}

/// Writes `anndata` elements into a [`MemoryContainer`].
pub struct FixtureWriter {
    container: MemoryContainer,
    filters: Vec<DatasetFilter>,
}

impl FixtureWriter {
    /// A writer of an uncompressed container holding the root group and empty collections.
    pub fn new() -> Self {
        Self::with_filters(vec![])
    }

    /// A writer compressing every non-scalar dataset with gzip at `level`.
    pub fn with_gzip(level: u32) -> Self {
        Self::with_filters(vec![DatasetFilter::gzip(level).unwrap()])
    }

    fn with_filters(filters: Vec<DatasetFilter>) -> Self {
        let writer = Self {
            container: MemoryContainer::new(),
            filters,
        };
        writer.set_encoding(&ContainerPath::root(), "anndata", "0.1.0");
        for collection in ["/obsm", "/varm", "/obsp", "/varp", "/layers", "/uns"] {
            writer.write_group(collection, "dict", "0.1.0");
        }
        writer
    }

    pub fn container(&self) -> &MemoryContainer {
        &self.container
    }

    pub fn into_container(self) -> MemoryContainer {
        self.container
    }

    pub fn set_encoding(&self, at: &ContainerPath, encoding_type: &str, encoding_version: &str) {
        self.container
            .set_attribute(at, "encoding-type", ArrayValue::new_scalar(encoding_type))
            .unwrap();
        self.container
            .set_attribute(at, "encoding-version", ArrayValue::new_scalar(encoding_version))
            .unwrap();
    }

    pub fn set_attribute(&self, at: &str, name: &str, value: ArrayValue) {
        self.container.set_attribute(&path(at), name, value).unwrap();
    }

    pub fn write_group(&self, at: &str, encoding_type: &str, encoding_version: &str) {
        let at = path(at);
        self.container.create_group(&at).unwrap();
        self.set_encoding(&at, encoding_type, encoding_version);
    }

    fn filters_for(&self, value: &ArrayValue) -> Vec<DatasetFilter> {
        if value.ndim() == 0 || self.filters.is_empty() {
            return vec![];
        }
        let mut filters = vec![];
        if let Some(element_size) = value.data_type().fixed_size() {
            filters.push(DatasetFilter::Shuffle { element_size });
        }
        filters.extend(self.filters.iter().copied());
        filters
    }

    /// Write a dataset without encoding attributes.
    pub fn write_raw(&self, at: &str, value: ArrayValue) {
        let filters = self.filters_for(&value);
        self.container
            .create_dataset(&path(at), &value, &filters)
            .unwrap();
    }

    /// Write an `array` or `string-array`.
    pub fn write_array(&self, at: &str, value: ArrayValue) {
        let encoding_type = if value.data().as_strings().is_some() {
            "string-array"
        } else {
            "array"
        };
        self.write_raw(at, value);
        self.set_encoding(&path(at), encoding_type, "0.2.0");
    }

    pub fn write_strings(&self, at: &str, values: Vec<String>) {
        self.write_array(at, ArrayValue::from(ArrayData::String(values)));
    }

    pub fn write_dense(&self, at: &str, shape: [usize; 2], data: impl Into<ArrayData>) {
        self.write_array(at, ArrayValue::new(shape.to_vec(), data.into()).unwrap());
    }

    /// Write a `numeric-scalar` or `string`.
    pub fn write_scalar(&self, at: &str, value: impl Into<ScalarValue>) {
        let value = value.into();
        let encoding_type = if value.as_str().is_some() {
            "string"
        } else {
            "numeric-scalar"
        };
        self.write_raw(at, ArrayValue::new_scalar(value));
        self.set_encoding(&path(at), encoding_type, "0.2.0");
    }

    /// Write the row-major `dense` matrix of `shape` as a `csr_matrix` or `csc_matrix`.
    pub fn write_sparse(&self, at: &str, format: SparseFormat, shape: [usize; 2], dense: &[f32]) {
        let [rows, cols] = shape;
        let (outer, inner) = match format {
            SparseFormat::Csr => (rows, cols),
            SparseFormat::Csc => (cols, rows),
        };
        let mut indptr = vec![0i32];
        let mut indices = vec![];
        let mut data = vec![];
        for o in 0..outer {
            for i in 0..inner {
                let value = match format {
                    SparseFormat::Csr => dense[o * cols + i],
                    SparseFormat::Csc => dense[i * cols + o],
                };
                if value != 0.0 {
                    indices.push(i32::try_from(i).unwrap());
                    data.push(value);
                }
            }
            indptr.push(i32::try_from(data.len()).unwrap());
        }
        self.write_sparse_parts(at, format, shape, indptr, indices, data);
    }

    /// Write the parts of a sparse matrix as given.
    pub fn write_sparse_parts(
        &self,
        at: &str,
        format: SparseFormat,
        shape: [usize; 2],
        indptr: Vec<i32>,
        indices: Vec<i32>,
        data: Vec<f32>,
    ) {
        let encoding_type = match format {
            SparseFormat::Csr => "csr_matrix",
            SparseFormat::Csc => "csc_matrix",
        };
        self.write_group(at, encoding_type, "0.1.0");
        self.set_attribute(
            at,
            "shape",
            ArrayValue::from(ArrayData::from(vec![shape[0] as i64, shape[1] as i64])),
        );
        self.write_array(&format!("{at}/indptr"), ArrayValue::from(ArrayData::from(indptr)));
        self.write_array(
            &format!("{at}/indices"),
            ArrayValue::from(ArrayData::from(indices)),
        );
        self.write_array(&format!("{at}/data"), ArrayValue::from(ArrayData::from(data)));
    }

    /// Write a `dataframe` with `index` labels and `columns` in order.
    pub fn write_dataframe<S: AsRef<str>>(
        &self,
        at: &str,
        index_name: Option<&str>,
        index: ArrayData,
        columns: Vec<(S, ColumnData)>,
    ) {
        let index_name = index_name.unwrap_or("_index");
        self.write_group(at, "dataframe", "0.2.0");
        self.set_attribute(at, "_index", ArrayValue::new_scalar(index_name));
        let column_order = if columns.is_empty() {
            // h5py writes an empty list as float64
            ArrayData::Float64(vec![])
        } else {
            ArrayData::String(columns.iter().map(|(name, _)| name.as_ref().to_string()).collect())
        };
        self.set_attribute(at, "column-order", ArrayValue::from(column_order));
        self.write_array(&format!("{at}/{index_name}"), ArrayValue::from(index));
        for (name, column) in columns {
            let column_path = format!("{at}/{}", name.as_ref());
            match column {
                ColumnData::Array(data) => self.write_array(&column_path, ArrayValue::from(data)),
                ColumnData::Categorical {
                    codes,
                    categories,
                    ordered,
                } => {
                    self.write_group(&column_path, "categorical", "0.2.0");
                    self.set_attribute(&column_path, "ordered", ArrayValue::new_scalar(ordered));
                    self.write_array(
                        &format!("{column_path}/codes"),
                        ArrayValue::from(ArrayData::from(codes)),
                    );
                    self.write_strings(&format!("{column_path}/categories"), categories);
                }
                ColumnData::Nullable {
                    encoding_type,
                    values,
                    mask,
                } => {
                    self.write_group(&column_path, encoding_type, "0.1.0");
                    self.write_array(&format!("{column_path}/values"), ArrayValue::from(values));
                    self.write_array(
                        &format!("{column_path}/mask"),
                        ArrayValue::from(ArrayData::from(mask)),
                    );
                }
            }
        }
    }

    /// Write `obs` and `var` with `cell_i` / `gene_i` labels and the given columns.
    pub fn write_axes(
        &self,
        n_obs: usize,
        n_vars: usize,
        obs_columns: Vec<(&str, ColumnData)>,
        var_columns: Vec<(&str, ColumnData)>,
    ) {
        self.write_dataframe(
            "/obs",
            None,
            ArrayData::String(names("cell", n_obs)),
            obs_columns,
        );
        self.write_dataframe(
            "/var",
            None,
            ArrayData::String(names("gene", n_vars)),
            var_columns,
        );
    }

    /// Write a dense `float32` X of the standard shape.
    pub fn write_x_f32(&self, seed: usize) {
        self.write_dense("/X", [N_OBS, N_VARS], dense_values(N_OBS * N_VARS, seed));
    }
}

pub fn index_unnamed() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(
        N_OBS,
        N_VARS,
        vec![("cluster", ColumnData::Array(ArrayData::String(choice(&["A", "B", "C"], N_OBS, 0))))],
        vec![(
            "gene_type",
            ColumnData::Array(ArrayData::String(choice(&["protein", "rna"], N_VARS, 1))),
        )],
    );
    writer.write_x_f32(0);
    writer.into_container()
}

pub fn index_named() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_dataframe(
        "/obs",
        Some("cell_id"),
        ArrayData::String(names("cell", N_OBS)),
        vec![("cluster", ColumnData::Array(ArrayData::String(choice(&["A", "B", "C"], N_OBS, 0))))],
    );
    writer.write_dataframe(
        "/var",
        Some("gene_id"),
        ArrayData::String(names("gene", N_VARS)),
        vec![(
            "gene_type",
            ColumnData::Array(ArrayData::String(choice(&["protein", "rna"], N_VARS, 1))),
        )],
    );
    writer.write_x_f32(1);
    writer.into_container()
}

pub fn index_integer() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_dataframe(
        "/obs",
        None,
        ArrayData::Int64((0..N_OBS as i64).collect()),
        no_columns(),
    );
    writer.write_dataframe(
        "/var",
        None,
        ArrayData::Int64((0..N_VARS as i64).collect()),
        no_columns(),
    );
    writer.write_x_f32(2);
    writer.into_container()
}

pub fn dtypes_numeric() -> MemoryContainer {
    let writer = FixtureWriter::new();
    let n = N_OBS as i64;
    writer.write_axes(
        N_OBS,
        N_VARS,
        vec![
            ("int8", ColumnData::Array(ArrayData::Int8((0..n).map(|i| (i * 13 - 128) as i8).collect()))),
            ("int16", ColumnData::Array(ArrayData::Int16((0..n).map(|i| (i * 3001 - 32768) as i16).collect()))),
            ("int32", ColumnData::Array(ArrayData::Int32((0..n).map(|i| (i as i32) * 100_000_000 - 2_000_000_000).collect()))),
            ("int64", ColumnData::Array(ArrayData::Int64((0..n).map(|i| i * 10 - 100).collect()))),
            ("uint8", ColumnData::Array(ArrayData::UInt8((0..n).map(|i| (i * 12) as u8).collect()))),
            ("float32", ColumnData::Array(ArrayData::Float32(dense_values(N_OBS, 3)))),
            ("float64", ColumnData::Array(ArrayData::Float64((0..n).map(|i| i as f64 / 7.0).collect()))),
        ],
        vec![
            ("int32", ColumnData::Array(ArrayData::Int32((0..N_VARS as i32).map(|i| i * 9).collect()))),
            ("float32", ColumnData::Array(ArrayData::Float32(dense_values(N_VARS, 4)))),
        ],
    );
    writer.write_x_f32(3);
    writer.into_container()
}

pub fn dtypes_categorical() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(
        N_OBS,
        N_VARS,
        vec![
            (
                "cat_unordered",
                ColumnData::categorical(&choice(&["A", "B", "C"], N_OBS, 0), None),
            ),
            (
                "cat_ordered",
                ColumnData::categorical(
                    &choice(&["low", "medium", "high"], N_OBS, 2),
                    Some(&["low", "medium", "high"][..]),
                ),
            ),
        ],
        vec![(
            "cat_unordered",
            ColumnData::categorical(&choice(&["type1", "type2"], N_VARS, 1), None),
        )],
    );
    writer.write_x_f32(4);
    writer.into_container()
}

pub fn dtypes_boolean() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(
        N_OBS,
        N_VARS,
        vec![
            ("is_selected", ColumnData::Array(ArrayData::Bool((0..N_OBS).map(|i| i % 3 == 0).collect()))),
            ("is_valid", ColumnData::Array(ArrayData::Bool((0..N_OBS).map(|i| i % 2 == 1).collect()))),
        ],
        vec![("is_marker", ColumnData::Array(ArrayData::Bool((0..N_VARS).map(|i| i < 4).collect())))],
    );
    writer.write_x_f32(5);
    writer.into_container()
}

pub fn nullable_int_mask() -> Vec<bool> {
    (0..N_OBS).map(|i| i % 4 == 1).collect()
}

pub fn nullable_bool_mask() -> Vec<bool> {
    (0..N_OBS).map(|i| i % 5 == 0).collect()
}

pub fn dtypes_nullable() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(
        N_OBS,
        N_VARS,
        vec![
            (
                "nullable_int",
                ColumnData::Nullable {
                    encoding_type: "nullable-integer",
                    values: ArrayData::Int32((0..N_OBS as i32).map(|i| i * 5).collect()),
                    mask: nullable_int_mask(),
                },
            ),
            (
                "nullable_bool",
                ColumnData::Nullable {
                    encoding_type: "nullable-boolean",
                    values: ArrayData::Bool((0..N_OBS).map(|i| i % 2 == 0).collect()),
                    mask: nullable_bool_mask(),
                },
            ),
        ],
        vec![],
    );
    writer.write_x_f32(6);
    writer.into_container()
}

pub fn dtypes_string() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(
        N_OBS,
        N_VARS,
        vec![
            ("sample_id", ColumnData::Array(ArrayData::String(names("sample", N_OBS)))),
            (
                "batch",
                ColumnData::Array(ArrayData::String(choice(&["batch1", "batch2", "batch3"], N_OBS, 1))),
            ),
        ],
        vec![("gene_symbol", ColumnData::Array(ArrayData::String(names("GENE", N_VARS))))],
    );
    writer.write_x_f32(7);
    writer.into_container()
}

pub fn x_dense_float64() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(N_OBS, N_VARS, vec![], vec![]);
    let values: Vec<f64> = dense_values(N_OBS * N_VARS, 8)
        .into_iter()
        .map(f64::from)
        .collect();
    writer.write_dense("/X", [N_OBS, N_VARS], values);
    writer.into_container()
}

/// X as a sparse matrix of `format`, returning the container and the dense values.
pub fn x_sparse(format: SparseFormat) -> (MemoryContainer, Vec<f32>) {
    let writer = FixtureWriter::new();
    writer.write_axes(N_OBS, N_VARS, vec![], vec![]);
    let dense = sparse_values(N_OBS * N_VARS, 9, 10);
    writer.write_sparse("/X", format, [N_OBS, N_VARS], &dense);
    (writer.into_container(), dense)
}

pub fn x_none() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(
        N_OBS,
        N_VARS,
        vec![("cluster", ColumnData::Array(ArrayData::String(choice(&["A", "B"], N_OBS, 0))))],
        vec![("type", ColumnData::Array(ArrayData::String(choice(&["type1", "type2"], N_VARS, 0))))],
    );
    writer.into_container()
}

pub fn obsm_dense() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(N_OBS, N_VARS, vec![], vec![]);
    writer.write_x_f32(10);
    writer.write_dense("/obsm/X_pca", [N_OBS, 10], dense_values(N_OBS * 10, 11));
    writer.write_dense("/obsm/X_umap", [N_OBS, 2], dense_values(N_OBS * 2, 12));
    writer.write_dense("/varm/PCs", [N_VARS, 10], dense_values(N_VARS * 10, 13));
    writer.into_container()
}

pub fn obsm_sparse() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(N_OBS, N_VARS, vec![], vec![]);
    writer.write_x_f32(14);
    writer.write_sparse(
        "/obsm/X_sparse",
        SparseFormat::Csr,
        [N_OBS, 50],
        &sparse_values(N_OBS * 50, 15, 10),
    );
    writer.write_sparse(
        "/varm/Y_sparse",
        SparseFormat::Csc,
        [N_VARS, 30],
        &sparse_values(N_VARS * 30, 16, 10),
    );
    writer.into_container()
}

pub fn obsm_dataframe() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(N_OBS, N_VARS, vec![], vec![]);
    writer.write_x_f32(17);
    let columns = |prefix: &str, rows: usize, n: usize| -> Vec<(String, ColumnData)> {
        (0..n)
            .map(|i| {
                let values = dense_values(rows, 18 + i).into_iter().map(f64::from).collect();
                (format!("{prefix}{i}"), ColumnData::Array(ArrayData::Float64(values)))
            })
            .collect()
    };
    writer.write_dataframe(
        "/obsm/X_df",
        None,
        ArrayData::String(names("cell", N_OBS)),
        columns("PC", N_OBS, 5),
    );
    writer.write_dataframe(
        "/varm/Y_df",
        None,
        ArrayData::String(names("gene", N_VARS)),
        columns("comp", N_VARS, 3),
    );
    writer.into_container()
}

pub fn obsp_dense() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(N_OBS, N_VARS, vec![], vec![]);
    writer.write_x_f32(20);
    writer.write_dense("/obsp/connectivities", [N_OBS, N_OBS], dense_values(N_OBS * N_OBS, 21));
    writer.write_dense("/obsp/distances", [N_OBS, N_OBS], dense_values(N_OBS * N_OBS, 22));
    writer.write_dense("/varp/correlations", [N_VARS, N_VARS], dense_values(N_VARS * N_VARS, 23));
    writer.into_container()
}

pub fn obsp_sparse() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(N_OBS, N_VARS, vec![], vec![]);
    writer.write_x_f32(24);
    writer.write_sparse(
        "/obsp/connectivities",
        SparseFormat::Csr,
        [N_OBS, N_OBS],
        &sparse_values(N_OBS * N_OBS, 25, 5),
    );
    writer.write_sparse(
        "/varp/correlations",
        SparseFormat::Csc,
        [N_VARS, N_VARS],
        &sparse_values(N_VARS * N_VARS, 26, 5),
    );
    writer.into_container()
}

pub fn layers_mixed() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(N_OBS, N_VARS, vec![], vec![]);
    writer.write_x_f32(27);
    writer.write_dense("/layers/counts", [N_OBS, N_VARS], dense_values(N_OBS * N_VARS, 28));
    writer.write_sparse(
        "/layers/normalized",
        SparseFormat::Csr,
        [N_OBS, N_VARS],
        &sparse_values(N_OBS * N_VARS, 29, 10),
    );
    let log: Vec<f64> = dense_values(N_OBS * N_VARS, 30)
        .into_iter()
        .map(f64::from)
        .collect();
    writer.write_dense("/layers/log", [N_OBS, N_VARS], log);
    writer.into_container()
}

pub fn uns_nested() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(N_OBS, N_VARS, vec![], vec![]);
    writer.write_x_f32(31);
    writer.write_scalar("/uns/scalar_int", 42i64);
    writer.write_scalar("/uns/scalar_float", 3.14f64);
    writer.write_scalar("/uns/scalar_str", "test_string");
    writer.write_scalar("/uns/scalar_bool", true);
    writer.write_array(
        "/uns/array_1d",
        ArrayValue::from(ArrayData::Int64(vec![1, 2, 3, 4, 5])),
    );
    let array_2d: Vec<f64> = (0..15).map(|i| f64::from(i) / 15.0).collect();
    writer.write_dense("/uns/array_2d", [5, 3], array_2d);
    writer.write_group("/uns/nested", "dict", "0.1.0");
    writer.write_group("/uns/nested/level1", "dict", "0.1.0");
    writer.write_scalar("/uns/nested/level1/level2", "deep_value");
    writer.write_array(
        "/uns/nested/level1/array",
        ArrayValue::from(ArrayData::Int64(vec![10, 20, 30])),
    );
    writer.write_scalar("/uns/nested/scalar", 100i64);
    let records = CompoundData::new(
        5,
        vec![
            ("name".to_string(), ArrayData::String(names("item", 5))),
            (
                "value".to_string(),
                ArrayData::Float32((0..5u8).map(|i| f32::from(i) * 2.0).collect()),
            ),
            ("count".to_string(), ArrayData::Int32((0..5).collect())),
        ],
    )
    .unwrap();
    writer.write_raw("/uns/recarray", ArrayValue::from(ArrayData::Compound(records)));
    writer.set_encoding(&path("/uns/recarray"), "rec-array", "0.2.0");
    writer.into_container()
}

pub fn edge_minimal() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(N_OBS, N_VARS, vec![], vec![]);
    writer.write_x_f32(32);
    writer.into_container()
}

pub fn edge_empty_obs() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(
        0,
        N_VARS,
        vec![],
        vec![("type", ColumnData::Array(ArrayData::String(choice(&["type1", "type2"], N_VARS, 1))))],
    );
    writer.into_container()
}

pub fn unicode_obs_names() -> Vec<String> {
    (0..N_OBS).map(|i| format!("cell_{i}_αβγ")).collect()
}

pub fn unicode_var_names() -> Vec<String> {
    (0..N_VARS).map(|i| format!("gene_{i}_日本語")).collect()
}

pub fn edge_unicode() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_dataframe(
        "/obs",
        None,
        ArrayData::String(unicode_obs_names()),
        vec![
            ("cluster", ColumnData::Array(ArrayData::String(choice(&["A", "B", "C"], N_OBS, 0)))),
            (
                "description",
                ColumnData::Array(ArrayData::String(
                    (0..N_OBS).map(|i| format!("Sample {i} with émojis 🧬")).collect(),
                )),
            ),
        ],
    );
    writer.write_dataframe(
        "/var",
        None,
        ArrayData::String(unicode_var_names()),
        vec![(
            "symbol",
            ColumnData::Array(ArrayData::String(
                (0..N_VARS).map(|i| format!("GENE_{i}_🎯")).collect(),
            )),
        )],
    );
    writer.write_x_f32(33);
    writer.into_container()
}

/// The contents of the compressed fixtures, written through `writer`.
pub fn compression(writer: FixtureWriter) -> MemoryContainer {
    writer.write_axes(
        N_OBS,
        N_VARS,
        vec![
            (
                "cluster",
                ColumnData::categorical(&choice(&["A", "B", "C"], N_OBS, 2), None),
            ),
            (
                "n_genes",
                ColumnData::Array(ArrayData::Int32((0..N_OBS as i32).map(|i| 100 + i * 40).collect())),
            ),
            ("total_counts", ColumnData::Array(ArrayData::Float32(dense_values(N_OBS, 34)))),
        ],
        vec![
            (
                "gene_type",
                ColumnData::categorical(&choice(&["protein", "rna"], N_VARS, 0), None),
            ),
            ("mean_counts", ColumnData::Array(ArrayData::Float32(dense_values(N_VARS, 35)))),
        ],
    );
    writer.write_sparse(
        "/X",
        SparseFormat::Csr,
        [N_OBS, N_VARS],
        &sparse_values(N_OBS * N_VARS, 36, 10),
    );
    writer.write_dense("/obsm/X_pca", [N_OBS, 10], dense_values(N_OBS * 10, 37));
    writer.write_dense("/layers/counts", [N_OBS, N_VARS], dense_values(N_OBS * N_VARS, 38));
    writer.write_scalar("/uns/description", "Test file with gzip compression");
    writer.write_scalar("/uns/compression_level", 4i64);
    writer.into_container()
}

pub fn full_featured() -> MemoryContainer {
    let writer = FixtureWriter::new();
    writer.write_axes(
        N_OBS,
        N_VARS,
        vec![
            (
                "cluster",
                ColumnData::categorical(&choice(&["A", "B", "C"], N_OBS, 1), None),
            ),
            (
                "n_genes",
                ColumnData::Array(ArrayData::Int32((0..N_OBS as i32).map(|i| 100 + i * 40).collect())),
            ),
            ("total_counts", ColumnData::Array(ArrayData::Float32(dense_values(N_OBS, 40)))),
            ("is_selected", ColumnData::Array(ArrayData::Bool((0..N_OBS).map(|i| i % 2 == 0).collect()))),
        ],
        vec![
            (
                "gene_type",
                ColumnData::categorical(&choice(&["protein", "rna"], N_VARS, 1), None),
            ),
            ("n_cells", ColumnData::Array(ArrayData::Int32((0..N_VARS as i32).collect()))),
            ("mean_counts", ColumnData::Array(ArrayData::Float32(dense_values(N_VARS, 41)))),
        ],
    );
    writer.write_sparse(
        "/X",
        SparseFormat::Csr,
        [N_OBS, N_VARS],
        &sparse_values(N_OBS * N_VARS, 42, 10),
    );
    writer.write_dense("/obsm/X_pca", [N_OBS, 10], dense_values(N_OBS * 10, 43));
    writer.write_dense("/obsm/X_umap", [N_OBS, 2], dense_values(N_OBS * 2, 44));
    writer.write_dense("/varm/PCs", [N_VARS, 10], dense_values(N_VARS * 10, 45));
    writer.write_sparse(
        "/obsp/connectivities",
        SparseFormat::Csr,
        [N_OBS, N_OBS],
        &sparse_values(N_OBS * N_OBS, 46, 5),
    );
    writer.write_sparse(
        "/varp/correlations",
        SparseFormat::Csc,
        [N_VARS, N_VARS],
        &sparse_values(N_VARS * N_VARS, 47, 5),
    );
    writer.write_dense("/layers/counts", [N_OBS, N_VARS], dense_values(N_OBS * N_VARS, 48));
    writer.write_sparse(
        "/layers/normalized",
        SparseFormat::Csr,
        [N_OBS, N_VARS],
        &sparse_values(N_OBS * N_VARS, 49, 10),
    );
    writer.write_group("/uns/neighbors", "dict", "0.1.0");
    writer.write_group("/uns/neighbors/params", "dict", "0.1.0");
    writer.write_scalar("/uns/neighbors/params/n_neighbors", 15i64);
    writer.write_scalar("/uns/neighbors/params/method", "umap");
    writer.write_group("/uns/pca", "dict", "0.1.0");
    writer.write_array(
        "/uns/pca/variance",
        ArrayValue::from(ArrayData::Float32(dense_values(10, 50))),
    );
    writer.write_scalar("/uns/scalar", 42i64);
    writer.into_container()
}
