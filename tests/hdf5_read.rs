#![cfg(feature = "hdf5")]

use std::path::Path;

use h5ad::{
    anndata::{read_h5ad, read_h5ad_with_options},
    array::{ArrayData, ScalarValue},
    config::DecodeOptions,
    dataframe::Column,
    DecodeError, Element,
};
use hdf5::types::VarLenUnicode;

fn unicode(value: &str) -> VarLenUnicode {
    value.parse().unwrap()
}

fn set_string_attribute(location: &hdf5::Location, name: &str, value: &str) {
    location
        .new_attr::<VarLenUnicode>()
        .shape(())
        .create(name)
        .unwrap()
        .write_scalar(&unicode(value))
        .unwrap();
}

fn set_encoding(location: &hdf5::Location, encoding_type: &str, encoding_version: &str) {
    set_string_attribute(location, "encoding-type", encoding_type);
    set_string_attribute(location, "encoding-version", encoding_version);
}

fn write_strings(group: &hdf5::Group, name: &str, values: &[String]) {
    let values: Vec<VarLenUnicode> = values.iter().map(|value| unicode(value)).collect();
    let dataset = group
        .new_dataset_builder()
        .with_data(values.as_slice())
        .create(name)
        .unwrap();
    set_encoding(&dataset, "string-array", "0.2.0");
}

fn write_dataframe(file: &hdf5::File, axis: &str, labels: &[String]) -> hdf5::Group {
    let group = file.create_group(axis).unwrap();
    set_encoding(&group, "dataframe", "0.2.0");
    set_string_attribute(&group, "_index", "_index");
    write_strings(&group, "_index", labels);
    group
}

/// Write a 4 × 3 dataset with a gzip compressed CSR `X`.
fn write_h5ad(path: &Path) {
    let file = hdf5::File::create(path).unwrap();
    set_encoding(&file, "anndata", "0.1.0");

    let obs_names: Vec<String> = (0..4).map(|i| format!("cell_{i}")).collect();
    let obs = write_dataframe(&file, "obs", &obs_names);
    let column_order: Vec<VarLenUnicode> = vec![unicode("cluster"), unicode("n_genes")];
    obs.new_attr_builder()
        .with_data(column_order.as_slice())
        .create("column-order")
        .unwrap();
    let cluster = obs.create_group("cluster").unwrap();
    set_encoding(&cluster, "categorical", "0.2.0");
    cluster
        .new_attr::<bool>()
        .shape(())
        .create("ordered")
        .unwrap()
        .write_scalar(&false)
        .unwrap();
    cluster
        .new_dataset_builder()
        .with_data([0i8, 1, 1, 0].as_slice())
        .create("codes")
        .unwrap();
    write_strings(&cluster, "categories", &["A".to_string(), "B".to_string()]);
    let n_genes = obs
        .new_dataset_builder()
        .with_data([10i32, 20, 30, 40].as_slice())
        .create("n_genes")
        .unwrap();
    set_encoding(&n_genes, "array", "0.2.0");

    let var_names: Vec<String> = (0..3).map(|i| format!("gene_{i}")).collect();
    let var = write_dataframe(&file, "var", &var_names);
    var.new_attr_builder()
        .with_data(Vec::<f64>::new().as_slice())
        .create("column-order")
        .unwrap();

    let x = file.create_group("X").unwrap();
    set_encoding(&x, "csr_matrix", "0.1.0");
    x.new_attr_builder()
        .with_data([4i64, 3].as_slice())
        .create("shape")
        .unwrap();
    for (name, values) in [("indptr", vec![0i32, 1, 1, 3, 4]), ("indices", vec![2i32, 0, 1, 2])] {
        x.new_dataset_builder()
            .shuffle()
            .deflate(4)
            .with_data(values.as_slice())
            .create(name)
            .unwrap();
    }
    x.new_dataset_builder()
        .shuffle()
        .deflate(4)
        .with_data([1.0f32, 2.0, 3.0, 4.0].as_slice())
        .create("data")
        .unwrap();

    let uns = file.create_group("uns").unwrap();
    set_encoding(&uns, "dict", "0.1.0");
    let description = uns
        .new_dataset::<VarLenUnicode>()
        .shape(())
        .create("description")
        .unwrap();
    description.write_scalar(&unicode("written by hdf5")).unwrap();
    set_encoding(&description, "string", "0.2.0");
}

#[test]
fn hdf5_read_h5ad() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.h5ad");
    write_h5ad(&path);

    let adata = read_h5ad(&path).unwrap();
    assert_eq!(adata.shape(), (4, 3));
    assert_eq!(adata.obs_names(), vec!["cell_0", "cell_1", "cell_2", "cell_3"]);
    assert_eq!(adata.var().n_columns(), 0);
    assert_eq!(
        adata.obs().column_names().collect::<Vec<_>>(),
        vec!["cluster", "n_genes"]
    );
    let Some(Column::Categorical(cluster)) = adata.obs().column("cluster") else {
        panic!("cluster is not categorical");
    };
    assert_eq!(cluster.label(2), Some(ScalarValue::from("B")));
    assert_eq!(
        adata.obs().column("n_genes"),
        Some(&Column::Array(ArrayData::Int32(vec![10, 20, 30, 40])))
    );

    let x = adata.x().unwrap();
    assert!(x.is_sparse());
    assert_eq!(
        x.to_dense_f64().unwrap(),
        vec![
            0.0, 0.0, 1.0, //
            0.0, 0.0, 0.0, //
            2.0, 3.0, 0.0, //
            0.0, 0.0, 4.0,
        ]
    );
    assert_eq!(
        adata.uns().get("description").and_then(Element::as_scalar),
        Some(&ScalarValue::from("written by hdf5"))
    );
}

#[test]
fn hdf5_read_h5ad_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.h5ad");
    let err = read_h5ad_with_options(&path, &DecodeOptions::default()).unwrap_err();
    assert_eq!(err.path(), path.as_path());
    assert!(matches!(err.error(), DecodeError::ContainerOpen { .. }));
}
