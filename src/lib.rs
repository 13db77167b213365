//! A rust library for decoding [AnnData](https://anndata.readthedocs.io) `.h5ad` containers.
//!
//! An `.h5ad` file is an HDF5 container holding an annotated matrix: a primary matrix `X`,
//! row (`obs`) and column (`var`) tables, aligned arrays (`obsm`, `varm`), pairwise matrices
//! (`obsp`, `varp`), alternate matrices (`layers`) and a free-form metadata tree (`uns`).
//! Every element declares how it is stored with an `encoding-type` / `encoding-version` attribute
//! pair, which this crate resolves through a compile-time [`plugin`] registry.
//!
//! ## Getting Started
//! - [`anndata::AnnData`] is the decoded dataset, built with [`anndata::AnnData::from_container`]
//!   or [`anndata::read_h5ad`] (requires the `hdf5` feature).
//! - [`container`] defines the container interface and its backends.
//! - [`element::Element`] is the decoded form of any single element, and the node type of the
//!   `uns` tree.
//!
//! ## Example
//! ```rust
//! # use h5ad::{
//! #     anndata::AnnData,
//! #     array::{ArrayData, ArrayValue},
//! #     config::DecodeOptions,
//! #     container::{store::MemoryContainer, WritableContainerTraits},
//! # };
//! let container = MemoryContainer::new();
//! for axis in ["/obs", "/var"] {
//!     let path = axis.try_into()?;
//!     container.create_group(&path)?;
//!     container.set_attribute(&path, "encoding-type", ArrayValue::new_scalar("dataframe"))?;
//!     container.set_attribute(&path, "encoding-version", ArrayValue::new_scalar("0.2.0"))?;
//!     container.set_attribute(&path, "_index", ArrayValue::new_scalar("_index"))?;
//!     container.set_attribute(&path, "column-order", ArrayValue::from(ArrayData::String(vec![])))?;
//!     let labels = vec!["a".to_string(), "b".to_string()];
//!     container.create_dataset(
//!         &format!("{axis}/_index").as_str().try_into()?,
//!         &ArrayValue::from(ArrayData::String(labels)),
//!         &[],
//!     )?;
//! }
//! let adata = AnnData::from_container(&container, &DecodeOptions::default())?;
//! assert_eq!(adata.shape(), (2, 2));
//! assert!(adata.x().is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Features
//! #### Default
//!  - `ndarray`: [`ndarray`] conversions for [`matrix::Matrix`].
//!
//! #### Non-Default
//!  - `hdf5`: the [`container::store::Hdf5Container`] backend and [`anndata::read_h5ad`].
//!    Requires a system HDF5 library.
//!
//! ## Licence
//! `h5ad` is licensed under either of
//!  - the Apache License, Version 2.0 or <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license or <http://opensource.org/licenses/MIT>, at your option.

#![warn(unused_variables)]
#![warn(dead_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod anndata;
pub mod annotation;
pub mod array;
pub mod config;
pub mod container;
pub mod dataframe;
pub mod element;
pub mod encoding;
pub mod matrix;
pub mod plugin;

pub use anndata::AnnData;
pub use element::{DecodeError, Element};
