//! Container backends.
//!
//! - [`MemoryContainer`]: an in-memory container, which is also writable.
//! - `Hdf5Container`: a read-only HDF5 file (requires the `hdf5` feature).

mod memory;
pub use memory::MemoryContainer;

#[cfg(feature = "hdf5")]
mod hdf5;
#[cfg(feature = "hdf5")]
pub use self::hdf5::Hdf5Container;
