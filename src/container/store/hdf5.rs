//! An HDF5 file container.

use std::path::Path;

use hdf5::types::{
    CompoundField as Hdf5CompoundField, CompoundType, FloatSize, H5Type, IntSize, TypeDescriptor,
    VarLenAscii, VarLenUnicode,
};
use hdf5_sys::{h5d::H5Dread, h5p::H5P_DEFAULT, h5s::H5S_ALL};

use crate::{
    array::{
        ArrayData, ArrayValue, CompoundData, CompoundField, DataType, UnsupportedDataTypeError,
    },
    container::{
        ContainerError, ContainerPath, DatasetInfo, ListableContainerTraits, NodeKind,
        ReadableContainerTraits,
    },
};

/// A read-only HDF5 file container.
///
/// Filters (`gzip`, `shuffle`, ...) are applied by the HDF5 library and are transparent.
#[derive(Debug)]
pub struct Hdf5Container {
    file: hdf5::File,
}

impl From<hdf5::Error> for ContainerError {
    fn from(err: hdf5::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl Hdf5Container {
    /// Open the HDF5 file at `path` for reading.
    ///
    /// # Errors
    /// Returns [`ContainerError::Open`] if the file does not exist or is not an HDF5 file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ContainerError> {
        let path = path.as_ref();
        let file = hdf5::File::open(path).map_err(|err| ContainerError::Open {
            location: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self { file })
    }

    fn with_location<R>(
        &self,
        path: &ContainerPath,
        f: impl FnOnce(&hdf5::Location) -> Result<R, ContainerError>,
    ) -> Result<R, ContainerError> {
        if let Ok(group) = self.file.group(path.as_str()) {
            f(&group)
        } else if let Ok(dataset) = self.file.dataset(path.as_str()) {
            f(&dataset)
        } else {
            Err(ContainerError::NotFound(path.clone()))
        }
    }

    fn dataset(&self, path: &ContainerPath) -> Result<hdf5::Dataset, ContainerError> {
        match self.node_kind(path)? {
            Some(NodeKind::Dataset) => Ok(self.file.dataset(path.as_str())?),
            Some(NodeKind::Group) => Err(ContainerError::NotADataset(path.clone())),
            None => Err(ContainerError::NotFound(path.clone())),
        }
    }
}

impl ReadableContainerTraits for Hdf5Container {
    fn node_kind(&self, path: &ContainerPath) -> Result<Option<NodeKind>, ContainerError> {
        if !path.is_root() && !self.file.link_exists(path.as_str()) {
            return Ok(None);
        }
        if self.file.group(path.as_str()).is_ok() {
            Ok(Some(NodeKind::Group))
        } else if self.file.dataset(path.as_str()).is_ok() {
            Ok(Some(NodeKind::Dataset))
        } else {
            Ok(None)
        }
    }

    fn attribute_names(&self, path: &ContainerPath) -> Result<Vec<String>, ContainerError> {
        self.with_location(path, |location| {
            let mut names = location.attr_names()?;
            names.sort();
            Ok(names)
        })
    }

    fn attribute(
        &self,
        path: &ContainerPath,
        name: &str,
    ) -> Result<Option<ArrayValue>, ContainerError> {
        self.with_location(path, |location| {
            if !location.attr_names()?.iter().any(|attr| attr == name) {
                return Ok(None);
            }
            let attribute = location.attr(name)?;
            let descriptor = attribute.dtype()?.to_descriptor()?;
            let data = read_values(&attribute, &descriptor)?;
            Ok(Some(ArrayValue::new(attribute.shape(), data)?))
        })
    }

    fn dataset_info(&self, path: &ContainerPath) -> Result<DatasetInfo, ContainerError> {
        let dataset = self.dataset(path)?;
        let descriptor = dataset.dtype()?.to_descriptor()?;
        Ok(DatasetInfo::new(
            dataset.shape(),
            data_type_of(&descriptor)?,
        ))
    }

    fn read_dataset(&self, path: &ContainerPath) -> Result<ArrayValue, ContainerError> {
        let dataset = self.dataset(path)?;
        let descriptor = dataset.dtype()?.to_descriptor()?;
        let data = if let TypeDescriptor::Compound(compound) = &descriptor {
            read_compound(&dataset, compound)?
        } else {
            read_values(&dataset, &descriptor)?
        };
        Ok(ArrayValue::new(dataset.shape(), data)?)
    }
}

impl ListableContainerTraits for Hdf5Container {
    fn children(&self, path: &ContainerPath) -> Result<Vec<String>, ContainerError> {
        match self.node_kind(path)? {
            Some(NodeKind::Group) => {
                let mut names = self.file.group(path.as_str())?.member_names()?;
                names.sort();
                Ok(names)
            }
            Some(NodeKind::Dataset) => Err(ContainerError::NotAGroup(path.clone())),
            None => Err(ContainerError::NotFound(path.clone())),
        }
    }
}

fn unsupported(descriptor: &TypeDescriptor) -> ContainerError {
    UnsupportedDataTypeError::new(descriptor.to_string()).into()
}

fn data_type_of(descriptor: &TypeDescriptor) -> Result<DataType, ContainerError> {
    Ok(match descriptor {
        TypeDescriptor::Boolean => DataType::Bool,
        TypeDescriptor::Integer(IntSize::U1) => DataType::Int8,
        TypeDescriptor::Integer(IntSize::U2) => DataType::Int16,
        TypeDescriptor::Integer(IntSize::U4) => DataType::Int32,
        TypeDescriptor::Integer(IntSize::U8) => DataType::Int64,
        TypeDescriptor::Unsigned(IntSize::U1) => DataType::UInt8,
        TypeDescriptor::Unsigned(IntSize::U2) => DataType::UInt16,
        TypeDescriptor::Unsigned(IntSize::U4) => DataType::UInt32,
        TypeDescriptor::Unsigned(IntSize::U8) => DataType::UInt64,
        TypeDescriptor::Float(FloatSize::U4) => DataType::Float32,
        TypeDescriptor::Float(FloatSize::U8) => DataType::Float64,
        TypeDescriptor::VarLenUnicode | TypeDescriptor::VarLenAscii => DataType::String,
        TypeDescriptor::Compound(compound) => DataType::Compound(
            compound
                .fields
                .iter()
                .map(|field| Ok(CompoundField::new(field.name.clone(), data_type_of(&field.ty)?)))
                .collect::<Result<_, ContainerError>>()?,
        ),
        other => return Err(unsupported(other)),
    })
}

/// Read the elements of a dataset or attribute, converting to the native type of `descriptor`.
fn read_values(
    container: &hdf5::Container,
    descriptor: &TypeDescriptor,
) -> Result<ArrayData, ContainerError> {
    Ok(match descriptor {
        TypeDescriptor::Boolean => ArrayData::Bool(container.read_raw()?),
        TypeDescriptor::Integer(IntSize::U1) => ArrayData::Int8(container.read_raw()?),
        TypeDescriptor::Integer(IntSize::U2) => ArrayData::Int16(container.read_raw()?),
        TypeDescriptor::Integer(IntSize::U4) => ArrayData::Int32(container.read_raw()?),
        TypeDescriptor::Integer(IntSize::U8) => ArrayData::Int64(container.read_raw()?),
        TypeDescriptor::Unsigned(IntSize::U1) => ArrayData::UInt8(container.read_raw()?),
        TypeDescriptor::Unsigned(IntSize::U2) => ArrayData::UInt16(container.read_raw()?),
        TypeDescriptor::Unsigned(IntSize::U4) => ArrayData::UInt32(container.read_raw()?),
        TypeDescriptor::Unsigned(IntSize::U8) => ArrayData::UInt64(container.read_raw()?),
        TypeDescriptor::Float(FloatSize::U4) => ArrayData::Float32(container.read_raw()?),
        TypeDescriptor::Float(FloatSize::U8) => ArrayData::Float64(container.read_raw()?),
        TypeDescriptor::VarLenUnicode => ArrayData::String(
            container
                .read_raw::<VarLenUnicode>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
        ),
        TypeDescriptor::VarLenAscii => ArrayData::String(
            container
                .read_raw::<VarLenAscii>()?
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
        ),
        other => return Err(unsupported(other)),
    })
}

/// Read the compound `field` of every element of `dataset`.
///
/// The memory type is a compound holding only `field`, so HDF5 converts that member alone.
fn read_compound_field<T: H5Type>(
    dataset: &hdf5::Dataset,
    field: &str,
    len: usize,
) -> Result<Vec<T>, ContainerError> {
    let descriptor = TypeDescriptor::Compound(CompoundType {
        fields: vec![Hdf5CompoundField {
            name: field.to_string(),
            ty: T::type_descriptor(),
            offset: 0,
            index: 0,
        }],
        size: std::mem::size_of::<T>(),
    });
    let mem_type = hdf5::Datatype::from_descriptor(&descriptor)?;
    let mut values: Vec<T> = Vec::with_capacity(len);
    // SAFETY: the buffer holds `len` elements of the memory type, which is the dataset extent.
    let status = unsafe {
        H5Dread(
            dataset.id(),
            mem_type.id(),
            H5S_ALL,
            H5S_ALL,
            H5P_DEFAULT,
            values.as_mut_ptr().cast(),
        )
    };
    if status < 0 {
        return Err(ContainerError::Other(format!(
            "failed to read compound field {field} of {}",
            dataset.name()
        )));
    }
    // SAFETY: H5Dread initialised all `len` elements.
    unsafe { values.set_len(len) };
    Ok(values)
}

fn read_compound(
    dataset: &hdf5::Dataset,
    compound: &CompoundType,
) -> Result<ArrayData, ContainerError> {
    let len = dataset.size();
    let fields = compound
        .fields
        .iter()
        .map(|field| {
            let name = field.name.as_str();
            let data = match &field.ty {
                TypeDescriptor::Boolean => ArrayData::Bool(read_compound_field(dataset, name, len)?),
                TypeDescriptor::Integer(IntSize::U1) => {
                    ArrayData::Int8(read_compound_field(dataset, name, len)?)
                }
                TypeDescriptor::Integer(IntSize::U2) => {
                    ArrayData::Int16(read_compound_field(dataset, name, len)?)
                }
                TypeDescriptor::Integer(IntSize::U4) => {
                    ArrayData::Int32(read_compound_field(dataset, name, len)?)
                }
                TypeDescriptor::Integer(IntSize::U8) => {
                    ArrayData::Int64(read_compound_field(dataset, name, len)?)
                }
                TypeDescriptor::Unsigned(IntSize::U1) => {
                    ArrayData::UInt8(read_compound_field(dataset, name, len)?)
                }
                TypeDescriptor::Unsigned(IntSize::U2) => {
                    ArrayData::UInt16(read_compound_field(dataset, name, len)?)
                }
                TypeDescriptor::Unsigned(IntSize::U4) => {
                    ArrayData::UInt32(read_compound_field(dataset, name, len)?)
                }
                TypeDescriptor::Unsigned(IntSize::U8) => {
                    ArrayData::UInt64(read_compound_field(dataset, name, len)?)
                }
                TypeDescriptor::Float(FloatSize::U4) => {
                    ArrayData::Float32(read_compound_field(dataset, name, len)?)
                }
                TypeDescriptor::Float(FloatSize::U8) => {
                    ArrayData::Float64(read_compound_field(dataset, name, len)?)
                }
                TypeDescriptor::VarLenUnicode => ArrayData::String(
                    read_compound_field::<VarLenUnicode>(dataset, name, len)?
                        .iter()
                        .map(|s| s.as_str().to_string())
                        .collect(),
                ),
                TypeDescriptor::VarLenAscii => ArrayData::String(
                    read_compound_field::<VarLenAscii>(dataset, name, len)?
                        .iter()
                        .map(|s| s.as_str().to_string())
                        .collect(),
                ),
                other => return Err(unsupported(other)),
            };
            Ok((field.name.clone(), data))
        })
        .collect::<Result<Vec<_>, ContainerError>>()?;
    Ok(ArrayData::Compound(
        CompoundData::new(len, fields).map_err(|err| ContainerError::Other(err.to_string()))?,
    ))
}
