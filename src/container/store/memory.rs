//! An in-memory container.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::{
    array::{ArrayData, ArrayValue, CompoundData, DataType},
    container::{
        filter::{decode_filters, encode_filters},
        ContainerError, ContainerPath, DatasetFilter, DatasetInfo, ListableContainerTraits,
        NodeKind, ReadableContainerTraits, WritableContainerTraits,
    },
};

/// An in-memory container.
///
/// Datasets are held as encoded bytes behind their filters, the same way they are held in a file.
/// Reading a dataset decodes its bytes through its filters on every call.
#[derive(Debug)]
pub struct MemoryContainer {
    nodes: RwLock<BTreeMap<ContainerPath, MemoryNode>>,
}

#[derive(Debug)]
struct MemoryNode {
    dataset: Option<MemoryDataset>,
    attributes: BTreeMap<String, ArrayValue>,
}

#[derive(Debug)]
struct MemoryDataset {
    shape: Vec<usize>,
    data_type: DataType,
    filters: Vec<DatasetFilter>,
    bytes: Vec<u8>,
}

impl MemoryNode {
    fn group() -> Self {
        Self {
            dataset: None,
            attributes: BTreeMap::new(),
        }
    }

    fn kind(&self) -> NodeKind {
        if self.dataset.is_some() {
            NodeKind::Dataset
        } else {
            NodeKind::Group
        }
    }
}

impl MemoryContainer {
    /// Create a new memory container holding an empty root group.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ContainerPath::root(), MemoryNode::group());
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    /// Insert `node` at `path`, creating missing ancestor groups.
    fn insert_node(&self, path: &ContainerPath, node: MemoryNode) -> Result<(), ContainerError> {
        let mut nodes = self.nodes.write();
        if nodes.contains_key(path) {
            return Err(ContainerError::AlreadyExists(path.clone()));
        }
        let mut ancestors = vec![];
        let mut parent = path.parent();
        while let Some(ancestor) = parent {
            match nodes.get(&ancestor).map(MemoryNode::kind) {
                Some(NodeKind::Group) => break,
                Some(NodeKind::Dataset) => return Err(ContainerError::NotAGroup(ancestor)),
                None => {
                    parent = ancestor.parent();
                    ancestors.push(ancestor);
                }
            }
        }
        for ancestor in ancestors {
            nodes.insert(ancestor, MemoryNode::group());
        }
        nodes.insert(path.clone(), node);
        Ok(())
    }
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadableContainerTraits for MemoryContainer {
    fn node_kind(&self, path: &ContainerPath) -> Result<Option<NodeKind>, ContainerError> {
        Ok(self.nodes.read().get(path).map(MemoryNode::kind))
    }

    fn attribute_names(&self, path: &ContainerPath) -> Result<Vec<String>, ContainerError> {
        let nodes = self.nodes.read();
        let node = nodes
            .get(path)
            .ok_or_else(|| ContainerError::NotFound(path.clone()))?;
        Ok(node.attributes.keys().cloned().collect())
    }

    fn attribute(
        &self,
        path: &ContainerPath,
        name: &str,
    ) -> Result<Option<ArrayValue>, ContainerError> {
        let nodes = self.nodes.read();
        let node = nodes
            .get(path)
            .ok_or_else(|| ContainerError::NotFound(path.clone()))?;
        Ok(node.attributes.get(name).cloned())
    }

    fn dataset_info(&self, path: &ContainerPath) -> Result<DatasetInfo, ContainerError> {
        let nodes = self.nodes.read();
        let dataset = get_dataset(&nodes, path)?;
        Ok(DatasetInfo::new(
            dataset.shape.clone(),
            dataset.data_type.clone(),
        ))
    }

    fn read_dataset(&self, path: &ContainerPath) -> Result<ArrayValue, ContainerError> {
        let nodes = self.nodes.read();
        let dataset = get_dataset(&nodes, path)?;
        let bytes = decode_filters(&dataset.filters, dataset.bytes.clone())?;
        let len = dataset.shape.iter().product::<usize>();
        let mut reader = ByteReader::new(&bytes);
        let data = decode_array_data(&mut reader, &dataset.data_type, len)?;
        if !reader.is_exhausted() {
            return Err(ContainerError::Other(format!(
                "dataset {path} has trailing bytes"
            )));
        }
        Ok(ArrayValue::new(dataset.shape.clone(), data)?)
    }
}

impl ListableContainerTraits for MemoryContainer {
    fn children(&self, path: &ContainerPath) -> Result<Vec<String>, ContainerError> {
        let nodes = self.nodes.read();
        match nodes.get(path).map(MemoryNode::kind) {
            None => return Err(ContainerError::NotFound(path.clone())),
            Some(NodeKind::Dataset) => return Err(ContainerError::NotAGroup(path.clone())),
            Some(NodeKind::Group) => {}
        }
        let mut children: Vec<String> = nodes
            .keys()
            .filter(|child| child.parent().as_ref() == Some(path))
            .map(|child| child.name().to_string())
            .collect();
        children.sort();
        Ok(children)
    }
}

impl WritableContainerTraits for MemoryContainer {
    fn create_group(&self, path: &ContainerPath) -> Result<(), ContainerError> {
        self.insert_node(path, MemoryNode::group())
    }

    fn create_dataset(
        &self,
        path: &ContainerPath,
        value: &ArrayValue,
        filters: &[DatasetFilter],
    ) -> Result<(), ContainerError> {
        let mut bytes = vec![];
        encode_array_data(&mut bytes, value.data());
        let bytes = encode_filters(filters, bytes)?;
        let dataset = MemoryDataset {
            shape: value.shape().to_vec(),
            data_type: value.data_type(),
            filters: filters.to_vec(),
            bytes,
        };
        self.insert_node(
            path,
            MemoryNode {
                dataset: Some(dataset),
                attributes: BTreeMap::new(),
            },
        )
    }

    fn set_attribute(
        &self,
        path: &ContainerPath,
        name: &str,
        value: ArrayValue,
    ) -> Result<(), ContainerError> {
        let mut nodes = self.nodes.write();
        let node = nodes
            .get_mut(path)
            .ok_or_else(|| ContainerError::NotFound(path.clone()))?;
        node.attributes.insert(name.to_string(), value);
        Ok(())
    }
}

fn get_dataset<'a>(
    nodes: &'a BTreeMap<ContainerPath, MemoryNode>,
    path: &ContainerPath,
) -> Result<&'a MemoryDataset, ContainerError> {
    nodes
        .get(path)
        .ok_or_else(|| ContainerError::NotFound(path.clone()))?
        .dataset
        .as_ref()
        .ok_or_else(|| ContainerError::NotADataset(path.clone()))
}

/// Encode array elements as native-endian bytes.
///
/// Strings are length prefixed, compound fields are stored one after another, each length prefixed.
fn encode_array_data(bytes: &mut Vec<u8>, data: &ArrayData) {
    match data {
        ArrayData::Bool(v) => bytes.extend(v.iter().map(|b| u8::from(*b))),
        ArrayData::Int8(v) => bytes.extend_from_slice(bytemuck::must_cast_slice(v)),
        ArrayData::Int16(v) => bytes.extend_from_slice(bytemuck::must_cast_slice(v)),
        ArrayData::Int32(v) => bytes.extend_from_slice(bytemuck::must_cast_slice(v)),
        ArrayData::Int64(v) => bytes.extend_from_slice(bytemuck::must_cast_slice(v)),
        ArrayData::UInt8(v) => bytes.extend_from_slice(v),
        ArrayData::UInt16(v) => bytes.extend_from_slice(bytemuck::must_cast_slice(v)),
        ArrayData::UInt32(v) => bytes.extend_from_slice(bytemuck::must_cast_slice(v)),
        ArrayData::UInt64(v) => bytes.extend_from_slice(bytemuck::must_cast_slice(v)),
        ArrayData::Float32(v) => bytes.extend_from_slice(bytemuck::must_cast_slice(v)),
        ArrayData::Float64(v) => bytes.extend_from_slice(bytemuck::must_cast_slice(v)),
        ArrayData::String(v) => {
            for s in v {
                bytes.extend_from_slice(&(s.len() as u64).to_ne_bytes());
                bytes.extend_from_slice(s.as_bytes());
            }
        }
        ArrayData::Compound(compound) => {
            for (_, field) in compound.fields() {
                let mut field_bytes = vec![];
                encode_array_data(&mut field_bytes, field);
                bytes.extend_from_slice(&(field_bytes.len() as u64).to_ne_bytes());
                bytes.extend(field_bytes);
            }
        }
    }
}

struct ByteReader<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn is_exhausted(&self) -> bool {
        self.bytes.is_empty()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ContainerError> {
        if len > self.bytes.len() {
            return Err(ContainerError::Other(format!(
                "dataset is truncated, expected {len} more bytes but {} remain",
                self.bytes.len()
            )));
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn take_len(&mut self) -> Result<usize, ContainerError> {
        let prefix: [u8; 8] = self
            .take(8)?
            .try_into()
            .map_err(|_| ContainerError::from("invalid length prefix"))?;
        usize::try_from(u64::from_ne_bytes(prefix))
            .map_err(|_| ContainerError::from("length prefix exceeds usize"))
    }

    fn take_pod<T: bytemuck::AnyBitPattern + bytemuck::NoUninit>(
        &mut self,
        len: usize,
    ) -> Result<Vec<T>, ContainerError> {
        let bytes = self.take(len * std::mem::size_of::<T>())?;
        Ok(bytemuck::pod_collect_to_vec(bytes))
    }
}

fn decode_array_data(
    reader: &mut ByteReader,
    data_type: &DataType,
    len: usize,
) -> Result<ArrayData, ContainerError> {
    Ok(match data_type {
        DataType::Bool => ArrayData::Bool(reader.take(len)?.iter().map(|b| *b != 0).collect()),
        DataType::Int8 => ArrayData::Int8(reader.take_pod(len)?),
        DataType::Int16 => ArrayData::Int16(reader.take_pod(len)?),
        DataType::Int32 => ArrayData::Int32(reader.take_pod(len)?),
        DataType::Int64 => ArrayData::Int64(reader.take_pod(len)?),
        DataType::UInt8 => ArrayData::UInt8(reader.take(len)?.to_vec()),
        DataType::UInt16 => ArrayData::UInt16(reader.take_pod(len)?),
        DataType::UInt32 => ArrayData::UInt32(reader.take_pod(len)?),
        DataType::UInt64 => ArrayData::UInt64(reader.take_pod(len)?),
        DataType::Float32 => ArrayData::Float32(reader.take_pod(len)?),
        DataType::Float64 => ArrayData::Float64(reader.take_pod(len)?),
        DataType::String => ArrayData::String(
            (0..len)
                .map(|_| {
                    let string_len = reader.take_len()?;
                    let bytes = reader.take(string_len)?;
                    String::from_utf8(bytes.to_vec())
                        .map_err(|err| ContainerError::Other(err.to_string()))
                })
                .collect::<Result<_, _>>()?,
        ),
        DataType::Compound(fields) => {
            let fields = fields
                .iter()
                .map(|field| {
                    let field_len = reader.take_len()?;
                    let mut field_reader = ByteReader::new(reader.take(field_len)?);
                    let data = decode_array_data(&mut field_reader, &field.data_type, len)?;
                    Ok((field.name.clone(), data))
                })
                .collect::<Result<Vec<_>, ContainerError>>()?;
            ArrayData::Compound(
                CompoundData::new(len, fields)
                    .map_err(|err| ContainerError::Other(err.to_string()))?,
            )
        }
    })
}
