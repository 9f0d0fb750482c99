//! Tagged binary serialization of values
//!
//! Every value is written as a fixed-size [`TagNode`] plus optional
//! auxiliary bytes. Scalars are decoded here; tags that denote game
//! entities are handed to a [`LoadContext`] supplied by the embedding code.

use crate::bytecode::BytecodeRef;
use crate::error::Error;
use crate::mutex::MutexContext;
use crate::subroutine::SubroutineValue;
use crate::value::Value;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::rc::Rc;

pub const TAG_EMPTY: u16 = 0x0000;
pub const TAG_INTEGER: u16 = 0x0001;
pub const TAG_FLOAT: u16 = 0x0002;
pub const TAG_BOOLEAN: u16 = 0x0003;
pub const TAG_STRING: u16 = 0x4000;
pub const TAG_BCO: u16 = 0x4001;
pub const TAG_MUTEX: u16 = 0x4002;
pub const TAG_HULL: u16 = 0x8005;
pub const TAG_ENGINE: u16 = 0x8006;
pub const TAG_BEAM: u16 = 0x8007;
pub const TAG_TORPEDO: u16 = 0x8008;
pub const TAG_LAUNCHER: u16 = 0x8009;

/// Fixed-size value header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagNode {
    pub tag: u16,
    pub value: u32,
}

impl TagNode {
    pub fn new(tag: u16, value: u32) -> Self {
        Self { tag, value }
    }

    /// Write the six-byte little-endian header
    pub fn write_to(&self, out: &mut dyn Write) -> Result<(), Error> {
        out.write_u16::<LittleEndian>(self.tag)?;
        out.write_u32::<LittleEndian>(self.value)?;
        Ok(())
    }

    pub fn read_from(input: &mut dyn Read) -> Result<Self, Error> {
        let tag = input.read_u16::<LittleEndian>()?;
        let value = input.read_u32::<LittleEndian>()?;
        Ok(Self { tag, value })
    }
}

/// Character set used for string payloads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    #[default]
    Utf8,
    Latin1,
}

impl Charset {
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Charset::Utf8 => text.as_bytes().to_vec(),
            Charset::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }
}

/// Receives objects that are stored by reference
pub trait SaveContext {
    /// Register a bytecode object and return its persistent id
    fn add_bytecode(&mut self, bco: &BytecodeRef) -> Result<u32, Error>;
}

/// Rebuilds values whose tags are not known to the interpreter
pub trait LoadContext {
    /// Rebuild an entity value. Entities that no longer exist load as null;
    /// tags the context does not know fail with [`unknown_tag`].
    fn load_context(&self, node: &TagNode, aux: &mut dyn Read) -> Result<Option<Value>, Error>;

    /// Bytecode object registered under `id` when the value was saved
    fn load_bytecode(&self, id: u32) -> Result<Option<BytecodeRef>, Error>;
}

/// Bytecode objects stored by reference, numbered from 0 in order of
/// registration. Registering the same object twice yields the same id.
#[derive(Debug, Default)]
pub struct BytecodeList {
    objects: Vec<BytecodeRef>,
}

impl BytecodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u32) -> Option<&BytecodeRef> {
        self.objects.get(usize::try_from(id).ok()?)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

impl SaveContext for BytecodeList {
    fn add_bytecode(&mut self, bco: &BytecodeRef) -> Result<u32, Error> {
        let index = match self.objects.iter().position(|o| Rc::ptr_eq(o, bco)) {
            Some(index) => index,
            None => {
                self.objects.push(bco.clone());
                self.objects.len() - 1
            }
        };
        u32::try_from(index).map_err(|_| Error::Range)
    }
}

/// Error for a tag no decoder recognizes
pub fn unknown_tag(node: &TagNode) -> Error {
    Error::InvalidData(format!("unknown tag 0x{:04X}", node.tag))
}

/// Store an optional value; null becomes [`TAG_EMPTY`]
pub fn store_value(
    value: Option<&Value>,
    out: &mut TagNode,
    aux: &mut Vec<u8>,
    charset: Charset,
    ctx: Option<&mut dyn SaveContext>,
) -> Result<(), Error> {
    match value {
        None => {
            *out = TagNode::new(TAG_EMPTY, 0);
            Ok(())
        }
        Some(v) => v.store(out, aux, charset, ctx),
    }
}

pub(crate) fn store_string(text: &str, out: &mut TagNode, aux: &mut Vec<u8>, charset: Charset) -> Result<(), Error> {
    let bytes = charset.encode(text);
    let len = u32::try_from(bytes.len()).map_err(|_| Error::Range)?;
    aux.extend_from_slice(&bytes);
    *out = TagNode::new(TAG_STRING, len);
    Ok(())
}

pub(crate) fn store_float(value: f64, out: &mut TagNode, aux: &mut Vec<u8>) -> Result<(), Error> {
    aux.write_f64::<LittleEndian>(value)?;
    *out = TagNode::new(TAG_FLOAT, 0);
    Ok(())
}

/// Write a length-prefixed string into auxiliary data
pub fn write_aux_string(aux: &mut Vec<u8>, text: &str, charset: Charset) -> Result<(), Error> {
    let bytes = charset.encode(text);
    let len = u32::try_from(bytes.len()).map_err(|_| Error::Range)?;
    aux.write_u32::<LittleEndian>(len)?;
    aux.extend_from_slice(&bytes);
    Ok(())
}

/// Read a length-prefixed string written by [`write_aux_string`]
pub fn read_aux_string(aux: &mut dyn Read, charset: Charset) -> Result<String, Error> {
    let len = aux.read_u32::<LittleEndian>()?;
    read_bytes(aux, len).map(|bytes| charset.decode(&bytes))
}

fn read_bytes(aux: &mut dyn Read, len: u32) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    let got = aux.take(u64::from(len)).read_to_end(&mut bytes)?;
    if got as u64 != u64::from(len) {
        return Err(Error::InvalidData("auxiliary data truncated".to_string()));
    }
    Ok(bytes)
}

/// Rebuild a value from its tag node and auxiliary data
pub fn load_value(
    node: &TagNode,
    aux: &mut dyn Read,
    charset: Charset,
    ctx: &dyn LoadContext,
) -> Result<Option<Value>, Error> {
    match node.tag {
        TAG_EMPTY => Ok(None),
        TAG_INTEGER => Ok(Some(Value::Integer(node.value as i32))),
        TAG_BOOLEAN => match node.value {
            0 => Ok(Some(Value::Boolean(false))),
            1 => Ok(Some(Value::Boolean(true))),
            _ => Ok(None),
        },
        TAG_FLOAT => Ok(Some(Value::Float(aux.read_f64::<LittleEndian>()?))),
        TAG_STRING => {
            let bytes = read_bytes(aux, node.value)?;
            Ok(Some(Value::String(charset.decode(&bytes))))
        }
        TAG_MUTEX => {
            let name = read_aux_string(aux, charset)?;
            let note = read_aux_string(aux, charset)?;
            Ok(Some(Value::Context(Box::new(MutexContext::new(name, note)))))
        }
        TAG_BCO => match ctx.load_bytecode(node.value)? {
            Some(bco) => Ok(Some(SubroutineValue::new(bco).into_value())),
            None => Err(Error::InvalidData(format!("unknown bytecode object {}", node.value))),
        },
        _ => ctx.load_context(node, aux),
    }
}
