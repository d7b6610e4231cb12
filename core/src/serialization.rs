use std::io::{Read, Result, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Little-endian serialization into a pre-allocated layout.
pub trait WriterTo {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()>;
}

/// Deserialization in place: the receiver is allocated with the expected
/// dimensions and any mismatch with the stream is an `InvalidData` error.
pub trait ReaderFrom {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()>;
}

pub(crate) fn invalid_data(msg: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, msg)
}

/// Writes `data.len()` as u64 followed by the words.
pub(crate) fn write_u64_slice<W: Write>(writer: &mut W, data: &[u64]) -> Result<()> {
    writer.write_u64::<LittleEndian>(data.len() as u64)?;
    data.iter().try_for_each(|x| writer.write_u64::<LittleEndian>(*x))
}

/// Reads a slice written by [`write_u64_slice`] into `data`, whose length must match.
pub(crate) fn read_u64_slice<R: Read>(reader: &mut R, data: &mut [u64]) -> Result<()> {
    let len: usize = reader.read_u64::<LittleEndian>()? as usize;
    if len != data.len() {
        return Err(invalid_data(format!(
            "self.data.len()={} != read len={}",
            data.len(),
            len
        )));
    }
    reader.read_u64_into::<LittleEndian>(data)
}

pub(crate) fn write_u32_slice<W: Write>(writer: &mut W, data: &[u32]) -> Result<()> {
    writer.write_u64::<LittleEndian>(data.len() as u64)?;
    data.iter().try_for_each(|x| writer.write_u32::<LittleEndian>(*x))
}

pub(crate) fn read_u32_slice<R: Read>(reader: &mut R, data: &mut [u32]) -> Result<()> {
    let len: usize = reader.read_u64::<LittleEndian>()? as usize;
    if len != data.len() {
        return Err(invalid_data(format!(
            "self.data.len()={} != read len={}",
            data.len(),
            len
        )));
    }
    reader.read_u32_into::<LittleEndian>(data)
}
