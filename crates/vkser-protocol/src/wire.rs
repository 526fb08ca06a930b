use std::borrow::Cow;
use std::io::{Read, Write};

/// Chunk magic bytes: "VS"
pub const MAGIC: [u8; 2] = [0x56, 0x53];

/// Maximum chunk payload size: 256 MB
pub const MAX_CHUNK_SIZE: u32 = 256 * 1024 * 1024;

/// Chunk header size in bytes: magic(2) + flags(1) + version(4) + length(4) = 11
pub const HEADER_SIZE: usize = 11;

/// Minimum payload size to attempt LZ4 compression (bytes).
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 512;

bitflags::bitflags! {
    /// Chunk flags byte. Any other bit set is a malformed header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChunkFlags: u8 {
        const COMPRESSED = 0b0000_0001;
    }
}

/// Decoded chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub flags: ChunkFlags,
    /// Stream version the payload was serialised with.
    pub version: u32,
    pub length: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    /// Compress payloads larger than `threshold` bytes when it makes them
    /// smaller.
    Lz4 { threshold: usize },
}

impl Default for Compression {
    fn default() -> Self {
        Compression::Lz4 {
            threshold: DEFAULT_COMPRESSION_THRESHOLD,
        }
    }
}

/// Frame a serialised record (header + payload), with optional LZ4 compression.
pub fn encode_chunk(payload: &[u8], version: u32, compression: Compression) -> Result<Vec<u8>, WireError> {
    let (final_payload, flags) = match compression {
        Compression::Lz4 { threshold } if payload.len() > threshold => {
            let compressed = lz4_flex::compress_prepend_size(payload);
            if compressed.len() < payload.len() {
                (Cow::Owned(compressed), ChunkFlags::COMPRESSED)
            } else {
                // Compression didn't help, store uncompressed
                (Cow::Borrowed(payload), ChunkFlags::empty())
            }
        }
        _ => (Cow::Borrowed(payload), ChunkFlags::empty()),
    };

    let length = u32::try_from(final_payload.len())
        .ok()
        .filter(|len| *len <= MAX_CHUNK_SIZE)
        .ok_or(WireError::ChunkTooLarge(final_payload.len() as u64))?;

    let mut chunk = Vec::with_capacity(HEADER_SIZE + final_payload.len());
    chunk.extend_from_slice(&MAGIC);
    chunk.push(flags.bits());
    chunk.extend_from_slice(&version.to_le_bytes());
    chunk.extend_from_slice(&length.to_le_bytes());
    chunk.extend_from_slice(&final_payload);

    Ok(chunk)
}

/// Decode a chunk header.
pub fn decode_header(header: &[u8; HEADER_SIZE]) -> Result<ChunkHeader, WireError> {
    if header[0] != MAGIC[0] || header[1] != MAGIC[1] {
        return Err(WireError::InvalidMagic);
    }

    let flags = ChunkFlags::from_bits(header[2]).ok_or(WireError::UnknownFlags(header[2]))?;
    let version = u32::from_le_bytes([header[3], header[4], header[5], header[6]]);
    let length = u32::from_le_bytes([header[7], header[8], header[9], header[10]]);

    if length > MAX_CHUNK_SIZE {
        return Err(WireError::ChunkTooLarge(u64::from(length)));
    }

    Ok(ChunkHeader { flags, version, length })
}

/// Split an in-memory chunk into its header and raw payload.
pub fn split_chunk(chunk: &[u8]) -> Result<(ChunkHeader, &[u8]), WireError> {
    let header: &[u8; HEADER_SIZE] = chunk
        .get(..HEADER_SIZE)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(WireError::Truncated {
            expected: HEADER_SIZE,
            actual: chunk.len(),
        })?;
    let header = decode_header(header)?;

    let body = &chunk[HEADER_SIZE..];
    let length = header.length as usize;
    if body.len() < length {
        return Err(WireError::Truncated {
            expected: HEADER_SIZE + length,
            actual: chunk.len(),
        });
    }
    Ok((header, &body[..length]))
}

/// Recover the serialised record, decompressing if the COMPRESSED flag is set.
pub fn decode_payload<'p>(payload: &'p [u8], flags: ChunkFlags) -> Result<Cow<'p, [u8]>, WireError> {
    if flags.contains(ChunkFlags::COMPRESSED) {
        Ok(Cow::Owned(
            lz4_flex::decompress_size_prepended(payload)
                .map_err(|e| WireError::DecompressionError(e.to_string()))?,
        ))
    } else {
        Ok(Cow::Borrowed(payload))
    }
}

/// Read one chunk and return its header with the decompressed record.
pub fn read_chunk<R: Read>(reader: &mut R) -> Result<(ChunkHeader, Vec<u8>), WireError> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;
    let header = decode_header(&header)?;

    let mut payload = vec![0u8; header.length as usize];
    reader.read_exact(&mut payload)?;
    let record = decode_payload(&payload, header.flags)?.into_owned();
    Ok((header, record))
}

pub fn write_chunk<W: Write>(
    writer: &mut W,
    payload: &[u8],
    version: u32,
    compression: Compression,
) -> Result<(), WireError> {
    let chunk = encode_chunk(payload, version, compression)?;
    writer.write_all(&chunk)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid magic bytes")]
    InvalidMagic,
    #[error("unknown chunk flags {0:#010b}")]
    UnknownFlags(u8),
    #[error("chunk too large: {0} bytes")]
    ChunkTooLarge(u64),
    #[error("truncated chunk: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("decompression error: {0}")]
    DecompressionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
