/// Broad category of a serialisation failure, for callers deciding whether
/// a failed record should abort a whole load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The stream uses a feature this build was compiled without.
    ApiUnsupported,
    /// The bytes do not describe a valid record.
    Corrupt,
    /// The stream was written by an incompatible format version.
    Version,
    /// A value does not fit the host representation.
    Range,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerialiseError {
    #[error("{name} is not supported by this build, the rest of its next chain was discarded")]
    UnsupportedStructure { name: &'static str },

    #[error("unrecognised structure type {0} in next chain")]
    UnknownStructureType(i32),

    #[error("unexpected end of data reading {field}: wanted {wanted} bytes, {remaining} remaining")]
    UnexpectedEof {
        field: &'static str,
        wanted: usize,
        remaining: usize,
    },

    #[error("invalid boolean {value} in {field}")]
    InvalidBool { field: &'static str, value: u8 },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("length {length} of {field} is larger than the remaining data")]
    InvalidLength { field: &'static str, length: u64 },

    #[error("{value} in {field} does not fit a {bits}-bit host")]
    ValueOutOfRange {
        field: &'static str,
        value: u64,
        bits: u32,
    },

    #[error("{field} is nested {depth} levels deep, past the format limit")]
    TooDeep { field: &'static str, depth: usize },

    #[error("{remaining} trailing bytes after the record")]
    TrailingData { remaining: usize },

    #[error("format version {version:#x} is outside the supported range {min:#x}..={max:#x}")]
    UnsupportedVersion { version: u32, min: u32, max: u32 },
}

impl SerialiseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SerialiseError::UnsupportedStructure { .. } => ErrorKind::ApiUnsupported,
            SerialiseError::UnknownStructureType(_)
            | SerialiseError::UnexpectedEof { .. }
            | SerialiseError::InvalidBool { .. }
            | SerialiseError::InvalidUtf8 { .. }
            | SerialiseError::InvalidLength { .. }
            | SerialiseError::TooDeep { .. }
            | SerialiseError::TrailingData { .. } => ErrorKind::Corrupt,
            SerialiseError::ValueOutOfRange { .. } => ErrorKind::Range,
            SerialiseError::UnsupportedVersion { .. } => ErrorKind::Version,
        }
    }
}
