//! Stream format versions.
//!
//! Every field added after the first supported version is gated on the
//! constant that introduced it, and readers of older streams fall back to
//! the default documented next to the field.

/// Oldest stream version this build can read.
pub const MIN_SUPPORTED_VERSION: u32 = 0x10;

/// `PipelineMultisampleStateCreateInfo::pSampleMask`.
/// Older streams read back with no sample mask.
pub const VERSION_SAMPLE_MASK: u32 = 0x11;

/// `basePipelineHandle` / `basePipelineIndex` on pipeline create infos.
/// Older streams read back with a null handle and index -1.
pub const VERSION_BASE_PIPELINE: u32 = 0x12;

/// Deepest field nesting a record may reach, counting the record itself.
/// Every next chain node adds one level, so this also bounds chain length.
/// Exceeding it is `SerialiseError::TooDeep` on every pass.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Version written by this build.
pub const CURRENT_VERSION: u32 = 0x12;
