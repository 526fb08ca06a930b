//! Binary serialisation of Vulkan structs and their `pNext` extension
//! chains.
//!
//! A single [`Serialise`] implementation per struct drives writing, reading
//! and structured export. Chains are owned [`Next`] lists; unsupported
//! nodes are dropped on write and stop the chain on read.

pub mod error;
pub mod flags;
pub mod handle;
pub mod next_chain;
pub mod optional;
pub mod serialiser;
pub mod structs;
pub mod structured;
pub mod stype;
mod types;
pub mod validity;
pub mod version;
pub mod wire;

pub use error::{ErrorKind, SerialiseError};
pub use handle::{ResourceId, ResourceManager};
pub use next_chain::{serialise_next, ChainNode, Extensible, Next, OpaqueStruct};
pub use serialiser::{Decoded, HostWidth, Mode, Serialise, Serialiser};
pub use structured::{to_json, StructuredData, StructuredObject};
pub use stype::StructureType;
pub use validity::{NextChainFlags, StructArgs, Validity};
pub use version::{CURRENT_VERSION, MAX_NESTING_DEPTH};
pub use wire::{ChunkFlags, ChunkHeader, Compression, WireError};
