//! Serialisers for individual Vulkan structs.
//!
//! Field names match the Vulkan member names so structured dumps read like
//! the API. Extensible structs end with [`serialise_next`](crate::next_chain::serialise_next).

pub mod barrier;
pub mod descriptor;
#[cfg(feature = "win32")]
pub mod external;
pub mod pipeline;
pub mod plain;
pub mod resource;
pub mod shader;
pub mod submit;

pub use barrier::*;
pub use descriptor::*;
#[cfg(feature = "win32")]
pub use external::*;
pub use pipeline::*;
pub use plain::*;
pub use resource::*;
pub use shader::*;
pub use submit::*;
