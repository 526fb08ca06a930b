use std::fmt;

use ash::vk::{self, Handle};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::SerialiseError;
use crate::serialiser::Serialiser;
use crate::structured::StructuredData;

/// Stable identifier for a Vulkan object, valid across capture and replay.
/// Raw handle values are never written to the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u64);

impl ResourceId {
    pub const NULL: ResourceId = ResourceId(0);

    pub fn null() -> Self {
        Self::NULL
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId::{}", self.0)
    }
}

/// Translation between live handles and stream identifiers.
///
/// The serialiser only ever reads through this trait, so an implementation
/// shared between threads needs interior synchronisation but no locking
/// across a pass.
pub trait ResourceManager {
    /// Identifier recorded for a live handle, or [`ResourceId::NULL`] if the
    /// handle is unknown.
    fn resource_id(&self, object_type: vk::ObjectType, raw: u64) -> ResourceId;

    /// The identifier the resource had when it was first captured. Replay
    /// sessions may remap ids; structured dumps show the original.
    fn original_id(&self, id: ResourceId) -> ResourceId;

    fn has_live_resource(&self, id: ResourceId) -> bool;

    /// Raw live handle bound to `id`, if it is of `object_type`.
    fn live_handle(&self, object_type: vk::ObjectType, id: ResourceId) -> Option<u64>;
}

/// Display name of a handle type in structured output.
pub fn object_type_name(object_type: vk::ObjectType) -> &'static str {
    match object_type {
        vk::ObjectType::BUFFER => "VkBuffer",
        vk::ObjectType::BUFFER_VIEW => "VkBufferView",
        vk::ObjectType::IMAGE => "VkImage",
        vk::ObjectType::IMAGE_VIEW => "VkImageView",
        vk::ObjectType::SAMPLER => "VkSampler",
        vk::ObjectType::DEVICE_MEMORY => "VkDeviceMemory",
        vk::ObjectType::DESCRIPTOR_SET => "VkDescriptorSet",
        vk::ObjectType::PIPELINE => "VkPipeline",
        vk::ObjectType::PIPELINE_LAYOUT => "VkPipelineLayout",
        vk::ObjectType::RENDER_PASS => "VkRenderPass",
        vk::ObjectType::SHADER_MODULE => "VkShaderModule",
        vk::ObjectType::SEMAPHORE => "VkSemaphore",
        vk::ObjectType::COMMAND_BUFFER => "VkCommandBuffer",
        _ => "VkObject",
    }
}

/// Serialise a handle through its [`ResourceId`].
///
/// Writing records the id the resource manager assigned to the live handle.
/// Structurising live data records the original id instead. Reading resolves
/// the id back to a live handle; a miss is a warning unless the enclosing
/// struct declared its resources optional, and leaves the handle null.
pub fn serialise_handle<H: Handle + Copy>(
    ser: &mut Serialiser<'_>,
    handle: &mut H,
) -> Result<(), SerialiseError> {
    let object_type = H::TYPE;
    let resources = ser.resources();

    let mut id = ResourceId::NULL;
    if !ser.is_reading() && !handle.is_null() {
        if let Some(rm) = resources {
            id = rm.resource_id(object_type, handle.as_raw());
            if !ser.is_writing() {
                id = rm.original_id(id);
            }
        }
    }

    id = ResourceId(u64::from_le_bytes(ser.scalar(id.0.to_le_bytes())?));
    ser.record(|| StructuredData::Resource(id));

    if ser.is_reading() {
        *handle = H::from_raw(0);
        if id.is_null() || ser.is_structurising() {
            return Ok(());
        }

        let live = resources
            .filter(|rm| rm.has_live_resource(id))
            .and_then(|rm| rm.live_handle(object_type, id));
        match live {
            Some(raw) => *handle = H::from_raw(raw),
            None if ser.optional_resources_active() => {
                trace!(%id, "optional {} has no live resource", object_type_name(object_type));
            }
            None => {
                warn!(
                    %id,
                    "stream references a {} with no live resource, it may have been dropped from the capture",
                    object_type_name(object_type)
                );
            }
        }
    }

    Ok(())
}
