//! Wire representation of ash's enum, flags and handle types.

use ash::vk;

use crate::error::SerialiseError;
use crate::flags::{FlagBits, NoBits};
use crate::handle::serialise_handle;
use crate::serialiser::{Serialise, Serialiser};
use crate::structured::StructuredData;
use crate::validity::StructArgs;

// Enums travel as i32.
macro_rules! vk_enums {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Serialise for $ty {
            const TYPE_NAME: &'static str = $name;

            fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
                let raw = i32::from_le_bytes(ser.scalar(self.as_raw().to_le_bytes())?);
                *self = <$ty>::from_raw(raw);
                let value = *self;
                ser.record(|| StructuredData::Enum {
                    value: i64::from(raw),
                    name: format!("{value:?}"),
                });
                Ok(())
            }
        }
    )*};
}

// Flags travel as u32.
macro_rules! vk_flags {
    (@impl $ty:ty => $name:literal) => {
        impl Serialise for $ty {
            const TYPE_NAME: &'static str = $name;

            fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
                let raw = u32::from_le_bytes(ser.scalar(self.as_raw().to_le_bytes())?);
                *self = <$ty>::from_raw(raw);
                let value = *self;
                ser.record(|| StructuredData::Bitmask {
                    value: u64::from(raw),
                    flags: $name,
                    bits: format!("{value:?}"),
                });
                Ok(())
            }
        }
    };
    (bits: $($ty:ty => $name:literal),* $(,)?) => {$(
        vk_flags!(@impl $ty => $name);
        impl FlagBits for $ty {}
    )*};
    (no_bits: $($ty:ty => $name:literal),* $(,)?) => {$(
        vk_flags!(@impl $ty => $name);
        impl NoBits for $ty {}
    )*};
}

macro_rules! vk_handles {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Serialise for $ty {
            const TYPE_NAME: &'static str = $name;

            fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
                serialise_handle(ser, self)
            }
        }
    )*};
}

vk_enums! {
    vk::StructureType => "VkStructureType",
    vk::Format => "VkFormat",
    vk::ImageType => "VkImageType",
    vk::ImageTiling => "VkImageTiling",
    vk::ImageLayout => "VkImageLayout",
    vk::ImageViewType => "VkImageViewType",
    vk::SharingMode => "VkSharingMode",
    vk::ComponentSwizzle => "VkComponentSwizzle",
    vk::DescriptorType => "VkDescriptorType",
    vk::PrimitiveTopology => "VkPrimitiveTopology",
    vk::PolygonMode => "VkPolygonMode",
    vk::FrontFace => "VkFrontFace",
    vk::CompareOp => "VkCompareOp",
    vk::StencilOp => "VkStencilOp",
    vk::LogicOp => "VkLogicOp",
    vk::BlendFactor => "VkBlendFactor",
    vk::BlendOp => "VkBlendOp",
    vk::DynamicState => "VkDynamicState",
    vk::VertexInputRate => "VkVertexInputRate",
}

vk_flags! {
    bits:
    vk::AccessFlags => "VkAccessFlags",
    vk::BufferCreateFlags => "VkBufferCreateFlags",
    vk::BufferUsageFlags => "VkBufferUsageFlags",
    vk::ImageCreateFlags => "VkImageCreateFlags",
    vk::ImageUsageFlags => "VkImageUsageFlags",
    vk::ImageAspectFlags => "VkImageAspectFlags",
    vk::ImageViewCreateFlags => "VkImageViewCreateFlags",
    vk::SampleCountFlags => "VkSampleCountFlags",
    vk::PipelineStageFlags => "VkPipelineStageFlags",
    vk::PipelineCreateFlags => "VkPipelineCreateFlags",
    vk::PipelineCacheCreateFlags => "VkPipelineCacheCreateFlags",
    vk::PipelineShaderStageCreateFlags => "VkPipelineShaderStageCreateFlags",
    vk::PipelineColorBlendStateCreateFlags => "VkPipelineColorBlendStateCreateFlags",
    vk::PipelineDepthStencilStateCreateFlags => "VkPipelineDepthStencilStateCreateFlags",
    vk::ShaderStageFlags => "VkShaderStageFlags",
    vk::CullModeFlags => "VkCullModeFlags",
    vk::ColorComponentFlags => "VkColorComponentFlags",
    vk::GraphicsPipelineLibraryFlagsEXT => "VkGraphicsPipelineLibraryFlagsEXT",
    vk::ExternalMemoryHandleTypeFlags => "VkExternalMemoryHandleTypeFlags",
}

vk_flags! {
    no_bits:
    vk::ShaderModuleCreateFlags => "VkShaderModuleCreateFlags",
    vk::PipelineVertexInputStateCreateFlags => "VkPipelineVertexInputStateCreateFlags",
    vk::PipelineInputAssemblyStateCreateFlags => "VkPipelineInputAssemblyStateCreateFlags",
    vk::PipelineTessellationStateCreateFlags => "VkPipelineTessellationStateCreateFlags",
    vk::PipelineViewportStateCreateFlags => "VkPipelineViewportStateCreateFlags",
    vk::PipelineRasterizationStateCreateFlags => "VkPipelineRasterizationStateCreateFlags",
    vk::PipelineMultisampleStateCreateFlags => "VkPipelineMultisampleStateCreateFlags",
    vk::PipelineDynamicStateCreateFlags => "VkPipelineDynamicStateCreateFlags",
}

vk_handles! {
    vk::Buffer => "VkBuffer",
    vk::BufferView => "VkBufferView",
    vk::Image => "VkImage",
    vk::ImageView => "VkImageView",
    vk::Sampler => "VkSampler",
    vk::DeviceMemory => "VkDeviceMemory",
    vk::DescriptorSet => "VkDescriptorSet",
    vk::Pipeline => "VkPipeline",
    vk::PipelineLayout => "VkPipelineLayout",
    vk::RenderPass => "VkRenderPass",
    vk::ShaderModule => "VkShaderModule",
    vk::Semaphore => "VkSemaphore",
    vk::CommandBuffer => "VkCommandBuffer",
}
