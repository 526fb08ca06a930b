//! Plain structs embedded in others. No `sType`, no chain.

use ash::vk;

use crate::error::SerialiseError;
use crate::flags::serialise_flags;
use crate::serialiser::{Serialise, Serialiser};
use crate::validity::StructArgs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offset2D {
    pub x: i32,
    pub y: i32,
}

impl Serialise for Offset2D {
    const TYPE_NAME: &'static str = "VkOffset2D";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("x", &mut self.x)?;
        ser.serialise("y", &mut self.y)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl Serialise for Extent2D {
    const TYPE_NAME: &'static str = "VkExtent2D";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("width", &mut self.width)?;
        ser.serialise("height", &mut self.height)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent3D {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Serialise for Extent3D {
    const TYPE_NAME: &'static str = "VkExtent3D";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("width", &mut self.width)?;
        ser.serialise("height", &mut self.height)?;
        ser.serialise("depth", &mut self.depth)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect2D {
    pub offset: Offset2D,
    pub extent: Extent2D,
}

impl Serialise for Rect2D {
    const TYPE_NAME: &'static str = "VkRect2D";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("offset", &mut self.offset)?;
        ser.serialise("extent", &mut self.extent)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Serialise for Viewport {
    const TYPE_NAME: &'static str = "VkViewport";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("x", &mut self.x)?;
        ser.serialise("y", &mut self.y)?;
        ser.serialise("width", &mut self.width)?;
        ser.serialise("height", &mut self.height)?;
        ser.serialise("minDepth", &mut self.min_depth)?;
        ser.serialise("maxDepth", &mut self.max_depth)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageSubresourceRange {
    pub aspect_mask: vk::ImageAspectFlags,
    pub base_mip_level: u32,
    pub level_count: u32,
    pub base_array_layer: u32,
    pub layer_count: u32,
}

impl Serialise for ImageSubresourceRange {
    const TYPE_NAME: &'static str = "VkImageSubresourceRange";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "aspectMask", &mut self.aspect_mask)?;
        ser.serialise("baseMipLevel", &mut self.base_mip_level)?;
        ser.serialise("levelCount", &mut self.level_count)?;
        ser.serialise("baseArrayLayer", &mut self.base_array_layer)?;
        ser.serialise("layerCount", &mut self.layer_count)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentMapping {
    pub r: vk::ComponentSwizzle,
    pub g: vk::ComponentSwizzle,
    pub b: vk::ComponentSwizzle,
    pub a: vk::ComponentSwizzle,
}

impl Serialise for ComponentMapping {
    const TYPE_NAME: &'static str = "VkComponentMapping";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("r", &mut self.r)?;
        ser.serialise("g", &mut self.g)?;
        ser.serialise("b", &mut self.b)?;
        ser.serialise("a", &mut self.a)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StencilOpState {
    pub fail_op: vk::StencilOp,
    pub pass_op: vk::StencilOp,
    pub depth_fail_op: vk::StencilOp,
    pub compare_op: vk::CompareOp,
    pub compare_mask: u32,
    pub write_mask: u32,
    pub reference: u32,
}

impl Serialise for StencilOpState {
    const TYPE_NAME: &'static str = "VkStencilOpState";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("failOp", &mut self.fail_op)?;
        ser.serialise("passOp", &mut self.pass_op)?;
        ser.serialise("depthFailOp", &mut self.depth_fail_op)?;
        ser.serialise("compareOp", &mut self.compare_op)?;
        ser.serialise("compareMask", &mut self.compare_mask)?;
        ser.serialise("writeMask", &mut self.write_mask)?;
        ser.serialise("reference", &mut self.reference)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineColorBlendAttachmentState {
    pub blend_enable: bool,
    pub src_color_blend_factor: vk::BlendFactor,
    pub dst_color_blend_factor: vk::BlendFactor,
    pub color_blend_op: vk::BlendOp,
    pub src_alpha_blend_factor: vk::BlendFactor,
    pub dst_alpha_blend_factor: vk::BlendFactor,
    pub alpha_blend_op: vk::BlendOp,
    pub color_write_mask: vk::ColorComponentFlags,
}

impl Serialise for PipelineColorBlendAttachmentState {
    const TYPE_NAME: &'static str = "VkPipelineColorBlendAttachmentState";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("blendEnable", &mut self.blend_enable)?;
        ser.serialise("srcColorBlendFactor", &mut self.src_color_blend_factor)?;
        ser.serialise("dstColorBlendFactor", &mut self.dst_color_blend_factor)?;
        ser.serialise("colorBlendOp", &mut self.color_blend_op)?;
        ser.serialise("srcAlphaBlendFactor", &mut self.src_alpha_blend_factor)?;
        ser.serialise("dstAlphaBlendFactor", &mut self.dst_alpha_blend_factor)?;
        ser.serialise("alphaBlendOp", &mut self.alpha_blend_op)?;
        serialise_flags(ser, "colorWriteMask", &mut self.color_write_mask)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexInputBindingDescription {
    pub binding: u32,
    pub stride: u32,
    pub input_rate: vk::VertexInputRate,
}

impl Serialise for VertexInputBindingDescription {
    const TYPE_NAME: &'static str = "VkVertexInputBindingDescription";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("binding", &mut self.binding)?;
        ser.serialise("stride", &mut self.stride)?;
        ser.serialise("inputRate", &mut self.input_rate)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexInputAttributeDescription {
    pub location: u32,
    pub binding: u32,
    pub format: vk::Format,
    pub offset: u32,
}

impl Serialise for VertexInputAttributeDescription {
    const TYPE_NAME: &'static str = "VkVertexInputAttributeDescription";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("location", &mut self.location)?;
        ser.serialise("binding", &mut self.binding)?;
        ser.serialise("format", &mut self.format)?;
        ser.serialise("offset", &mut self.offset)?;
        Ok(())
    }
}
