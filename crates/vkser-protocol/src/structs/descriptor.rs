use ash::vk;

use crate::error::SerialiseError;
use crate::next_chain::{serialise_next, Extensible, Next};
use crate::serialiser::{Serialise, Serialiser};
use crate::validity::{serialise_gated, Gate, StructArgs, Validity};

/// Members of `VkDescriptorImageInfo` that a descriptor type reads.
pub fn image_info_validity(descriptor_type: vk::DescriptorType) -> Validity {
    match descriptor_type {
        vk::DescriptorType::SAMPLER => Validity::SAMPLER,
        vk::DescriptorType::COMBINED_IMAGE_SAMPLER => Validity::all(),
        vk::DescriptorType::SAMPLED_IMAGE
        | vk::DescriptorType::STORAGE_IMAGE
        | vk::DescriptorType::INPUT_ATTACHMENT => Validity::IMAGE_VIEW | Validity::IMAGE_LAYOUT,
        _ => Validity::empty(),
    }
}

/// Which array of a `VkWriteDescriptorSet` holds the descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorPayload {
    Image,
    Buffer,
    TexelBuffer,
    /// Data lives in a chained `VkWriteDescriptorSetInlineUniformBlock`.
    Inline,
    None,
}

impl DescriptorPayload {
    pub fn of(descriptor_type: vk::DescriptorType) -> Self {
        match descriptor_type {
            vk::DescriptorType::SAMPLER
            | vk::DescriptorType::COMBINED_IMAGE_SAMPLER
            | vk::DescriptorType::SAMPLED_IMAGE
            | vk::DescriptorType::STORAGE_IMAGE
            | vk::DescriptorType::INPUT_ATTACHMENT => DescriptorPayload::Image,
            vk::DescriptorType::UNIFORM_BUFFER
            | vk::DescriptorType::STORAGE_BUFFER
            | vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC
            | vk::DescriptorType::STORAGE_BUFFER_DYNAMIC => DescriptorPayload::Buffer,
            vk::DescriptorType::UNIFORM_TEXEL_BUFFER | vk::DescriptorType::STORAGE_TEXEL_BUFFER => {
                DescriptorPayload::TexelBuffer
            }
            vk::DescriptorType::INLINE_UNIFORM_BLOCK => DescriptorPayload::Inline,
            _ => DescriptorPayload::None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescriptorImageInfo {
    pub sampler: vk::Sampler,
    pub image_view: vk::ImageView,
    pub image_layout: vk::ImageLayout,
}

impl Serialise for DescriptorImageInfo {
    const TYPE_NAME: &'static str = "VkDescriptorImageInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        let mut ser = ser.optional_resources();
        let validity = args.validity;

        serialise_gated(
            &mut ser,
            "sampler",
            Gate::when(validity.contains(Validity::SAMPLER)),
            &mut self.sampler,
            args,
        )?;
        serialise_gated(
            &mut ser,
            "imageView",
            Gate::when(validity.contains(Validity::IMAGE_VIEW)),
            &mut self.image_view,
            args,
        )?;
        serialise_gated(
            &mut ser,
            "imageLayout",
            Gate::when(validity.contains(Validity::IMAGE_LAYOUT)),
            &mut self.image_layout,
            args,
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescriptorBufferInfo {
    pub buffer: vk::Buffer,
    pub offset: u64,
    pub range: u64,
}

impl Serialise for DescriptorBufferInfo {
    const TYPE_NAME: &'static str = "VkDescriptorBufferInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        let mut ser = ser.optional_resources();

        ser.serialise("buffer", &mut self.buffer)?;
        ser.serialise("offset", &mut self.offset)?;
        ser.serialise("range", &mut self.range)?;
        Ok(())
    }
}

/// Only the array matching `descriptor_type` is meaningful; the others are
/// written empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteDescriptorSet {
    pub dst_set: vk::DescriptorSet,
    pub dst_binding: u32,
    pub dst_array_element: u32,
    /// Number of descriptors, or bytes for inline uniform blocks.
    pub descriptor_count: u32,
    pub descriptor_type: vk::DescriptorType,
    pub image_info: Vec<DescriptorImageInfo>,
    pub buffer_info: Vec<DescriptorBufferInfo>,
    pub texel_buffer_view: Vec<vk::BufferView>,
    pub next: Next,
}

impl Serialise for WriteDescriptorSet {
    const TYPE_NAME: &'static str = "VkWriteDescriptorSet";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        // Writes to descriptors the capture never used can reference
        // resources that were not recorded.
        let mut ser = ser.optional_resources();

        ser.serialise("dstSet", &mut self.dst_set)?;
        ser.serialise("dstBinding", &mut self.dst_binding)?;
        ser.serialise("dstArrayElement", &mut self.dst_array_element)?;
        ser.serialise("descriptorCount", &mut self.descriptor_count)?;
        ser.serialise("descriptorType", &mut self.descriptor_type)?;

        let payload = DescriptorPayload::of(self.descriptor_type);
        let image_args = args.with_validity(image_info_validity(self.descriptor_type));

        serialise_gated(
            &mut ser,
            "pImageInfo",
            Gate::when(payload == DescriptorPayload::Image),
            &mut self.image_info,
            image_args,
        )?;
        serialise_gated(
            &mut ser,
            "pBufferInfo",
            Gate::when(payload == DescriptorPayload::Buffer),
            &mut self.buffer_info,
            args,
        )?;
        serialise_gated(
            &mut ser,
            "pTexelBufferView",
            Gate::when(payload == DescriptorPayload::TexelBuffer),
            &mut self.texel_buffer_view,
            args,
        )?;

        serialise_next(&mut ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyDescriptorSet {
    pub src_set: vk::DescriptorSet,
    pub src_binding: u32,
    pub src_array_element: u32,
    pub dst_set: vk::DescriptorSet,
    pub dst_binding: u32,
    pub dst_array_element: u32,
    pub descriptor_count: u32,
    pub next: Next,
}

impl Serialise for CopyDescriptorSet {
    const TYPE_NAME: &'static str = "VkCopyDescriptorSet";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        let mut ser = ser.optional_resources();

        ser.serialise("srcSet", &mut self.src_set)?;
        ser.serialise("srcBinding", &mut self.src_binding)?;
        ser.serialise("srcArrayElement", &mut self.src_array_element)?;
        ser.serialise("dstSet", &mut self.dst_set)?;
        ser.serialise("dstBinding", &mut self.dst_binding)?;
        ser.serialise("dstArrayElement", &mut self.dst_array_element)?;
        ser.serialise("descriptorCount", &mut self.descriptor_count)?;
        serialise_next(&mut ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteDescriptorSetInlineUniformBlock {
    pub data: Vec<u8>,
    pub next: Next,
}

impl Serialise for WriteDescriptorSetInlineUniformBlock {
    const TYPE_NAME: &'static str = "VkWriteDescriptorSetInlineUniformBlock";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise_bytes("pData", &mut self.data)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}
