use ash::vk;

use crate::error::SerialiseError;
use crate::flags::serialise_flags;
use crate::next_chain::{serialise_next, Extensible, Next};
use crate::serialiser::{Serialise, Serialiser};
use crate::structs::plain::ImageSubresourceRange;
use crate::validity::StructArgs;

/// Queue family indices travel signed so `VK_QUEUE_FAMILY_IGNORED` shows as -1.
pub(crate) fn serialise_queue_family(
    ser: &mut Serialiser<'_>,
    name: &'static str,
    index: &mut u32,
) -> Result<(), SerialiseError> {
    let mut signed = *index as i32;
    ser.serialise(name, &mut signed)?;
    *index = signed as u32;
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryBarrier {
    pub src_access_mask: vk::AccessFlags,
    pub dst_access_mask: vk::AccessFlags,
    pub next: Next,
}

impl Serialise for MemoryBarrier {
    const TYPE_NAME: &'static str = "VkMemoryBarrier";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "srcAccessMask", &mut self.src_access_mask)?;
        serialise_flags(ser, "dstAccessMask", &mut self.dst_access_mask)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferMemoryBarrier {
    pub src_access_mask: vk::AccessFlags,
    pub dst_access_mask: vk::AccessFlags,
    pub src_queue_family_index: u32,
    pub dst_queue_family_index: u32,
    pub buffer: vk::Buffer,
    pub offset: u64,
    pub size: u64,
    pub next: Next,
}

impl Default for BufferMemoryBarrier {
    fn default() -> Self {
        Self {
            src_access_mask: vk::AccessFlags::empty(),
            dst_access_mask: vk::AccessFlags::empty(),
            src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            buffer: vk::Buffer::null(),
            offset: 0,
            size: vk::WHOLE_SIZE,
            next: Next::new(),
        }
    }
}

impl Serialise for BufferMemoryBarrier {
    const TYPE_NAME: &'static str = "VkBufferMemoryBarrier";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        // Barriers may name resources the capture pruned as unused.
        let mut ser = ser.optional_resources();

        serialise_flags(&mut ser, "srcAccessMask", &mut self.src_access_mask)?;
        serialise_flags(&mut ser, "dstAccessMask", &mut self.dst_access_mask)?;
        serialise_queue_family(&mut ser, "srcQueueFamilyIndex", &mut self.src_queue_family_index)?;
        serialise_queue_family(&mut ser, "dstQueueFamilyIndex", &mut self.dst_queue_family_index)?;
        ser.serialise("buffer", &mut self.buffer)?;
        ser.serialise("offset", &mut self.offset)?;
        ser.serialise("size", &mut self.size)?;
        serialise_next(&mut ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageMemoryBarrier {
    pub src_access_mask: vk::AccessFlags,
    pub dst_access_mask: vk::AccessFlags,
    pub old_layout: vk::ImageLayout,
    pub new_layout: vk::ImageLayout,
    pub src_queue_family_index: u32,
    pub dst_queue_family_index: u32,
    pub image: vk::Image,
    pub subresource_range: ImageSubresourceRange,
    pub next: Next,
}

impl Default for ImageMemoryBarrier {
    fn default() -> Self {
        Self {
            src_access_mask: vk::AccessFlags::empty(),
            dst_access_mask: vk::AccessFlags::empty(),
            old_layout: vk::ImageLayout::UNDEFINED,
            new_layout: vk::ImageLayout::UNDEFINED,
            src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
            image: vk::Image::null(),
            subresource_range: ImageSubresourceRange::default(),
            next: Next::new(),
        }
    }
}

impl Serialise for ImageMemoryBarrier {
    const TYPE_NAME: &'static str = "VkImageMemoryBarrier";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        let mut ser = ser.optional_resources();

        serialise_flags(&mut ser, "srcAccessMask", &mut self.src_access_mask)?;
        serialise_flags(&mut ser, "dstAccessMask", &mut self.dst_access_mask)?;
        ser.serialise("oldLayout", &mut self.old_layout)?;
        ser.serialise("newLayout", &mut self.new_layout)?;
        serialise_queue_family(&mut ser, "srcQueueFamilyIndex", &mut self.src_queue_family_index)?;
        serialise_queue_family(&mut ser, "dstQueueFamilyIndex", &mut self.dst_queue_family_index)?;
        ser.serialise("image", &mut self.image)?;
        ser.serialise("subresourceRange", &mut self.subresource_range)?;
        serialise_next(&mut ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}
