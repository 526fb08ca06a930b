use ash::vk;

use crate::error::SerialiseError;
use crate::flags::serialise_flags;
use crate::next_chain::{serialise_next, Extensible, Next};
use crate::serialiser::{Serialise, Serialiser};
use crate::structs::plain::{ComponentMapping, Extent3D, ImageSubresourceRange};
use crate::validity::{serialise_gated, Gate, StructArgs};

/// Queue family indices are only meaningful for concurrent sharing. The
/// exclusive case still writes an empty array so the layout is the same.
fn serialise_queue_families(
    ser: &mut Serialiser<'_>,
    sharing_mode: vk::SharingMode,
    indices: &mut Vec<u32>,
) -> Result<(), SerialiseError> {
    let gate = Gate::when(sharing_mode == vk::SharingMode::CONCURRENT);
    serialise_gated(ser, "pQueueFamilyIndices", gate, indices, StructArgs::default())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferCreateInfo {
    pub flags: vk::BufferCreateFlags,
    pub size: u64,
    pub usage: vk::BufferUsageFlags,
    pub sharing_mode: vk::SharingMode,
    pub queue_family_indices: Vec<u32>,
    pub next: Next,
}

impl Serialise for BufferCreateInfo {
    const TYPE_NAME: &'static str = "VkBufferCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "flags", &mut self.flags)?;
        ser.serialise("size", &mut self.size)?;
        serialise_flags(ser, "usage", &mut self.usage)?;
        ser.serialise("sharingMode", &mut self.sharing_mode)?;
        serialise_queue_families(ser, self.sharing_mode, &mut self.queue_family_indices)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageCreateInfo {
    pub flags: vk::ImageCreateFlags,
    pub image_type: vk::ImageType,
    pub format: vk::Format,
    pub extent: Extent3D,
    pub mip_levels: u32,
    pub array_layers: u32,
    pub samples: vk::SampleCountFlags,
    pub tiling: vk::ImageTiling,
    pub usage: vk::ImageUsageFlags,
    pub sharing_mode: vk::SharingMode,
    pub queue_family_indices: Vec<u32>,
    pub initial_layout: vk::ImageLayout,
    pub next: Next,
}

impl Default for ImageCreateInfo {
    fn default() -> Self {
        Self {
            flags: vk::ImageCreateFlags::empty(),
            image_type: vk::ImageType::TYPE_2D,
            format: vk::Format::UNDEFINED,
            extent: Extent3D::default(),
            mip_levels: 1,
            array_layers: 1,
            samples: vk::SampleCountFlags::TYPE_1,
            tiling: vk::ImageTiling::OPTIMAL,
            usage: vk::ImageUsageFlags::empty(),
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            queue_family_indices: Vec::new(),
            initial_layout: vk::ImageLayout::UNDEFINED,
            next: Next::new(),
        }
    }
}

impl Serialise for ImageCreateInfo {
    const TYPE_NAME: &'static str = "VkImageCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "flags", &mut self.flags)?;
        ser.serialise("imageType", &mut self.image_type)?;
        ser.serialise("format", &mut self.format)?;
        ser.serialise("extent", &mut self.extent)?;
        ser.serialise("mipLevels", &mut self.mip_levels)?;
        ser.serialise("arrayLayers", &mut self.array_layers)?;
        serialise_flags(ser, "samples", &mut self.samples)?;
        ser.serialise("tiling", &mut self.tiling)?;
        serialise_flags(ser, "usage", &mut self.usage)?;
        ser.serialise("sharingMode", &mut self.sharing_mode)?;
        serialise_queue_families(ser, self.sharing_mode, &mut self.queue_family_indices)?;
        ser.serialise("initialLayout", &mut self.initial_layout)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageViewCreateInfo {
    pub flags: vk::ImageViewCreateFlags,
    pub image: vk::Image,
    pub view_type: vk::ImageViewType,
    pub format: vk::Format,
    pub components: ComponentMapping,
    pub subresource_range: ImageSubresourceRange,
    pub next: Next,
}

impl Serialise for ImageViewCreateInfo {
    const TYPE_NAME: &'static str = "VkImageViewCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "flags", &mut self.flags)?;
        ser.serialise("image", &mut self.image)?;
        ser.serialise("viewType", &mut self.view_type)?;
        ser.serialise("format", &mut self.format)?;
        ser.serialise("components", &mut self.components)?;
        ser.serialise("subresourceRange", &mut self.subresource_range)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageFormatListCreateInfo {
    pub view_formats: Vec<vk::Format>,
    pub next: Next,
}

impl Serialise for ImageFormatListCreateInfo {
    const TYPE_NAME: &'static str = "VkImageFormatListCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("pViewFormats", &mut self.view_formats)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryAllocateInfo {
    pub allocation_size: u64,
    pub memory_type_index: u32,
    pub next: Next,
}

impl Serialise for MemoryAllocateInfo {
    const TYPE_NAME: &'static str = "VkMemoryAllocateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("allocationSize", &mut self.allocation_size)?;
        ser.serialise("memoryTypeIndex", &mut self.memory_type_index)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDedicatedAllocateInfo {
    pub image: vk::Image,
    pub buffer: vk::Buffer,
    pub next: Next,
}

impl Serialise for MemoryDedicatedAllocateInfo {
    const TYPE_NAME: &'static str = "VkMemoryDedicatedAllocateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        // At most one of the two is set; the other is legitimately null.
        let mut ser = ser.optional_resources();

        ser.serialise("image", &mut self.image)?;
        ser.serialise("buffer", &mut self.buffer)?;
        serialise_next(&mut ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}
