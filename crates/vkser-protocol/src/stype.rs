use std::fmt;

use ash::vk;

macro_rules! structure_types {
    ($($variant:ident = $vk:ident => $name:literal,)*) => {
        /// Every structure type the stream format knows about.
        ///
        /// Knowing a type is separate from being able to serialise it: the
        /// handler table in `next_chain` decides which are supported.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum StructureType {
            $($variant,)*
        }

        impl StructureType {
            pub const ALL: &'static [StructureType] = &[$(StructureType::$variant,)*];

            pub fn to_vk(self) -> vk::StructureType {
                match self {
                    $(StructureType::$variant => vk::StructureType::$vk,)*
                }
            }

            /// Vulkan name of the struct, e.g. `VkMemoryBarrier`.
            pub fn name(self) -> &'static str {
                match self {
                    $(StructureType::$variant => $name,)*
                }
            }
        }

        impl TryFrom<vk::StructureType> for StructureType {
            type Error = vk::StructureType;

            fn try_from(raw: vk::StructureType) -> Result<Self, Self::Error> {
                match raw {
                    $(vk::StructureType::$vk => Ok(StructureType::$variant),)*
                    other => Err(other),
                }
            }
        }
    };
}

structure_types! {
    // Barriers
    MemoryBarrier = MEMORY_BARRIER => "VkMemoryBarrier",
    BufferMemoryBarrier = BUFFER_MEMORY_BARRIER => "VkBufferMemoryBarrier",
    ImageMemoryBarrier = IMAGE_MEMORY_BARRIER => "VkImageMemoryBarrier",

    // Resource creation
    BufferCreateInfo = BUFFER_CREATE_INFO => "VkBufferCreateInfo",
    ImageCreateInfo = IMAGE_CREATE_INFO => "VkImageCreateInfo",
    ImageViewCreateInfo = IMAGE_VIEW_CREATE_INFO => "VkImageViewCreateInfo",
    ImageFormatListCreateInfo = IMAGE_FORMAT_LIST_CREATE_INFO => "VkImageFormatListCreateInfo",
    MemoryAllocateInfo = MEMORY_ALLOCATE_INFO => "VkMemoryAllocateInfo",
    MemoryDedicatedAllocateInfo = MEMORY_DEDICATED_ALLOCATE_INFO => "VkMemoryDedicatedAllocateInfo",
    ShaderModuleCreateInfo = SHADER_MODULE_CREATE_INFO => "VkShaderModuleCreateInfo",
    PipelineCacheCreateInfo = PIPELINE_CACHE_CREATE_INFO => "VkPipelineCacheCreateInfo",

    // Descriptors
    WriteDescriptorSet = WRITE_DESCRIPTOR_SET => "VkWriteDescriptorSet",
    CopyDescriptorSet = COPY_DESCRIPTOR_SET => "VkCopyDescriptorSet",
    WriteDescriptorSetInlineUniformBlock = WRITE_DESCRIPTOR_SET_INLINE_UNIFORM_BLOCK
        => "VkWriteDescriptorSetInlineUniformBlock",

    // Pipelines
    GraphicsPipelineCreateInfo = GRAPHICS_PIPELINE_CREATE_INFO => "VkGraphicsPipelineCreateInfo",
    ComputePipelineCreateInfo = COMPUTE_PIPELINE_CREATE_INFO => "VkComputePipelineCreateInfo",
    PipelineShaderStageCreateInfo = PIPELINE_SHADER_STAGE_CREATE_INFO => "VkPipelineShaderStageCreateInfo",
    PipelineVertexInputStateCreateInfo = PIPELINE_VERTEX_INPUT_STATE_CREATE_INFO
        => "VkPipelineVertexInputStateCreateInfo",
    PipelineInputAssemblyStateCreateInfo = PIPELINE_INPUT_ASSEMBLY_STATE_CREATE_INFO
        => "VkPipelineInputAssemblyStateCreateInfo",
    PipelineTessellationStateCreateInfo = PIPELINE_TESSELLATION_STATE_CREATE_INFO
        => "VkPipelineTessellationStateCreateInfo",
    PipelineViewportStateCreateInfo = PIPELINE_VIEWPORT_STATE_CREATE_INFO
        => "VkPipelineViewportStateCreateInfo",
    PipelineRasterizationStateCreateInfo = PIPELINE_RASTERIZATION_STATE_CREATE_INFO
        => "VkPipelineRasterizationStateCreateInfo",
    PipelineMultisampleStateCreateInfo = PIPELINE_MULTISAMPLE_STATE_CREATE_INFO
        => "VkPipelineMultisampleStateCreateInfo",
    PipelineDepthStencilStateCreateInfo = PIPELINE_DEPTH_STENCIL_STATE_CREATE_INFO
        => "VkPipelineDepthStencilStateCreateInfo",
    PipelineColorBlendStateCreateInfo = PIPELINE_COLOR_BLEND_STATE_CREATE_INFO
        => "VkPipelineColorBlendStateCreateInfo",
    PipelineDynamicStateCreateInfo = PIPELINE_DYNAMIC_STATE_CREATE_INFO
        => "VkPipelineDynamicStateCreateInfo",
    PipelineRenderingCreateInfo = PIPELINE_RENDERING_CREATE_INFO => "VkPipelineRenderingCreateInfo",
    GraphicsPipelineLibraryCreateInfoExt = GRAPHICS_PIPELINE_LIBRARY_CREATE_INFO_EXT
        => "VkGraphicsPipelineLibraryCreateInfoEXT",

    // Submission
    SubmitInfo = SUBMIT_INFO => "VkSubmitInfo",
    TimelineSemaphoreSubmitInfo = TIMELINE_SEMAPHORE_SUBMIT_INFO => "VkTimelineSemaphoreSubmitInfo",

    // External memory
    ExportMemoryAllocateInfo = EXPORT_MEMORY_ALLOCATE_INFO => "VkExportMemoryAllocateInfo",
    ExternalMemoryBufferCreateInfo = EXTERNAL_MEMORY_BUFFER_CREATE_INFO => "VkExternalMemoryBufferCreateInfo",
    ExternalMemoryImageCreateInfo = EXTERNAL_MEMORY_IMAGE_CREATE_INFO => "VkExternalMemoryImageCreateInfo",
    ImportMemoryFdInfoKhr = IMPORT_MEMORY_FD_INFO_KHR => "VkImportMemoryFdInfoKHR",
    ImportMemoryWin32HandleInfoKhr = IMPORT_MEMORY_WIN32_HANDLE_INFO_KHR => "VkImportMemoryWin32HandleInfoKHR",
    ExportMemoryWin32HandleInfoKhr = EXPORT_MEMORY_WIN32_HANDLE_INFO_KHR => "VkExportMemoryWin32HandleInfoKHR",
    SwapchainCounterCreateInfoExt = SWAPCHAIN_COUNTER_CREATE_INFO_EXT => "VkSwapchainCounterCreateInfoEXT",
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
