use ash::vk::{self, Handle};

use crate::error::SerialiseError;
use crate::flags::{serialise_flags, serialise_no_bits};
use crate::next_chain::{serialise_next, Extensible, Next};
use crate::serialiser::{Serialise, Serialiser};
use crate::structs::plain::{
    PipelineColorBlendAttachmentState, Rect2D, StencilOpState, VertexInputAttributeDescription,
    VertexInputBindingDescription, Viewport,
};
use crate::structs::shader::PipelineShaderStageCreateInfo;
use crate::validity::{serialise_gated, Gate, NextChainFlags, StructArgs};
use crate::version::{VERSION_BASE_PIPELINE, VERSION_SAMPLE_MASK};

/// Base pipeline fields, absent before [`VERSION_BASE_PIPELINE`].
fn serialise_base_pipeline(
    ser: &mut Serialiser<'_>,
    handle: &mut vk::Pipeline,
    index: &mut i32,
) -> Result<(), SerialiseError> {
    if ser.version_at_least(VERSION_BASE_PIPELINE) {
        ser.serialise("basePipelineHandle", handle)?;
        ser.serialise("basePipelineIndex", index)?;
    } else if ser.is_reading() {
        *handle = vk::Pipeline::null();
        *index = -1;
    }
    Ok(())
}

// ── Fixed-function state ──

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineVertexInputStateCreateInfo {
    pub flags: vk::PipelineVertexInputStateCreateFlags,
    pub vertex_binding_descriptions: Vec<VertexInputBindingDescription>,
    pub vertex_attribute_descriptions: Vec<VertexInputAttributeDescription>,
    pub next: Next,
}

impl Serialise for PipelineVertexInputStateCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineVertexInputStateCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_no_bits(ser, "flags", &mut self.flags)?;
        ser.serialise_array("pVertexBindingDescriptions", &mut self.vertex_binding_descriptions, args)?;
        ser.serialise_array("pVertexAttributeDescriptions", &mut self.vertex_attribute_descriptions, args)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineInputAssemblyStateCreateInfo {
    pub flags: vk::PipelineInputAssemblyStateCreateFlags,
    pub topology: vk::PrimitiveTopology,
    pub primitive_restart_enable: bool,
    pub next: Next,
}

impl Serialise for PipelineInputAssemblyStateCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineInputAssemblyStateCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_no_bits(ser, "flags", &mut self.flags)?;
        ser.serialise("topology", &mut self.topology)?;
        ser.serialise("primitiveRestartEnable", &mut self.primitive_restart_enable)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineTessellationStateCreateInfo {
    pub flags: vk::PipelineTessellationStateCreateFlags,
    pub patch_control_points: u32,
    pub next: Next,
}

impl Serialise for PipelineTessellationStateCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineTessellationStateCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_no_bits(ser, "flags", &mut self.flags)?;
        ser.serialise("patchControlPoints", &mut self.patch_control_points)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

/// The counts are kept separately because with dynamic viewports or
/// scissors the arrays are empty while the counts are not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineViewportStateCreateInfo {
    pub flags: vk::PipelineViewportStateCreateFlags,
    pub viewport_count: u32,
    pub viewports: Vec<Viewport>,
    pub scissor_count: u32,
    pub scissors: Vec<Rect2D>,
    pub next: Next,
}

impl Serialise for PipelineViewportStateCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineViewportStateCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_no_bits(ser, "flags", &mut self.flags)?;
        ser.serialise("viewportCount", &mut self.viewport_count)?;
        ser.serialise_array("pViewports", &mut self.viewports, args)?;
        ser.serialise("scissorCount", &mut self.scissor_count)?;
        ser.serialise_array("pScissors", &mut self.scissors, args)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRasterizationStateCreateInfo {
    pub flags: vk::PipelineRasterizationStateCreateFlags,
    pub depth_clamp_enable: bool,
    pub rasterizer_discard_enable: bool,
    pub polygon_mode: vk::PolygonMode,
    pub cull_mode: vk::CullModeFlags,
    pub front_face: vk::FrontFace,
    pub depth_bias_enable: bool,
    pub depth_bias_constant_factor: f32,
    pub depth_bias_clamp: f32,
    pub depth_bias_slope_factor: f32,
    pub line_width: f32,
    pub next: Next,
}

impl Default for PipelineRasterizationStateCreateInfo {
    fn default() -> Self {
        Self {
            flags: vk::PipelineRasterizationStateCreateFlags::empty(),
            depth_clamp_enable: false,
            rasterizer_discard_enable: false,
            polygon_mode: vk::PolygonMode::FILL,
            cull_mode: vk::CullModeFlags::NONE,
            front_face: vk::FrontFace::COUNTER_CLOCKWISE,
            depth_bias_enable: false,
            depth_bias_constant_factor: 0.0,
            depth_bias_clamp: 0.0,
            depth_bias_slope_factor: 0.0,
            line_width: 1.0,
            next: Next::new(),
        }
    }
}

impl Serialise for PipelineRasterizationStateCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineRasterizationStateCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_no_bits(ser, "flags", &mut self.flags)?;
        ser.serialise("depthClampEnable", &mut self.depth_clamp_enable)?;
        ser.serialise("rasterizerDiscardEnable", &mut self.rasterizer_discard_enable)?;
        ser.serialise("polygonMode", &mut self.polygon_mode)?;
        serialise_flags(ser, "cullMode", &mut self.cull_mode)?;
        ser.serialise("frontFace", &mut self.front_face)?;
        ser.serialise("depthBiasEnable", &mut self.depth_bias_enable)?;
        ser.serialise("depthBiasConstantFactor", &mut self.depth_bias_constant_factor)?;
        ser.serialise("depthBiasClamp", &mut self.depth_bias_clamp)?;
        ser.serialise("depthBiasSlopeFactor", &mut self.depth_bias_slope_factor)?;
        ser.serialise("lineWidth", &mut self.line_width)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineMultisampleStateCreateInfo {
    pub flags: vk::PipelineMultisampleStateCreateFlags,
    pub rasterization_samples: vk::SampleCountFlags,
    pub sample_shading_enable: bool,
    pub min_sample_shading: f32,
    /// One word per 32 samples. Streams older than [`VERSION_SAMPLE_MASK`]
    /// read back as `None`.
    pub sample_mask: Option<Vec<u32>>,
    pub alpha_to_coverage_enable: bool,
    pub alpha_to_one_enable: bool,
    pub next: Next,
}

impl Default for PipelineMultisampleStateCreateInfo {
    fn default() -> Self {
        Self {
            flags: vk::PipelineMultisampleStateCreateFlags::empty(),
            rasterization_samples: vk::SampleCountFlags::TYPE_1,
            sample_shading_enable: false,
            min_sample_shading: 0.0,
            sample_mask: None,
            alpha_to_coverage_enable: false,
            alpha_to_one_enable: false,
            next: Next::new(),
        }
    }
}

impl Serialise for PipelineMultisampleStateCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineMultisampleStateCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_no_bits(ser, "flags", &mut self.flags)?;
        serialise_flags(ser, "rasterizationSamples", &mut self.rasterization_samples)?;
        ser.serialise("sampleShadingEnable", &mut self.sample_shading_enable)?;
        ser.serialise("minSampleShading", &mut self.min_sample_shading)?;
        if ser.version_at_least(VERSION_SAMPLE_MASK) {
            ser.serialise_nullable("pSampleMask", &mut self.sample_mask, args)?;
        } else if ser.is_reading() {
            self.sample_mask = None;
        }
        ser.serialise("alphaToCoverageEnable", &mut self.alpha_to_coverage_enable)?;
        ser.serialise("alphaToOneEnable", &mut self.alpha_to_one_enable)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineDepthStencilStateCreateInfo {
    pub flags: vk::PipelineDepthStencilStateCreateFlags,
    pub depth_test_enable: bool,
    pub depth_write_enable: bool,
    pub depth_compare_op: vk::CompareOp,
    pub depth_bounds_test_enable: bool,
    pub stencil_test_enable: bool,
    pub front: StencilOpState,
    pub back: StencilOpState,
    pub min_depth_bounds: f32,
    pub max_depth_bounds: f32,
    pub next: Next,
}

impl Serialise for PipelineDepthStencilStateCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineDepthStencilStateCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "flags", &mut self.flags)?;
        ser.serialise("depthTestEnable", &mut self.depth_test_enable)?;
        ser.serialise("depthWriteEnable", &mut self.depth_write_enable)?;
        ser.serialise("depthCompareOp", &mut self.depth_compare_op)?;
        ser.serialise("depthBoundsTestEnable", &mut self.depth_bounds_test_enable)?;
        ser.serialise("stencilTestEnable", &mut self.stencil_test_enable)?;
        ser.serialise("front", &mut self.front)?;
        ser.serialise("back", &mut self.back)?;
        ser.serialise("minDepthBounds", &mut self.min_depth_bounds)?;
        ser.serialise("maxDepthBounds", &mut self.max_depth_bounds)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineColorBlendStateCreateInfo {
    pub flags: vk::PipelineColorBlendStateCreateFlags,
    pub logic_op_enable: bool,
    pub logic_op: vk::LogicOp,
    pub attachments: Vec<PipelineColorBlendAttachmentState>,
    pub blend_constants: [f32; 4],
    pub next: Next,
}

impl Serialise for PipelineColorBlendStateCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineColorBlendStateCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "flags", &mut self.flags)?;
        ser.serialise("logicOpEnable", &mut self.logic_op_enable)?;
        ser.serialise("logicOp", &mut self.logic_op)?;
        ser.serialise_array("pAttachments", &mut self.attachments, args)?;
        ser.serialise("blendConstants", &mut self.blend_constants)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineDynamicStateCreateInfo {
    pub flags: vk::PipelineDynamicStateCreateFlags,
    pub dynamic_states: Vec<vk::DynamicState>,
    pub next: Next,
}

impl Serialise for PipelineDynamicStateCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineDynamicStateCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_no_bits(ser, "flags", &mut self.flags)?;
        ser.serialise_array("pDynamicStates", &mut self.dynamic_states, args)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

// ── Dynamic rendering and libraries ──

/// Attachment formats are ignored when the pipeline also names a render
/// pass or is a library without the fragment output interface; they are
/// then written empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineRenderingCreateInfo {
    pub view_mask: u32,
    pub color_attachment_formats: Vec<vk::Format>,
    pub depth_attachment_format: vk::Format,
    pub stencil_attachment_format: vk::Format,
    pub next: Next,
}

impl Serialise for PipelineRenderingCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineRenderingCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        let formats = Gate::when(!args.chain.contains(NextChainFlags::DYNAMIC_RENDERING_FORMATS_IGNORED));

        ser.serialise("viewMask", &mut self.view_mask)?;
        serialise_gated(ser, "pColorAttachmentFormats", formats, &mut self.color_attachment_formats, args)?;
        serialise_gated(ser, "depthAttachmentFormat", formats, &mut self.depth_attachment_format, args)?;
        serialise_gated(ser, "stencilAttachmentFormat", formats, &mut self.stencil_attachment_format, args)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphicsPipelineLibraryCreateInfoExt {
    pub flags: vk::GraphicsPipelineLibraryFlagsEXT,
    pub next: Next,
}

impl Serialise for GraphicsPipelineLibraryCreateInfoExt {
    const TYPE_NAME: &'static str = "VkGraphicsPipelineLibraryCreateInfoEXT";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "flags", &mut self.flags)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

// ── Pipelines ──

#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsPipelineCreateInfo {
    pub flags: vk::PipelineCreateFlags,
    pub stages: Vec<PipelineShaderStageCreateInfo>,
    pub vertex_input_state: Option<Box<PipelineVertexInputStateCreateInfo>>,
    pub input_assembly_state: Option<Box<PipelineInputAssemblyStateCreateInfo>>,
    pub tessellation_state: Option<Box<PipelineTessellationStateCreateInfo>>,
    pub viewport_state: Option<Box<PipelineViewportStateCreateInfo>>,
    pub rasterization_state: Option<Box<PipelineRasterizationStateCreateInfo>>,
    pub multisample_state: Option<Box<PipelineMultisampleStateCreateInfo>>,
    pub depth_stencil_state: Option<Box<PipelineDepthStencilStateCreateInfo>>,
    pub color_blend_state: Option<Box<PipelineColorBlendStateCreateInfo>>,
    pub dynamic_state: Option<Box<PipelineDynamicStateCreateInfo>>,
    pub layout: vk::PipelineLayout,
    pub render_pass: vk::RenderPass,
    pub subpass: u32,
    pub base_pipeline_handle: vk::Pipeline,
    pub base_pipeline_index: i32,
    pub next: Next,
}

impl Default for GraphicsPipelineCreateInfo {
    fn default() -> Self {
        Self {
            flags: vk::PipelineCreateFlags::empty(),
            stages: Vec::new(),
            vertex_input_state: None,
            input_assembly_state: None,
            tessellation_state: None,
            viewport_state: None,
            rasterization_state: None,
            multisample_state: None,
            depth_stencil_state: None,
            color_blend_state: None,
            dynamic_state: None,
            layout: vk::PipelineLayout::null(),
            render_pass: vk::RenderPass::null(),
            subpass: 0,
            base_pipeline_handle: vk::Pipeline::null(),
            base_pipeline_index: -1,
            next: Next::new(),
        }
    }
}

impl GraphicsPipelineCreateInfo {
    /// Look ahead over the live chain for facts that nodes earlier in the
    /// chain depend on.
    pub fn next_chain_flags(&self) -> NextChainFlags {
        let mut flags = NextChainFlags::empty();

        let library_without_output = self
            .next
            .find::<GraphicsPipelineLibraryCreateInfoExt>()
            .is_some_and(|lib| {
                !lib.flags
                    .contains(vk::GraphicsPipelineLibraryFlagsEXT::FRAGMENT_OUTPUT_INTERFACE)
            });
        if !self.render_pass.is_null() || library_without_output {
            flags |= NextChainFlags::DYNAMIC_RENDERING_FORMATS_IGNORED;
        }

        flags
    }
}

impl Serialise for GraphicsPipelineCreateInfo {
    const TYPE_NAME: &'static str = "VkGraphicsPipelineCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "flags", &mut self.flags)?;
        ser.serialise_array("pStages", &mut self.stages, args)?;
        ser.serialise_nullable("pVertexInputState", &mut self.vertex_input_state, args)?;
        ser.serialise_nullable("pInputAssemblyState", &mut self.input_assembly_state, args)?;
        ser.serialise_nullable("pTessellationState", &mut self.tessellation_state, args)?;
        ser.serialise_nullable("pViewportState", &mut self.viewport_state, args)?;
        ser.serialise_nullable("pRasterizationState", &mut self.rasterization_state, args)?;
        ser.serialise_nullable("pMultisampleState", &mut self.multisample_state, args)?;
        ser.serialise_nullable("pDepthStencilState", &mut self.depth_stencil_state, args)?;
        ser.serialise_nullable("pColorBlendState", &mut self.color_blend_state, args)?;
        ser.serialise_nullable("pDynamicState", &mut self.dynamic_state, args)?;
        ser.serialise("layout", &mut self.layout)?;
        ser.serialise("renderPass", &mut self.render_pass)?;
        ser.serialise("subpass", &mut self.subpass)?;
        serialise_base_pipeline(ser, &mut self.base_pipeline_handle, &mut self.base_pipeline_index)?;

        // Readers cannot see later chain nodes yet, so the flags are
        // computed from the live chain and stored ahead of it.
        let mut chain_flags = if ser.is_reading() {
            NextChainFlags::empty()
        } else {
            self.next_chain_flags()
        };
        ser.serialise("nextChainFlags", &mut chain_flags)?.hidden();

        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args.with_chain(chain_flags))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputePipelineCreateInfo {
    pub flags: vk::PipelineCreateFlags,
    pub stage: PipelineShaderStageCreateInfo,
    pub layout: vk::PipelineLayout,
    pub base_pipeline_handle: vk::Pipeline,
    pub base_pipeline_index: i32,
    pub next: Next,
}

impl Default for ComputePipelineCreateInfo {
    fn default() -> Self {
        Self {
            flags: vk::PipelineCreateFlags::empty(),
            stage: PipelineShaderStageCreateInfo::default(),
            layout: vk::PipelineLayout::null(),
            base_pipeline_handle: vk::Pipeline::null(),
            base_pipeline_index: -1,
            next: Next::new(),
        }
    }
}

impl Serialise for ComputePipelineCreateInfo {
    const TYPE_NAME: &'static str = "VkComputePipelineCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "flags", &mut self.flags)?;
        ser.serialise_with("stage", &mut self.stage, args)?;
        ser.serialise("layout", &mut self.layout)?;
        serialise_base_pipeline(ser, &mut self.base_pipeline_handle, &mut self.base_pipeline_index)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}
