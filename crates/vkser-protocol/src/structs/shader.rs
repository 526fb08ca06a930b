use ash::vk;

use crate::error::SerialiseError;
use crate::flags::{serialise_flags, serialise_no_bits};
use crate::next_chain::{serialise_next, Extensible, Next};
use crate::serialiser::{Serialise, Serialiser};
use crate::validity::StructArgs;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderModuleCreateInfo {
    pub flags: vk::ShaderModuleCreateFlags,
    /// SPIR-V words.
    pub code: Vec<u32>,
    pub next: Next,
}

impl Serialise for ShaderModuleCreateInfo {
    const TYPE_NAME: &'static str = "VkShaderModuleCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_no_bits(ser, "flags", &mut self.flags)?;

        let mut bytes = bytemuck::cast_slice::<u32, u8>(&self.code).to_vec();
        ser.serialise_bytes("pCode", &mut bytes)?;
        if ser.is_reading() {
            if bytes.len() % 4 != 0 {
                return Err(SerialiseError::InvalidLength {
                    field: "pCode",
                    length: bytes.len() as u64,
                });
            }
            self.code = vec![0u32; bytes.len() / 4];
            bytemuck::cast_slice_mut::<u32, u8>(&mut self.code).copy_from_slice(&bytes);
        }

        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecializationMapEntry {
    pub constant_id: u32,
    pub offset: u32,
    pub size: usize,
}

impl Serialise for SpecializationMapEntry {
    const TYPE_NAME: &'static str = "VkSpecializationMapEntry";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("constantID", &mut self.constant_id)?;
        ser.serialise("offset", &mut self.offset)?;

        // Early streams wrote constantID twice, ahead of size. The copy stays
        // in the format and is never used.
        let mut legacy_constant_id = self.constant_id;
        ser.serialise("constantID", &mut legacy_constant_id)?.hidden();

        ser.serialise_host_size("size", &mut self.size)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecializationInfo {
    pub map_entries: Vec<SpecializationMapEntry>,
    pub data: Vec<u8>,
}

impl Serialise for SpecializationInfo {
    const TYPE_NAME: &'static str = "VkSpecializationInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise_array("pMapEntries", &mut self.map_entries, args)?;
        ser.serialise_bytes("pData", &mut self.data)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineShaderStageCreateInfo {
    pub flags: vk::PipelineShaderStageCreateFlags,
    pub stage: vk::ShaderStageFlags,
    pub module: vk::ShaderModule,
    pub name: String,
    pub specialization_info: Option<SpecializationInfo>,
    pub next: Next,
}

impl Default for PipelineShaderStageCreateInfo {
    fn default() -> Self {
        Self {
            flags: vk::PipelineShaderStageCreateFlags::empty(),
            stage: vk::ShaderStageFlags::empty(),
            module: vk::ShaderModule::null(),
            name: String::from("main"),
            specialization_info: None,
            next: Next::new(),
        }
    }
}

impl Serialise for PipelineShaderStageCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineShaderStageCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "flags", &mut self.flags)?;
        serialise_flags(ser, "stage", &mut self.stage)?;
        ser.serialise("module", &mut self.module)?;
        ser.serialise("pName", &mut self.name)?;
        ser.serialise_nullable("pSpecializationInfo", &mut self.specialization_info, args)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineCacheCreateInfo {
    pub flags: vk::PipelineCacheCreateFlags,
    /// The u64 length prefix stands in for `initialDataSize`.
    pub initial_data: Vec<u8>,
    pub next: Next,
}

impl Serialise for PipelineCacheCreateInfo {
    const TYPE_NAME: &'static str = "VkPipelineCacheCreateInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "flags", &mut self.flags)?;
        ser.serialise_bytes("pInitialData", &mut self.initial_data)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}
