use ash::vk;

use crate::error::SerialiseError;
use crate::flags::serialise_flags_array;
use crate::next_chain::{serialise_next, Extensible, Next};
use crate::serialiser::{Serialise, Serialiser};
use crate::validity::StructArgs;

/// `pWaitDstStageMask` has one entry per wait semaphore.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitInfo {
    pub wait_semaphores: Vec<vk::Semaphore>,
    pub wait_dst_stage_mask: Vec<vk::PipelineStageFlags>,
    pub command_buffers: Vec<vk::CommandBuffer>,
    pub signal_semaphores: Vec<vk::Semaphore>,
    pub next: Next,
}

impl Serialise for SubmitInfo {
    const TYPE_NAME: &'static str = "VkSubmitInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise_array("pWaitSemaphores", &mut self.wait_semaphores, args)?;
        serialise_flags_array(ser, "pWaitDstStageMask", &mut self.wait_dst_stage_mask)?;
        ser.serialise_array("pCommandBuffers", &mut self.command_buffers, args)?;
        ser.serialise_array("pSignalSemaphores", &mut self.signal_semaphores, args)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

/// Values for timeline semaphores; binary semaphores take a placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineSemaphoreSubmitInfo {
    pub wait_semaphore_values: Vec<u64>,
    pub signal_semaphore_values: Vec<u64>,
    pub next: Next,
}

impl Serialise for TimelineSemaphoreSubmitInfo {
    const TYPE_NAME: &'static str = "VkTimelineSemaphoreSubmitInfo";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise_array("pWaitSemaphoreValues", &mut self.wait_semaphore_values, args)?;
        ser.serialise_array("pSignalSemaphoreValues", &mut self.signal_semaphore_values, args)?;
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}
