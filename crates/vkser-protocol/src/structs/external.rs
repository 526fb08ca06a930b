//! Win32 external memory structs.
//!
//! `HANDLE` values are recorded as raw u64s. They are meaningless outside
//! the capturing process; replay re-imports memory by `name` where set.

use ash::vk;

use crate::error::SerialiseError;
use crate::flags::serialise_flags;
use crate::next_chain::{serialise_next, Extensible, Next};
use crate::serialiser::{Serialise, Serialiser};
use crate::validity::StructArgs;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportMemoryWin32HandleInfoKhr {
    pub handle_type: vk::ExternalMemoryHandleTypeFlags,
    pub handle: u64,
    pub name: String,
    pub next: Next,
}

impl Serialise for ImportMemoryWin32HandleInfoKhr {
    const TYPE_NAME: &'static str = "VkImportMemoryWin32HandleInfoKHR";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        serialise_flags(ser, "handleType", &mut self.handle_type)?;
        ser.serialise("handle", &mut self.handle)?.typed_as("HANDLE");
        ser.serialise("name", &mut self.name)?.typed_as("LPCWSTR");
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}

/// Security attributes are not recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportMemoryWin32HandleInfoKhr {
    pub dw_access: u32,
    pub name: String,
    pub next: Next,
}

impl Serialise for ExportMemoryWin32HandleInfoKhr {
    const TYPE_NAME: &'static str = "VkExportMemoryWin32HandleInfoKHR";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        ser.serialise("dwAccess", &mut self.dw_access)?.typed_as("DWORD");
        ser.serialise("name", &mut self.name)?.typed_as("LPCWSTR");
        serialise_next(ser, Self::STRUCTURE_TYPE, &mut self.next, args)
    }
}
