use crate::error::SerialiseError;
use crate::serialiser::{Serialise, Serialiser};
use crate::structured::StructuredData;

bitflags::bitflags! {
    /// Which members of a shared sub-struct the parent considers meaningful.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Validity: u8 {
        const SAMPLER      = 0b0000_0001;
        const IMAGE_VIEW   = 0b0000_0010;
        const IMAGE_LAYOUT = 0b0000_0100;
    }
}

bitflags::bitflags! {
    /// Facts about a whole next chain, computed before it is walked and
    /// stored ahead of it so readers see them before the nodes they affect.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NextChainFlags: u32 {
        /// The pipeline takes its attachment formats from a render pass, or
        /// is a library without the fragment output interface, so any
        /// `VkPipelineRenderingCreateInfo` formats are ignored.
        const DYNAMIC_RENDERING_FORMATS_IGNORED = 0b0000_0001;
    }
}

impl Serialise for NextChainFlags {
    const TYPE_NAME: &'static str = "NextChainFlags";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        let raw = u32::from_le_bytes(ser.scalar(self.bits().to_le_bytes())?);
        *self = NextChainFlags::from_bits_truncate(raw);
        let value = *self;
        ser.record(|| StructuredData::Bitmask {
            value: u64::from(value.bits()),
            flags: "NextChainFlags",
            bits: format!("{value:?}"),
        });
        Ok(())
    }
}

/// Context passed explicitly from a parent serialiser to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructArgs {
    pub validity: Validity,
    pub chain: NextChainFlags,
}

impl Default for StructArgs {
    fn default() -> Self {
        Self {
            validity: Validity::all(),
            chain: NextChainFlags::empty(),
        }
    }
}

impl StructArgs {
    pub fn with_validity(self, validity: Validity) -> Self {
        Self { validity, ..self }
    }

    pub fn with_chain(self, chain: NextChainFlags) -> Self {
        Self { chain, ..self }
    }

    /// Arguments for the nodes of a next chain: chain flags carry through,
    /// sibling validity does not.
    pub fn for_chain(self) -> Self {
        Self {
            validity: Validity::all(),
            chain: self.chain,
        }
    }
}

/// Whether a field group is meaningful for this call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Active,
    /// Serialise a default of the same shape, and discard it on read.
    Placeholder,
}

impl Gate {
    pub fn when(active: bool) -> Self {
        if active {
            Gate::Active
        } else {
            Gate::Placeholder
        }
    }
}

/// Serialise `value` if the gate is active, otherwise a default value under
/// the same name. Both branches produce the same entry kind, so a reader
/// that derives the gate from already-read data stays in step.
pub fn serialise_gated<T: Serialise>(
    ser: &mut Serialiser<'_>,
    name: &'static str,
    gate: Gate,
    value: &mut T,
    args: StructArgs,
) -> Result<(), SerialiseError> {
    match gate {
        Gate::Active => {
            ser.serialise_with(name, value, args)?;
        }
        Gate::Placeholder => {
            let mut placeholder = T::default();
            ser.serialise_with(name, &mut placeholder, args)?;
            if ser.is_reading() {
                *value = T::default();
            }
        }
    }
    Ok(())
}
