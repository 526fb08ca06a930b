use std::borrow::Cow;

use crate::error::SerialiseError;
use crate::serialiser::{Serialise, Serialiser};
use crate::validity::StructArgs;

/// Display type for flags types that define no bits yet.
pub const NO_BITS_TYPE: &str = "VkFlagWithNoBits";

/// A flags type with a matching `FlagBits` enum.
pub trait FlagBits: Serialise + Copy {}

/// A reserved flags type with no bits defined. When bits are added the type
/// moves to [`FlagBits`], and every [`serialise_no_bits`] call site using it
/// stops compiling.
pub trait NoBits: Serialise + Copy {}

/// Flags types whose bits enum does not follow the mechanical rule.
const BITS_NAME_EXCEPTIONS: &[(&str, &str)] = &[
    ("VkAccessFlags2", "VkAccessFlagBits2"),
    ("VkPipelineStageFlags2", "VkPipelineStageFlagBits2"),
    ("VkFormatFeatureFlags2", "VkFormatFeatureFlagBits2"),
    ("VkPipelineCreateFlags2KHR", "VkPipelineCreateFlagBits2KHR"),
    ("VkBufferUsageFlags2KHR", "VkBufferUsageFlagBits2KHR"),
    ("VkMemoryDecompressionMethodFlagsNV", "VkMemoryDecompressionMethodFlagBitsNV"),
];

/// Name of the bits enum for a flags type: `VkFooFlags` becomes
/// `VkFooFlagBits` and `VkFooFlagsEXT` becomes `VkFooFlagBitsEXT`.
/// Names that are not flags types are returned unchanged.
pub fn bits_type_name(flags: &'static str) -> Cow<'static, str> {
    if let Some((_, bits)) = BITS_NAME_EXCEPTIONS.iter().find(|(name, _)| *name == flags) {
        return Cow::Borrowed(*bits);
    }

    match flags.rfind("Flags") {
        Some(pos) => {
            let suffix = &flags[pos + "Flags".len()..];
            if suffix.chars().all(|c| c.is_ascii_uppercase()) {
                Cow::Owned(format!("{}FlagBits{}", &flags[..pos], suffix))
            } else {
                Cow::Borrowed(flags)
            }
        }
        None => Cow::Borrowed(flags),
    }
}

/// Serialise a flags field, displayed under its bits enum.
pub fn serialise_flags<F: FlagBits>(
    ser: &mut Serialiser<'_>,
    name: &'static str,
    flags: &mut F,
) -> Result<(), SerialiseError> {
    ser.serialise_with(name, flags, StructArgs::default())?
        .typed_as(bits_type_name(F::TYPE_NAME));
    Ok(())
}

/// Serialise an array of flags, each element displayed under the bits enum.
pub fn serialise_flags_array<F: FlagBits>(
    ser: &mut Serialiser<'_>,
    name: &'static str,
    flags: &mut Vec<F>,
) -> Result<(), SerialiseError> {
    ser.serialise_array(name, flags, StructArgs::default())?
        .typed_as(bits_type_name(F::TYPE_NAME));
    Ok(())
}

/// Serialise a reserved flags field.
pub fn serialise_no_bits<F: NoBits>(
    ser: &mut Serialiser<'_>,
    name: &'static str,
    flags: &mut F,
) -> Result<(), SerialiseError> {
    ser.serialise_with(name, flags, StructArgs::default())?
        .typed_as(NO_BITS_TYPE);
    Ok(())
}
