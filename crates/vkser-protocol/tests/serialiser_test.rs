//! Integration test: serialiser modes and stream validation
//!
//! Covers the optional-resource scope, host-width narrowing, version-gated
//! fields, and rejection of corrupt or incompatible streams.
//!
//! Run with: cargo test --test serialiser_test -- --nocapture

mod common;

use ash::vk::{self, Handle};
use common::{decode, encode, MockResources};
use vkser_protocol::structs::*;
use vkser_protocol::version::{MIN_SUPPORTED_VERSION, VERSION_BASE_PIPELINE, VERSION_SAMPLE_MASK};
use vkser_protocol::{
    ErrorKind, HostWidth, Mode, SerialiseError, Serialiser, CURRENT_VERSION,
};

#[test]
fn test_modes() {
    let writer = Serialiser::writer();
    assert_eq!(writer.mode(), Mode::Writing);
    assert!(writer.is_writing() && !writer.is_structurising());
    assert_eq!(writer.version(), CURRENT_VERSION);

    let reader = Serialiser::reader(&[], MIN_SUPPORTED_VERSION).unwrap();
    assert!(reader.is_reading() && !reader.is_structurising());
    assert!(!reader.version_at_least(VERSION_SAMPLE_MASK));

    let exporting = Serialiser::reader(&[], CURRENT_VERSION)
        .unwrap()
        .with_structured_export();
    assert!(exporting.is_reading() && exporting.is_structurising());

    let structuriser = Serialiser::structuriser();
    assert_eq!(structuriser.mode(), Mode::Structurising);
    assert!(structuriser.is_structurising());
}

#[test]
fn test_optional_scopes_nest() {
    let mut ser = Serialiser::reader(&[], CURRENT_VERSION).unwrap();
    assert!(!ser.optional_resources_active());
    {
        let mut outer = ser.optional_resources();
        assert!(outer.optional_resources_active());
        {
            let inner = outer.optional_resources();
            assert!(inner.optional_resources_active());
        }
        assert!(outer.optional_resources_active(), "inner exit ended the outer scope");
    }
    assert!(!ser.optional_resources_active());
}

#[test]
fn test_optional_scope_only_counts_when_reading() {
    let mut ser = Serialiser::writer();
    let guard = ser.optional_resources();
    assert!(!guard.optional_resources_active());
}

#[test]
fn test_missing_optional_resource_reads_as_null() {
    let mut resources = MockResources::new();
    resources
        .add(vk::Image::from_raw(0x1a), 21)
        .add(vk::Buffer::from_raw(0x1b), 22);

    let mut barrier = ImageMemoryBarrier {
        src_access_mask: vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
        dst_access_mask: vk::AccessFlags::SHADER_READ,
        old_layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        new_layout: vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        image: vk::Image::from_raw(0x1a),
        ..Default::default()
    };
    let bytes = encode(&mut barrier, &resources);

    resources.forget_live(21);
    let decoded = decode::<ImageMemoryBarrier>(&bytes, &resources);
    assert!(decoded.is_complete());
    assert!(decoded.value.image.is_null());
    assert_eq!(decoded.value.new_layout, vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL);
}

#[test]
fn test_missing_required_resource_reads_as_null() {
    let mut resources = MockResources::new();
    resources.add(vk::Image::from_raw(0x2c), 31);

    let mut view = ImageViewCreateInfo {
        image: vk::Image::from_raw(0x2c),
        view_type: vk::ImageViewType::TYPE_2D,
        format: vk::Format::B8G8R8A8_SRGB,
        subresource_range: ImageSubresourceRange {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            level_count: 1,
            layer_count: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let bytes = encode(&mut view, &resources);

    // Not inside an optional scope: warned about, but not an error.
    resources.forget_live(31);
    let decoded = decode::<ImageViewCreateInfo>(&bytes, &resources);
    assert!(decoded.is_complete(), "unexpected error {:?}", decoded.error);
    assert!(decoded.value.image.is_null());
    assert_eq!(decoded.value.format, vk::Format::B8G8R8A8_SRGB);
    assert_eq!(decoded.value.subresource_range, view.subresource_range);
}

#[test]
fn test_host_size_portability() {
    let mut entry = SpecializationMapEntry {
        constant_id: 7,
        offset: 16,
        size: 4,
    };

    // 32-bit writer, native reader.
    let bytes = Serialiser::writer()
        .with_host_width(HostWidth::Bits32)
        .encode("entry", &mut entry)
        .unwrap();
    let decoded = Serialiser::reader(&bytes, CURRENT_VERSION)
        .unwrap()
        .decode::<SpecializationMapEntry>("entry")
        .unwrap();
    assert_eq!(decoded.value, entry);

    // Native writer, 32-bit reader.
    let bytes = Serialiser::writer().encode("entry", &mut entry).unwrap();
    let decoded = Serialiser::reader(&bytes, CURRENT_VERSION)
        .unwrap()
        .with_host_width(HostWidth::Bits32)
        .decode::<SpecializationMapEntry>("entry")
        .unwrap();
    assert_eq!(decoded.value, entry);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_host_size_out_of_range() {
    let mut entry = SpecializationMapEntry {
        constant_id: 0,
        offset: 0,
        size: u32::MAX as usize + 1,
    };

    match Serialiser::writer()
        .with_host_width(HostWidth::Bits32)
        .encode("entry", &mut entry)
    {
        Err(SerialiseError::ValueOutOfRange { field: "size", bits: 32, .. }) => {}
        other => panic!("expected ValueOutOfRange, got {:?}", other),
    }

    let bytes = Serialiser::writer().encode("entry", &mut entry).unwrap();
    let result = Serialiser::reader(&bytes, CURRENT_VERSION)
        .unwrap()
        .with_host_width(HostWidth::Bits32)
        .decode::<SpecializationMapEntry>("entry");
    match result {
        Err(err) => {
            assert_eq!(
                err,
                SerialiseError::ValueOutOfRange {
                    field: "size",
                    value: u64::from(u32::MAX) + 1,
                    bits: 32,
                }
            );
            assert_eq!(err.kind(), ErrorKind::Range);
        }
        Ok(decoded) => panic!("expected ValueOutOfRange, got {:?}", decoded.value),
    }
}

fn multisample_pipeline() -> GraphicsPipelineCreateInfo {
    GraphicsPipelineCreateInfo {
        multisample_state: Some(Box::new(PipelineMultisampleStateCreateInfo {
            rasterization_samples: vk::SampleCountFlags::TYPE_4,
            sample_mask: Some(vec![0b1011]),
            ..Default::default()
        })),
        base_pipeline_index: 3,
        ..Default::default()
    }
}

#[test]
fn test_version_gated_fields_default_on_old_streams() {
    let resources = MockResources::new();

    let mut pipeline = multisample_pipeline();
    let bytes = Serialiser::writer_for_version(MIN_SUPPORTED_VERSION)
        .encode("pipeline", &mut pipeline)
        .unwrap();
    let decoded = Serialiser::reader(&bytes, MIN_SUPPORTED_VERSION)
        .unwrap()
        .with_resources(&resources)
        .decode::<GraphicsPipelineCreateInfo>("pipeline")
        .unwrap();
    let value = decoded.value;
    let multisample = value.multisample_state.as_deref().unwrap();
    assert_eq!(multisample.rasterization_samples, vk::SampleCountFlags::TYPE_4);
    assert_eq!(multisample.sample_mask, None);
    assert_eq!(value.base_pipeline_index, -1);
    assert!(value.base_pipeline_handle.is_null());

    // Sample mask present, base pipeline not yet.
    let mut pipeline = multisample_pipeline();
    let bytes = Serialiser::writer_for_version(VERSION_SAMPLE_MASK)
        .encode("pipeline", &mut pipeline)
        .unwrap();
    let decoded = Serialiser::reader(&bytes, VERSION_SAMPLE_MASK)
        .unwrap()
        .decode::<GraphicsPipelineCreateInfo>("pipeline")
        .unwrap();
    let value = decoded.value;
    assert_eq!(
        value.multisample_state.as_deref().and_then(|m| m.sample_mask.clone()),
        Some(vec![0b1011])
    );
    assert_eq!(value.base_pipeline_index, -1);

    let mut pipeline = multisample_pipeline();
    let bytes = Serialiser::writer_for_version(VERSION_BASE_PIPELINE)
        .encode("pipeline", &mut pipeline)
        .unwrap();
    let decoded = Serialiser::reader(&bytes, VERSION_BASE_PIPELINE)
        .unwrap()
        .decode::<GraphicsPipelineCreateInfo>("pipeline")
        .unwrap();
    assert_eq!(decoded.value, pipeline);
}

#[test]
fn test_unsupported_versions_rejected() {
    for version in [MIN_SUPPORTED_VERSION - 1, CURRENT_VERSION + 1] {
        match Serialiser::reader(&[], version) {
            Err(err) => {
                assert_eq!(
                    err,
                    SerialiseError::UnsupportedVersion {
                        version,
                        min: MIN_SUPPORTED_VERSION,
                        max: CURRENT_VERSION,
                    }
                );
                assert_eq!(err.kind(), ErrorKind::Version);
            }
            Ok(_) => panic!("expected UnsupportedVersion for {version:#x}"),
        }
    }
}

#[test]
fn test_corrupt_bool_rejected() {
    let result = Serialiser::reader(&[2], CURRENT_VERSION)
        .unwrap()
        .decode::<bool>("primitiveRestartEnable");
    match result {
        Err(err) => {
            assert_eq!(
                err,
                SerialiseError::InvalidBool {
                    field: "primitiveRestartEnable",
                    value: 2,
                }
            );
            assert_eq!(err.kind(), ErrorKind::Corrupt);
        }
        Ok(decoded) => panic!("expected InvalidBool, got {:?}", decoded.value),
    }
}

#[test]
fn test_truncated_and_trailing_data() {
    let resources = MockResources::new();
    let mut barrier = MemoryBarrier {
        src_access_mask: vk::AccessFlags::TRANSFER_WRITE,
        ..Default::default()
    };
    let bytes = encode(&mut barrier, &resources);

    let truncated = Serialiser::reader(&bytes[..bytes.len() - 1], CURRENT_VERSION)
        .unwrap()
        .decode::<MemoryBarrier>("record");
    match truncated {
        Err(SerialiseError::UnexpectedEof { wanted: 1, remaining: 0, .. }) => {}
        other => panic!("expected UnexpectedEof, got {:?}", other.map(|d| d.value)),
    }

    let mut padded = bytes.clone();
    padded.push(0);
    let trailing = Serialiser::reader(&padded, CURRENT_VERSION)
        .unwrap()
        .decode::<MemoryBarrier>("record");
    match trailing {
        Err(SerialiseError::TrailingData { remaining: 1 }) => {}
        other => panic!("expected TrailingData, got {:?}", other.map(|d| d.value)),
    }
}

#[test]
fn test_oversized_count_rejected() {
    let mut ser = Serialiser::writer();
    ser.serialise("count", &mut u64::MAX).unwrap();
    let bytes = ser.into_bytes();

    let result = Serialiser::reader(&bytes, CURRENT_VERSION)
        .unwrap()
        .decode::<Vec<u32>>("pViewFormats");
    match result {
        Err(SerialiseError::InvalidLength { field: "pViewFormats", length }) => {
            assert_eq!(length, u64::MAX);
        }
        other => panic!("expected InvalidLength, got {:?}", other.map(|d| d.value)),
    }
}

#[test]
fn test_sticky_error_keeps_first() {
    let mut ser = Serialiser::reader(&[], CURRENT_VERSION).unwrap();
    assert!(!ser.has_error());

    ser.set_error(SerialiseError::UnsupportedStructure { name: "VkFirst" });
    ser.set_error(SerialiseError::UnsupportedStructure { name: "VkSecond" });
    assert_eq!(
        ser.error(),
        Some(&SerialiseError::UnsupportedStructure { name: "VkFirst" })
    );

    // Reads after the error yield defaults without touching the data.
    let mut value = 5u32;
    ser.serialise("value", &mut value).unwrap();
    assert_eq!(value, 0);

    assert!(ser.take_error().is_some());
    assert!(!ser.has_error());
}
