//! Integration test: structured export
//!
//! Checks the tree built when structurising live structs or exporting a
//! stream: display type names, hidden entries, resource ids, and the JSON
//! and text renderings.
//!
//! Run with: cargo test --test structured_test -- --nocapture

mod common;

use ash::vk::{self, Handle};
use common::{encode, export, record, structurise, MockResources};
use vkser_protocol::flags::{bits_type_name, NO_BITS_TYPE};
use vkser_protocol::structs::*;
use vkser_protocol::{to_json, Next, ResourceId, StructuredData};

#[test]
fn test_bits_type_names() {
    assert_eq!(bits_type_name("VkAccessFlags"), "VkAccessFlagBits");
    assert_eq!(bits_type_name("VkGraphicsPipelineLibraryFlagsEXT"), "VkGraphicsPipelineLibraryFlagBitsEXT");
    assert_eq!(bits_type_name("VkAccessFlags2"), "VkAccessFlagBits2");
    assert_eq!(bits_type_name("VkPipelineCreateFlags2KHR"), "VkPipelineCreateFlagBits2KHR");
    assert_eq!(bits_type_name("VkFormat"), "VkFormat");
}

#[test]
fn test_flags_shown_under_bits_type() {
    let resources = MockResources::new();
    let mut barrier = MemoryBarrier {
        src_access_mask: vk::AccessFlags::SHADER_WRITE,
        dst_access_mask: vk::AccessFlags::SHADER_READ | vk::AccessFlags::UNIFORM_READ,
        next: Next::new(),
    };

    let tree = structurise(&mut barrier, &resources);
    let root = record(&tree);
    assert_eq!(root.type_name, "VkMemoryBarrier");

    let src = root.child("srcAccessMask").unwrap();
    assert_eq!(src.type_name, "VkAccessFlagBits");
    assert_eq!(src.as_unsigned(), Some(u64::from(vk::AccessFlags::SHADER_WRITE.as_raw())));
    match &src.data {
        StructuredData::Bitmask { flags, .. } => assert_eq!(*flags, "VkAccessFlags"),
        other => panic!("expected Bitmask, got {:?}", other),
    }

    let dst = root.child("dstAccessMask").unwrap();
    assert_eq!(
        dst.as_unsigned(),
        Some(u64::from((vk::AccessFlags::SHADER_READ | vk::AccessFlags::UNIFORM_READ).as_raw()))
    );
}

#[test]
fn test_flags_without_bits() {
    let resources = MockResources::new();
    let mut module = ShaderModuleCreateInfo {
        code: vec![0x0723_0203],
        ..Default::default()
    };

    let tree = structurise(&mut module, &resources);
    let flags = record(&tree).child("flags").unwrap();
    assert_eq!(flags.type_name, NO_BITS_TYPE);
    assert_eq!(flags.as_unsigned(), Some(0));
}

#[test]
fn test_flag_arrays_renamed_per_element() {
    let resources = MockResources::new();
    let mut submit = SubmitInfo {
        wait_dst_stage_mask: vec![
            vk::PipelineStageFlags::TRANSFER,
            vk::PipelineStageFlags::FRAGMENT_SHADER,
        ],
        ..Default::default()
    };

    let tree = structurise(&mut submit, &resources);
    let masks = record(&tree).child("pWaitDstStageMask").unwrap();
    assert_eq!(masks.type_name, "VkPipelineStageFlagBits");
    assert_eq!(masks.children().len(), 2);
    for el in masks.children() {
        assert_eq!(el.type_name, "VkPipelineStageFlagBits");
    }
}

#[test]
fn test_legacy_constant_id_hidden() {
    let resources = MockResources::new();
    let mut stage = PipelineShaderStageCreateInfo {
        stage: vk::ShaderStageFlags::VERTEX,
        specialization_info: Some(SpecializationInfo {
            map_entries: vec![SpecializationMapEntry {
                constant_id: 12,
                offset: 0,
                size: 4,
            }],
            data: vec![0; 4],
        }),
        ..Default::default()
    };

    let tree = structurise(&mut stage, &resources);
    let entries = record(&tree)
        .path(&["pSpecializationInfo", "pMapEntries"])
        .unwrap();
    let entry = &entries.children()[0];

    let names: Vec<&str> = entry.children().iter().map(|c| c.name).collect();
    assert_eq!(names, ["constantID", "offset", "constantID", "size"]);
    assert!(entry.children()[2].hidden);
    assert!(!entry.children()[0].hidden);

    let visible: Vec<&str> = entry.visible_children().map(|c| c.name).collect();
    assert_eq!(visible, ["constantID", "offset", "size"]);
    assert_eq!(entry.child("size").map(|s| &*s.type_name), Some("size_t"));
}

#[test]
fn test_chain_end_and_hidden_tags() {
    let resources = MockResources::new();
    let mut info = BufferCreateInfo {
        size: 1024,
        usage: vk::BufferUsageFlags::VERTEX_BUFFER,
        ..Default::default()
    };

    let tree = structurise(&mut info, &resources);
    let root = record(&tree);

    let next_type = root.child("nextType").unwrap();
    assert!(next_type.hidden);
    assert!(next_type.is_null());

    let next = root.child("pNext").unwrap();
    assert!(next.is_null());
    assert_eq!(next.type_name, "void *");
    assert!(!next.hidden);
}

#[test]
fn test_structurise_shows_original_ids() {
    let mut resources = MockResources::new();
    resources
        .add(vk::Buffer::from_raw(0xb1), 7)
        .set_original(7, 3);

    let mut barrier = BufferMemoryBarrier {
        buffer: vk::Buffer::from_raw(0xb1),
        ..Default::default()
    };

    let tree = structurise(&mut barrier, &resources);
    let buffer = record(&tree).child("buffer").unwrap();
    assert_eq!(buffer.type_name, "VkBuffer");
    assert_eq!(buffer.as_resource(), Some(ResourceId(3)));

    // The stream itself carries the current id.
    let bytes = encode(&mut barrier, &resources);
    let exported = export::<BufferMemoryBarrier>(&bytes);
    let buffer = record(&exported.structured).child("buffer").unwrap();
    assert_eq!(buffer.as_resource(), Some(ResourceId(7)));
}

#[test]
fn test_export_leaves_handles_unresolved() {
    let mut resources = MockResources::new();
    resources.add(vk::Image::from_raw(0x99), 12);

    let mut barrier = ImageMemoryBarrier {
        image: vk::Image::from_raw(0x99),
        new_layout: vk::ImageLayout::GENERAL,
        ..Default::default()
    };
    let bytes = encode(&mut barrier, &resources);

    let exported = export::<ImageMemoryBarrier>(&bytes);
    assert!(exported.is_complete());
    assert!(exported.value.image.is_null());
    assert_eq!(exported.value.new_layout, vk::ImageLayout::GENERAL);

    let image = record(&exported.structured).child("image").unwrap();
    assert_eq!(image.as_resource(), Some(ResourceId(12)));
}

#[test]
fn test_queue_family_shown_signed() {
    let resources = MockResources::new();
    let mut barrier = BufferMemoryBarrier::default();

    let tree = structurise(&mut barrier, &resources);
    let src = record(&tree).child("srcQueueFamilyIndex").unwrap();
    assert_eq!(src.as_signed(), Some(-1));
}

#[test]
fn test_plain_read_builds_no_tree() {
    let resources = MockResources::new();
    let mut barrier = MemoryBarrier::default();
    let bytes = encode(&mut barrier, &resources);

    let decoded = common::decode::<MemoryBarrier>(&bytes, &resources);
    assert!(decoded.structured.is_empty());
}

#[test]
fn test_json_export() {
    let resources = MockResources::new();
    let mut barrier = MemoryBarrier {
        src_access_mask: vk::AccessFlags::HOST_WRITE,
        ..Default::default()
    };

    let tree = structurise(&mut barrier, &resources);
    let json = to_json(&tree).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    let root = &parsed[0];
    assert_eq!(root["name"], "record");
    assert_eq!(root["type_name"], "VkMemoryBarrier");
    assert_eq!(root["data"]["kind"], "struct");

    let fields = root["data"]["value"].as_array().unwrap();
    let src = &fields[0];
    assert_eq!(src["name"], "srcAccessMask");
    assert_eq!(src["data"]["kind"], "bitmask");
    assert_eq!(src["data"]["value"]["flags"], "VkAccessFlags");
    assert!(src.get("hidden").is_none());

    let next_type = fields
        .iter()
        .find(|f| f["name"] == "nextType")
        .unwrap();
    assert_eq!(next_type["hidden"], true);
}

#[test]
fn test_render_skips_hidden_entries() {
    let resources = MockResources::new();
    let mut barrier = MemoryBarrier {
        src_access_mask: vk::AccessFlags::TRANSFER_WRITE,
        ..Default::default()
    };

    let tree = structurise(&mut barrier, &resources);
    let text = record(&tree).render();
    assert!(text.starts_with("VkMemoryBarrier record\n"), "got:\n{text}");
    assert!(text.contains("  VkAccessFlagBits srcAccessMask = "));
    assert!(text.contains("  void * pNext = NULL"));
    assert!(!text.contains("nextType"));
}
