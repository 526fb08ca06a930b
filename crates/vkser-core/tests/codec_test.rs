//! Integration test: Codec
//!
//! Encodes records into framed chunks against a shared registry and reads
//! them back, including partial reads and structured export.
//!
//! Run with: cargo test --test codec_test -- --nocapture

use std::io::Cursor;
use std::sync::Arc;

use ash::vk::{self, Handle};
use vkser_core::config::SerialiseConfig;
use vkser_core::{Codec, CoreError, ResourceRegistry};
use vkser_protocol::structs::*;
use vkser_protocol::wire::{self, split_chunk};
use vkser_protocol::{
    ChunkFlags, Compression, Next, ResourceId, SerialiseError, Serialiser, CURRENT_VERSION,
};

fn codec(config: SerialiseConfig) -> Codec {
    Codec::new(config, Arc::new(ResourceRegistry::new()))
}

fn barrier_chain(buffer: vk::Buffer) -> MemoryBarrier {
    MemoryBarrier {
        src_access_mask: vk::AccessFlags::TRANSFER_WRITE,
        dst_access_mask: vk::AccessFlags::SHADER_READ,
        next: Next::from(BufferMemoryBarrier {
            buffer,
            offset: 64,
            size: 4096,
            ..Default::default()
        }),
    }
}

#[test]
fn test_round_trip_with_registry() {
    let codec = codec(SerialiseConfig::default());
    let buffer = vk::Buffer::from_raw(0xbeef);
    let id = codec.registry().register_handle(buffer);
    assert_eq!(id, ResourceId(1));

    let mut barrier = barrier_chain(buffer);
    let chunk = codec.encode("barrier", &mut barrier).unwrap();

    let decoded = codec.decode::<MemoryBarrier>("barrier", &chunk).unwrap();
    assert!(decoded.is_complete(), "unexpected error {:?}", decoded.error);
    assert!(decoded.structured.is_empty());
    assert_eq!(decoded.value, barrier);
}

#[test]
fn test_replay_binds_new_handle() {
    let capture = codec(SerialiseConfig::default());
    let mut barrier = barrier_chain(vk::Buffer::from_raw(0x1000));
    let id = capture.registry().register_handle(vk::Buffer::from_raw(0x1000));
    let chunk = capture.encode("barrier", &mut barrier).unwrap();

    let replay = codec(SerialiseConfig::default());
    replay.registry().bind_live(id, vk::ObjectType::BUFFER, 0x2000);

    let decoded = replay.decode::<MemoryBarrier>("barrier", &chunk).unwrap();
    let inner = decoded.value.next.find::<BufferMemoryBarrier>().unwrap();
    assert_eq!(inner.buffer, vk::Buffer::from_raw(0x2000));
}

#[test]
fn test_compression_follows_config() {
    let mut info = ImageFormatListCreateInfo {
        view_formats: vec![vk::Format::R8G8B8A8_UNORM; 2048],
        ..Default::default()
    };

    let compressed = codec(SerialiseConfig::default())
        .encode("formats", &mut info)
        .unwrap();
    let (header, _) = split_chunk(&compressed).unwrap();
    assert!(header.flags.contains(ChunkFlags::COMPRESSED));

    let raw_config = SerialiseConfig {
        compression: false,
        ..Default::default()
    };
    let raw = codec(raw_config).encode("formats", &mut info).unwrap();
    let (header, _) = split_chunk(&raw).unwrap();
    assert_eq!(header.flags, ChunkFlags::empty());
    assert!(raw.len() > compressed.len());

    for chunk in [&compressed, &raw] {
        let decoded = codec(SerialiseConfig::default())
            .decode::<ImageFormatListCreateInfo>("formats", chunk)
            .unwrap();
        assert_eq!(decoded.value, info);
    }
}

#[test]
fn test_structurise_and_export_json() {
    let codec = codec(SerialiseConfig::default());
    let buffer = vk::Buffer::from_raw(0xabc);
    codec.registry().register_handle(buffer);

    let mut barrier = barrier_chain(buffer);
    let tree = codec.structurise("barrier", &mut barrier).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].type_name, "VkMemoryBarrier");

    let json = codec.export_json(&tree).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["name"], "barrier");
    assert_eq!(parsed[0]["type_name"], "VkMemoryBarrier");
}

#[test]
fn test_structured_export_leaves_handles_unresolved() {
    let capture = codec(SerialiseConfig::default());
    let buffer = vk::Buffer::from_raw(0x44);
    capture.registry().register_handle(buffer);
    let chunk = capture.encode("barrier", &mut barrier_chain(buffer)).unwrap();

    let viewer = Codec::new(
        SerialiseConfig {
            structured_export: true,
            ..Default::default()
        },
        Arc::new(ResourceRegistry::new()),
    );
    let decoded = viewer.decode::<MemoryBarrier>("barrier", &chunk).unwrap();
    assert!(decoded.is_complete());
    assert_eq!(decoded.structured.len(), 1);

    let inner = decoded.value.next.find::<BufferMemoryBarrier>().unwrap();
    assert!(inner.buffer.is_null());

    let recorded = decoded.structured[0]
        .path(&["pNext", "buffer"])
        .and_then(|b| b.as_resource());
    assert_eq!(recorded, Some(ResourceId(1)));
}

#[test]
fn test_export_config_writes_plain_chunks() {
    let exporting = codec(SerialiseConfig {
        structured_export: true,
        compression: false,
        ..Default::default()
    });
    let mut barrier = barrier_chain(vk::Buffer::null());
    let chunk = exporting.encode("barrier", &mut barrier).unwrap();
    let (header, _) = split_chunk(&chunk).unwrap();
    assert_eq!(header.flags, ChunkFlags::empty());

    let decoded = codec(SerialiseConfig::default())
        .decode::<MemoryBarrier>("barrier", &chunk)
        .unwrap();
    assert!(decoded.structured.is_empty());
    assert_eq!(decoded.value, barrier);
}

#[test]
fn test_unsupported_node_returns_partial_value() {
    let mut ser = Serialiser::writer();
    ser.serialise("allocationSize", &mut 65536u64).unwrap();
    ser.serialise("memoryTypeIndex", &mut 3u32).unwrap();
    ser.serialise("sType", &mut vk::StructureType::MEMORY_ALLOCATE_INFO).unwrap();
    ser.serialise("nextType", &mut Some(vk::StructureType::EXPORT_MEMORY_ALLOCATE_INFO))
        .unwrap();
    ser.serialise("handleTypes", &mut 1u32).unwrap();
    let chunk = wire::encode_chunk(&ser.into_bytes(), CURRENT_VERSION, Compression::None).unwrap();

    let decoded = codec(SerialiseConfig::default())
        .decode::<MemoryAllocateInfo>("alloc", &chunk)
        .unwrap();
    assert_eq!(decoded.value.allocation_size, 65536);
    assert_eq!(decoded.value.memory_type_index, 3);
    assert!(decoded.value.next.is_empty());
    match decoded.error {
        Some(SerialiseError::UnsupportedStructure { name }) => {
            assert_eq!(name, "VkExportMemoryAllocateInfo");
        }
        other => panic!("expected UnsupportedStructure, got {:?}", other),
    }
}

#[test]
fn test_unsupported_stream_version() {
    let chunk = wire::encode_chunk(&[0; 8], 0x0f, Compression::None).unwrap();
    match codec(SerialiseConfig::default()).decode::<MemoryBarrier>("barrier", &chunk) {
        Err(CoreError::Serialise(SerialiseError::UnsupportedVersion { version, .. })) => {
            assert_eq!(version, 0x0f);
        }
        other => panic!("expected UnsupportedVersion, got {:?}", other),
    }
}

#[test]
fn test_malformed_chunk() {
    match codec(SerialiseConfig::default()).decode::<MemoryBarrier>("barrier", &[0x56, 0x53, 0]) {
        Err(CoreError::Wire(_)) => {}
        other => panic!("expected wire error, got {:?}", other),
    }
}

#[test]
fn test_write_to_read_from_stream() {
    let codec = codec(SerialiseConfig::default());
    let mut first = MemoryAllocateInfo {
        allocation_size: 1 << 20,
        memory_type_index: 1,
        next: Next::new(),
    };
    let mut second = barrier_chain(vk::Buffer::null());

    let mut stream = Vec::new();
    codec.write_to(&mut stream, "alloc", &mut first).unwrap();
    codec.write_to(&mut stream, "barrier", &mut second).unwrap();

    let mut reader = Cursor::new(stream);
    let alloc = codec.read_from::<MemoryAllocateInfo, _>(&mut reader, "alloc").unwrap();
    assert_eq!(alloc.value.allocation_size, 1 << 20);
    let barrier = codec.read_from::<MemoryBarrier, _>(&mut reader, "barrier").unwrap();
    assert_eq!(barrier.value, second);

    match codec.read_from::<MemoryBarrier, _>(&mut reader, "barrier") {
        Err(CoreError::Wire(_)) => {}
        other => panic!("expected wire error at end of stream, got {:?}", other),
    }
}
