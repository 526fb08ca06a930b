//! Shared helpers for the protocol integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use ash::vk::{self, Handle};
use vkser_protocol::{Decoded, ResourceId, ResourceManager, Serialise, Serialiser, StructuredObject};

/// In-memory resource manager. Handles registered here are both known at
/// capture and live at replay unless dropped with [`MockResources::forget_live`].
#[derive(Default)]
pub struct MockResources {
    ids: HashMap<(vk::ObjectType, u64), ResourceId>,
    live: HashMap<ResourceId, (vk::ObjectType, u64)>,
    originals: HashMap<ResourceId, ResourceId>,
}

impl MockResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<H: Handle + Copy>(&mut self, handle: H, id: u64) -> &mut Self {
        let id = ResourceId(id);
        self.ids.insert((H::TYPE, handle.as_raw()), id);
        self.live.insert(id, (H::TYPE, handle.as_raw()));
        self
    }

    pub fn set_original(&mut self, id: u64, original: u64) -> &mut Self {
        self.originals.insert(ResourceId(id), ResourceId(original));
        self
    }

    /// Keep the id known but without a live handle, as for a resource the
    /// capture dropped.
    pub fn forget_live(&mut self, id: u64) -> &mut Self {
        self.live.remove(&ResourceId(id));
        self
    }
}

impl ResourceManager for MockResources {
    fn resource_id(&self, object_type: vk::ObjectType, raw: u64) -> ResourceId {
        self.ids.get(&(object_type, raw)).copied().unwrap_or(ResourceId::NULL)
    }

    fn original_id(&self, id: ResourceId) -> ResourceId {
        self.originals.get(&id).copied().unwrap_or(id)
    }

    fn has_live_resource(&self, id: ResourceId) -> bool {
        self.live.contains_key(&id)
    }

    fn live_handle(&self, object_type: vk::ObjectType, id: ResourceId) -> Option<u64> {
        self.live
            .get(&id)
            .filter(|(ty, _)| *ty == object_type)
            .map(|(_, raw)| *raw)
    }
}

pub fn encode<T: Serialise>(value: &mut T, resources: &MockResources) -> Vec<u8> {
    Serialiser::writer()
        .with_resources(resources)
        .encode("record", value)
        .expect("encode")
}

pub fn decode<T: Serialise>(bytes: &[u8], resources: &MockResources) -> Decoded<T> {
    Serialiser::reader(bytes, vkser_protocol::CURRENT_VERSION)
        .expect("reader")
        .with_resources(resources)
        .decode("record")
        .expect("decode")
}

/// Decode with a structured tree, as a capture viewer would.
pub fn export<T: Serialise>(bytes: &[u8]) -> Decoded<T> {
    Serialiser::reader(bytes, vkser_protocol::CURRENT_VERSION)
        .expect("reader")
        .with_structured_export()
        .decode("record")
        .expect("decode")
}

pub fn structurise<T: Serialise>(value: &mut T, resources: &MockResources) -> Vec<StructuredObject> {
    Serialiser::structuriser()
        .with_resources(resources)
        .structurise("record", value)
        .expect("structurise")
}

/// The single top-level record of a tree.
pub fn record(tree: &[StructuredObject]) -> &StructuredObject {
    match tree {
        [record] => record,
        other => panic!("expected one record, got {:?}", other),
    }
}
