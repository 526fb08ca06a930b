//! Integration test: ResourceRegistry
//!
//! Tests handle registration, replay binding and the resource manager
//! lookups the serialiser relies on.
//!
//! Run with: cargo test --test registry_test -- --nocapture

use std::sync::Arc;
use std::thread;

use ash::vk::{self, Handle};
use vkser_core::{CoreError, ResourceRegistry};
use vkser_protocol::{ResourceId, ResourceManager};

#[test]
fn test_register_assigns_ids_from_one() {
    let registry = ResourceRegistry::new();
    assert!(registry.is_empty());

    let buffer = registry.register_handle(vk::Buffer::from_raw(0x100));
    let image = registry.register_handle(vk::Image::from_raw(0x200));
    assert_eq!(buffer, ResourceId(1));
    assert_eq!(image, ResourceId(2));
    assert_eq!(registry.len(), 2);

    // Same handle, same id.
    assert_eq!(registry.register_handle(vk::Buffer::from_raw(0x100)), buffer);
    assert_eq!(registry.len(), 2);

    // Same raw value, different object type.
    let view = registry.register(vk::ObjectType::IMAGE_VIEW, 0x100);
    assert_ne!(view, buffer);
}

#[test]
fn test_null_handle_not_registered() {
    let registry = ResourceRegistry::new();
    assert_eq!(registry.register_handle(vk::Buffer::null()), ResourceId::NULL);
    assert!(registry.is_empty());
}

#[test]
fn test_resource_manager_lookups() {
    let registry = ResourceRegistry::new();
    let id = registry.register_handle(vk::Sampler::from_raw(0x5a));

    assert_eq!(registry.resource_id(vk::ObjectType::SAMPLER, 0x5a), id);
    assert_eq!(registry.resource_id(vk::ObjectType::SAMPLER, 0x5b), ResourceId::NULL);
    assert!(registry.has_live_resource(id));
    assert_eq!(registry.live_handle(vk::ObjectType::SAMPLER, id), Some(0x5a));
    assert_eq!(registry.live_handle(vk::ObjectType::IMAGE, id), None);
    assert_eq!(registry.original_id(id), id);

    registry.set_original(id, ResourceId(900));
    assert_eq!(registry.original_id(id), ResourceId(900));
}

#[test]
fn test_bind_live_replaces_binding() {
    let registry = ResourceRegistry::new();
    let recorded = ResourceId(42);

    registry.bind_live(recorded, vk::ObjectType::BUFFER, 0xaaa);
    assert_eq!(registry.resolve(recorded).unwrap(), (vk::ObjectType::BUFFER, 0xaaa));

    // Recreated on a new device.
    registry.bind_live(recorded, vk::ObjectType::BUFFER, 0xbbb);
    assert_eq!(registry.resolve(recorded).unwrap(), (vk::ObjectType::BUFFER, 0xbbb));
    assert_eq!(registry.resource_id(vk::ObjectType::BUFFER, 0xaaa), ResourceId::NULL);
    assert_eq!(registry.resource_id(vk::ObjectType::BUFFER, 0xbbb), recorded);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_remove_and_resolve() {
    let registry = ResourceRegistry::new();
    let id = registry.register_handle(vk::Pipeline::from_raw(0x77));
    registry.set_original(id, ResourceId(5));

    assert_eq!(registry.remove(id), Some((vk::ObjectType::PIPELINE, 0x77)));
    assert_eq!(registry.remove(id), None);
    assert!(!registry.has_live_resource(id));
    assert_eq!(registry.original_id(id), id);

    match registry.resolve(id) {
        Err(CoreError::ResourceNotFound(missing)) => assert_eq!(missing, id),
        other => panic!("expected ResourceNotFound, got {:?}", other),
    }
}

#[test]
fn test_concurrent_registration() {
    let registry = Arc::new(ResourceRegistry::new());

    let workers: Vec<_> = (0..4u64)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..250u64)
                    .map(|i| registry.register(vk::ObjectType::IMAGE, worker * 1000 + i + 1))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<ResourceId> = workers
        .into_iter()
        .flat_map(|w| w.join().unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 1000);
    assert_eq!(registry.len(), 1000);
}
