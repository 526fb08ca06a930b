use std::sync::atomic::{AtomicU64, Ordering};

use ash::vk::{self, Handle};
use dashmap::DashMap;
use vkser_protocol::{ResourceId, ResourceManager};

use crate::error::CoreError;

/// Bidirectional mapping between live Vulkan handles and stream resource ids.
/// Capture registers handles as they are created; replay binds recorded ids
/// to the handles it recreated.
pub struct ResourceRegistry {
    /// (object type, raw handle) -> ResourceId
    by_handle: DashMap<(vk::ObjectType, u64), ResourceId>,
    /// ResourceId -> (object type, raw handle)
    by_id: DashMap<ResourceId, (vk::ObjectType, u64)>,
    /// Replay id -> id the resource had at capture
    originals: DashMap<ResourceId, ResourceId>,
    /// Counter for generating unique ids
    next_id: AtomicU64,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            by_handle: DashMap::new(),
            by_id: DashMap::new(),
            originals: DashMap::new(),
            // Start from 1, 0 is the null id
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a live handle and return its id. Registering the same handle
    /// again returns the existing id.
    pub fn register(&self, object_type: vk::ObjectType, raw: u64) -> ResourceId {
        if raw == 0 {
            return ResourceId::NULL;
        }
        *self.by_handle.entry((object_type, raw)).or_insert_with(|| {
            let id = ResourceId(self.next_id.fetch_add(1, Ordering::Relaxed));
            self.by_id.insert(id, (object_type, raw));
            id
        })
    }

    pub fn register_handle<H: Handle>(&self, handle: H) -> ResourceId {
        self.register(H::TYPE, handle.as_raw())
    }

    /// Bind a recorded id to a live handle created during replay.
    pub fn bind_live(&self, id: ResourceId, object_type: vk::ObjectType, raw: u64) {
        if let Some((_, previous)) = self.by_id.remove(&id) {
            self.by_handle.remove(&previous);
        }
        self.by_id.insert(id, (object_type, raw));
        self.by_handle.insert((object_type, raw), id);
    }

    /// Record that `id` stands in for `original` from the capture.
    pub fn set_original(&self, id: ResourceId, original: ResourceId) {
        self.originals.insert(id, original);
    }

    /// Forget a resource. Returns its live binding, if any.
    pub fn remove(&self, id: ResourceId) -> Option<(vk::ObjectType, u64)> {
        self.originals.remove(&id);
        let (_, live) = self.by_id.remove(&id)?;
        self.by_handle.remove(&live);
        Some(live)
    }

    /// Live binding of an id.
    pub fn resolve(&self, id: ResourceId) -> Result<(vk::ObjectType, u64), CoreError> {
        self.by_id
            .get(&id)
            .map(|v| *v)
            .ok_or(CoreError::ResourceNotFound(id))
    }

    /// Return number of live resources.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceManager for ResourceRegistry {
    fn resource_id(&self, object_type: vk::ObjectType, raw: u64) -> ResourceId {
        self.by_handle
            .get(&(object_type, raw))
            .map(|v| *v)
            .unwrap_or(ResourceId::NULL)
    }

    fn original_id(&self, id: ResourceId) -> ResourceId {
        self.originals.get(&id).map(|v| *v).unwrap_or(id)
    }

    fn has_live_resource(&self, id: ResourceId) -> bool {
        self.by_id.contains_key(&id)
    }

    fn live_handle(&self, object_type: vk::ObjectType, id: ResourceId) -> Option<u64> {
        self.by_id
            .get(&id)
            .filter(|live| live.0 == object_type)
            .map(|live| live.1)
    }
}
