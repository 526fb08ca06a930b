use std::io::{Read, Write};
use std::sync::Arc;

use tracing::{debug, warn};
use vkser_protocol::wire::{self, ChunkHeader};
use vkser_protocol::{
    to_json, Decoded, Serialise, Serialiser, StructuredObject, CURRENT_VERSION,
};

use crate::config::SerialiseConfig;
use crate::error::CoreError;
use crate::registry::ResourceRegistry;

/// Framed record encoding against a shared resource registry.
///
/// Each call runs its own serialisation pass, so a `Codec` can be shared
/// between threads.
pub struct Codec {
    config: SerialiseConfig,
    registry: Arc<ResourceRegistry>,
}

impl Codec {
    pub fn new(config: SerialiseConfig, registry: Arc<ResourceRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Serialise `value` as a chunk at the current stream version.
    pub fn encode<T: Serialise>(&self, name: &'static str, value: &mut T) -> Result<Vec<u8>, CoreError> {
        let payload = Serialiser::writer()
            .with_resources(self.registry.as_ref())
            .encode(name, value)?;
        debug!(record = name, bytes = payload.len(), "encoded record");
        Ok(wire::encode_chunk(&payload, CURRENT_VERSION, self.config.compression())?)
    }

    /// Read one chunk. A soft error, such as an unsupported chain node, is
    /// logged and returned alongside the partially read value.
    pub fn decode<T: Serialise>(&self, name: &'static str, chunk: &[u8]) -> Result<Decoded<T>, CoreError> {
        let (header, payload) = wire::split_chunk(chunk)?;
        let record = wire::decode_payload(payload, header.flags)?;
        self.decode_record(name, header, &record)
    }

    pub fn write_to<T: Serialise, W: Write>(
        &self,
        writer: &mut W,
        name: &'static str,
        value: &mut T,
    ) -> Result<(), CoreError> {
        let chunk = self.encode(name, value)?;
        writer.write_all(&chunk)?;
        Ok(())
    }

    pub fn read_from<T: Serialise, R: Read>(&self, reader: &mut R, name: &'static str) -> Result<Decoded<T>, CoreError> {
        let (header, record) = wire::read_chunk(reader)?;
        self.decode_record(name, header, &record)
    }

    /// Describe live structs without producing bytes.
    pub fn structurise<T: Serialise>(
        &self,
        name: &'static str,
        value: &mut T,
    ) -> Result<Vec<StructuredObject>, CoreError> {
        Ok(Serialiser::structuriser()
            .with_resources(self.registry.as_ref())
            .structurise(name, value)?)
    }

    pub fn export_json(&self, objects: &[StructuredObject]) -> Result<String, CoreError> {
        Ok(to_json(objects)?)
    }

    fn decode_record<T: Serialise>(
        &self,
        name: &'static str,
        header: ChunkHeader,
        record: &[u8],
    ) -> Result<Decoded<T>, CoreError> {
        let mut ser = Serialiser::reader(record, header.version)?.with_resources(self.registry.as_ref());
        if self.config.structured_export {
            ser = ser.with_structured_export();
        }

        let decoded = ser.decode::<T>(name)?;
        if let Some(err) = &decoded.error {
            warn!(record = name, "record read incompletely: {}", err);
        }
        Ok(decoded)
    }
}
