use std::borrow::Cow;

use tracing::error;

use crate::error::SerialiseError;
use crate::handle::ResourceManager;
use crate::optional::OptionalResources;
use crate::structured::{StructuredData, StructuredObject};
use crate::validity::StructArgs;
use crate::version::{CURRENT_VERSION, MAX_NESTING_DEPTH, MIN_SUPPORTED_VERSION};

/// Direction of a serialisation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Live structs to bytes.
    Writing,
    /// Bytes to live structs.
    Reading,
    /// Live structs to a structured tree, no bytes.
    Structurising,
}

/// Pointer width of the host a stream is narrowed for. Size fields are
/// always 64 bits on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostWidth {
    #[default]
    Native,
    Bits32,
}

impl HostWidth {
    fn bits(self) -> u32 {
        match self {
            HostWidth::Native => usize::BITS,
            HostWidth::Bits32 => 32,
        }
    }

    fn limit(self) -> u64 {
        match self {
            HostWidth::Native => usize::MAX as u64,
            HostWidth::Bits32 => u64::from(u32::MAX),
        }
    }
}

/// A type with a fixed field layout on the wire.
///
/// One implementation serves every mode: the same body writes, reads and
/// describes the value, querying the serialiser where the modes differ.
pub trait Serialise: Default {
    /// Name shown in structured output, e.g. `VkMemoryBarrier`.
    const TYPE_NAME: &'static str;

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError>;
}

/// The result of reading one record.
///
/// `error` is the soft error that stopped the read early, if any. Fields
/// read before it are kept in `value`.
#[derive(Debug)]
pub struct Decoded<T> {
    pub value: T,
    pub error: Option<SerialiseError>,
    pub structured: Vec<StructuredObject>,
}

impl<T> Decoded<T> {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-pass serialisation state.
///
/// Everything mutable during a pass lives here: the cursor, the optional
/// resource depth, the sticky error and the structured tree. Independent
/// passes can run on different threads.
pub struct Serialiser<'a> {
    mode: Mode,
    version: u32,
    data: &'a [u8],
    offset: usize,
    out: Vec<u8>,
    resources: Option<&'a dyn ResourceManager>,
    optional_depth: u32,
    export: bool,
    host_width: HostWidth,
    names: Vec<&'static str>,
    tree: Vec<StructuredObject>,
    error: Option<SerialiseError>,
}

impl<'a> Serialiser<'a> {
    fn new(mode: Mode, version: u32, data: &'a [u8]) -> Self {
        Self {
            mode,
            version,
            data,
            offset: 0,
            out: Vec::new(),
            resources: None,
            optional_depth: 0,
            export: mode == Mode::Structurising,
            host_width: HostWidth::Native,
            names: Vec::new(),
            tree: vec![StructuredObject::new("", "root")],
            error: None,
        }
    }

    pub fn writer() -> Self {
        Self::new(Mode::Writing, CURRENT_VERSION, &[])
    }

    /// A writer producing streams as an older build would have written them.
    /// Only useful for compatibility fixtures.
    pub fn writer_for_version(version: u32) -> Self {
        Self::new(Mode::Writing, version, &[])
    }

    pub fn reader(data: &'a [u8], version: u32) -> Result<Self, SerialiseError> {
        if !(MIN_SUPPORTED_VERSION..=CURRENT_VERSION).contains(&version) {
            return Err(SerialiseError::UnsupportedVersion {
                version,
                min: MIN_SUPPORTED_VERSION,
                max: CURRENT_VERSION,
            });
        }
        Ok(Self::new(Mode::Reading, version, data))
    }

    /// Describe live structs without producing bytes.
    pub fn structuriser() -> Self {
        Self::new(Mode::Structurising, CURRENT_VERSION, &[])
    }

    pub fn with_resources(mut self, resources: &'a dyn ResourceManager) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Build a structured tree while reading. Handles are then left
    /// unresolved.
    pub fn with_structured_export(mut self) -> Self {
        self.export = true;
        self
    }

    pub fn with_host_width(mut self, width: HostWidth) -> Self {
        self.host_width = width;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_writing(&self) -> bool {
        self.mode == Mode::Writing
    }

    pub fn is_reading(&self) -> bool {
        self.mode == Mode::Reading
    }

    pub fn is_structurising(&self) -> bool {
        self.export
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn version_at_least(&self, version: u32) -> bool {
        self.version >= version
    }

    pub fn resources(&self) -> Option<&'a dyn ResourceManager> {
        self.resources
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Record a soft error. Only the first one is kept, and once set every
    /// further read yields default values without consuming data.
    pub fn set_error(&mut self, err: SerialiseError) {
        if self.error.is_none() {
            error!("{}", err);
            self.error = Some(err);
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&SerialiseError> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<SerialiseError> {
        self.error.take()
    }

    /// Mark resources referenced until the guard drops as possibly absent.
    pub fn optional_resources(&mut self) -> OptionalResources<'_, 'a> {
        OptionalResources::enter(self)
    }

    pub fn optional_resources_active(&self) -> bool {
        self.optional_depth > 0
    }

    pub(crate) fn optional_depth_mut(&mut self) -> &mut u32 {
        &mut self.optional_depth
    }

    pub fn serialise<T: Serialise>(
        &mut self,
        name: &'static str,
        value: &mut T,
    ) -> Result<Field<'_, 'a>, SerialiseError> {
        self.serialise_with(name, value, StructArgs::default())
    }

    pub fn serialise_with<T: Serialise>(
        &mut self,
        name: &'static str,
        value: &mut T,
        args: StructArgs,
    ) -> Result<Field<'_, 'a>, SerialiseError> {
        self.begin(name, Cow::Borrowed(T::TYPE_NAME))?;
        let result = value.serialise(self, args);
        self.end();
        result?;
        Ok(Field { ser: self })
    }

    /// A u64 element count followed by the elements.
    pub fn serialise_array<T: Serialise>(
        &mut self,
        name: &'static str,
        values: &mut Vec<T>,
        args: StructArgs,
    ) -> Result<Field<'_, 'a>, SerialiseError> {
        self.serialise_with(name, values, args)
    }

    /// A presence byte followed by the value when present.
    pub fn serialise_nullable<T: Serialise>(
        &mut self,
        name: &'static str,
        value: &mut Option<T>,
        args: StructArgs,
    ) -> Result<Field<'_, 'a>, SerialiseError> {
        self.serialise_with(name, value, args)
    }

    /// Write side of a nullable whose value is known to be present.
    pub(crate) fn serialise_present<T: Serialise>(
        &mut self,
        name: &'static str,
        value: &mut T,
        args: StructArgs,
    ) -> Result<(), SerialiseError> {
        debug_assert!(!self.is_reading(), "serialise_present used while reading");
        self.begin(name, Cow::Borrowed(T::TYPE_NAME))?;
        let result = match self.scalar([1u8]) {
            Ok(_) => value.serialise(self, args),
            Err(err) => Err(err),
        };
        self.end();
        result
    }

    /// An opaque byte buffer with a u64 length.
    pub fn serialise_bytes(
        &mut self,
        name: &'static str,
        bytes: &mut Vec<u8>,
    ) -> Result<Field<'_, 'a>, SerialiseError> {
        self.begin(name, Cow::Borrowed("byte"))?;
        let result = self.bytes(bytes);
        self.end();
        result?;
        Ok(Field { ser: self })
    }

    /// A host-width size, widened to u64 on the wire and narrowed back with
    /// a range check against the host width.
    pub fn serialise_host_size(
        &mut self,
        name: &'static str,
        value: &mut usize,
    ) -> Result<Field<'_, 'a>, SerialiseError> {
        let mut wide = *value as u64;
        if !self.is_reading() {
            self.check_host_size(name, wide)?;
        }
        self.serialise(name, &mut wide)?;
        if self.is_reading() {
            *value = self.narrow(name, wide)?;
        }
        Ok(Field { ser: self }.typed_as("size_t"))
    }

    /// Record a null pointer in the tree without touching the stream.
    pub(crate) fn record_null(&mut self, name: &'static str, type_name: &'static str) {
        if self.is_structurising() {
            let mut obj = StructuredObject::new(name, type_name);
            obj.data = StructuredData::Null;
            if let Some(top) = self.tree.last_mut() {
                top.push_child(obj);
            }
        }
    }

    /// Describe `name` as a live-struct dump.
    pub fn structurise<T: Serialise>(
        mut self,
        name: &'static str,
        value: &mut T,
    ) -> Result<Vec<StructuredObject>, SerialiseError> {
        self.serialise(name, value)?;
        Ok(self.into_structured())
    }

    pub fn encode<T: Serialise>(mut self, name: &'static str, value: &mut T) -> Result<Vec<u8>, SerialiseError> {
        self.serialise(name, value)?;
        Ok(self.into_bytes())
    }

    /// Read one record spanning the whole input.
    pub fn decode<T: Serialise>(mut self, name: &'static str) -> Result<Decoded<T>, SerialiseError> {
        let mut value = T::default();
        self.serialise(name, &mut value)?;
        if self.error.is_none() && self.remaining() > 0 {
            return Err(SerialiseError::TrailingData {
                remaining: self.remaining(),
            });
        }
        let error = self.error.take();
        Ok(Decoded {
            value,
            error,
            structured: self.into_structured(),
        })
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    pub fn into_structured(mut self) -> Vec<StructuredObject> {
        match self.tree.drain(..).next().map(|root| root.data) {
            Some(StructuredData::Struct(children)) => children,
            _ => Vec::new(),
        }
    }

    // ── Primitive plumbing ──

    /// Move a fixed-size scalar through the pass. Returns the bytes that
    /// now hold, which for writes and structurising is the input.
    pub(crate) fn scalar<const N: usize>(&mut self, bytes: [u8; N]) -> Result<[u8; N], SerialiseError> {
        match self.mode {
            Mode::Writing => {
                self.out.extend_from_slice(&bytes);
                Ok(bytes)
            }
            Mode::Structurising => Ok(bytes),
            Mode::Reading => {
                if self.error.is_some() {
                    return Ok([0; N]);
                }
                let mut buf = [0u8; N];
                buf.copy_from_slice(self.take(N)?);
                Ok(buf)
            }
        }
    }

    pub(crate) fn bytes(&mut self, bytes: &mut Vec<u8>) -> Result<(), SerialiseError> {
        let field = self.current_field();
        let len = u64::from_le_bytes(self.scalar((bytes.len() as u64).to_le_bytes())?);
        if self.is_reading() {
            let len = self.narrow(field, len)?;
            if len > self.remaining() && self.error.is_none() {
                return Err(SerialiseError::InvalidLength {
                    field,
                    length: len as u64,
                });
            }
            bytes.clear();
            if self.error.is_none() {
                bytes.extend_from_slice(self.take(len)?);
            }
        } else if self.is_writing() {
            self.out.extend_from_slice(bytes);
        }
        self.record(|| StructuredData::Bytes(bytes.clone()));
        Ok(())
    }

    /// Validate an element count read from the stream. Every element takes
    /// at least one byte, so a count past the end is corrupt.
    pub(crate) fn check_count(&self, count: u64) -> Result<usize, SerialiseError> {
        if count > self.remaining() as u64 {
            return Err(SerialiseError::InvalidLength {
                field: self.current_field(),
                length: count,
            });
        }
        Ok(count as usize)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], SerialiseError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(SerialiseError::UnexpectedEof {
                field: self.current_field(),
                wanted: len,
                remaining,
            });
        }
        let data: &'a [u8] = self.data;
        let slice = &data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn check_host_size(&self, field: &'static str, value: u64) -> Result<(), SerialiseError> {
        if value > self.host_width.limit() {
            return Err(SerialiseError::ValueOutOfRange {
                field,
                value,
                bits: self.host_width.bits(),
            });
        }
        Ok(())
    }

    fn narrow(&self, field: &'static str, value: u64) -> Result<usize, SerialiseError> {
        self.check_host_size(field, value)?;
        usize::try_from(value).map_err(|_| SerialiseError::ValueOutOfRange {
            field,
            value,
            bits: usize::BITS,
        })
    }

    pub(crate) fn current_field(&self) -> &'static str {
        self.names.last().copied().unwrap_or("<root>")
    }

    // ── Structured tree ──

    /// Nothing is pushed when the nesting limit is hit, so the caller must
    /// not pair a failed `begin` with `end`.
    fn begin(
        &mut self,
        name: &'static str,
        type_name: Cow<'static, str>,
    ) -> Result<(), SerialiseError> {
        if self.names.len() >= MAX_NESTING_DEPTH {
            return Err(SerialiseError::TooDeep {
                field: name,
                depth: self.names.len() + 1,
            });
        }
        self.names.push(name);
        if self.is_structurising() {
            self.tree.push(StructuredObject::new(name, type_name));
        }
        Ok(())
    }

    fn end(&mut self) {
        self.names.pop();
        if self.is_structurising() && self.tree.len() > 1 {
            if let Some(obj) = self.tree.pop() {
                if let Some(parent) = self.tree.last_mut() {
                    parent.push_child(obj);
                }
            }
        }
    }

    /// Set the data of the entry being serialised.
    pub(crate) fn record(&mut self, data: impl FnOnce() -> StructuredData) {
        if self.is_structurising() && self.tree.len() > 1 {
            if let Some(top) = self.tree.last_mut() {
                top.data = data();
            }
        }
    }

    /// Switch the entry being serialised to an array before its elements
    /// are added.
    pub(crate) fn mark_array(&mut self) {
        self.record(|| StructuredData::Array(Vec::new()));
    }

    fn annotate_last(&mut self, f: impl FnOnce(&mut StructuredObject)) {
        if self.is_structurising() {
            if let Some(last) = self.tree.last_mut().and_then(|top| top.last_child_mut()) {
                f(last);
            }
        }
    }
}

/// Handle to the entry just serialised, for display annotations. Has no
/// effect on the bytes.
pub struct Field<'s, 'a> {
    ser: &'s mut Serialiser<'a>,
}

impl<'s, 'a> Field<'s, 'a> {
    /// Keep the entry out of user-facing output.
    pub fn hidden(self) -> Self {
        self.ser.annotate_last(|obj| obj.hidden = true);
        self
    }

    /// Display the entry, and the elements of an array entry, under
    /// another type name.
    pub fn typed_as(self, type_name: impl Into<Cow<'static, str>>) -> Self {
        let type_name = type_name.into();
        self.ser.annotate_last(|obj| {
            if let StructuredData::Array(elements) = &mut obj.data {
                for el in elements {
                    el.type_name = type_name.clone();
                }
            }
            obj.type_name = type_name;
        });
        self
    }
}

// ── Generic containers ──

impl<T: Serialise> Serialise for Vec<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        ser.mark_array();
        let count = u64::from_le_bytes(ser.scalar((self.len() as u64).to_le_bytes())?);
        if ser.is_reading() {
            let count = ser.check_count(count)?;
            self.clear();
            self.reserve(count);
            for _ in 0..count {
                let mut el = T::default();
                ser.serialise_with("$el", &mut el, args)?;
                self.push(el);
            }
        } else {
            for el in self.iter_mut() {
                ser.serialise_with("$el", el, args)?;
            }
        }
        Ok(())
    }
}

impl<T: Serialise> Serialise for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        let [present] = ser.scalar([u8::from(self.is_some())])?;
        if ser.is_reading() {
            *self = match present {
                0 => None,
                1 => {
                    let mut value = T::default();
                    value.serialise(ser, args)?;
                    Some(value)
                }
                value => {
                    return Err(SerialiseError::InvalidBool {
                        field: ser.current_field(),
                        value,
                    })
                }
            };
        } else if let Some(value) = self {
            value.serialise(ser, args)?;
        }
        if self.is_none() {
            ser.record(|| StructuredData::Null);
        }
        Ok(())
    }
}

impl<T: Serialise> Serialise for Box<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        self.as_mut().serialise(ser, args)
    }
}

// ── Scalars ──

macro_rules! impl_unsigned {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Serialise for $ty {
            const TYPE_NAME: &'static str = $name;

            fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
                *self = <$ty>::from_le_bytes(ser.scalar(self.to_le_bytes())?);
                let value = *self;
                ser.record(|| StructuredData::Unsigned(u64::from(value)));
                Ok(())
            }
        }
    )*};
}

macro_rules! impl_signed {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Serialise for $ty {
            const TYPE_NAME: &'static str = $name;

            fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
                *self = <$ty>::from_le_bytes(ser.scalar(self.to_le_bytes())?);
                let value = *self;
                ser.record(|| StructuredData::Signed(i64::from(value)));
                Ok(())
            }
        }
    )*};
}

impl_unsigned!(u8 => "uint8_t", u32 => "uint32_t", u64 => "uint64_t");
impl_signed!(i32 => "int32_t", i64 => "int64_t");

impl Serialise for f32 {
    const TYPE_NAME: &'static str = "float";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        *self = f32::from_le_bytes(ser.scalar(self.to_le_bytes())?);
        let value = *self;
        ser.record(|| StructuredData::Float(f64::from(value)));
        Ok(())
    }
}

impl Serialise for [f32; 4] {
    const TYPE_NAME: &'static str = "float";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
        ser.mark_array();
        for el in self.iter_mut() {
            ser.serialise_with("$el", el, args)?;
        }
        Ok(())
    }
}

impl Serialise for bool {
    const TYPE_NAME: &'static str = "bool";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        let [byte] = ser.scalar([u8::from(*self)])?;
        *self = match byte {
            0 => false,
            1 => true,
            value => {
                return Err(SerialiseError::InvalidBool {
                    field: ser.current_field(),
                    value,
                })
            }
        };
        let value = *self;
        ser.record(|| StructuredData::Bool(value));
        Ok(())
    }
}

impl Serialise for String {
    const TYPE_NAME: &'static str = "string";

    fn serialise(&mut self, ser: &mut Serialiser<'_>, _args: StructArgs) -> Result<(), SerialiseError> {
        let field = ser.current_field();
        let len = u32::try_from(self.len()).map_err(|_| SerialiseError::ValueOutOfRange {
            field,
            value: self.len() as u64,
            bits: 32,
        })?;
        let len = u32::from_le_bytes(ser.scalar(len.to_le_bytes())?);
        if ser.is_reading() {
            let len = len as usize;
            if len > ser.remaining() && !ser.has_error() {
                return Err(SerialiseError::InvalidLength {
                    field,
                    length: len as u64,
                });
            }
            self.clear();
            if !ser.has_error() {
                let bytes = ser.take(len)?;
                let text = std::str::from_utf8(bytes).map_err(|_| SerialiseError::InvalidUtf8 { field })?;
                self.push_str(text);
            }
        } else if ser.is_writing() {
            ser.out.extend_from_slice(self.as_bytes());
        }
        ser.record(|| StructuredData::String(self.clone()));
        Ok(())
    }
}
