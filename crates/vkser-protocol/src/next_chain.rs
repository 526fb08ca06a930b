//! Serialisation of `pNext` extension chains.
//!
//! After its own fields, every extensible struct writes its `sType`, then
//! for the first serialisable node of its chain a hidden `nextType` tag and
//! the node itself. The node writes its own chain the same way, so a chain
//! of N nodes nests N deep. A null `nextType` ends the chain.
//!
//! Nodes of known types this build cannot serialise are dropped when
//! writing. Reading one stops the chain: its layout is unknown, so nothing
//! after it can be parsed.

use std::cell::Cell;
use std::fmt;
use std::ptr;

use ash::vk;
use tracing::{error, trace, warn};

use crate::error::SerialiseError;
use crate::serialiser::{Serialise, Serialiser};
use crate::structs::*;
use crate::stype::StructureType;
use crate::validity::StructArgs;

/// A struct that carries a `pNext` chain.
pub trait Extensible: Serialise + Sized {
    const STRUCTURE_TYPE: StructureType;

    fn next(&self) -> &Next;
    fn next_mut(&mut self) -> &mut Next;
    fn into_node(self: Box<Self>) -> ChainNode;
    fn from_node(node: &ChainNode) -> Option<&Self>;
}

/// Node of a known structure type that has no serialiser here, as handed in
/// by an interception layer. Skipped when writing.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueStruct {
    pub s_type: StructureType,
    pub next: Next,
}

macro_rules! chain_nodes {
    ($($(#[$attr:meta])* $ty:ident,)*) => {
        /// One link of a `pNext` chain.
        #[derive(Debug, Clone, PartialEq)]
        pub enum ChainNode {
            $($(#[$attr])* $ty(Box<$ty>),)*
            Opaque(Box<OpaqueStruct>),
        }

        impl ChainNode {
            pub fn structure_type(&self) -> StructureType {
                match self {
                    $($(#[$attr])* ChainNode::$ty(_) => StructureType::$ty,)*
                    ChainNode::Opaque(node) => node.s_type,
                }
            }

            pub fn next(&self) -> &Next {
                match self {
                    $($(#[$attr])* ChainNode::$ty(node) => &node.next,)*
                    ChainNode::Opaque(node) => &node.next,
                }
            }

            pub fn next_mut(&mut self) -> &mut Next {
                match self {
                    $($(#[$attr])* ChainNode::$ty(node) => &mut node.next,)*
                    ChainNode::Opaque(node) => &mut node.next,
                }
            }

            fn serialise_payload(&mut self, ser: &mut Serialiser<'_>, args: StructArgs) -> Result<(), SerialiseError> {
                match self {
                    $($(#[$attr])* ChainNode::$ty(node) => ser.serialise_present("pNext", node.as_mut(), args),)*
                    ChainNode::Opaque(_) => Ok(()),
                }
            }
        }

        $(
            $(#[$attr])*
            impl Extensible for $ty {
                const STRUCTURE_TYPE: StructureType = StructureType::$ty;

                fn next(&self) -> &Next {
                    &self.next
                }

                fn next_mut(&mut self) -> &mut Next {
                    &mut self.next
                }

                fn into_node(self: Box<Self>) -> ChainNode {
                    ChainNode::$ty(self)
                }

                fn from_node(node: &ChainNode) -> Option<&Self> {
                    match node {
                        ChainNode::$ty(node) => Some(&**node),
                        _ => None,
                    }
                }
            }
        )*
    };
}

chain_nodes! {
    MemoryBarrier,
    BufferMemoryBarrier,
    ImageMemoryBarrier,
    BufferCreateInfo,
    ImageCreateInfo,
    ImageViewCreateInfo,
    ImageFormatListCreateInfo,
    MemoryAllocateInfo,
    MemoryDedicatedAllocateInfo,
    ShaderModuleCreateInfo,
    PipelineCacheCreateInfo,
    WriteDescriptorSet,
    CopyDescriptorSet,
    WriteDescriptorSetInlineUniformBlock,
    GraphicsPipelineCreateInfo,
    ComputePipelineCreateInfo,
    PipelineShaderStageCreateInfo,
    PipelineVertexInputStateCreateInfo,
    PipelineInputAssemblyStateCreateInfo,
    PipelineTessellationStateCreateInfo,
    PipelineViewportStateCreateInfo,
    PipelineRasterizationStateCreateInfo,
    PipelineMultisampleStateCreateInfo,
    PipelineDepthStencilStateCreateInfo,
    PipelineColorBlendStateCreateInfo,
    PipelineDynamicStateCreateInfo,
    PipelineRenderingCreateInfo,
    GraphicsPipelineLibraryCreateInfoExt,
    SubmitInfo,
    TimelineSemaphoreSubmitInfo,
    #[cfg(feature = "win32")]
    ImportMemoryWin32HandleInfoKhr,
    #[cfg(feature = "win32")]
    ExportMemoryWin32HandleInfoKhr,
}

impl ChainNode {
    pub fn opaque(s_type: StructureType) -> Self {
        ChainNode::Opaque(Box::new(OpaqueStruct {
            s_type,
            next: Next::new(),
        }))
    }

    pub fn downcast_ref<T: Extensible>(&self) -> Option<&T> {
        T::from_node(self)
    }
}

impl<T: Extensible> From<T> for ChainNode {
    fn from(value: T) -> Self {
        Box::new(value).into_node()
    }
}

/// Owned, singly linked `pNext` chain.
///
/// Dropping, cloning, comparing and printing walk the chain node by node,
/// so long chains do not recurse.
#[derive(Default)]
pub struct Next(Option<ChainNode>);

impl Next {
    pub fn new() -> Self {
        Next(None)
    }

    /// Link `nodes` in order. Any chain already hanging off a node is
    /// replaced.
    pub fn chain(nodes: impl IntoIterator<Item = ChainNode>) -> Self {
        let nodes: Vec<ChainNode> = nodes.into_iter().collect();
        let mut head = Next::new();
        for mut node in nodes.into_iter().rev() {
            *node.next_mut() = head;
            head = Next(Some(node));
        }
        head
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn head(&self) -> Option<&ChainNode> {
        self.0.as_ref()
    }

    pub fn head_mut(&mut self) -> Option<&mut ChainNode> {
        self.0.as_mut()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { cursor: self.head() }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn structure_types(&self) -> Vec<StructureType> {
        self.iter().map(ChainNode::structure_type).collect()
    }

    /// First node of type `T` anywhere in the chain.
    pub fn find<T: Extensible>(&self) -> Option<&T> {
        self.iter().find_map(T::from_node)
    }

    pub fn take(&mut self) -> Next {
        Next(self.0.take())
    }
}

impl<T: Extensible> From<T> for Next {
    fn from(value: T) -> Self {
        Next(Some(ChainNode::from(value)))
    }
}

thread_local! {
    /// The link a chain walk is currently stepping over. Inside a node's
    /// derived impls it stands for the rest of the chain, which the walk
    /// handles itself.
    static DETACHED: Cell<*const Next> = const { Cell::new(ptr::null()) };
}

/// Marks a node's own link as detached for as long as it lives.
struct Detach {
    prev: *const Next,
}

impl Detach {
    fn link(node: &ChainNode) -> Self {
        let link: *const Next = node.next();
        Detach {
            prev: DETACHED.with(|d| d.replace(link)),
        }
    }
}

impl Drop for Detach {
    fn drop(&mut self) {
        DETACHED.with(|d| d.set(self.prev));
    }
}

fn is_detached(link: &Next) -> bool {
    DETACHED.with(|d| ptr::eq(d.get(), link))
}

impl Clone for Next {
    fn clone(&self) -> Self {
        if is_detached(self) {
            return Next::new();
        }
        Next::chain(self.iter().map(|node| {
            let _link = Detach::link(node);
            node.clone()
        }))
    }
}

impl PartialEq for Next {
    fn eq(&self, other: &Self) -> bool {
        if is_detached(self) {
            return true;
        }
        let mut lhs = self.iter();
        let mut rhs = other.iter();
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) => {
                    let _link = Detach::link(a);
                    if a != b {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

struct Link<'n>(&'n ChainNode);

impl fmt::Debug for Link<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let _link = Detach::link(self.0);
        fmt::Debug::fmt(self.0, f)
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_detached(self) {
            return f.write_str("..");
        }
        f.debug_list().entries(self.iter().map(Link)).finish()
    }
}

impl Drop for Next {
    fn drop(&mut self) {
        let mut cursor = self.0.take();
        while let Some(mut node) = cursor {
            cursor = node.next_mut().0.take();
        }
    }
}

pub struct Iter<'n> {
    cursor: Option<&'n ChainNode>,
}

impl<'n> Iterator for Iter<'n> {
    type Item = &'n ChainNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor?;
        self.cursor = node.next().head();
        Some(node)
    }
}

/// Reads one node of the given type into a chain.
type ReadNode = fn(&mut Serialiser<'_>, &mut Next, StructArgs) -> Result<(), SerialiseError>;

enum Handler {
    Supported(ReadNode),
    Unsupported,
}

/// The registration table. There is no wildcard arm: a new structure type
/// does not compile until it is given a handler or declared unsupported.
fn handler(s_type: StructureType) -> Handler {
    use StructureType as S;

    match s_type {
        S::MemoryBarrier => Handler::Supported(read_node::<MemoryBarrier>),
        S::BufferMemoryBarrier => Handler::Supported(read_node::<BufferMemoryBarrier>),
        S::ImageMemoryBarrier => Handler::Supported(read_node::<ImageMemoryBarrier>),
        S::BufferCreateInfo => Handler::Supported(read_node::<BufferCreateInfo>),
        S::ImageCreateInfo => Handler::Supported(read_node::<ImageCreateInfo>),
        S::ImageViewCreateInfo => Handler::Supported(read_node::<ImageViewCreateInfo>),
        S::ImageFormatListCreateInfo => Handler::Supported(read_node::<ImageFormatListCreateInfo>),
        S::MemoryAllocateInfo => Handler::Supported(read_node::<MemoryAllocateInfo>),
        S::MemoryDedicatedAllocateInfo => Handler::Supported(read_node::<MemoryDedicatedAllocateInfo>),
        S::ShaderModuleCreateInfo => Handler::Supported(read_node::<ShaderModuleCreateInfo>),
        S::PipelineCacheCreateInfo => Handler::Supported(read_node::<PipelineCacheCreateInfo>),
        S::WriteDescriptorSet => Handler::Supported(read_node::<WriteDescriptorSet>),
        S::CopyDescriptorSet => Handler::Supported(read_node::<CopyDescriptorSet>),
        S::WriteDescriptorSetInlineUniformBlock => {
            Handler::Supported(read_node::<WriteDescriptorSetInlineUniformBlock>)
        }
        S::GraphicsPipelineCreateInfo => Handler::Supported(read_node::<GraphicsPipelineCreateInfo>),
        S::ComputePipelineCreateInfo => Handler::Supported(read_node::<ComputePipelineCreateInfo>),
        S::PipelineShaderStageCreateInfo => Handler::Supported(read_node::<PipelineShaderStageCreateInfo>),
        S::PipelineVertexInputStateCreateInfo => {
            Handler::Supported(read_node::<PipelineVertexInputStateCreateInfo>)
        }
        S::PipelineInputAssemblyStateCreateInfo => {
            Handler::Supported(read_node::<PipelineInputAssemblyStateCreateInfo>)
        }
        S::PipelineTessellationStateCreateInfo => {
            Handler::Supported(read_node::<PipelineTessellationStateCreateInfo>)
        }
        S::PipelineViewportStateCreateInfo => Handler::Supported(read_node::<PipelineViewportStateCreateInfo>),
        S::PipelineRasterizationStateCreateInfo => {
            Handler::Supported(read_node::<PipelineRasterizationStateCreateInfo>)
        }
        S::PipelineMultisampleStateCreateInfo => {
            Handler::Supported(read_node::<PipelineMultisampleStateCreateInfo>)
        }
        S::PipelineDepthStencilStateCreateInfo => {
            Handler::Supported(read_node::<PipelineDepthStencilStateCreateInfo>)
        }
        S::PipelineColorBlendStateCreateInfo => {
            Handler::Supported(read_node::<PipelineColorBlendStateCreateInfo>)
        }
        S::PipelineDynamicStateCreateInfo => Handler::Supported(read_node::<PipelineDynamicStateCreateInfo>),
        S::PipelineRenderingCreateInfo => Handler::Supported(read_node::<PipelineRenderingCreateInfo>),
        S::GraphicsPipelineLibraryCreateInfoExt => {
            Handler::Supported(read_node::<GraphicsPipelineLibraryCreateInfoExt>)
        }
        S::SubmitInfo => Handler::Supported(read_node::<SubmitInfo>),
        S::TimelineSemaphoreSubmitInfo => Handler::Supported(read_node::<TimelineSemaphoreSubmitInfo>),

        #[cfg(feature = "win32")]
        S::ImportMemoryWin32HandleInfoKhr => Handler::Supported(read_node::<ImportMemoryWin32HandleInfoKhr>),
        #[cfg(feature = "win32")]
        S::ExportMemoryWin32HandleInfoKhr => Handler::Supported(read_node::<ExportMemoryWin32HandleInfoKhr>),
        #[cfg(not(feature = "win32"))]
        S::ImportMemoryWin32HandleInfoKhr | S::ExportMemoryWin32HandleInfoKhr => Handler::Unsupported,

        S::ExportMemoryAllocateInfo
        | S::ExternalMemoryBufferCreateInfo
        | S::ExternalMemoryImageCreateInfo
        | S::ImportMemoryFdInfoKhr
        | S::SwapchainCounterCreateInfoExt => Handler::Unsupported,
    }
}

impl StructureType {
    /// Whether this build has a serialiser for the type.
    pub fn is_supported(self) -> bool {
        matches!(handler(self), Handler::Supported(_))
    }
}

/// Serialise the `sType` and `pNext` of a struct of type `expected`.
pub fn serialise_next(
    ser: &mut Serialiser<'_>,
    expected: StructureType,
    next: &mut Next,
    args: StructArgs,
) -> Result<(), SerialiseError> {
    let mut s_type = expected.to_vk();
    ser.serialise("sType", &mut s_type)?;
    if ser.is_reading() && !ser.has_error() && s_type != expected.to_vk() {
        warn!(
            "{} recorded with sType {:?}, treating it as {:?}",
            expected.name(),
            s_type,
            expected.to_vk()
        );
    }

    let args = args.for_chain();
    if ser.is_reading() {
        read_next(ser, next, args)
    } else {
        write_next(ser, next, args)
    }
}

fn write_next(ser: &mut Serialiser<'_>, next: &mut Next, args: StructArgs) -> Result<(), SerialiseError> {
    let mut cursor = next.head_mut();
    while let Some(node) = cursor {
        match node {
            ChainNode::Opaque(opaque) => {
                error!(
                    "{} has no serialiser in this build, dropping it from the next chain",
                    opaque.s_type.name()
                );
                cursor = opaque.next.head_mut();
            }
            supported => {
                let s_type = supported.structure_type();
                trace!(structure = s_type.name(), "writing next chain node");
                let mut tag = Some(s_type.to_vk());
                ser.serialise("nextType", &mut tag)?.hidden();
                return supported.serialise_payload(ser, args);
            }
        }
    }

    let mut tag: Option<vk::StructureType> = None;
    ser.serialise("nextType", &mut tag)?.hidden();
    ser.record_null("pNext", "void *");
    Ok(())
}

fn read_next(ser: &mut Serialiser<'_>, next: &mut Next, args: StructArgs) -> Result<(), SerialiseError> {
    *next = Next::new();

    let mut tag: Option<vk::StructureType> = None;
    ser.serialise("nextType", &mut tag)?.hidden();
    let Some(raw) = tag else {
        ser.record_null("pNext", "void *");
        return Ok(());
    };

    let s_type = StructureType::try_from(raw)
        .map_err(|raw| SerialiseError::UnknownStructureType(raw.as_raw()))?;
    trace!(structure = s_type.name(), "reading next chain node");

    match handler(s_type) {
        Handler::Supported(read) => read(ser, next, args),
        Handler::Unsupported => {
            ser.record_null("pNext", s_type.name());
            ser.set_error(SerialiseError::UnsupportedStructure { name: s_type.name() });
            Ok(())
        }
    }
}

fn read_node<T: Extensible>(ser: &mut Serialiser<'_>, next: &mut Next, args: StructArgs) -> Result<(), SerialiseError> {
    let mut node: Option<Box<T>> = None;
    ser.serialise_nullable("pNext", &mut node, args)?;
    next.0 = node.map(|node| node.into_node());
    Ok(())
}
