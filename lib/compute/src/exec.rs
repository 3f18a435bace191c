// SPDX-FileCopyrightText: Copyright (c) 2024-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Execution context: the per-call argument bindings handed to a kernel.

use std::collections::{BTreeMap, HashMap};

use zeropad_memory::MemoryObject;

/// Named argument slot of a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArgSlot {
    Src,
    Dst,
}

/// What a kernel may do with a bound memory argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub fn is_mutable(&self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

/// A borrowed memory object tagged with the kernel's access intent.
///
/// The intent is a statement about device-side use; the host only holds a
/// shared borrow.
#[derive(Debug, Clone, Copy)]
pub struct MemoryArg<'a> {
    pub memory: &'a MemoryObject,
    pub access: Access,
}

/// Identifier of an abstract kernel resource.
pub type ResourceId = u64;

/// Opaque handle to a concrete device resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceResource(pub u64);

/// Maps abstract kernel resources to the device resources backing them.
///
/// Owned by the engine alongside the kernel it belongs to and borrowed for
/// each execution.
#[derive(Debug, Clone, Default)]
pub struct ResourceMapper {
    resources: HashMap<ResourceId, DeviceResource>,
}

impl ResourceMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, id: ResourceId, resource: DeviceResource) -> Self {
        self.resources.insert(id, resource);
        self
    }

    pub fn insert(&mut self, id: ResourceId, resource: DeviceResource) -> Option<DeviceResource> {
        self.resources.insert(id, resource)
    }

    pub fn get(&self, id: ResourceId) -> Option<DeviceResource> {
        self.resources.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Arguments and resources for one kernel execution.
///
/// Built fresh for every call and dropped when the call returns.
#[derive(Debug)]
pub struct ExecContext<'a> {
    args: BTreeMap<ArgSlot, MemoryArg<'a>>,
    mapper: &'a ResourceMapper,
}

impl<'a> ExecContext<'a> {
    pub fn new(mapper: &'a ResourceMapper) -> Self {
        Self {
            args: BTreeMap::new(),
            mapper,
        }
    }

    /// Bind the single in-place argument of the zero-pad kernel.
    ///
    /// The kernel writes zeros straight into the tensor's padding, so the
    /// source slot is bound read-write.
    pub fn for_zero_pad(memory: &'a MemoryObject, mapper: &'a ResourceMapper) -> Self {
        Self::new(mapper).with_arg(ArgSlot::Src, memory, Access::ReadWrite)
    }

    pub fn with_arg(mut self, slot: ArgSlot, memory: &'a MemoryObject, access: Access) -> Self {
        self.args.insert(slot, MemoryArg { memory, access });
        self
    }

    pub fn arg(&self, slot: ArgSlot) -> Option<&MemoryArg<'a>> {
        self.args.get(&slot)
    }

    /// All bound arguments in slot order.
    pub fn args(&self) -> impl Iterator<Item = (ArgSlot, &MemoryArg<'a>)> {
        self.args.iter().map(|(slot, arg)| (*slot, arg))
    }

    pub fn num_args(&self) -> usize {
        self.args.len()
    }

    pub fn resource_mapper(&self) -> &'a ResourceMapper {
        self.mapper
    }
}
