// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use super::{
    Buffer, MemoryDescription, Result, StorageError, create_buffer, desc::MemoryDesc,
    inspect::LayoutInspect,
};

/// A buffer together with the descriptor of the tensor stored in it.
///
/// Padding writes through a shared handle on the device side, so callers
/// hand a `MemoryObject` to the zero-pad path by `&mut` to keep a single
/// writer per object.
#[derive(Debug, Clone)]
pub struct MemoryObject {
    buffer: Buffer,
    desc: MemoryDesc,
}

impl MemoryObject {
    /// Pair `buffer` with `desc`.
    ///
    /// Fails if the buffer cannot hold the padded tensor.
    pub fn new(buffer: Buffer, desc: MemoryDesc) -> Result<Self> {
        let required = desc.size_bytes();
        if buffer.size() < required {
            return Err(StorageError::Unsupported(format!(
                "buffer of {} bytes cannot hold tensor of {} bytes",
                buffer.size(),
                required
            )));
        }
        Ok(Self { buffer, desc })
    }

    /// Wrap concrete storage.
    pub fn from_storage<S: MemoryDescription + 'static>(
        storage: S,
        desc: MemoryDesc,
    ) -> Result<Self> {
        Self::new(create_buffer(storage), desc)
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn desc(&self) -> &MemoryDesc {
        &self.desc
    }

    /// The concrete storage behind the buffer, if it is an `S`.
    pub fn storage<S: MemoryDescription + 'static>(&self) -> Option<&S> {
        self.buffer.as_any().downcast_ref::<S>()
    }

    /// Mutable access to the concrete storage.
    ///
    /// `None` if the storage is not an `S` or the buffer is shared with
    /// another object.
    pub fn storage_mut<S: MemoryDescription + 'static>(&mut self) -> Option<&mut S> {
        self.buffer.get_mut()?.as_any_mut().downcast_mut::<S>()
    }
}

impl LayoutInspect for MemoryObject {
    fn memory_desc(&self) -> &MemoryDesc {
        &self.desc
    }
}
