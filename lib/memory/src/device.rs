// SPDX-FileCopyrightText: Copyright (c) 2024-2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Device memory handed out by an engine.

use super::{MemoryDescription, Result, StorageError, StorageKind};
use std::any::Any;

/// A device allocation owned by the engine that produced it.
///
/// The region is only a handle: it is never dereferenced on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRegion {
    ptr: u64,
    len: usize,
    device_id: u32,
}

impl DeviceRegion {
    /// Describe `len` bytes at device address `ptr` on `device_id`.
    pub fn new(ptr: u64, len: usize, device_id: u32) -> Result<Self> {
        if len == 0 {
            return Err(StorageError::AllocationFailed(
                "zero-sized allocations are not supported".into(),
            ));
        }
        if ptr == 0 {
            return Err(StorageError::Unsupported("null device pointer".into()));
        }
        Ok(Self {
            ptr,
            len,
            device_id,
        })
    }

    /// Get the device pointer value.
    pub fn device_ptr(&self) -> u64 {
        self.ptr
    }

    /// Get the device ID this memory is allocated on.
    pub fn device_id(&self) -> u32 {
        self.device_id
    }
}

impl MemoryDescription for DeviceRegion {
    fn addr(&self) -> usize {
        self.ptr as usize
    }

    fn size(&self) -> usize {
        self.len
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::Device(self.device_id)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
