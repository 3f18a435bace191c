// SPDX-FileCopyrightText: Copyright (c) 2024-2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! System memory storage.

use super::{MemoryDescription, Result, StorageError, StorageKind, actions};
use std::any::Any;

/// Zero-initialized system memory.
#[derive(Debug)]
pub struct SystemStorage {
    data: Box<[u8]>,
}

impl SystemStorage {
    /// Allocate new system memory of the given size.
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(StorageError::AllocationFailed(
                "zero-sized allocations are not supported".into(),
            ));
        }

        Ok(Self {
            data: vec![0u8; len].into_boxed_slice(),
        })
    }
}

impl MemoryDescription for SystemStorage {
    fn addr(&self) -> usize {
        self.data.as_ptr() as usize
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::System
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl actions::Memset for SystemStorage {
    fn memset(&mut self, value: u8, offset: usize, size: usize) -> Result<()> {
        let end = offset
            .checked_add(size)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                StorageError::OperationFailed("memset: offset + size > storage size".into())
            })?;
        self.data[offset..end].fill(value);
        Ok(())
    }
}

impl actions::Slice for SystemStorage {
    fn as_slice(&self) -> Result<&[u8]> {
        Ok(&self.data)
    }
}
