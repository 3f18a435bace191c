// SPDX-FileCopyrightText: Copyright (c) 2024-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Storage actions.

use super::{MemoryDescription, StorageError};

/// Extension trait for storage types that support memory setting operations
pub trait Memset: MemoryDescription {
    /// Sets a region of memory to a specific value
    ///
    /// # Arguments
    /// * `value` - The byte value to set
    /// * `offset` - Offset in bytes from the start of the storage
    /// * `size` - Number of bytes to set
    fn memset(&mut self, value: u8, offset: usize, size: usize) -> Result<(), StorageError>;
}

/// Extension trait for host-visible storage that can be read as bytes
pub trait Slice: MemoryDescription + 'static {
    /// Returns a byte slice view of the entire storage region
    fn as_slice(&self) -> Result<&[u8], StorageError>;

    /// Returns a byte slice view of a subregion
    ///
    /// # Arguments
    /// * `offset` - Offset in bytes from the start of the storage
    /// * `len` - Number of bytes to slice
    fn slice(&self, offset: usize, len: usize) -> Result<&[u8], StorageError> {
        let slice = self.as_slice()?;

        slice
            .get(offset..offset.saturating_add(len))
            .filter(|s| s.len() == len)
            .ok_or_else(|| StorageError::Unsupported("slice out of bounds".into()))
    }
}
