// SPDX-FileCopyrightText: Copyright (c) 2024-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Tensor memory for the zero-padding path.
//!
//! This crate provides:
//! - [`MemoryDesc`]: immutable tensor descriptor (data type, logical and
//!   padded dims, blocking description)
//! - [`LayoutInspect`]: pure layout queries used to decide whether padding work is needed
//! - Storage types behind a single trait for type erasure ([`MemoryDescription`])
//! - [`MemoryObject`]: a buffer paired with the descriptor of the tensor it holds

pub mod actions;
pub mod desc;
pub mod inspect;
pub mod padding;
pub mod render;

mod device;
mod object;
mod system;


pub use desc::{BlockingDesc, DataType, DescError, FormatKind, MAX_DIMS, MemoryDesc};
pub use device::DeviceRegion;
pub use inspect::LayoutInspect;
pub use object::MemoryObject;
pub use system::SystemStorage;

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("allocation failed: {0}")]
    AllocationFailed(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("invalid descriptor: {0}")]
    Desc(#[from] DescError),
}

/// Storage type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    /// System memory
    System,

    /// Accelerator device memory with device ID
    Device(u32),
}

/// Core trait for memory regions that can be type-erased.
///
/// Concrete storage types implement this trait to enable type erasure via
/// `Arc<dyn MemoryDescription>`.
pub trait MemoryDescription: Send + Sync + fmt::Debug {
    /// Base address of the memory region.
    fn addr(&self) -> usize;

    /// Size of the memory region in bytes.
    fn size(&self) -> usize;

    /// Type of storage backing this region.
    fn storage_kind(&self) -> StorageKind;

    /// Enable downcasting to concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable counterpart of [`as_any`](Self::as_any).
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Type-erased memory region.
#[derive(Clone)]
pub struct Buffer(Arc<dyn MemoryDescription>);

impl Buffer {
    /// Mutable access to the region, only while this handle is the sole owner.
    pub fn get_mut(&mut self) -> Option<&mut (dyn MemoryDescription + 'static)> {
        Arc::get_mut(&mut self.0)
    }
}

impl std::ops::Deref for Buffer {
    type Target = dyn MemoryDescription;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("addr", &self.addr())
            .field("size", &self.size())
            .field("kind", &self.storage_kind())
            .finish()
    }
}

/// Helper function to convert concrete storage to type-erased form.
pub fn create_buffer<S: MemoryDescription + 'static>(memory: S) -> Buffer {
    Buffer(Arc::new(memory))
}
