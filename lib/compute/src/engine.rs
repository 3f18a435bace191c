// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Collaborator traits implemented per device family.
//!
//! Engines own a precompiled zero-pad kernel and the resource mapper that
//! goes with it. Both are resolved on every call and shared across streams,
//! so implementations must make resolution thread safe.

use std::fmt::Debug;

use zeropad_memory::MemoryObject;

use crate::error::{DeviceError, ZeroPadError};
use crate::exec::ResourceMapper;

/// A precompiled kernel that zeroes the padding elements of one tensor.
pub trait ZeroPadKernel: Send + Sync + Debug {
    /// Implementation name, reported in verbose records.
    fn name(&self) -> &str;
}

/// A device engine able to run the specialized zero-pad kernel.
pub trait ComputeEngine: Send + Sync + Debug {
    /// Look up the cached kernel and its resource mapper.
    ///
    /// Fails when the device cannot provide the kernel, e.g. unsupported
    /// hardware or exhausted resources.
    fn zero_pad_kernel(&self) -> Result<(&dyn ZeroPadKernel, &ResourceMapper), DeviceError>;
}

/// Generic padding used when the specialized kernel cannot handle a tensor.
///
/// Whatever it returns is the result of the padding call.
pub trait FallbackPad: Send + Sync {
    fn zero_pad(&self, memory: &mut MemoryObject) -> Result<(), ZeroPadError>;
}
