// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Generic zero-padding on host memory.

use zeropad_memory::actions::Memset;
use zeropad_memory::padding::{contiguous_runs, padding_offsets};
use zeropad_memory::{LayoutInspect, MemoryObject, SystemStorage};

use crate::engine::FallbackPad;
use crate::error::ZeroPadError;

/// Zeroes padding elements of tensors held in [`SystemStorage`].
///
/// The object must own its buffer exclusively; a buffer shared with another
/// `MemoryObject` is rejected rather than written behind the other owner.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostZeroPad;

impl FallbackPad for HostZeroPad {
    fn zero_pad(&self, memory: &mut MemoryObject) -> Result<(), ZeroPadError> {
        if !memory.is_blocked() {
            return Err(ZeroPadError::UnsupportedLayout(memory.format_kind()));
        }

        let elem = memory.data_type_size();
        let runs = contiguous_runs(&padding_offsets(memory.desc()));
        if runs.is_empty() {
            return Ok(());
        }

        let storage = memory.storage_mut::<SystemStorage>().ok_or_else(|| {
            ZeroPadError::HostStorage("memory is not exclusively owned system storage".into())
        })?;
        for run in &runs {
            storage
                .memset(0, run.start * elem, run.len() * elem)
                .map_err(|e| ZeroPadError::HostStorage(e.to_string()))?;
        }

        tracing::debug!(runs = runs.len(), "zeroed padding on host");
        Ok(())
    }
}
