// SPDX-FileCopyrightText: Copyright (c) 2024-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Read-only layout queries.

use super::desc::{FormatKind, MemoryDesc};

/// Layout questions asked before any device work is issued.
///
/// All queries are pure and defined for every descriptor.
pub trait LayoutInspect {
    /// The descriptor being inspected.
    fn memory_desc(&self) -> &MemoryDesc;

    fn format_kind(&self) -> FormatKind {
        self.memory_desc().format_kind
    }

    fn is_blocked(&self) -> bool {
        self.format_kind() == FormatKind::Blocked
    }

    /// Number of elements, logical (`false`) or physical (`true`).
    ///
    /// A zero-rank descriptor holds no elements.
    fn nelems(&self, with_padding: bool) -> usize {
        let desc = self.memory_desc();
        let dims = if with_padding {
            desc.padded_dims()
        } else {
            desc.dims()
        };
        if dims.is_empty() {
            return 0;
        }
        dims.iter().fold(1usize, |acc, &d| acc.saturating_mul(d))
    }

    /// Element width in bytes.
    fn data_type_size(&self) -> usize {
        self.memory_desc().data_type().size()
    }

    /// Innermost tile sizes, outermost first. Empty when not tiled.
    fn inner_blks(&self) -> &[usize] {
        let desc = self.memory_desc();
        if desc.format_kind != FormatKind::Blocked {
            return &[];
        }
        &desc.blocking().inner_blks
    }
}

impl LayoutInspect for MemoryDesc {
    fn memory_desc(&self) -> &MemoryDesc {
        self
    }
}
