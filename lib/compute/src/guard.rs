// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Checks that decide whether a tensor needs, and can get, device zero-padding.

use zeropad_memory::LayoutInspect;

use crate::error::ZeroPadError;

/// Element widths the zero-pad kernel is compiled for.
pub const SUPPORTED_ELEMENT_SIZES: [usize; 3] = [1, 2, 4];

/// Outcome of the guard when the layout is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Logical and physical element counts match; nothing to zero.
    AlreadyDense,
    NeedsPadding,
}

/// Whether the layout kind and element width are handled at all.
pub fn is_supported<L: LayoutInspect + ?Sized>(layout: &L) -> bool {
    layout.is_blocked() && SUPPORTED_ELEMENT_SIZES.contains(&layout.data_type_size())
}

/// Whether the tensor has padding elements.
pub fn needs_padding<L: LayoutInspect + ?Sized>(layout: &L) -> bool {
    layout.nelems(false) != layout.nelems(true)
}

/// Run the checks cheapest first: layout kind, then element counts, then
/// element width.
///
/// A dense tensor is accepted before its element width is looked at, so an
/// unsupported width only fails when there is padding to fill.
pub fn check<L: LayoutInspect + ?Sized>(layout: &L) -> Result<GuardDecision, ZeroPadError> {
    if !layout.is_blocked() {
        return Err(ZeroPadError::UnsupportedLayout(layout.format_kind()));
    }

    if !needs_padding(layout) {
        return Ok(GuardDecision::AlreadyDense);
    }

    let size = layout.data_type_size();
    if !SUPPORTED_ELEMENT_SIZES.contains(&size) {
        return Err(ZeroPadError::UnsupportedElementSize(size));
    }

    Ok(GuardDecision::NeedsPadding)
}
