// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Short textual renderings of a descriptor for verbose output.

use std::fmt::Write;

use super::desc::{FormatKind, MemoryDesc};
use super::inspect::LayoutInspect;

/// Upper bound on the length of a rendered string.
pub const MAX_RENDER_LEN: usize = 64;

/// Render the format of `desc`, e.g. `f32::blocked:aBcd16b:f0`.
pub fn format_str(desc: &MemoryDesc) -> String {
    let tag = match desc.format_kind() {
        FormatKind::Blocked => format_tag(desc).unwrap_or_else(|| "any".to_string()),
        FormatKind::Any | FormatKind::Opaque => "any".to_string(),
    };
    bounded(format!(
        "{}::{}:{}:f0",
        desc.data_type(),
        desc.format_kind(),
        tag
    ))
}

/// Render the logical dimensions of `desc`, e.g. `2x17x5x5`.
pub fn dims_str(desc: &MemoryDesc) -> String {
    let mut out = String::new();
    for (i, d) in desc.dims().iter().enumerate() {
        if i > 0 {
            out.push('x');
        }
        let _ = write!(out, "{d}");
    }
    bounded(out)
}

/// Letters for the outer dimensions ordered by decreasing stride, upper-case
/// when tiled, followed by one `<size><letter>` per inner block.
///
/// `None` when the blocking description does not match the rank.
fn format_tag(desc: &MemoryDesc) -> Option<String> {
    let blocking = desc.blocking();
    let strides = blocking.strides.get(..desc.ndims())?;

    let mut order: Vec<usize> = (0..desc.ndims()).collect();
    // stable: equal strides keep logical order
    order.sort_by(|&a, &b| strides[b].cmp(&strides[a]));

    let mut tag = String::with_capacity(2 * desc.ndims());
    for d in order {
        let letter = dim_letter(d)?;
        if blocking.is_blocked_dim(d) {
            tag.push(letter.to_ascii_uppercase());
        } else {
            tag.push(letter);
        }
    }
    for (blk, &idx) in blocking.inner_blks.iter().zip(&blocking.inner_idxs) {
        let _ = write!(tag, "{}{}", blk, dim_letter(idx)?);
    }
    Some(tag)
}

fn dim_letter(dim: usize) -> Option<char> {
    u8::try_from(dim).ok().filter(|&d| d < 26).map(|d| (b'a' + d) as char)
}

fn bounded(mut s: String) -> String {
    if s.len() > MAX_RENDER_LEN {
        let mut end = MAX_RENDER_LEN;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}
