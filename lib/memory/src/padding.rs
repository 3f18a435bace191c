// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Physical placement of padding elements in a blocked layout.

use std::ops::Range;

use super::desc::{FormatKind, MemoryDesc};
use super::inspect::LayoutInspect;

/// Element offsets of every padding element, ascending.
///
/// Empty for non-blocked descriptors and for blocked ones without padding.
pub fn padding_offsets(desc: &MemoryDesc) -> Vec<usize> {
    if desc.format_kind() != FormatKind::Blocked || desc.nelems(false) == desc.nelems(true) {
        return Vec::new();
    }

    let blocking = desc.blocking();
    let ndims = desc.ndims();

    // (block size, element stride inside the tile) per dim, innermost first
    let mut tiles: Vec<Vec<(usize, usize)>> = vec![Vec::new(); ndims];
    let mut inner_stride = 1usize;
    for (&blk, &idx) in blocking.inner_blks.iter().zip(&blocking.inner_idxs).rev() {
        tiles[idx].push((blk, inner_stride));
        inner_stride *= blk;
    }
    let block_per_dim: Vec<usize> = tiles
        .iter()
        .map(|t| t.iter().map(|&(blk, _)| blk).product())
        .collect();

    let offset_of = |coord: &[usize]| -> usize {
        let mut off = 0;
        for d in 0..ndims {
            let bpd = block_per_dim[d];
            off += (coord[d] / bpd) * blocking.strides[d];
            let mut rem = coord[d] % bpd;
            for &(blk, stride) in &tiles[d] {
                off += (rem % blk) * stride;
                rem /= blk;
            }
        }
        off
    };

    let dims = desc.dims();
    let padded = desc.padded_dims();
    let mut offsets = Vec::with_capacity(desc.nelems(true) - desc.nelems(false));
    let mut coord = vec![0usize; ndims];
    'walk: loop {
        if coord.iter().zip(dims).any(|(&c, &d)| c >= d) {
            offsets.push(offset_of(&coord));
        }
        // odometer over the padded extents, last dim fastest
        for d in (0..ndims).rev() {
            coord[d] += 1;
            if coord[d] < padded[d] {
                continue 'walk;
            }
            coord[d] = 0;
        }
        break;
    }

    offsets.sort_unstable();
    offsets
}

/// Merge ascending element offsets into contiguous ranges.
pub fn contiguous_runs(offsets: &[usize]) -> Vec<Range<usize>> {
    let mut runs: Vec<Range<usize>> = Vec::new();
    for &off in offsets {
        match runs.last_mut() {
            Some(run) if run.end == off => run.end += 1,
            _ => runs.push(off..off + 1),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataType;

    #[test]
    fn test_single_block() {
        let desc = MemoryDesc::blocked(DataType::F32, &[3, 5], &[(1, 8)]).unwrap();
        assert_eq!(
            padding_offsets(&desc),
            vec![5, 6, 7, 13, 14, 15, 21, 22, 23]
        );
        assert_eq!(
            contiguous_runs(&padding_offsets(&desc)),
            vec![5..8, 13..16, 21..24]
        );
    }

    #[test]
    fn test_channel_padding_nchw16c() {
        // 17 channels padded to 32: the second channel block holds 1 real channel
        let desc = MemoryDesc::blocked(DataType::F16, &[1, 17, 1, 2], &[(1, 16)]).unwrap();
        let offsets = padding_offsets(&desc);
        assert_eq!(offsets.len(), desc.nelems(true) - desc.nelems(false));
        // layout: [c_blk][w][16c]; block 1, w in 0..2, lanes 1..16
        let expected: Vec<usize> = (33..48).chain(49..64).collect();
        assert_eq!(offsets, expected);
    }

    #[test]
    fn test_dim_split_across_two_blocks() {
        // dim 0 of size 3 tiled as 2a inside 2a: one padded row
        let desc = MemoryDesc::blocked(DataType::S8, &[3, 1], &[(0, 2), (0, 2)]).unwrap();
        assert_eq!(desc.padded_dims(), &[4, 1]);
        // logical row 3 is outer lane 1, inner lane 1
        assert_eq!(padding_offsets(&desc), vec![3]);
    }

    #[test]
    fn test_no_padding() {
        let dense = MemoryDesc::blocked(DataType::F32, &[4, 16], &[(1, 16)]).unwrap();
        assert!(padding_offsets(&dense).is_empty());
        let opaque = MemoryDesc::opaque(DataType::F32, &[3, 5]).unwrap();
        assert!(padding_offsets(&opaque).is_empty());
        assert!(contiguous_runs(&[]).is_empty());
    }
}
