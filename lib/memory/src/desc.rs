// SPDX-FileCopyrightText: Copyright (c) 2024-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Tensor memory descriptors.
//!
//! A [`MemoryDesc`] describes a tensor's logical shape, element type and how
//! its elements are placed in memory. Blocked (tiled) descriptors group the
//! innermost dimensions into fixed-size tiles; when a dimension is not a
//! multiple of its tile size the physical extent is rounded up and the extra
//! elements are padding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum tensor rank supported by a descriptor.
pub const MAX_DIMS: usize = 12;

/// Errors raised while constructing a descriptor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescError {
    #[error("too many dimensions: {0} (max {MAX_DIMS})")]
    TooManyDims(usize),

    #[error("inner block for dimension {idx} is out of range for rank {ndims}")]
    BlockIndexOutOfRange { idx: usize, ndims: usize },

    #[error("inner block size must be positive (dimension {idx})")]
    ZeroBlock { idx: usize },

    #[error("too many inner blocks: {0} (max {MAX_DIMS})")]
    TooManyBlocks(usize),

    #[error("inner blocks overflow the tile size (dimension {idx})")]
    BlockTooLarge { idx: usize },

    #[error("padded tensor does not fit in the address space")]
    TensorTooLarge,

    #[error("descriptor fields disagree with its layout")]
    Inconsistent,
}

/// Element type of a tensor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    F64,
    F32,
    S32,
    F16,
    BF16,
    S8,
    U8,
}

impl DataType {
    /// Width of one element in bytes.
    pub const fn size(&self) -> usize {
        match self {
            DataType::F64 => 8,
            DataType::F32 | DataType::S32 => 4,
            DataType::F16 | DataType::BF16 => 2,
            DataType::S8 | DataType::U8 => 1,
        }
    }
}

/// How the elements of a tensor are arranged in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// Layout has not been decided yet.
    #[strum(serialize = "any")]
    Any,

    /// Strided outer dimensions with optional inner tiles.
    #[strum(serialize = "blocked")]
    Blocked,

    /// Implementation-private layout; nothing can be said about its geometry.
    #[strum(serialize = "opaque")]
    Opaque,
}

/// Blocking description of a tiled layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingDesc {
    /// Stride of each logical dimension across whole tiles, in elements.
    pub strides: Vec<usize>,

    /// Innermost tile sizes, outermost first.
    pub inner_blks: Vec<usize>,

    /// Logical dimension tiled by the matching entry of `inner_blks`.
    pub inner_idxs: Vec<usize>,
}

impl BlockingDesc {
    /// Number of elements in one inner tile.
    pub fn inner_nelems(&self) -> usize {
        self.inner_blks.iter().fold(1usize, |acc, &blk| acc.saturating_mul(blk))
    }

    /// Whether dimension `dim` is split by at least one inner block.
    pub fn is_blocked_dim(&self, dim: usize) -> bool {
        self.inner_idxs.contains(&dim)
    }
}

/// Immutable description of a tensor in memory.
///
/// Deserialized descriptors go back through the constructors and must match
/// what they derive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMemoryDesc")]
pub struct MemoryDesc {
    pub(crate) data_type: DataType,
    pub(crate) dims: Vec<usize>,
    pub(crate) padded_dims: Vec<usize>,
    pub(crate) format_kind: FormatKind,
    pub(crate) blocking: BlockingDesc,
}

impl MemoryDesc {
    /// Create a blocked descriptor with dense outer strides.
    ///
    /// `inner_blocks` lists `(dim, block_size)` pairs from outermost to
    /// innermost tile. Each logical dimension is rounded up to the product
    /// of the blocks that tile it.
    ///
    /// ```
    /// use zeropad_memory::{DataType, LayoutInspect, MemoryDesc};
    ///
    /// // nChw16c with 17 channels: the channel dim is padded to 32
    /// let desc = MemoryDesc::blocked(DataType::F32, &[2, 17, 5, 5], &[(1, 16)]).unwrap();
    /// assert_eq!(desc.padded_dims(), &[2, 32, 5, 5]);
    /// assert_eq!(desc.nelems(false), 850);
    /// assert_eq!(desc.nelems(true), 1600);
    /// ```
    pub fn blocked(
        data_type: DataType,
        dims: &[usize],
        inner_blocks: &[(usize, usize)],
    ) -> Result<Self, DescError> {
        let ndims = dims.len();
        if ndims > MAX_DIMS {
            return Err(DescError::TooManyDims(ndims));
        }
        if inner_blocks.len() > MAX_DIMS {
            return Err(DescError::TooManyBlocks(inner_blocks.len()));
        }

        let mut block_per_dim = vec![1usize; ndims];
        let mut inner_nelems = 1usize;
        for &(idx, blk) in inner_blocks {
            if idx >= ndims {
                return Err(DescError::BlockIndexOutOfRange { idx, ndims });
            }
            if blk == 0 {
                return Err(DescError::ZeroBlock { idx });
            }
            // the tile covers every per-dim product, so checking it is enough
            inner_nelems = inner_nelems.checked_mul(blk).ok_or(DescError::BlockTooLarge { idx })?;
            block_per_dim[idx] *= blk;
        }

        let padded_dims = dims
            .iter()
            .zip(&block_per_dim)
            .map(|(&d, &b)| d.div_ceil(b).checked_mul(b).ok_or(DescError::TensorTooLarge))
            .collect::<Result<Vec<usize>, _>>()?;

        let inner_blks: Vec<usize> = inner_blocks.iter().map(|&(_, blk)| blk).collect();
        let inner_idxs: Vec<usize> = inner_blocks.iter().map(|&(idx, _)| idx).collect();

        // Dense row-major strides over whole tiles, innermost dimension last.
        let mut strides = vec![0usize; ndims];
        let mut stride = inner_nelems;
        for d in (0..ndims).rev() {
            strides[d] = stride;
            stride = stride
                .checked_mul(padded_dims[d] / block_per_dim[d])
                .ok_or(DescError::TensorTooLarge)?;
        }

        Ok(Self {
            data_type,
            dims: dims.to_vec(),
            padded_dims,
            format_kind: FormatKind::Blocked,
            blocking: BlockingDesc {
                strides,
                inner_blks,
                inner_idxs,
            },
        })
    }

    /// Create a plain dense descriptor (no tiles).
    pub fn plain(data_type: DataType, dims: &[usize]) -> Result<Self, DescError> {
        Self::blocked(data_type, dims, &[])
    }

    /// Create a descriptor whose layout is private to some implementation.
    pub fn opaque(data_type: DataType, dims: &[usize]) -> Result<Self, DescError> {
        Self::unblocked(data_type, dims, FormatKind::Opaque)
    }

    /// Create a descriptor whose layout is left for an implementation to pick.
    pub fn any(data_type: DataType, dims: &[usize]) -> Result<Self, DescError> {
        Self::unblocked(data_type, dims, FormatKind::Any)
    }

    fn unblocked(
        data_type: DataType,
        dims: &[usize],
        format_kind: FormatKind,
    ) -> Result<Self, DescError> {
        if dims.len() > MAX_DIMS {
            return Err(DescError::TooManyDims(dims.len()));
        }
        Ok(Self {
            data_type,
            dims: dims.to_vec(),
            padded_dims: dims.to_vec(),
            format_kind,
            blocking: BlockingDesc::default(),
        })
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    /// Logical dimensions.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Physical dimensions, including padding.
    pub fn padded_dims(&self) -> &[usize] {
        &self.padded_dims
    }

    /// Blocking description; empty unless the descriptor is blocked.
    pub fn blocking(&self) -> &BlockingDesc {
        &self.blocking
    }

    /// Size in bytes of the physical (padded) tensor.
    pub fn size_bytes(&self) -> usize {
        if self.padded_dims.is_empty() {
            return 0;
        }
        self.padded_dims
            .iter()
            .fold(self.data_type.size(), |acc, &d| acc.saturating_mul(d))
    }
}

#[derive(Deserialize)]
struct RawMemoryDesc {
    data_type: DataType,
    dims: Vec<usize>,
    padded_dims: Vec<usize>,
    format_kind: FormatKind,
    blocking: BlockingDesc,
}

impl TryFrom<RawMemoryDesc> for MemoryDesc {
    type Error = DescError;

    fn try_from(raw: RawMemoryDesc) -> Result<Self, Self::Error> {
        let desc = match raw.format_kind {
            FormatKind::Blocked => {
                let blocking = &raw.blocking;
                if blocking.inner_blks.len() != blocking.inner_idxs.len() {
                    return Err(DescError::Inconsistent);
                }
                let blocks: Vec<(usize, usize)> = blocking
                    .inner_idxs
                    .iter()
                    .copied()
                    .zip(blocking.inner_blks.iter().copied())
                    .collect();
                Self::blocked(raw.data_type, &raw.dims, &blocks)?
            }
            kind => Self::unblocked(raw.data_type, &raw.dims, kind)?,
        };

        if desc.padded_dims != raw.padded_dims || desc.blocking != raw.blocking {
            return Err(DescError::Inconsistent);
        }
        Ok(desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_blocked_strides_are_dense() {
        let desc = MemoryDesc::blocked(DataType::F32, &[2, 17, 5, 5], &[(1, 16)]).unwrap();
        assert_eq!(desc.blocking().strides, vec![800, 400, 80, 16]);
        assert_eq!(desc.blocking().inner_blks, vec![16]);
        assert_eq!(desc.blocking().inner_idxs, vec![1]);
        assert_eq!(desc.size_bytes(), 1600 * 4);
    }

    #[test]
    fn test_double_blocked_dim() {
        // ABcd4b8a2b style: dim 1 tiled twice
        let desc =
            MemoryDesc::blocked(DataType::BF16, &[10, 3, 4, 4], &[(1, 4), (0, 8), (1, 2)]).unwrap();
        assert_eq!(desc.padded_dims(), &[16, 8, 4, 4]);
        assert_eq!(desc.blocking().inner_nelems(), 64);
        assert!(desc.blocking().is_blocked_dim(0));
        assert!(!desc.blocking().is_blocked_dim(2));
    }

    #[test]
    fn test_invalid_blocks() {
        assert_matches!(
            MemoryDesc::blocked(DataType::F32, &[4, 4], &[(2, 8)]),
            Err(DescError::BlockIndexOutOfRange { idx: 2, ndims: 2 })
        );
        assert_matches!(
            MemoryDesc::blocked(DataType::F32, &[4, 4], &[(0, 0)]),
            Err(DescError::ZeroBlock { idx: 0 })
        );
        assert_matches!(
            MemoryDesc::opaque(DataType::F32, &[1; 13]),
            Err(DescError::TooManyDims(13))
        );
    }

    #[test]
    fn test_data_type_names() {
        assert_eq!(DataType::BF16.to_string(), "bf16");
        assert_eq!("s8".parse::<DataType>().unwrap(), DataType::S8);
        assert_eq!(FormatKind::Any.to_string(), "any");
        assert_eq!(
            MemoryDesc::any(DataType::F32, &[4]).unwrap().format_kind,
            FormatKind::Any
        );
    }

    #[test]
    fn test_desc_serde() {
        let desc = MemoryDesc::blocked(DataType::S8, &[3, 7], &[(1, 4)]).unwrap();
        let json = serde_json::to_string(&desc).unwrap();
        assert!(json.contains("\"s8\""));
        let back: MemoryDesc = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }

    #[test]
    fn test_oversized_blocks_are_rejected() {
        assert_matches!(
            MemoryDesc::blocked(DataType::F32, &[4, 4], &[(0, 1 << 32), (1, 1 << 32)]),
            Err(DescError::BlockTooLarge { idx: 1 })
        );
        assert_matches!(
            MemoryDesc::blocked(DataType::F32, &[usize::MAX, 4], &[(0, 16)]),
            Err(DescError::TensorTooLarge)
        );
        assert_matches!(
            MemoryDesc::plain(DataType::F32, &[123_456_789; 12]),
            Err(DescError::TensorTooLarge)
        );
    }

    #[test]
    fn test_inner_nelems_saturates() {
        let blocking = BlockingDesc {
            strides: vec![1, 1],
            inner_blks: vec![usize::MAX, 2],
            inner_idxs: vec![0, 1],
        };
        assert_eq!(blocking.inner_nelems(), usize::MAX);
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_blocking() {
        let json = r#"{"data_type":"f32","dims":[3,5],"padded_dims":[3,8],"format_kind":"blocked",
            "blocking":{"strides":[],"inner_blks":[8],"inner_idxs":[1]}}"#;
        let err = serde_json::from_str::<MemoryDesc>(json).unwrap_err();
        assert!(err.to_string().contains("disagree"), "{err}");

        // padded dims that do not follow from the blocks
        let json = r#"{"data_type":"f32","dims":[3,5],"padded_dims":[3,16],"format_kind":"blocked",
            "blocking":{"strides":[8,8],"inner_blks":[8],"inner_idxs":[1]}}"#;
        assert!(serde_json::from_str::<MemoryDesc>(json).is_err());

        // mismatched block lists
        let json = r#"{"data_type":"f32","dims":[3,5],"padded_dims":[3,8],"format_kind":"blocked",
            "blocking":{"strides":[8,8],"inner_blks":[8],"inner_idxs":[]}}"#;
        assert!(serde_json::from_str::<MemoryDesc>(json).is_err());

        // block index out of range goes through the constructor checks
        let json = r#"{"data_type":"f32","dims":[3,5],"padded_dims":[3,8],"format_kind":"blocked",
            "blocking":{"strides":[8,8],"inner_blks":[8],"inner_idxs":[7]}}"#;
        let err = serde_json::from_str::<MemoryDesc>(json).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");
    }

    #[test]
    fn test_deserialize_accepts_constructed_descriptors() {
        for desc in [
            MemoryDesc::blocked(DataType::F32, &[3, 5], &[(1, 8)]).unwrap(),
            MemoryDesc::opaque(DataType::F16, &[4, 4]).unwrap(),
            MemoryDesc::any(DataType::U8, &[7]).unwrap(),
        ] {
            let json = serde_json::to_string(&desc).unwrap();
            assert_eq!(serde_json::from_str::<MemoryDesc>(&json).unwrap(), desc);
        }

        let json = r#"{"data_type":"f32","dims":[3,5],"padded_dims":[3,8],"format_kind":"blocked",
            "blocking":{"strides":[8,8],"inner_blks":[8],"inner_idxs":[1]}}"#;
        let desc: MemoryDesc = serde_json::from_str(json).unwrap();
        assert_eq!(desc.padded_dims(), &[3, 8]);
    }
}
