// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Step size check against what the compiled kernel variants can handle.

use zeropad_memory::LayoutInspect;

/// Result of comparing a tensor's step size with the kernel limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCheck {
    /// The specialized kernel can pad this tensor.
    Within(usize),

    /// No compiled variant covers this step; the generic fallback must run.
    Overflow { step: usize, max: usize },
}

/// Product of the innermost tile sizes. One when there are no tiles.
pub fn step_size(inner_blks: &[usize]) -> usize {
    inner_blks.iter().fold(1usize, |acc, &blk| acc.saturating_mul(blk))
}

/// Compare the step size of `layout` with `max_step`.
///
/// Well-formed descriptors never exceed the limit, so an overflow is logged
/// as an error. The caller still routes it to the fallback.
pub fn validate<L: LayoutInspect + ?Sized>(layout: &L, max_step: usize) -> StepCheck {
    let step = step_size(layout.inner_blks());
    if step <= max_step {
        return StepCheck::Within(step);
    }

    tracing::error!(
        step,
        max_step,
        inner_blks = ?layout.inner_blks(),
        "zero-pad step size exceeds kernel capacity; descriptor construction is likely broken"
    );
    StepCheck::Overflow {
        step,
        max: max_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZERO_PAD_MAX_STEP_SIZE;
    use zeropad_memory::{DataType, MemoryDesc};

    #[test]
    fn test_step_size() {
        assert_eq!(step_size(&[]), 1);
        assert_eq!(step_size(&[16]), 16);
        assert_eq!(step_size(&[4, 8, 2]), 64);
        assert_eq!(step_size(&[usize::MAX, 2]), usize::MAX);
    }

    #[test]
    fn test_within_limit() {
        let desc = MemoryDesc::blocked(DataType::F32, &[3, 5], &[(1, 8)]).unwrap();
        assert_eq!(validate(&desc, 16), StepCheck::Within(8));
        assert_eq!(validate(&desc, 8), StepCheck::Within(8));
    }

    #[test]
    fn test_overflow_does_not_panic() {
        let desc = MemoryDesc::blocked(DataType::F32, &[3, 5], &[(1, 32)]).unwrap();
        assert_eq!(
            validate(&desc, 16),
            StepCheck::Overflow { step: 32, max: 16 }
        );
    }

    #[test]
    fn test_common_layouts_fit_default_limit() {
        // OIhw16i16o and ABcd4b16a4b, both bf16-friendly weight layouts
        let a = MemoryDesc::blocked(DataType::BF16, &[17, 3, 3, 3], &[(1, 16), (0, 16)]).unwrap();
        let b = MemoryDesc::blocked(DataType::BF16, &[17, 3, 3, 3], &[(1, 4), (0, 16), (1, 4)])
            .unwrap();
        assert_eq!(validate(&a, ZERO_PAD_MAX_STEP_SIZE), StepCheck::Within(256));
        assert_eq!(validate(&b, ZERO_PAD_MAX_STEP_SIZE), StepCheck::Within(256));
    }
}
