// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Device zero-padding for tiled tensors.
//!
//! Tiled layouts round some dimensions up to a multiple of their block size.
//! The extra elements must read as zero before kernels that consume the
//! whole tile run. [`ZeroPadder::zero_pad`] checks the layout, then either
//! dispatches the engine's specialized kernel on a [`ComputeStream`] and
//! waits for it, or hands the tensor to a [`FallbackPad`].
//!
//! ```ignore
//! let padder = ZeroPadder::new(ZeroPadConfig::from_settings()?, fallback);
//! padder.zero_pad(&stream, &mut memory)?;
//! ```

pub mod capacity;
pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod fallback;
pub mod guard;
pub mod logging;
pub mod stream;
pub mod verbose;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{ZERO_PAD_MAX_STEP_SIZE, ZeroPadConfig};
pub use engine::{ComputeEngine, FallbackPad, ZeroPadKernel};
pub use error::{DeviceError, Status, ZeroPadError, status_of};
pub use exec::{Access, ArgSlot, ExecContext, MemoryArg, ResourceMapper};
pub use fallback::HostZeroPad;
pub use stream::{ComputeStream, Synchronizer, ZeroPadOutcome, ZeroPadder};
pub use verbose::{StdoutSink, TracingSink, VerboseRecord, VerboseSink};
