// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Zero-padding of tiled tensors on a compute stream.
//!
//! A call runs synchronously from the caller's point of view. Device work is
//! enqueued on the stream and the call blocks only on the final wait. Calls
//! on one stream are ordered by the stream; calls on different streams may
//! overlap on the device.

use std::sync::Arc;
use std::time::{Duration, Instant};

use zeropad_memory::{LayoutInspect, MemoryObject};

use crate::capacity::{self, StepCheck};
use crate::config::ZeroPadConfig;
use crate::engine::{ComputeEngine, FallbackPad, ZeroPadKernel};
use crate::error::{DeviceError, ZeroPadError};
use crate::exec::ExecContext;
use crate::guard::{self, GuardDecision};
use crate::verbose::{StdoutSink, VerboseRecord, VerboseSink};

/// An ordered queue of device work bound to one engine.
pub trait ComputeStream: Send + Sync {
    fn engine(&self) -> &dyn ComputeEngine;

    /// Submit `kernel` with its bound arguments. Returns once queued.
    fn enqueue(&self, kernel: &dyn ZeroPadKernel, ctx: &ExecContext<'_>) -> Result<(), DeviceError>;

    /// Block until all work queued so far has completed.
    fn wait(&self) -> Result<(), DeviceError>;
}

/// What a successful zero-pad call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroPadOutcome {
    /// No padding elements; no device work was issued.
    AlreadyDense,

    /// The fallback padded the tensor.
    Delegated,

    /// The specialized kernel ran. `elapsed` is only measured when verbose.
    Padded { elapsed: Option<Duration> },
}

/// Enqueues a resolved kernel and waits for it, timing the pair when a
/// verbose sink is attached.
pub struct Synchronizer<'s> {
    sink: Option<&'s dyn VerboseSink>,
}

impl<'s> Synchronizer<'s> {
    pub fn new() -> Self {
        Self { sink: None }
    }

    pub fn instrumented(sink: &'s dyn VerboseSink) -> Self {
        Self { sink: Some(sink) }
    }

    /// Dispatch and wait.
    ///
    /// A failed enqueue skips the wait. The wait's result is the result of
    /// the call. When instrumented, one record is emitted after the wait
    /// whether or not it succeeded.
    pub fn run(
        &self,
        stream: &dyn ComputeStream,
        kernel: &dyn ZeroPadKernel,
        ctx: &ExecContext<'_>,
        memory: &MemoryObject,
    ) -> Result<Option<Duration>, ZeroPadError> {
        let Some(sink) = self.sink else {
            stream.enqueue(kernel, ctx).map_err(ZeroPadError::Dispatch)?;
            stream.wait().map_err(ZeroPadError::Synchronization)?;
            return Ok(None);
        };

        // drain earlier work so the timing covers this kernel only
        if let Err(e) = stream.wait() {
            tracing::debug!(error = %e, "baseline wait failed before timed zero-pad");
        }

        let start = Instant::now();
        stream.enqueue(kernel, ctx).map_err(ZeroPadError::Dispatch)?;
        let status = stream.wait();
        let elapsed = start.elapsed();

        sink.emit(&VerboseRecord::new(kernel.name(), memory.memory_desc(), elapsed));

        status.map_err(ZeroPadError::Synchronization)?;
        Ok(Some(elapsed))
    }
}

impl Default for Synchronizer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Zero-fills the padding elements of tiled tensors.
///
/// Runs the guard, then the capacity check, then resolves the engine's
/// kernel and dispatches it. Tensors whose step size the kernel cannot
/// handle go to the fallback.
pub struct ZeroPadder {
    config: ZeroPadConfig,
    fallback: Arc<dyn FallbackPad>,
    sink: Arc<dyn VerboseSink>,
}

impl ZeroPadder {
    pub fn new(config: ZeroPadConfig, fallback: Arc<dyn FallbackPad>) -> Self {
        Self {
            config,
            fallback,
            sink: Arc::new(StdoutSink),
        }
    }

    /// Replace the default stdout sink for verbose records.
    pub fn with_sink(mut self, sink: Arc<dyn VerboseSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ZeroPadConfig {
        &self.config
    }

    /// Zero the padding elements of `memory` using `stream`.
    ///
    /// Non-tiled layouts and element widths other than 1, 2 or 4 bytes are
    /// unimplemented; tensors without padding succeed without device work.
    pub fn zero_pad(
        &self,
        stream: &dyn ComputeStream,
        memory: &mut MemoryObject,
    ) -> Result<ZeroPadOutcome, ZeroPadError> {
        let decision = guard::check(&*memory).inspect_err(|e| {
            tracing::debug!(error = %e, "zero-pad not implemented for tensor");
        })?;
        if decision == GuardDecision::AlreadyDense {
            tracing::debug!(nelems = memory.nelems(false), "no padding elements; skipping");
            return Ok(ZeroPadOutcome::AlreadyDense);
        }

        if let StepCheck::Overflow { step, .. } =
            capacity::validate(&*memory, self.config.max_step_size)
        {
            tracing::debug!(step, "delegating zero-pad to fallback");
            self.fallback.zero_pad(memory)?;
            return Ok(ZeroPadOutcome::Delegated);
        }

        let memory: &MemoryObject = memory;
        let (kernel, mapper) = stream
            .engine()
            .zero_pad_kernel()
            .map_err(ZeroPadError::Resolution)?;

        let ctx = ExecContext::for_zero_pad(memory, mapper);
        tracing::trace!(
            kernel = kernel.name(),
            nelems = memory.nelems(false),
            padded_nelems = memory.nelems(true),
            "dispatching zero-pad kernel"
        );

        let synchronizer = if self.config.verbose {
            Synchronizer::instrumented(self.sink.as_ref())
        } else {
            Synchronizer::new()
        };
        let elapsed = synchronizer.run(stream, kernel, &ctx, memory)?;

        Ok(ZeroPadOutcome::Padded { elapsed })
    }
}
