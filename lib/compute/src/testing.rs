// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Recording collaborators for exercising the zero-pad path without a device.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use zeropad_memory::{MemoryDescription, MemoryObject};

use crate::engine::{ComputeEngine, FallbackPad, ZeroPadKernel};
use crate::error::{DeviceError, ZeroPadError};
use crate::exec::{Access, ArgSlot, DeviceResource, ExecContext, ResourceMapper};
use crate::stream::ComputeStream;
use crate::verbose::{VerboseRecord, VerboseSink};

#[derive(Debug, Clone)]
pub struct MockKernel {
    name: String,
}

impl ZeroPadKernel for MockKernel {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Engine that hands out one kernel and counts resolutions.
#[derive(Debug)]
pub struct MockEngine {
    kernel: MockKernel,
    mapper: ResourceMapper,
    failure: Option<DeviceError>,
    resolutions: AtomicUsize,
}

impl MockEngine {
    pub fn new(kernel_name: &str) -> Self {
        Self {
            kernel: MockKernel {
                name: kernel_name.to_string(),
            },
            mapper: ResourceMapper::new().with_resource(0, DeviceResource(0x1000)),
            failure: None,
            resolutions: AtomicUsize::new(0),
        }
    }

    /// Every resolution fails with `error`.
    pub fn failing(kernel_name: &str, error: DeviceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(kernel_name)
        }
    }

    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }

    pub fn mapper(&self) -> &ResourceMapper {
        &self.mapper
    }
}

impl ComputeEngine for MockEngine {
    fn zero_pad_kernel(&self) -> Result<(&dyn ZeroPadKernel, &ResourceMapper), DeviceError> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok((&self.kernel, &self.mapper)),
        }
    }
}

/// A bound argument as seen by the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedArg {
    pub slot: ArgSlot,
    pub access: Access,
    /// Address of the bound buffer.
    pub addr: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOp {
    Enqueue {
        kernel: String,
        args: Vec<RecordedArg>,
        mapper_len: usize,
    },
    Wait,
}

/// Stream that records every operation instead of running it.
///
/// Waits succeed unless results were queued with [`push_wait_result`];
/// those are consumed in order.
///
/// [`push_wait_result`]: RecordingStream::push_wait_result
#[derive(Debug)]
pub struct RecordingStream {
    engine: Arc<MockEngine>,
    ops: Mutex<Vec<StreamOp>>,
    enqueue_failure: Mutex<Option<DeviceError>>,
    wait_results: Mutex<VecDeque<Result<(), DeviceError>>>,
}

impl RecordingStream {
    pub fn new(engine: Arc<MockEngine>) -> Self {
        Self {
            engine,
            ops: Mutex::new(Vec::new()),
            enqueue_failure: Mutex::new(None),
            wait_results: Mutex::new(VecDeque::new()),
        }
    }

    /// Make every following enqueue fail with `error`.
    pub fn fail_enqueue(&self, error: DeviceError) {
        *self.enqueue_failure.lock().unwrap() = Some(error);
    }

    pub fn push_wait_result(&self, result: Result<(), DeviceError>) {
        self.wait_results.lock().unwrap().push_back(result);
    }

    pub fn ops(&self) -> Vec<StreamOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn enqueues(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, StreamOp::Enqueue { .. }))
            .count()
    }

    pub fn waits(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, StreamOp::Wait))
            .count()
    }

    /// Operations that touch the device; zero for calls that short-circuit.
    pub fn device_ops(&self) -> usize {
        self.ops.lock().unwrap().len()
    }
}

impl ComputeStream for RecordingStream {
    fn engine(&self) -> &dyn ComputeEngine {
        self.engine.as_ref()
    }

    fn enqueue(
        &self,
        kernel: &dyn ZeroPadKernel,
        ctx: &ExecContext<'_>,
    ) -> Result<(), DeviceError> {
        if let Some(e) = self.enqueue_failure.lock().unwrap().clone() {
            return Err(e);
        }
        let args = ctx
            .args()
            .map(|(slot, arg)| RecordedArg {
                slot,
                access: arg.access,
                addr: arg.memory.buffer().addr(),
            })
            .collect();
        self.ops.lock().unwrap().push(StreamOp::Enqueue {
            kernel: kernel.name().to_string(),
            args,
            mapper_len: ctx.resource_mapper().len(),
        });
        Ok(())
    }

    fn wait(&self) -> Result<(), DeviceError> {
        self.ops.lock().unwrap().push(StreamOp::Wait);
        self.wait_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Fallback that counts calls and returns a fixed result.
#[derive(Debug)]
pub struct RecordingFallback {
    result: Result<(), ZeroPadError>,
    calls: AtomicUsize,
}

impl RecordingFallback {
    pub fn new(result: Result<(), ZeroPadError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Ok(()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FallbackPad for RecordingFallback {
    fn zero_pad(&self, _memory: &mut MemoryObject) -> Result<(), ZeroPadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Sink that keeps every record.
#[derive(Debug, Default)]
pub struct CollectingSink {
    records: Mutex<Vec<VerboseRecord>>,
}

impl CollectingSink {
    pub fn records(&self) -> Vec<VerboseRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.records().iter().map(ToString::to_string).collect()
    }
}

impl VerboseSink for CollectingSink {
    fn emit(&self, record: &VerboseRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}
