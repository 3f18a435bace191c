// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;
use zeropad_memory::FormatKind;

/// Failure reported by a device, engine or stream.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeviceError {
    #[error("not supported by device: {0}")]
    Unsupported(String),

    #[error("out of device resources: {0}")]
    OutOfResources(String),

    #[error("device runtime error: {0}")]
    Runtime(String),
}

/// Errors surfaced by a zero-pad call.
///
/// Collaborator failures are wrapped verbatim, tagged with the step that
/// produced them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ZeroPadError {
    #[error("zero padding is not implemented for {0} layouts")]
    UnsupportedLayout(FormatKind),

    #[error("zero padding is not implemented for {0}-byte elements")]
    UnsupportedElementSize(usize),

    #[error("failed to resolve zero-pad kernel: {0}")]
    Resolution(#[source] DeviceError),

    #[error("failed to enqueue zero-pad kernel: {0}")]
    Dispatch(#[source] DeviceError),

    #[error("failed waiting for zero-pad kernel: {0}")]
    Synchronization(#[source] DeviceError),

    #[error("host zero-pad failed: {0}")]
    HostStorage(String),
}

/// Coarse status code for callers that report integer-like statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Unimplemented,
    OutOfMemory,
    RuntimeError,
}

impl DeviceError {
    pub fn status(&self) -> Status {
        match self {
            DeviceError::Unsupported(_) => Status::Unimplemented,
            DeviceError::OutOfResources(_) => Status::OutOfMemory,
            DeviceError::Runtime(_) => Status::RuntimeError,
        }
    }
}

impl ZeroPadError {
    pub fn status(&self) -> Status {
        match self {
            ZeroPadError::UnsupportedLayout(_) | ZeroPadError::UnsupportedElementSize(_) => {
                Status::Unimplemented
            }
            ZeroPadError::Resolution(e)
            | ZeroPadError::Dispatch(e)
            | ZeroPadError::Synchronization(e) => e.status(),
            ZeroPadError::HostStorage(_) => Status::RuntimeError,
        }
    }

    /// True when the layout or element type is outside what the padding path handles.
    pub fn is_unimplemented(&self) -> bool {
        matches!(
            self,
            ZeroPadError::UnsupportedLayout(_) | ZeroPadError::UnsupportedElementSize(_)
        )
    }
}

/// Collapse a zero-pad result into a status code.
pub fn status_of<T>(result: &Result<T, ZeroPadError>) -> Status {
    match result {
        Ok(_) => Status::Success,
        Err(e) => e.status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ZeroPadError::UnsupportedLayout(FormatKind::Opaque).status(),
            Status::Unimplemented
        );
        assert_eq!(
            ZeroPadError::Resolution(DeviceError::OutOfResources("kernel cache".into())).status(),
            Status::OutOfMemory
        );
        assert_eq!(
            ZeroPadError::Synchronization(DeviceError::Runtime("lost".into())).status(),
            Status::RuntimeError
        );
        assert_eq!(status_of::<()>(&Ok(())), Status::Success);
    }

    #[test]
    fn test_unimplemented_only_for_layout_checks() {
        assert!(ZeroPadError::UnsupportedElementSize(8).is_unimplemented());
        // a device that cannot run the kernel is unimplemented by status, not by guard
        let err = ZeroPadError::Resolution(DeviceError::Unsupported("no subgroups".into()));
        assert!(!err.is_unimplemented());
        assert_eq!(err.status(), Status::Unimplemented);
    }

    #[test]
    fn test_error_display_keeps_source() {
        let err = ZeroPadError::Dispatch(DeviceError::Runtime("queue full".into()));
        assert_eq!(
            err.to_string(),
            "failed to enqueue zero-pad kernel: device runtime error: queue full"
        );
    }
}
