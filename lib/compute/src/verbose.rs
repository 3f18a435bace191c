// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Verbose records for instrumented zero-pad dispatches.

use std::fmt;
use std::time::Duration;

use zeropad_memory::{MemoryDesc, render};

/// Line prefix of every record.
pub const VERBOSE_PREFIX: &str = "zeropad_verbose";

/// Fixed event tag: an execution of the zero-pad kernel on a gpu stream.
pub const VERBOSE_TAG: &str = "exec,gpu,zero_pad";

/// One timed zero-pad dispatch.
///
/// Renders as `zeropad_verbose,exec,gpu,zero_pad,<kernel>,<fmt>,<dims>,<ms>`.
///
/// `<ms>` is the shortest decimal that round-trips the `f64`, not C `%g`:
/// ten nanoseconds prints as `0.00001` where `%g` gives `1e-05`.
#[derive(Debug, Clone, PartialEq)]
pub struct VerboseRecord {
    pub kernel_name: String,
    pub format: String,
    pub dims: String,
    pub elapsed_ms: f64,
}

impl VerboseRecord {
    pub fn new(kernel_name: &str, desc: &MemoryDesc, elapsed: Duration) -> Self {
        Self {
            kernel_name: kernel_name.to_string(),
            format: render::format_str(desc),
            dims: render::dims_str(desc),
            elapsed_ms: elapsed.as_nanos() as f64 / 1e6,
        }
    }
}

impl fmt::Display for VerboseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{VERBOSE_PREFIX},{VERBOSE_TAG},{},{},{},{}",
            self.kernel_name, self.format, self.dims, self.elapsed_ms
        )
    }
}

/// Destination for verbose records.
pub trait VerboseSink: Send + Sync {
    fn emit(&self, record: &VerboseRecord);
}

/// Prints each record as one line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl VerboseSink for StdoutSink {
    fn emit(&self, record: &VerboseRecord) {
        println!("{record}");
    }
}

/// Forwards records to `tracing` at info level under `zeropad::verbose`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl VerboseSink for TracingSink {
    fn emit(&self, record: &VerboseRecord) {
        tracing::info!(
            target: "zeropad::verbose",
            kernel = %record.kernel_name,
            elapsed_ms = record.elapsed_ms,
            "{record}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeropad_memory::DataType;

    #[test]
    fn test_record_line() {
        let desc = MemoryDesc::blocked(DataType::F32, &[2, 17, 5, 5], &[(1, 16)]).unwrap();
        let record = VerboseRecord::new("ocl:ref:any", &desc, Duration::from_micros(1250));

        assert_eq!(record.elapsed_ms, 1.25);
        assert_eq!(
            record.to_string(),
            "zeropad_verbose,exec,gpu,zero_pad,ocl:ref:any,f32::blocked:aBcd16b:f0,2x17x5x5,1.25"
        );
    }

    #[test]
    fn test_zero_elapsed() {
        let desc = MemoryDesc::blocked(DataType::S8, &[3], &[(0, 4)]).unwrap();
        let record = VerboseRecord::new("k", &desc, Duration::ZERO);
        assert!(record.to_string().ends_with(",3,0"));
    }

    #[test]
    fn test_small_elapsed_is_plain_decimal() {
        let desc = MemoryDesc::blocked(DataType::S8, &[3], &[(0, 4)]).unwrap();
        let record = VerboseRecord::new("k", &desc, Duration::from_nanos(10));
        assert!(record.to_string().ends_with(",3,0.00001"), "{record}");
    }

    #[test]
    fn test_tracing_sink_does_not_require_subscriber() {
        let desc = MemoryDesc::blocked(DataType::S8, &[3], &[(0, 4)]).unwrap();
        TracingSink.emit(&VerboseRecord::new("k", &desc, Duration::from_millis(2)));
    }
}
