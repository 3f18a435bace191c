// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use assert_matches::assert_matches;

use zeropad_compute::testing::{CollectingSink, MockEngine, RecordingStream};
use zeropad_compute::{HostZeroPad, ZeroPadConfig, ZeroPadError, ZeroPadOutcome, ZeroPadder};
use zeropad_memory::actions::{Memset, Slice};
use zeropad_memory::padding::padding_offsets;
use zeropad_memory::{DataType, MemoryDesc, MemoryObject, SystemStorage};

fn padder(max_step_size: usize) -> ZeroPadder {
    let config = ZeroPadConfig::builder().max_step_size(max_step_size).build().unwrap();
    ZeroPadder::new(config, Arc::new(HostZeroPad)).with_sink(Arc::new(CollectingSink::default()))
}

fn filled(desc: MemoryDesc, byte: u8) -> MemoryObject {
    let mut storage = SystemStorage::new(desc.size_bytes()).unwrap();
    storage.memset(byte, 0, desc.size_bytes()).unwrap();
    MemoryObject::from_storage(storage, desc).unwrap()
}

#[test]
fn test_overflow_is_padded_on_host() {
    let engine = Arc::new(MockEngine::new("ref:zero_pad"));
    let stream = RecordingStream::new(engine.clone());
    // step 4 * 8 = 32 over a limit of 16
    let desc = MemoryDesc::blocked(DataType::BF16, &[3, 17], &[(1, 4), (1, 8)]).unwrap();
    let padding: Vec<usize> = padding_offsets(&desc);
    let mut memory = filled(desc, 0xab);

    let result = padder(16).zero_pad(&stream, &mut memory);

    assert_eq!(result, Ok(ZeroPadOutcome::Delegated));
    assert_eq!(engine.resolutions(), 0);
    assert_eq!(stream.device_ops(), 0);

    let bytes = memory.storage::<SystemStorage>().unwrap().as_slice().unwrap();
    // 3 rows of 32 lanes, 17 real
    assert_eq!(padding.len(), 3 * 15);
    for (elem, pair) in bytes.chunks(2).enumerate() {
        let expected = if padding.contains(&elem) { 0 } else { 0xab };
        assert_eq!(pair, &[expected, expected], "element {elem}");
    }

    // a second pass finds nothing left to change
    let before = bytes.to_vec();
    padder(16).zero_pad(&stream, &mut memory).unwrap();
    let after = memory.storage::<SystemStorage>().unwrap().slice(0, before.len()).unwrap();
    assert_eq!(after, before.as_slice());
}

#[test]
fn test_host_failure_is_returned() {
    let engine = Arc::new(MockEngine::new("ref:zero_pad"));
    let stream = RecordingStream::new(engine);
    let desc = MemoryDesc::blocked(DataType::S8, &[5], &[(0, 32)]).unwrap();
    let mut memory = filled(desc, 1);
    let _shared = memory.clone();

    let result = padder(16).zero_pad(&stream, &mut memory);

    assert_matches!(result, Err(ZeroPadError::HostStorage(_)));
}
