/*
    FluxFox - fluxlss
    https://github.com/dbalsom/fluxfox

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------
*/

mod common;

use common::*;
use fluxlss::prelude::*;
use proptest::prelude::*;

const SYNC_AND_PROLOGUE: [u8; 10] = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xD5, 0xAA, 0x96, 0xFF, 0xFE];
const ADDRESS_FIELD: [u8; 9] = [0xFF, 0xFF, 0xD5, 0xAA, 0xAD, 0x97, 0xDE, 0xAA, 0xEB];

fn decode_whole(deltas: &[u8]) -> LssDecodeResult {
    match LssDecoder::decode(deltas, DecodeParams::default().with_horizon(None)) {
        Ok(result) => result,
        Err(e) => panic!("Failed to decode flux stream: {}", e),
    }
}

#[test]
fn test_short_stream_register_trace() {
    init();
    let deltas = [12u8, 255, 20, 9];
    let result = decode_whole(&deltas);

    // 12 + (255 + 20) + 9 flux ticks at 4 flux ticks per sequencer tick
    assert_eq!(result.stats.ticks, (12 + 255 + 20 + 9) / 4);

    let mut expected = vec![0u8; 4];
    for value in [0x01u8, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40] {
        expected.extend([value; 8]);
    }
    expected.extend([0x80u8; 14]);
    assert_eq!(result.registers, expected);
    assert_eq!(result.bytes, vec![0x80]);

    assert_eq!(
        result.read_pulse_string(),
        format!("11011{}111", "0".repeat(66))
    );
}

#[test]
fn test_gcr_sync_and_prologue() {
    init();
    let deltas = gcr_flux_deltas(&SYNC_AND_PROLOGUE);
    let result = decode_whole(&deltas);

    println!("Decoded: {:02X?}", result.bytes);
    assert_eq!(result.bytes, SYNC_AND_PROLOGUE.to_vec());
    assert_eq!(result.stats.ticks, 640);
    assert_eq!(result.stats.intervals, 136);
    assert_eq!(result.stats.pulses, 68);
    // Every 8 tick pulse lands on a 4 tick boundary and spans two sequencer ticks.
    assert_eq!(result.stats.pulse_ticks, 136);
}

#[test]
fn test_gcr_address_field() {
    init();
    let deltas = gcr_flux_deltas(&ADDRESS_FIELD);
    let result = decode_whole(&deltas);

    assert_eq!(result.bytes, ADDRESS_FIELD.to_vec());
    assert_eq!(result.stats.ticks, 576);
}

#[test]
fn test_reference_horizon() {
    init();
    let deltas = gcr_flux_deltas(&SYNC_AND_PROLOGUE);
    let result = LssDecoder::decode(&deltas, DecodeParams::default()).unwrap();

    assert_eq!(result.stats.ticks, 320);
    assert_eq!(result.stats.lss_time, 1280);
    assert_eq!(result.bytes, vec![0xFF; 5]);
}

#[test]
fn test_decode_is_deterministic() {
    init();
    let deltas = gcr_flux_deltas(&SYNC_AND_PROLOGUE);
    let first = decode_whole(&deltas);
    let second = decode_whole(&deltas);

    assert_eq!(first, second);
    assert_eq!(
        compute_slice_hash(&first.registers),
        "fb9332bea4e2509e8d7648b8bff75375a4116062"
    );
}

#[test]
fn test_decoder_iterator_matches_run() {
    init();
    let deltas = gcr_flux_deltas(&ADDRESS_FIELD);
    let timeline = FluxTimeline::from_deltas(&deltas).unwrap();
    let params = DecodeParams::default().with_horizon(None);

    let records: Vec<TickRecord> = LssDecoder::new(&timeline, params)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    let result = LssDecoder::new(&timeline, params).unwrap().run().unwrap();

    let registers: Vec<u8> = records.iter().map(|r| r.data_register).collect();
    let bytes: Vec<u8> = records.iter().filter_map(|r| r.byte).collect();
    assert_eq!(registers, result.registers);
    assert_eq!(bytes, result.bytes);
    assert!(records.iter().enumerate().all(|(i, r)| r.tick == i as u64 && r.flux_time == i as u64 * 4));
}

#[test]
fn test_extractor_over_register_trace() {
    init();
    let deltas = gcr_flux_deltas(&SYNC_AND_PROLOGUE);
    let result = decode_whole(&deltas);

    let bytes: Vec<u8> = BitstreamExtractor::extract(result.registers.iter().copied()).collect();
    assert_eq!(bytes, result.bytes);
}

#[test]
fn test_malformed_stream_is_rejected() {
    init();
    match LssDecoder::decode(&[32, 32, 7, 32], DecodeParams::default()) {
        Err(LssError::MalformedFluxStream { offset, count }) => {
            assert_eq!(offset, 2);
            assert_eq!(count, 7);
        }
        other => panic!("Expected MalformedFluxStream, got {:?}", other),
    }
}

/// Pulse positions starting at time 0 with legal spacing, plus an end time at least one pulse
/// width past the last of them.
fn pulse_train() -> impl Strategy<Value = (Vec<u64>, u64)> {
    (prop::collection::vec(8u64..1000, 0..200), 8u64..600).prop_map(|(gaps, tail)| {
        let mut positions = vec![0u64];
        for gap in gaps {
            let last = positions[positions.len() - 1];
            positions.push(last + gap);
        }
        let end_time = positions[positions.len() - 1] + tail;
        (positions, end_time)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn property_flux_round_trip((positions, end_time) in pulse_train()) {
        let deltas = fluxlss::encode_flux_deltas(&positions, end_time).unwrap();
        let timeline = FluxTimeline::from_deltas(&deltas).unwrap();

        prop_assert_eq!(timeline.pulse_positions().collect::<Vec<_>>(), positions);
        prop_assert_eq!(timeline.end_time(), end_time);
    }

    #[test]
    fn property_decode_is_deterministic((positions, end_time) in pulse_train()) {
        let deltas = fluxlss::encode_flux_deltas(&positions, end_time).unwrap();
        let first = decode_whole(&deltas);
        let second = decode_whole(&deltas);

        prop_assert_eq!(first.stats.ticks, end_time.div_ceil(4));
        prop_assert_eq!(first, second);
    }
}
