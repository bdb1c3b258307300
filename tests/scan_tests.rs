mod common;

use common::*;
use e07_400mm::driver::frequency_word;
use e07_400mm::{Error, ScanPoint, ScanRequest, INVALID_RSSI};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn scan_tunes_each_point_and_ends_idle() {
    let (mut radio, chip) = radio();
    let request = ScanRequest {
        center_mhz: 433.0,
        step_khz: 200.0,
        dwell_us: 100,
    };
    for (index, raw) in [0x10u8, 0x20, 0x30, 0x40, 0x50].into_iter().enumerate() {
        let word = frequency_word(request.frequency_mhz(index, 5));
        chip.borrow_mut().rssi_by_word.insert(word, raw);
    }

    let mut out = [ScanPoint::default(); 5];
    radio.scan(&mut out, request).unwrap();

    let expected = [432.6, 432.8, 433.0, 433.2, 433.4];
    for (point, frequency) in out.iter().zip(expected) {
        assert!(close(point.frequency_mhz, frequency), "{:?}", point);
        assert!(point.is_valid());
    }
    assert!(out.windows(2).all(|w| w[0].frequency_mhz < w[1].frequency_mhz));
    assert_eq!(out[0].rssi_dbm, -66.0);
    assert_eq!(out[4].rssi_dbm, -34.0);

    let chip = chip.borrow();
    let dwells: Vec<_> = chip
        .events
        .iter()
        .filter_map(|event| match event {
            Event::DelayUs(us) => Some(*us),
            _ => None,
        })
        .collect();
    assert_eq!(dwells, vec![500; 5]);

    assert_eq!(chip.state, State::Idle);
    assert_eq!(chip.stale_rssi_reads, 0);
    assert_eq!(chip.violations, 0);
    assert_eq!(chip.invalid_flushes, 0);
    assert_eq!(
        &chip.events[chip.events.len() - 2..],
        &[Event::Strobe(SIDLE), Event::Strobe(SFRX)]
    );
}

#[test]
fn each_sample_follows_rx_and_dwell() {
    let (mut radio, chip) = radio();
    let mut out = [0f32; 3];
    radio.scan_rssi(&mut out, 868.0, 100.0, 2000).unwrap();

    let chip = chip.borrow();
    let rssi_reads: Vec<usize> = chip
        .events
        .iter()
        .enumerate()
        .filter(|(_, event)| **event == Event::ReadBurst(RSSI, 1))
        .map(|(index, _)| index)
        .collect();
    assert_eq!(rssi_reads.len(), 3);
    for index in rssi_reads {
        assert_eq!(chip.events[index - 1], Event::DelayUs(2000));
        assert_eq!(chip.events[index - 2], Event::Strobe(SRX));
    }
}

#[test]
fn long_dwell_is_clamped() {
    let (mut radio, chip) = radio();
    let mut out = [0f32; 1];
    radio.scan_rssi(&mut out, 433.0, 100.0, 1_000_000).unwrap();

    assert!(chip.borrow().events.contains(&Event::DelayUs(50_000)));
}

#[test]
fn default_dwell_is_used() {
    let (mut radio, chip) = radio();
    let mut out = [0f32; 2];
    radio.scan_rssi_default(&mut out, 433.0, 100.0).unwrap();

    assert_eq!(out, [-138.0; 2]);
    assert!(chip.borrow().events.contains(&Event::DelayUs(3000)));
}

#[test]
fn empty_scan_is_rejected_without_bus_access() {
    let (mut radio, chip) = radio();
    let request = ScanRequest {
        center_mhz: 433.0,
        step_khz: 100.0,
        dwell_us: 1000,
    };

    assert_eq!(radio.scan(&mut [], request), Err(Error::InvalidParameters));
    assert_eq!(
        radio.scan_rssi(&mut [], 433.0, 100.0, 1000),
        Err(Error::InvalidParameters)
    );
    assert_eq!(transfers(&radio), 0);
    assert!(chip.borrow().events.is_empty());
}

#[test]
fn non_finite_request_is_rejected() {
    let (mut radio, chip) = radio();
    let mut out = [0f32; 4];

    assert_eq!(
        radio.scan_rssi(&mut out, f32::NAN, 100.0, 1000),
        Err(Error::InvalidParameters)
    );
    assert_eq!(
        radio.scan_rssi(&mut out, 433.0, f32::INFINITY, 1000),
        Err(Error::InvalidParameters)
    );
    assert!(chip.borrow().events.is_empty());
}

#[test]
fn non_positive_step_is_rejected() {
    let (mut radio, chip) = radio();
    let mut out = [ScanPoint::default(); 3];

    for step_khz in [-100.0, 0.0, -0.0] {
        let request = ScanRequest {
            center_mhz: 433.0,
            step_khz,
            dwell_us: 1000,
        };
        assert_eq!(radio.scan(&mut out, request), Err(Error::InvalidParameters));
    }
    assert_eq!(out, [ScanPoint::default(); 3]);
    assert_eq!(transfers(&radio), 0);
    assert!(chip.borrow().events.is_empty());
}

#[test]
fn out_of_band_points_read_the_sentinel() {
    let (mut radio, chip) = radio();
    let mut out = [ScanPoint::default(); 5];
    let request = ScanRequest {
        center_mhz: 348.0,
        step_khz: 500.0,
        dwell_us: 1000,
    };
    radio.scan(&mut out, request).unwrap();

    assert!(out[..3].iter().all(ScanPoint::is_valid));
    assert_eq!(out[3].rssi_dbm, INVALID_RSSI);
    assert_eq!(out[4].rssi_dbm, INVALID_RSSI);
    assert!(close(out[4].frequency_mhz, 349.0));

    let chip = chip.borrow();
    assert_eq!(chip.state, State::Idle);
    assert_eq!(chip.stale_rssi_reads, 0);
}

#[test]
fn scan_drops_the_cached_length() {
    let (mut radio, chip) = radio();
    chip.borrow_mut().fifo.push_back(6);
    assert_eq!(radio.get_packet_length(true), Ok(6));

    let mut out = [0f32; 2];
    radio.scan_rssi(&mut out, 433.0, 100.0, 1000).unwrap();

    chip.borrow_mut().fifo.push_back(9);
    chip.borrow_mut().clear_events();
    assert_eq!(radio.get_packet_length(false), Ok(9));
    assert_eq!(chip.borrow().events, vec![Event::ReadBurst(FIFO, 1)]);
}

#[test]
fn bus_failure_still_reports_an_error() {
    let (mut radio, chip) = radio();
    chip.borrow_mut().fail_bus = true;

    let mut out = [0f32; 3];
    assert_eq!(
        radio.scan_rssi(&mut out, 433.0, 100.0, 1000),
        Err(Error::Bus)
    );
}
