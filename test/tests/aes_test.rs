// Licensed under the Apache-2.0 license

use caravel_emu_bus::testing::Log;
use caravel_hw_model::{DefaultHwModel, HwModel, InitParams};
use caravel_hw_model_test_fw::{AesTestOptions, Fault};
use caravel_test::{aes_test, AesTestParams, Milestone, MonitorError};

fn model_with_fw(options: AesTestOptions) -> (DefaultHwModel, Log) {
    let log = Log::new();
    let model = caravel_hw_model::new(InitParams {
        firmware: options.firmware(),
        log_writer: Box::new(log.clone()),
        ..Default::default()
    })
    .unwrap();
    (model, log)
}

fn with_fault(fault: Fault) -> AesTestOptions {
    AesTestOptions { fault: Some(fault) }
}

#[test]
fn test_aes_pass() {
    let (mut model, log) = model_with_fw(AesTestOptions::default());
    let summary = aes_test(&mut model, AesTestParams::default()).unwrap();

    assert_eq!(summary.cycles, model.cycle_count());
    assert!(summary.poll_ticks > 0);
    assert_eq!(model.output().vgpio_history(), &[1, 2, 3, 4, 5, 6]);

    let log = log.take();
    let test_lines: Vec<&str> = log
        .lines()
        .filter_map(|line| line.split_once("[TEST] ").map(|(_, msg)| msg))
        .collect();
    assert_eq!(
        test_lines,
        vec![
            "Starting AES peripheral test",
            "Waiting for firmware Virtual GPIO events...",
            "✓ Firmware ready, user interface enabled",
            "✓ AES peripheral enabled via GCLK",
            "✓ Test vectors loaded (Key and Plaintext)",
            "✓ AES-128 encryption operation initiated",
            "✓ Ciphertext read from AES peripheral",
            "✓ PASS: Ciphertext matches expected value",
            "AES-128 encryption test completed successfully!",
            "=== AES Test Summary ===",
            "Test Vector: AES-128",
            "Key:       0x2b7e151628aed2a6abf7158809cf4f3c",
            "Plaintext: 0x3243f6a8885a308d313198a2e0370734",
            "Expected:  0x3925841d02dc09fbdc118597196a0b32",
            "Result:    PASS",
        ]
    );
}

#[test]
fn test_aes_mismatch() {
    let (mut model, log) = model_with_fw(with_fault(Fault::Mismatch));
    assert_eq!(
        aes_test(&mut model, AesTestParams::default()),
        Err(MonitorError::ResultMismatch)
    );
    let log = log.take();
    assert!(log.contains(
        "[TEST] ✗ FAIL: Ciphertext does not match expected value\n"
    ));
    let context = log
        .lines()
        .filter_map(|line| line.split_once("[TEST] ").map(|(_, msg)| msg))
        .last();
    assert_eq!(
        context,
        Some("Expected:  0x3925841d02dc09fbdc118597196a0b32, device reported status 7")
    );
    assert!(!log.contains("Result:    PASS"));
}

#[test]
fn test_aes_no_gclk_fails_after_start() {
    let (mut model, _) = model_with_fw(with_fault(Fault::NoGclk));
    // The firmware gives up waiting before ever reporting milestone 5.
    let params = AesTestParams {
        timeout_cycles: 20_000,
        ..Default::default()
    };
    assert_eq!(
        aes_test(&mut model, params),
        Err(MonitorError::MilestoneTimeout {
            milestone: Milestone::CiphertextRead,
            last_value: 7
        })
    );
    assert_eq!(model.output().vgpio_history(), &[1, 2, 3, 4, 7]);
}

#[test]
fn test_aes_hang_times_out() {
    let (mut model, log) = model_with_fw(with_fault(Fault::HangAfterRead));
    let params = AesTestParams {
        max_wait: 5_000,
        ..Default::default()
    };
    let start = model.cycle_count();
    assert_eq!(
        aes_test(&mut model, params),
        Err(MonitorError::PollTimeout {
            last_value: 5,
            ticks: 5_000
        })
    );
    assert!(model.cycle_count() - start > 5_000);
    assert!(log
        .as_str()
        .contains("[TEST] ✗ TIMEOUT: Final output stuck at 5\n"));
}

#[test]
fn test_aes_no_user_interface() {
    let (mut model, log) = model_with_fw(with_fault(Fault::NoUserInterface));
    let params = AesTestParams {
        timeout_cycles: 10_000,
        ..Default::default()
    };
    assert_eq!(
        aes_test(&mut model, params),
        Err(MonitorError::MilestoneTimeout {
            milestone: Milestone::FwReady,
            last_value: 0
        })
    );
    assert_eq!(model.cycle_count(), 10_000);
    assert!(model.firmware_fault().is_some());
    assert!(log.as_str().contains("FW FAULT: load access fault"));
}
