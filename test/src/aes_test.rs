// Licensed under the Apache-2.0 license

use std::env;
use std::error::Error;
use std::io::Write;

use caravel_hw_model::HwModel;
use caravel_test_harness_types::{aes_vector, status, words_to_hex};

use crate::{test_configure, MonitorError, StatusMonitor, VirtualGpioModel};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AesTestParams {
    /// Bound on the whole milestone phase, in clock cycles from configure.
    pub timeout_cycles: u64,
    /// Clock edges allowed between the last milestone and the verdict.
    pub max_wait: u32,
}

impl Default for AesTestParams {
    fn default() -> Self {
        Self {
            timeout_cycles: 1_000_000,
            max_wait: 100_000,
        }
    }
}

impl AesTestParams {
    /// Defaults, overridden by `CARAVEL_TIMEOUT_CYCLES` and `CARAVEL_MAX_WAIT`
    /// when set.
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Box<dyn Error>> {
        let mut params = Self::default();
        if let Some(val) = lookup("CARAVEL_TIMEOUT_CYCLES") {
            params.timeout_cycles = val
                .parse()
                .map_err(|e| format!("CARAVEL_TIMEOUT_CYCLES={val:?}: {e}"))?;
        }
        if let Some(val) = lookup("CARAVEL_MAX_WAIT") {
            params.max_wait = val
                .parse()
                .map_err(|e| format!("CARAVEL_MAX_WAIT={val:?}: {e}"))?;
        }
        Ok(params)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AesTestSummary {
    /// Cycle count when the verdict was read.
    pub cycles: u64,
    /// Clock edges between the last milestone and the verdict.
    pub poll_ticks: u32,
}

/// Runs the AES-128 peripheral test against `model`, whose firmware must be
/// the AES test firmware.
pub fn aes_test<M: HwModel>(
    model: &mut M,
    params: AesTestParams,
) -> Result<AesTestSummary, MonitorError> {
    let mut env = test_configure(model, params.timeout_cycles);
    log(env.model(), "[TEST] Starting AES peripheral test");
    env.release_csb();

    let mut vgpio = VirtualGpioModel::start(&mut env);
    log(
        vgpio.env().model(),
        "[TEST] Waiting for firmware Virtual GPIO events...",
    );

    let mut monitor = StatusMonitor::new(&mut vgpio);
    let verdict = monitor.run(params.max_wait);
    let poll_ticks = monitor.poll_ticks();
    if verdict == Err(MonitorError::ResultMismatch) {
        log(
            vgpio.env().model(),
            &format!(
                "[TEST] Expected:  0x{}, device reported status {}",
                words_to_hex(&aes_vector::CIPHERTEXT),
                status::FAIL
            ),
        );
    }
    verdict?;

    let model = env.model();
    for line in [
        "[TEST] AES-128 encryption test completed successfully!".to_string(),
        "[TEST] === AES Test Summary ===".to_string(),
        "[TEST] Test Vector: AES-128".to_string(),
        format!("[TEST] Key:       0x{}", words_to_hex(&aes_vector::KEY)),
        format!("[TEST] Plaintext: 0x{}", words_to_hex(&aes_vector::PLAINTEXT)),
        format!("[TEST] Expected:  0x{}", words_to_hex(&aes_vector::CIPHERTEXT)),
        "[TEST] Result:    PASS".to_string(),
    ] {
        log(model, &line);
    }
    Ok(AesTestSummary {
        cycles: model.cycle_count(),
        poll_ticks,
    })
}

fn log<M: HwModel>(model: &mut M, line: &str) {
    writeln!(model.output().logger(), "{line}").ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = AesTestParams::from_lookup(|_| None).unwrap();
        assert_eq!(params, AesTestParams::default());
        assert_eq!(params.timeout_cycles, 1_000_000);
        assert_eq!(params.max_wait, 100_000);
    }

    #[test]
    fn test_params_overrides() {
        let params = AesTestParams::from_lookup(|name| match name {
            "CARAVEL_MAX_WAIT" => Some("250".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(params.timeout_cycles, 1_000_000);
        assert_eq!(params.max_wait, 250);

        let err = AesTestParams::from_lookup(|name| match name {
            "CARAVEL_TIMEOUT_CYCLES" => Some("lots".into()),
            _ => None,
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "CARAVEL_TIMEOUT_CYCLES=\"lots\": invalid digit found in string"
        );
    }
}
