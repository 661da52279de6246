/*++

Licensed under the Apache-2.0 license.

File Name:

    main.rs

Abstract:

    File contains main entrypoint for the Caravel emulator. It runs the
    AES-128 peripheral test against the emulated SoC and reports the verdict.

--*/

mod fault_arg;

use anyhow::{anyhow, Context};
use caravel_hw_model::InitParams;
use caravel_hw_model_test_fw::AesTestOptions;
use caravel_test::{aes_test, AesTestParams};
use clap::{arg, value_parser};
use std::fs::File;
use std::io::{stdout, Write};
use std::path::PathBuf;

use crate::fault_arg::FaultArg;

fn cli() -> clap::Command<'static> {
    clap::Command::new("caravel-emu")
        .about("Caravel emulator: runs the AES-128 virtual GPIO test")
        .arg(
            arg!(--"timeout-cycles" [CYCLES] "Deadline for all firmware milestones, in clock cycles")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(--"max-wait" [TICKS] "Clock edges to wait for the final verdict")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--fault [FAULT] "Inject a firmware fault")
                .value_parser(value_parser!(FaultArg))
                .default_value("none"),
        )
        .arg(arg!(--log [FILE] "Write the model log to a file").value_parser(value_parser!(PathBuf)))
        .arg(
            arg!(--trace [FILE] "Trace management core bus accesses to a file")
                .value_parser(value_parser!(PathBuf)),
        )
}

fn main() {
    match main_impl() {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Fatal error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn test_params(args: &clap::ArgMatches) -> anyhow::Result<AesTestParams> {
    let mut params = AesTestParams::from_env().map_err(|e| anyhow!("{e}"))?;
    if let Some(&cycles) = args.get_one::<u64>("timeout-cycles") {
        params.timeout_cycles = cycles;
    }
    if let Some(&ticks) = args.get_one::<u32>("max-wait") {
        params.max_wait = ticks;
    }
    Ok(params)
}

fn main_impl() -> anyhow::Result<()> {
    let args = cli().get_matches();
    let params = test_params(&args)?;
    let fault = args
        .get_one::<FaultArg>("fault")
        .copied()
        .unwrap_or(FaultArg::None);

    let log_writer: Box<dyn Write> = match args.get_one::<PathBuf>("log") {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating log file {}", path.display()))?,
        ),
        None => Box::new(stdout()),
    };

    let mut model = caravel_hw_model::new(InitParams {
        firmware: AesTestOptions {
            fault: fault.fault(),
        }
        .firmware(),
        log_writer,
        trace_path: args.get_one::<PathBuf>("trace").cloned(),
        ..Default::default()
    })
    .map_err(|e| anyhow!("{e}"))?;

    let summary = aes_test(&mut model, params).context("AES test failed")?;
    println!(
        "AES test passed after {} cycles ({} ticks waiting for the verdict)",
        summary.cycles, summary.poll_ticks
    );
    Ok(())
}
