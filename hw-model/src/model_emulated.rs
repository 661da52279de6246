// Licensed under the Apache-2.0 license

use std::cell::RefMut;
use std::env;
use std::error::Error;
use std::path::PathBuf;

use caravel_emu_bus::{Bus, BusError, Clock};
use caravel_emu_cpu::{Cpu, StepAction};
use caravel_emu_periph::{CaravelRootBus, CaravelRootBusArgs, VgpioOutputCb};
use caravel_emu_types::{RvAddr, RvData, RvSize};

use crate::bus_logger::{BusLogger, LogFile};
use crate::{HwModel, InitParams, Output};

pub struct EmulatedWishboneBus<'a> {
    soc: RefMut<'a, BusLogger<CaravelRootBus>>,
}

impl<'a> Bus for EmulatedWishboneBus<'a> {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        self.soc.bus.read(size, addr)
    }
    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        self.soc.bus.write(size, addr, val)
    }
}

pub struct ModelEmulated {
    cpu: Cpu<BusLogger<CaravelRootBus>>,
    output: Output,
    boot_cycles: u64,
}

impl ModelEmulated {
    fn soc(&self) -> RefMut<'_, BusLogger<CaravelRootBus>> {
        self.cpu.bus()
    }
}

impl HwModel for ModelEmulated {
    type TBus<'a> = EmulatedWishboneBus<'a>;

    fn init(params: InitParams) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized,
    {
        let clock = Clock::new();
        let output = Output::new_internal(params.log_writer);

        let sink = output.sink().clone();
        let timer = clock.timer();
        let bus_args = CaravelRootBusArgs {
            vgpio_output_cb: VgpioOutputCb::new(move |old, new| {
                sink.set_now(timer.now());
                sink.push_vgpio_output(old, new);
            }),
        };
        let mut soc = BusLogger::new(CaravelRootBus::new(&clock, bus_args));
        let trace_path = params
            .trace_path
            .or_else(|| env::var_os("CARAVEL_TRACE_PATH").map(PathBuf::from));
        if let Some(path) = trace_path {
            soc.log = Some(LogFile::open(&path)?);
        }

        Ok(ModelEmulated {
            cpu: Cpu::new(soc, clock, params.firmware),
            output,
            boot_cycles: params.boot_cycles,
        })
    }

    fn wishbone_bus(&mut self) -> Self::TBus<'_> {
        EmulatedWishboneBus { soc: self.soc() }
    }

    fn step(&mut self) {
        let action = self.cpu.step();
        self.output.sink().set_now(self.cpu.clock().now());
        if action == StepAction::Fatal {
            self.output.sink().push_fw_fault(self.cpu.fault());
        }
    }

    fn output(&mut self) -> &mut Output {
        &mut self.output
    }

    fn cycle_count(&self) -> u64 {
        self.cpu.clock().now()
    }

    fn release_csb(&mut self) {
        self.cpu.release_reset(self.boot_cycles);
    }

    fn vgpio_output(&self) -> u16 {
        self.soc().bus.vgpio.output()
    }

    fn set_vgpio_input(&mut self, val: u16) {
        self.soc().bus.vgpio.set_input(val);
    }

    fn firmware_fault(&self) -> Option<BusError> {
        self.cpu.fault()
    }
}
