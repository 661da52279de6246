// Licensed under the Apache-2.0 license

use std::{
    cell::RefCell,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    rc::Rc,
};

use caravel_emu_bus::{Bus, BusError};
use caravel_emu_types::{RvAddr, RvData, RvSize};

#[derive(Clone)]
pub struct LogFile(Rc<RefCell<Box<dyn Write>>>);
impl LogFile {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
    pub fn new(writer: impl Write + 'static) -> Self {
        Self(Rc::new(RefCell::new(Box::new(writer))))
    }
}
impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

/// Traces every management core access that reaches `bus`.
pub struct BusLogger<TBus: Bus> {
    pub bus: TBus,
    pub log: Option<LogFile>,
}
impl<TBus: Bus> BusLogger<TBus> {
    pub fn new(bus: TBus) -> Self {
        Self { bus, log: None }
    }
    pub fn log_read(
        &mut self,
        bus_name: &str,
        size: RvSize,
        addr: RvAddr,
        result: Result<RvData, BusError>,
    ) {
        if let Some(log) = &mut self.log {
            let size = usize::from(size);
            match result {
                Ok(val) => writeln!(log, "{bus_name}  read{size} *0x{addr:08x} -> 0x{val:x}"),
                Err(e) => writeln!(log, "{bus_name}  read{size} *0x{addr:08x} ***FAULT {e:?}"),
            }
            .ok();
        }
    }
    pub fn log_write(
        &mut self,
        bus_name: &str,
        size: RvSize,
        addr: RvAddr,
        val: RvData,
        result: Result<(), BusError>,
    ) {
        if let Some(log) = &mut self.log {
            let size = usize::from(size);
            match result {
                Ok(()) => writeln!(log, "{bus_name} write{size} *0x{addr:08x} <- 0x{val:x}"),
                Err(e) => writeln!(
                    log,
                    "{bus_name} write{size} *0x{addr:08x} <- 0x{val:x} ***FAULT {e:?}"
                ),
            }
            .ok();
        }
    }
}
impl<TBus: Bus> Bus for BusLogger<TBus> {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        let result = self.bus.read(size, addr);
        self.log_read("MGMT", size, addr, result);
        result
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        let result = self.bus.write(size, addr, val);
        self.log_write("MGMT", size, addr, val, result);
        result
    }
    fn poll(&mut self) {
        self.bus.poll();
    }
}
