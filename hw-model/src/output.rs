// Licensed under the Apache-2.0 license

use std::fmt::Display;
use std::io::LineWriter;
use std::{
    cell::{Cell, RefCell},
    io::Write,
    rc::Rc,
};

use caravel_emu_bus::BusError;

struct OutputSinkImpl {
    new_vgpio_output: RefCell<Vec<u16>>,
    log_writer: RefCell<LineWriter<Box<dyn std::io::Write>>>,
    now: Cell<u64>,
    next_write_needs_time_prefix: Cell<bool>,
}

struct PrettyU64(u64);
impl Display for PrettyU64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const RANKS: [u64; 7] = [
            1_000_000_000_000_000_000,
            1_000_000_000_000_000,
            1_000_000_000_000,
            1_000_000_000,
            1_000_000,
            1_000,
            1,
        ];
        const PADDING_RANK: u64 = 1_000_000_000;
        let mut prev_numbers = false;
        for rank in RANKS {
            if (self.0 / rank) > 0 || rank == 1 {
                if prev_numbers {
                    write!(f, "{:03}", (self.0 / rank) % 1000)?;
                } else if rank >= PADDING_RANK {
                    write!(f, "{}", (self.0 / rank) % 1000)?;
                } else {
                    write!(f, "{:>3}", (self.0 / rank) % 1000)?;
                }
                if rank > 1 {
                    write!(f, ",")?;
                }
                prev_numbers = true;
            } else if rank < PADDING_RANK {
                write!(f, "    ")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[test]
fn test_pretty_u64() {
    assert_eq!(PrettyU64(0).to_string(), "          0");
    assert_eq!(PrettyU64(1).to_string(), "          1");
    assert_eq!(PrettyU64(999).to_string(), "        999");
    assert_eq!(PrettyU64(1_000).to_string(), "      1,000");
    assert_eq!(PrettyU64(999_999).to_string(), "    999,999");
    assert_eq!(PrettyU64(1_000_000).to_string(), "  1,000,000");
    assert_eq!(PrettyU64(999_999_999).to_string(), "999,999,999");
    assert_eq!(PrettyU64(1_999_999_999).to_string(), "1,999,999,999");
}

/// The model-side end of the log. Clones share the same writer, so
/// peripherals can report into it from their callbacks.
#[derive(Clone)]
pub struct OutputSink(Rc<OutputSinkImpl>);
impl OutputSink {
    pub fn set_now(&self, now: u64) {
        self.0.now.set(now);
    }
    pub fn now(&self) -> u64 {
        self.0.now.get()
    }

    /// Records a change of the virtual GPIO output half.
    pub fn push_vgpio_output(&self, old: u16, new: u16) {
        self.0.new_vgpio_output.borrow_mut().push(new);
        writeln!(&mut &*self, "VGPIO: {old} -> {new}").ok();
    }

    pub fn push_fw_fault(&self, fault: Option<BusError>) {
        match fault {
            Some(err) => writeln!(&mut &*self, "FW FAULT: {err}").ok(),
            None => writeln!(&mut &*self, "FW FAULT: unknown").ok(),
        };
    }
}
impl std::io::Write for &OutputSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let log_writer = &mut self.0.log_writer.borrow_mut();
        // Write a time prefix in front of every line
        for line in buf.split_inclusive(|ch| *ch == b'\n') {
            if self.0.next_write_needs_time_prefix.get() {
                write!(log_writer, "{} ", PrettyU64(self.0.now.get()))?;
                self.0.next_write_needs_time_prefix.set(false);
            }
            log_writer.write_all(line)?;
            if line.ends_with(b"\n") {
                self.0.next_write_needs_time_prefix.set(true);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.log_writer.borrow_mut().flush()
    }
}

pub struct Output {
    vgpio_history: Vec<u16>,
    sink: OutputSink,
}
impl Output {
    pub fn new(log_writer: impl std::io::Write + 'static) -> Self {
        Self::new_internal(Box::new(log_writer))
    }
    pub(crate) fn new_internal(log_writer: Box<dyn std::io::Write>) -> Self {
        Self {
            vgpio_history: vec![],
            sink: OutputSink(Rc::new(OutputSinkImpl {
                new_vgpio_output: Default::default(),
                log_writer: RefCell::new(LineWriter::new(log_writer)),
                now: Cell::new(0),
                next_write_needs_time_prefix: Cell::new(true),
            })),
        }
    }
    pub fn sink(&self) -> &OutputSink {
        &self.sink
    }
    pub fn logger(&self) -> impl std::io::Write + '_ {
        &self.sink
    }

    /// Every value the virtual GPIO output has taken so far, oldest first.
    pub fn vgpio_history(&mut self) -> &[u16] {
        self.process_new_data();
        &self.vgpio_history
    }

    pub fn take_vgpio_history(&mut self) -> Vec<u16> {
        self.process_new_data();
        std::mem::take(&mut self.vgpio_history)
    }

    fn process_new_data(&mut self) {
        let new_data = self.sink.0.new_vgpio_output.take();
        if self.vgpio_history.is_empty() {
            self.vgpio_history = new_data;
        } else {
            self.vgpio_history.extend(new_data);
        }
    }
}
