/*++

Licensed under the Apache-2.0 license.

File Name:

    bus.rs

Abstract:

    File contains the firmware's view of the management core bus. Every
    access completes immediately and then yields, so each one costs exactly
    one clock cycle.

--*/

use std::{
    cell::RefCell,
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

use caravel_emu_bus::{Bus, BusError, Timer};
use caravel_emu_types::{RvAddr, RvData, RvSize};

/// Handle given to firmware entry points. Cheap to clone; all clones talk to
/// the same bus.
#[derive(Clone)]
pub struct CpuBus {
    bus: Rc<RefCell<dyn Bus>>,
    timer: Timer,
}

impl CpuBus {
    pub(crate) fn new(bus: Rc<RefCell<dyn Bus>>, timer: Timer) -> Self {
        Self { bus, timer }
    }

    /// The current cycle count, as a cycle counter CSR would report it.
    pub fn now(&self) -> u64 {
        self.timer.now()
    }

    pub async fn read_u32(&self, addr: RvAddr) -> Result<RvData, BusError> {
        let result = self.bus.borrow_mut().read(RvSize::Word, addr);
        NextCycle::default().await;
        result
    }

    pub async fn write_u32(&self, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        let result = self.bus.borrow_mut().write(RvSize::Word, addr, val);
        NextCycle::default().await;
        result
    }

    /// Spins for `cycles` clock cycles without touching the bus.
    pub async fn delay(&self, cycles: u64) {
        for _ in 0..cycles {
            NextCycle::default().await;
        }
    }
}

/// Completes on the second poll, handing control back to the clock in
/// between.
#[derive(Default)]
struct NextCycle {
    yielded: bool,
}

impl Future for NextCycle {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            Poll::Pending
        }
    }
}
