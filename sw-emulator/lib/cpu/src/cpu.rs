/*++

Licensed under the Apache-2.0 license.

File Name:

    cpu.rs

Abstract:

    File contains the management core model. Instead of decoding
    instructions, the core drives a firmware future, polling it once per
    clock cycle.

--*/

use std::{
    cell::{RefCell, RefMut},
    future::Future,
    pin::Pin,
    rc::Rc,
    sync::Arc,
    task::{Context, Poll, Wake, Waker},
};

use caravel_emu_bus::{Bus, BusError, Clock};

use crate::CpuBus;

pub type FwResult = Result<(), BusError>;
type FwFuture = Pin<Box<dyn Future<Output = FwResult>>>;

/// A firmware entry point: called once when the core leaves reset.
pub struct Firmware(Box<dyn FnOnce(CpuBus) -> FwFuture>);

impl Firmware {
    pub fn new<F, Fut>(entry: F) -> Self
    where
        F: FnOnce(CpuBus) -> Fut + 'static,
        Fut: Future<Output = FwResult> + 'static,
    {
        Self(Box::new(move |bus| Box::pin(entry(bus))))
    }

    /// Firmware that never issues a bus access.
    pub fn idle() -> Self {
        Self::new(|_| std::future::pending())
    }
}

impl Default for Firmware {
    fn default() -> Self {
        Self::idle()
    }
}

impl std::fmt::Debug for Firmware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Firmware").field(&"<entry point>").finish()
    }
}

/// Cpu step action
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StepAction {
    /// Continue
    Continue,

    /// Firmware returned from its entry point
    Break,

    /// Firmware returned a bus fault
    Fatal,
}

struct NoopWake;
impl Wake for NoopWake {
    fn wake(self: Arc<Self>) {}
}

enum CoreState {
    Reset,
    Booting { start_at: u64 },
    Running(FwFuture),
    Halted,
}

/// Management core
pub struct Cpu<TBus: Bus + 'static> {
    bus: Rc<RefCell<TBus>>,
    clock: Clock,
    firmware: Option<Firmware>,
    state: CoreState,
    fault: Option<BusError>,
    waker: Waker,
}

impl<TBus: Bus + 'static> Cpu<TBus> {
    /// Create a core held in reset.
    pub fn new(bus: TBus, clock: Clock, firmware: Firmware) -> Self {
        Self {
            bus: Rc::new(RefCell::new(bus)),
            clock,
            firmware: Some(firmware),
            state: CoreState::Reset,
            fault: None,
            waker: Waker::from(Arc::new(NoopWake)),
        }
    }

    /// Direct access to the bus, bypassing the core. Does not consume cycles.
    pub fn bus(&self) -> RefMut<'_, TBus> {
        self.bus.borrow_mut()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Takes the core out of reset; the firmware entry point runs after
    /// `boot_cycles` cycles. Has no effect once the core has left reset.
    pub fn release_reset(&mut self, boot_cycles: u64) {
        if let CoreState::Reset = self.state {
            self.state = CoreState::Booting {
                start_at: self.clock.now().saturating_add(boot_cycles),
            };
        }
    }

    pub fn in_reset(&self) -> bool {
        matches!(self.state, CoreState::Reset)
    }

    pub fn halted(&self) -> bool {
        matches!(self.state, CoreState::Halted)
    }

    /// The bus fault that stopped the firmware, if any.
    pub fn fault(&self) -> Option<BusError> {
        self.fault
    }

    /// Step one clock cycle.
    pub fn step(&mut self) -> StepAction {
        self.clock.increment_and_poll(1, &mut *self.bus.borrow_mut());

        if let CoreState::Booting { start_at } = self.state {
            if self.clock.now() >= start_at {
                let bus: Rc<RefCell<dyn Bus>> = self.bus.clone();
                let entry = self.firmware.take().unwrap_or_default();
                self.state = CoreState::Running((entry.0)(CpuBus::new(bus, self.clock.timer())));
            }
        }

        let CoreState::Running(fw) = &mut self.state else {
            return StepAction::Continue;
        };
        let mut cx = Context::from_waker(&self.waker);
        match fw.as_mut().poll(&mut cx) {
            Poll::Pending => StepAction::Continue,
            Poll::Ready(result) => {
                self.state = CoreState::Halted;
                match result {
                    Ok(()) => StepAction::Break,
                    Err(err) => {
                        self.fault = Some(err);
                        StepAction::Fatal
                    }
                }
            }
        }
    }
}
