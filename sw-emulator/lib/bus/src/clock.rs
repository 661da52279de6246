/*++

Licensed under the Apache-2.0 license.

File Name:

    clock.rs

Abstract:

    File contains Clock and Timer types, used to implement timer-based deferred
    execution for peripherals.

--*/
use std::{
    cell::{Cell, RefCell},
    collections::BTreeSet,
    rc::Rc,
};

use crate::Bus;

/// Peripherals that want to use timer-based deferred execution will typically
/// store a clone of Timer inside themselves, and use it to schedule future
/// notification via [`Bus::poll`].
///
/// # Example
///
/// ```
/// use caravel_emu_bus::{ActionHandle, Bus, BusError, Clock, Timer};
/// use caravel_emu_types::{RvAddr, RvData, RvSize};
/// struct MyPeriph {
///     timer: Timer,
///     action0: Option<ActionHandle>,
/// }
/// impl Bus for MyPeriph {
///     fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
///         Ok(0)
///     }
///     fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
///         // If a timer action was previously scheduled, cancel it
///         if let Some(action0) = self.action0.take() {
///             self.timer.cancel(action0);
///         }
///         self.action0 = Some(self.timer.schedule_poll_in(1000));
///         Ok(())
///     }
///     fn poll(&mut self) {
///         if self.timer.fired(&mut self.action0) {
///             println!("It is 1000 clock cycles after the last write to MyPeriph.")
///         }
///     }
/// }
/// ```
#[derive(Clone)]
pub struct Timer {
    clock: Rc<ClockImpl>,
}
impl Timer {
    /// Constructs a new timer bound to the specified clock.
    pub fn new(clock: &Clock) -> Self {
        Self {
            clock: Rc::clone(&clock.clock),
        }
    }

    /// Returns the number of clock cycles that have elapsed since simulation
    /// start.
    #[inline]
    pub fn now(&self) -> u64 {
        self.clock.now.get()
    }

    /// If the scheduled time for `action` has come, `action` will be set to
    /// None and the function will return true. Otherwise (or if action is None),
    /// the function will return false.
    pub fn fired(&self, action: &mut Option<ActionHandle>) -> bool {
        let has_fired = match action {
            Some(handle) => {
                debug_assert_eq!(
                    handle.clock_ptr,
                    Rc::as_ptr(&self.clock),
                    "Supplied action was not created by this timer."
                );
                handle.time <= self.now()
            }
            None => false,
        };
        if has_fired {
            *action = None;
        }
        has_fired
    }

    /// Schedules a future call to [`Bus::poll()`] at `time`.
    pub fn schedule_poll_at(&self, time: u64) -> ActionHandle {
        self.clock.schedule_poll_at(time)
    }

    /// Schedules a future call to [`Bus::poll()`] `ticks_from_now` cycles
    /// from now.
    pub fn schedule_poll_in(&self, ticks_from_now: u64) -> ActionHandle {
        self.schedule_poll_at(self.now().saturating_add(ticks_from_now))
    }

    /// Cancels a previously scheduled poll action.
    ///
    /// # Panics
    ///
    /// Panics if the supplied `ActionHandle` was not created by this Timer.
    pub fn cancel(&self, handle: ActionHandle) {
        assert_eq!(
            handle.clock_ptr,
            Rc::as_ptr(&self.clock),
            "Supplied action was not created by this timer."
        );
        self.clock.pending.borrow_mut().remove(&(handle.time, handle.id));
    }
}

/// The simulated clock. Every call to [`Clock::increment`] represents one or
/// more clock edges.
pub struct Clock {
    clock: Rc<ClockImpl>,
}
impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
impl Clock {
    /// Constructs a new Clock with the cycle counter set to 0.
    pub fn new() -> Clock {
        Self {
            clock: Rc::new(ClockImpl {
                now: Cell::new(0),
                next_id: Cell::new(0),
                pending: RefCell::new(BTreeSet::new()),
            }),
        }
    }

    /// Constructs a `Timer` associated with this clock.
    pub fn timer(&self) -> Timer {
        Timer::new(self)
    }

    /// Returns the number of simulated clock cycles that have elapsed since
    /// simulation start.
    #[inline]
    pub fn now(&self) -> u64 {
        self.clock.now.get()
    }

    /// Increments the clock by `delta`, and returns true if any scheduled
    /// poll came due.
    pub fn increment(&self, delta: u64) -> bool {
        let now = self.now().checked_add(delta).unwrap_or_else(|| {
            panic!("Cannot increment the current time past {} clock cycles.", u64::MAX)
        });
        self.clock.now.set(now);

        let mut pending = self.clock.pending.borrow_mut();
        let mut fired = false;
        while let Some(&(time, id)) = pending.iter().next() {
            if time > now {
                break;
            }
            pending.remove(&(time, id));
            fired = true;
        }
        fired
    }

    /// Increments the clock by `delta`, and polls the bus if any scheduled
    /// timer actions fired.
    pub fn increment_and_poll(&self, delta: u64, bus: &mut (impl Bus + ?Sized)) -> bool {
        let fired = self.increment(delta);
        if fired {
            bus.poll();
        }
        fired
    }
}

/// Represents a poll scheduled with a `Timer`. Returned by
/// [`Timer::schedule_poll_at`] and passed to [`Timer::fired`] or
/// [`Timer::cancel`].
#[derive(Debug, Eq, PartialEq)]
pub struct ActionHandle {
    time: u64,
    id: u64,
    // Identification only; keeps handles from one clock out of another.
    clock_ptr: *const ClockImpl,
}

struct ClockImpl {
    now: Cell<u64>,
    next_id: Cell<u64>,
    pending: RefCell<BTreeSet<(u64, u64)>>,
}
impl ClockImpl {
    fn schedule_poll_at(self: &Rc<Self>, time: u64) -> ActionHandle {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.pending.borrow_mut().insert((time, id));
        ActionHandle {
            time,
            id,
            clock_ptr: Rc::as_ptr(self),
        }
    }
}
