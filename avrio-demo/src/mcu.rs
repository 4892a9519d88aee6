//! Simulated interrupt controller
//!
//! Models what the AVR core does with interrupts: a request sets a pending
//! flag; while the global interrupt flag is set, pending vectors are
//! serviced lowest vector number first, each with interrupts disabled for
//! the duration of its handler.

use log::warn;
use portable_atomic::{AtomicU32, Ordering};

use avrio_core::sync::{synchronized, Synchronized};
use avrio_core::{Vector, VectorTable};
use avrio_hal::InterruptControl;
use avrio_hal_host::SimInterrupts;

/// ATmega328P interrupt system on the host
pub struct SimMcu<'a> {
    irq: &'a SimInterrupts,
    table: VectorTable<'a>,
    /// One bit per vector index
    pending: AtomicU32,
    /// Requests that found no handler bound
    spurious: AtomicU32,
}

impl<'a> SimMcu<'a> {
    /// MCU using `irq` as its global interrupt flag, nothing bound
    pub fn new(irq: &'a SimInterrupts) -> Self {
        Self {
            irq,
            table: VectorTable::new(),
            pending: AtomicU32::new(0),
            spurious: AtomicU32::new(0),
        }
    }

    /// Handler table, for binding at startup
    pub fn vectors(&mut self) -> &mut VectorTable<'a> {
        &mut self.table
    }

    /// Global interrupt flag
    pub fn interrupts(&self) -> &'a SimInterrupts {
        self.irq
    }

    /// Request an interrupt
    ///
    /// Serviced at once unless interrupts are disabled, in which case it
    /// stays pending until they are enabled again.
    pub fn raise(&self, vector: Vector) {
        self.pending.fetch_or(1 << vector.index(), Ordering::AcqRel);
        self.service_pending();
    }

    pub fn is_pending(&self, vector: Vector) -> bool {
        self.pending.load(Ordering::Acquire) & (1 << vector.index()) != 0
    }

    /// Run handlers for all pending requests while interrupts are enabled
    ///
    /// Returns the number of requests serviced.
    pub fn service_pending(&self) -> usize {
        let mut serviced = 0;
        while self.irq.is_enabled() {
            let pending = self.pending.load(Ordering::Acquire);
            if pending == 0 {
                break;
            }
            let index = pending.trailing_zeros() as usize;
            self.pending.fetch_and(!(1 << index), Ordering::AcqRel);
            let vector = Vector::ALL[index];

            // The core clears I on entry and RETI sets it again
            let _guard = Synchronized::new(self.irq);
            if !self.table.invoke(vector) {
                self.spurious.fetch_add(1, Ordering::Relaxed);
                warn!("no handler bound for {:?}", vector);
            }
            serviced += 1;
        }
        serviced
    }

    /// Run `f` with interrupts disabled, then service what it left pending
    pub fn synchronized<R>(&self, f: impl FnOnce() -> R) -> R {
        let result = synchronized(self.irq, f);
        self.service_pending();
        result
    }

    /// Requests that found no handler
    pub fn spurious(&self) -> u32 {
        self.spurious.load(Ordering::Relaxed)
    }
}
