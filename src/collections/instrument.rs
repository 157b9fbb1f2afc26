//! Optional operation accounting for the containers.
//!
//! A store is handed an [`Instrument`] at construction instead of bumping
//! global counters. The default [`NoInstrument`] is zero-sized and compiles away.

use std::cell::Cell;
use std::rc::Rc;

/// Container operation being accounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Insert,
    Find,
    Erase,
    Visit,
}

/// Receives one record per container operation.
///
/// `steps` is the number of chain entries walked by the operation.
pub trait Instrument {
    fn record(&self, op: StoreOp, steps: usize);
}

/// Instrument that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInstrument;

impl Instrument for NoInstrument {
    #[inline(always)]
    fn record(&self, _op: StoreOp, _steps: usize) {}
}

impl<I: Instrument + ?Sized> Instrument for &I {
    #[inline]
    fn record(&self, op: StoreOp, steps: usize) {
        (**self).record(op, steps)
    }
}

impl<I: Instrument + ?Sized> Instrument for Rc<I> {
    #[inline]
    fn record(&self, op: StoreOp, steps: usize) {
        (**self).record(op, steps)
    }
}

/// Point-in-time copy of an [`OpCounters`] tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpTally {
    pub inserts: u64,
    pub finds: u64,
    pub erases: u64,
    pub visits: u64,
    /// Chain entries walked across all operations.
    pub steps: u64,
}

/// Single-threaded operation counters.
#[derive(Debug, Default)]
pub struct OpCounters {
    inserts: Cell<u64>,
    finds: Cell<u64>,
    erases: Cell<u64>,
    visits: Cell<u64>,
    steps: Cell<u64>,
}

impl OpCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> OpTally {
        OpTally {
            inserts: self.inserts.get(),
            finds: self.finds.get(),
            erases: self.erases.get(),
            visits: self.visits.get(),
            steps: self.steps.get(),
        }
    }

    /// Zero every counter, returning the tally accumulated so far.
    pub fn reset(&self) -> OpTally {
        let tally = self.snapshot();
        for cell in [&self.inserts, &self.finds, &self.erases, &self.visits, &self.steps] {
            cell.set(0);
        }
        tally
    }
}

impl Instrument for OpCounters {
    fn record(&self, op: StoreOp, steps: usize) {
        let counter = match op {
            StoreOp::Insert => &self.inserts,
            StoreOp::Find => &self.finds,
            StoreOp::Erase => &self.erases,
            StoreOp::Visit => &self.visits,
        };
        counter.set(counter.get() + 1);
        self.steps.set(self.steps.get() + steps as u64);
    }
}
