//! Hosts own lodgings.

use crate::collections::{Instrument, KeyedStore, Sequence};

use super::lodging::Lodging;

/// A lodging owner.
#[derive(Debug, Default)]
pub struct Host {
    /// Identity document, unique per host.
    pub document: u64,
    pub credential: String,
    pub seniority_months: u16,
    /// Average rating, 0.0 to 5.0.
    pub rating: f32,
    /// Codes of the lodgings this host owns.
    pub lodgings: Sequence<u32>,
}

impl Host {
    pub fn attach_lodging(&mut self, code: u32) {
        if !self.lodgings.contains(&code) {
            self.lodgings.push_front(code);
        }
    }

    /// Drop the link to a lodging. Returns whether it was linked.
    pub fn detach_lodging(&mut self, code: u32) -> bool {
        self.lodgings.remove(&code)
    }

    pub fn owns_lodging(&self, code: u32) -> bool {
        self.lodgings.contains(&code)
    }

    /// Lodgings of this host that are present in `store`.
    pub fn resolve_lodgings<'a, I: Instrument>(
        &'a self,
        store: &'a KeyedStore<u32, Lodging, I>,
    ) -> impl Iterator<Item = &'a Lodging> + 'a {
        self.lodgings.iter().filter_map(move |code| store.find(code))
    }
}
