//! Singly linked sequence of non-owning payloads.
//!
//! Nodes are owned by the sequence; payloads are meant to be cheap handles
//! (keys, shared references) to data owned elsewhere. Two insertion disciplines
//! coexist: O(1) [`Sequence::push_front`] and comparator-driven
//! [`Sequence::insert_sorted`], which keeps an already ordered sequence ordered.

use std::fmt;
use std::iter::FusedIterator;

type Link<T> = Option<Box<Node<T>>>;

struct Node<T> {
    value: T,
    next: Link<T>,
}

/// Singly linked list with a tracked length.
pub struct Sequence<T> {
    head: Link<T>,
    len: usize,
}

impl<T> Sequence<T> {
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// First payload, if any.
    pub fn head(&self) -> Option<&T> {
        self.head.as_deref().map(|node| &node.value)
    }

    pub fn push_front(&mut self, value: T) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { value, next }));
        self.len += 1;
    }

    /// Insert `value` before the first element it precedes, or at the tail.
    ///
    /// `precedes(a, b)` must mean "a strictly comes before b". The sequence is
    /// assumed to already be ordered by `precedes`; elements that compare equal
    /// keep their insertion order.
    pub fn insert_sorted<F>(&mut self, value: T, mut precedes: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let position = self
            .iter()
            .position(|existing| precedes(&value, existing))
            .unwrap_or(self.len);

        let slot = self.link_at(position);
        let next = slot.take();
        *slot = Some(Box::new(Node { value, next }));
        self.len += 1;
    }

    /// Remove and return the first payload matching `pred`.
    pub fn remove_where<F>(&mut self, pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let position = self.iter().position(pred)?;
        let slot = self.link_at(position);
        let node = slot.take()?;
        let Node { value, next } = *node;
        *slot = next;
        self.len -= 1;
        Some(value)
    }

    /// Consume the sequence, dropping every payload in order.
    ///
    /// This is the one place payloads are released on purpose; taking `self`
    /// makes a second call impossible.
    pub fn dispose_payloads(mut self) {
        let mut link = self.head.take();
        self.len = 0;
        while let Some(node) = link {
            let Node { value, next } = *node;
            drop(value);
            link = next;
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
            remaining: self.len,
        }
    }

    /// Link slot holding the node at `position` (or the tail slot).
    fn link_at(&mut self, position: usize) -> &mut Link<T> {
        let mut slot = &mut self.head;
        for _ in 0..position {
            match slot {
                Some(node) => slot = &mut node.next,
                None => break,
            }
        }
        slot
    }
}

impl<T: PartialEq> Sequence<T> {
    /// Remove the first payload equal to `value`; `false` if there is none.
    pub fn remove(&mut self, value: &T) -> bool {
        self.remove_where(|candidate| candidate == value).is_some()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|candidate| candidate == value)
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Sequence<T> {
    fn drop(&mut self) {
        // Unlink iteratively so long chains do not recurse through Box drops.
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    /// Builds by front insertion, so the result is in reverse iteration order.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sequence = Self::new();
        for value in iter {
            sequence.push_front(value);
        }
        sequence
    }
}

/// Borrowing iterator over a [`Sequence`], head first.
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
