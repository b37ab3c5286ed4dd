use std::{collections::HashMap, hash::Hash};

/// Share of a section that must be visible before it is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.08;

/// One-way latch per section: a section flips to shown the first time its
/// visible ratio reaches the threshold and never flips back.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealLatch<K: Eq + Hash> {
    shown: HashMap<K, bool>,
    threshold: f64,
}

impl<K: Eq + Hash> RevealLatch<K> {
    pub fn new<I>(sections: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        Self::with_threshold(sections, REVEAL_THRESHOLD)
    }

    pub fn with_threshold<I>(sections: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        Self {
            shown: sections.into_iter().map(|id| (id, false)).collect(),
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Records an observation and returns true only when it revealed the
    /// section. Unknown sections are ignored.
    pub fn observe<Q>(&mut self, section: &Q, visible_ratio: f64) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let Some(shown) = self.shown.get_mut(section) else {
            return false;
        };

        if *shown || visible_ratio.is_nan() || visible_ratio < self.threshold {
            return false;
        }

        *shown = true;
        true
    }

    pub fn is_shown<Q>(&self, section: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.shown.get(section).copied().unwrap_or(false)
    }

    pub fn all_shown(&self) -> bool {
        self.shown.values().all(|shown| *shown)
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}
