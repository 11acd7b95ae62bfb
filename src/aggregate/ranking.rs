//! Encounter-ordered tallies for top-N views
//!
//! Ranking is a stable sort by value descending, so equal values keep the
//! order in which their keys were first seen.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::AddAssign;

#[derive(Debug, Clone)]
pub struct Tally<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Default for Tally<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> Tally<V>
where
    V: AddAssign + Copy + Default + PartialOrd,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str, value: V) {
        match self.index.get(key) {
            Some(&position) => self.entries[position].1 += value,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                let mut total = V::default();
                total += value;
                self.entries.push((key.to_string(), total));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.index.get(key).map(|&position| self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order their keys were first seen
    pub fn entries(&self) -> &[(String, V)] {
        &self.entries
    }

    /// All entries, value descending, ties in encounter order
    pub fn ranked(&self) -> Vec<(String, V)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked
    }

    pub fn top(&self, n: usize) -> Vec<(String, V)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

impl Tally<u64> {
    pub fn count(&mut self, key: &str) {
        self.add(key, 1);
    }
}
