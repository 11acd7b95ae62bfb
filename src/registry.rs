//! Bounded per-account cache and lock registry
//!
//! Each aggregator owns one `AccountRegistry`. An entry is a typed slot set
//! behind its own async mutex; the mutex doubles as the per-account lock, so
//! slots can only be read or written while it is held.
//!
//! ## Structure
//!
//! ```text
//! structural mutex ─┬─ order:   VecDeque<account>   (FIFO, capacity N)
//!                   └─ entries: HashMap<account, Arc<Mutex<S>>>
//! ```
//!
//! The structural mutex only guards queue + map bookkeeping and is never
//! held across an await. Evicting a key drops its slots and lock together,
//! so only idle entries are evicted: an entry whose lock is held or awaited
//! is skipped in favour of the next-oldest one. When every entry is busy the
//! registry runs over capacity until a later insert finds idle entries.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Cached value of a single slot
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Slot<T> {
    /// Not computed yet
    #[default]
    Vacant,
    /// Computed, upstream had no data
    Absent,
    Filled(T),
}

impl<T> Slot<T> {
    pub fn is_vacant(&self) -> bool {
        matches!(self, Slot::Vacant)
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Slot::Filled(value) => Some(value),
            Slot::Vacant | Slot::Absent => None,
        }
    }

    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Slot::Filled(value),
            None => Slot::Absent,
        }
    }
}

impl<T: Clone> Slot<T> {
    pub fn cloned(&self) -> Option<T> {
        self.get().cloned()
    }
}

/// Typed set of slots cached for one account
pub trait SlotSet: Default + Send + 'static {
    type Kind: Copy + Eq + std::fmt::Debug;

    /// Whether the slot has been computed (filled or explicitly absent)
    fn has(&self, kind: Self::Kind) -> bool;
}

pub type AccountGuard<S> = OwnedMutexGuard<S>;

struct RegistryState<S> {
    order: VecDeque<String>,
    entries: HashMap<String, Arc<AsyncMutex<S>>>,
}

pub struct AccountRegistry<S: SlotSet> {
    name: &'static str,
    capacity: usize,
    state: Mutex<RegistryState<S>>,
}

impl<S: SlotSet> AccountRegistry<S> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            name,
            capacity,
            state: Mutex::new(RegistryState {
                order: VecDeque::with_capacity(capacity),
                entries: HashMap::with_capacity(capacity),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lock the account's entry, creating it (and evicting the oldest
    /// account when full) on first sight
    pub async fn acquire(&self, account: &str) -> AccountGuard<S> {
        let entry = self.entry_or_insert(account);
        entry.lock_owned().await
    }

    fn entry_or_insert(&self, account: &str) -> Arc<AsyncMutex<S>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = state.entries.get(account) {
            return Arc::clone(entry);
        }

        while state.order.len() >= self.capacity {
            if !self.evict_oldest_idle(&mut state) {
                log::debug!(
                    "⏳ [{}] all {} accounts busy, admitting {} over capacity",
                    self.name,
                    state.order.len(),
                    account
                );
                break;
            }
        }

        let entry = Arc::new(AsyncMutex::new(S::default()));
        state.order.push_back(account.to_string());
        state.entries.insert(account.to_string(), Arc::clone(&entry));
        entry
    }

    /// An entry is idle when the map holds the only reference to it: no
    /// guard is alive and no task is waiting on the lock.
    fn evict_oldest_idle(&self, state: &mut RegistryState<S>) -> bool {
        let position = state.order.iter().position(|account| {
            state
                .entries
                .get(account)
                .map_or(true, |entry| Arc::strong_count(entry) == 1)
        });

        let Some(evicted) = position.and_then(|position| state.order.remove(position)) else {
            return false;
        };
        state.entries.remove(&evicted);
        log::debug!("🧹 [{}] evicted account {}", self.name, evicted);
        true
    }

    fn existing(&self, account: &str) -> Option<Arc<AsyncMutex<S>>> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.get(account).map(Arc::clone)
    }

    /// Whether the slot is cached; waits for an in-flight pass on the account
    pub async fn has_slot(&self, account: &str, kind: S::Kind) -> bool {
        match self.existing(account) {
            Some(entry) => entry.lock().await.has(kind),
            None => false,
        }
    }

    pub fn contains(&self, account: &str) -> bool {
        self.existing(account).is_some()
    }

    pub fn len(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tracked accounts, oldest first
    pub fn tracked(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.order.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestKind {
        Total,
    }

    #[derive(Default)]
    struct TestSlots {
        total: Slot<u64>,
    }

    impl SlotSet for TestSlots {
        type Kind = TestKind;

        fn has(&self, kind: TestKind) -> bool {
            match kind {
                TestKind::Total => !self.total.is_vacant(),
            }
        }
    }

    #[tokio::test]
    async fn test_slots_survive_until_eviction() {
        let registry: AccountRegistry<TestSlots> = AccountRegistry::new("test", 2);

        {
            let mut guard = registry.acquire("alice").await;
            guard.total = Slot::Filled(7);
        }
        assert!(registry.has_slot("alice", TestKind::Total).await);
        assert_eq!(registry.acquire("alice").await.total.cloned(), Some(7));

        let _ = registry.acquire("bob").await;
        let _ = registry.acquire("carol").await;

        // alice was inserted first and is gone, slots and lock together
        assert!(!registry.contains("alice"));
        assert_eq!(registry.tracked(), vec!["bob".to_string(), "carol".to_string()]);
        assert!(!registry.has_slot("alice", TestKind::Total).await);
        assert!(registry.acquire("alice").await.total.is_vacant());
    }

    #[tokio::test]
    async fn test_fifo_ignores_recent_use() {
        let registry: AccountRegistry<TestSlots> = AccountRegistry::new("test", 2);

        let _ = registry.acquire("a").await;
        let _ = registry.acquire("b").await;
        let _ = registry.acquire("a").await;
        let _ = registry.acquire("c").await;

        assert_eq!(registry.tracked(), vec!["b".to_string(), "c".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_onboarding_keeps_queue_and_map_in_step() {
        let registry: Arc<AccountRegistry<TestSlots>> = Arc::new(AccountRegistry::new("test", 8));

        let mut handles = Vec::new();
        for i in 0..64 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let mut guard = registry.acquire(&format!("account-{}", i)).await;
                guard.total = Slot::Filled(i);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // a quiet insert trims anything admitted over capacity while busy
        let _ = registry.acquire("late").await;

        let tracked = registry.tracked();
        assert_eq!(tracked.len(), 8);
        assert_eq!(registry.len(), 8);
        for account in &tracked {
            assert!(registry.contains(account));
        }
    }

    #[tokio::test]
    async fn test_held_entry_is_not_evicted() {
        let registry: AccountRegistry<TestSlots> = AccountRegistry::new("test", 1);

        let mut held = registry.acquire("alice").await;
        held.total = Slot::Filled(1);

        // alice is busy, bob is admitted over capacity
        let _ = registry.acquire("bob").await;
        assert!(registry.contains("alice"));
        assert_eq!(registry.tracked(), vec!["alice".to_string(), "bob".to_string()]);

        drop(held);
        let _ = registry.acquire("carol").await;
        assert_eq!(registry.tracked(), vec!["carol".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_busy_account_keeps_its_lock_across_onboarding() {
        let registry: Arc<AccountRegistry<TestSlots>> = Arc::new(AccountRegistry::new("test", 1));
        let (locked_tx, locked_rx) = tokio::sync::oneshot::channel();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let holder = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                let mut guard = registry.acquire("alice").await;
                let _ = locked_tx.send(());
                let _ = release_rx.await;
                guard.total = Slot::Filled(42);
            })
        };
        locked_rx.await.unwrap();

        let _ = registry.acquire("bob").await;

        // a second caller for alice queues on the same lock and sees the write
        let waiter = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.acquire("alice").await.total.cloned() })
        };
        tokio::task::yield_now().await;
        let _ = release_tx.send(());

        holder.await.unwrap();
        assert_eq!(waiter.await.unwrap(), Some(42));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let registry: AccountRegistry<TestSlots> = AccountRegistry::new("test", 0);
        assert_eq!(registry.capacity(), 1);
        assert!(registry.is_empty());
    }
}
