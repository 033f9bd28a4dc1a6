//! Point balance and betting history
//!
//! Persisted under a fixed key, most recent bet first, capped at 20 entries.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};

/// Maximum number of settled bets to keep
pub const MAX_HISTORY: usize = 20;

/// Balance for a brand new player
pub const INITIAL_POINTS: u64 = 1000;

/// Entries shown in the "recent results" list
pub const RECENT_RESULTS: usize = 5;

/// One settled bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Points wagered
    pub amount: u64,
    /// Face values read off the dice
    pub dice: [u8; 2],
    pub win: bool,
    /// Points credited (0 on a loss)
    pub payout: u64,
}

/// Balance plus bounded bet history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingLedger {
    total_points: u64,
    #[serde(default)]
    betting_history: Vec<HistoryItem>,
}

impl Default for BettingLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl BettingLedger {
    /// Storage key for the persisted ledger
    pub const STORAGE_KEY: &'static str = "dice-betting-storage";

    /// Fresh ledger with the starting balance
    pub fn new() -> Self {
        Self {
            total_points: INITIAL_POINTS,
            betting_history: Vec::with_capacity(MAX_HISTORY),
        }
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    /// Settled bets, most recent first
    pub fn history(&self) -> &[HistoryItem] {
        &self.betting_history
    }

    /// The first `n` entries of the history
    pub fn recent(&self, n: usize) -> &[HistoryItem] {
        &self.betting_history[..n.min(self.betting_history.len())]
    }

    pub fn add_points(&mut self, amount: u64) {
        self.total_points = self.total_points.saturating_add(amount);
    }

    /// Debit `amount`. Returns false and leaves the balance alone if it
    /// would go negative.
    pub fn subtract_points(&mut self, amount: u64) -> bool {
        match self.total_points.checked_sub(amount) {
            Some(remaining) => {
                self.total_points = remaining;
                true
            }
            None => false,
        }
    }

    /// Back to the starting balance (history untouched)
    pub fn reset_points(&mut self) {
        self.total_points = INITIAL_POINTS;
    }

    /// Prepend a settled bet, evicting the oldest past the cap
    pub fn add_history(&mut self, item: HistoryItem) {
        self.betting_history.insert(0, item);
        self.betting_history.truncate(MAX_HISTORY);
    }

    pub fn clear_history(&mut self) {
        self.betting_history.clear();
    }

    /// Load the ledger, falling back to a fresh one if nothing usable is stored
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match load_json::<Self, S>(store, Self::STORAGE_KEY) {
            Ok(Some(mut ledger)) => {
                ledger.betting_history.truncate(MAX_HISTORY);
                log::info!(
                    "Loaded ledger: {} points, {} bets",
                    ledger.total_points,
                    ledger.betting_history.len()
                );
                ledger
            }
            Ok(None) => {
                log::info!("No ledger found, starting with {} points", INITIAL_POINTS);
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding unreadable ledger: {}", e);
                Self::new()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::debug!(
            "Ledger saved ({} points, {} bets)",
            self.total_points,
            self.betting_history.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn item(amount: u64) -> HistoryItem {
        HistoryItem {
            amount,
            dice: [1, 3],
            win: false,
            payout: 0,
        }
    }

    #[test]
    fn test_new_ledger() {
        let ledger = BettingLedger::new();
        assert_eq!(ledger.total_points(), 1000);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_subtract_refuses_overdraft() {
        let mut ledger = BettingLedger::new();
        assert!(!ledger.subtract_points(1001));
        assert_eq!(ledger.total_points(), 1000);
        assert!(ledger.subtract_points(1000));
        assert_eq!(ledger.total_points(), 0);
    }

    #[test]
    fn test_history_most_recent_first_and_capped() {
        let mut ledger = BettingLedger::new();
        for i in 1..=25 {
            ledger.add_history(item(i));
        }
        assert_eq!(ledger.history().len(), MAX_HISTORY);
        assert_eq!(ledger.history()[0].amount, 25);
        assert_eq!(ledger.history()[MAX_HISTORY - 1].amount, 6);
        assert_eq!(ledger.recent(RECENT_RESULTS).len(), 5);
        assert_eq!(ledger.recent(100).len(), MAX_HISTORY);
    }

    #[test]
    fn test_reset_points_keeps_history() {
        let mut ledger = BettingLedger::new();
        ledger.subtract_points(400);
        ledger.add_history(item(400));
        ledger.reset_points();
        assert_eq!(ledger.total_points(), INITIAL_POINTS);
        assert_eq!(ledger.history().len(), 1);
        ledger.clear_history();
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut ledger = BettingLedger::new();
        ledger.subtract_points(50);
        ledger.add_history(HistoryItem {
            amount: 50,
            dice: [3, 4],
            win: true,
            payout: 100,
        });
        ledger.add_points(100);
        ledger.save(&mut store).unwrap();

        let loaded = BettingLedger::load(&store);
        assert_eq!(loaded, ledger);
        assert_eq!(loaded.total_points(), 1050);
    }

    #[test]
    fn test_stored_format_uses_camel_case() {
        let mut store = MemoryStore::new();
        BettingLedger::new().save(&mut store).unwrap();
        let json = store.get(BettingLedger::STORAGE_KEY).unwrap().unwrap();
        assert!(json.contains("\"totalPoints\":1000"));
        assert!(json.contains("\"bettingHistory\":[]"));
    }

    #[test]
    fn test_corrupt_or_negative_ledger_starts_fresh() {
        let mut store = MemoryStore::new();
        store.set(BettingLedger::STORAGE_KEY, "garbage").unwrap();
        assert_eq!(BettingLedger::load(&store), BettingLedger::new());

        store
            .set(BettingLedger::STORAGE_KEY, r#"{"totalPoints":-5,"bettingHistory":[]}"#)
            .unwrap();
        assert_eq!(BettingLedger::load(&store), BettingLedger::new());
    }

    #[test]
    fn test_missing_history_field_defaults_empty() {
        let mut store = MemoryStore::new();
        store.set(BettingLedger::STORAGE_KEY, r#"{"totalPoints":77}"#).unwrap();
        let ledger = BettingLedger::load(&store);
        assert_eq!(ledger.total_points(), 77);
        assert!(ledger.history().is_empty());
    }
}
