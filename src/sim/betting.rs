//! Betting and settlement
//!
//! Owns the selected bet, the round phase and the ledger. Every ledger
//! mutation is written through to the store; a failed write is logged and the
//! game carries on.

use serde::{Deserialize, Serialize};

use super::state::GamePhase;
use crate::consts::DICE_COUNT;
use crate::ledger::{BettingLedger, HistoryItem};
use crate::persistence::KeyValueStore;

/// Quick-pick bet amounts
pub const PRESET_BETS: [u64; 4] = [10, 25, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

/// Which payout rule a winning roll matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinRule {
    /// Total of 7 or 11, pays 2x
    Natural,
    /// Both dice equal, pays 3x
    Doubles,
    /// Total of 12, pays 4x. Checked after doubles, so 6+6 never reaches it.
    Jackpot,
}

impl WinRule {
    pub fn multiplier(&self) -> u64 {
        match self {
            WinRule::Natural => 2,
            WinRule::Doubles => 3,
            WinRule::Jackpot => 4,
        }
    }
}

/// Snapshot of a settled round, shown until the player continues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScore {
    pub dice: [u8; DICE_COUNT],
    pub total: u8,
    pub outcome: Outcome,
    pub rule: Option<WinRule>,
    pub payout: u64,
}

impl RoundScore {
    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }
}

/// Settle a roll. First matching rule wins.
pub fn evaluate_roll(bet: u64, dice: [u8; DICE_COUNT]) -> RoundScore {
    let total = dice[0].saturating_add(dice[1]);
    let is_doubles = dice[0] == dice[1];

    let rule = if total == 7 || total == 11 {
        Some(WinRule::Natural)
    } else if is_doubles {
        Some(WinRule::Doubles)
    } else if total == 12 {
        Some(WinRule::Jackpot)
    } else {
        None
    };

    match rule {
        Some(rule) => RoundScore {
            dice,
            total,
            outcome: Outcome::Win,
            rule: Some(rule),
            payout: bet.saturating_mul(rule.multiplier()),
        },
        None => RoundScore {
            dice,
            total,
            outcome: Outcome::Loss,
            rule: None,
            payout: 0,
        },
    }
}

/// Digits-only parse of a typed bet. Non-digits are stripped.
pub fn parse_custom_bet(input: &str) -> Option<u64> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Bet selection, phase transitions and settlement over a persisted ledger
#[derive(Debug)]
pub struct BettingEngine<S: KeyValueStore> {
    ledger: BettingLedger,
    store: S,
    phase: GamePhase,
    /// Currently selected bet (0 = none)
    bet_amount: u64,
    /// Amount debited for the round in progress
    wager: u64,
    score: Option<RoundScore>,
}

impl<S: KeyValueStore> BettingEngine<S> {
    /// Load the ledger from `store` and open in the betting phase
    pub fn new(store: S) -> Self {
        let ledger = BettingLedger::load(&store);
        let mut engine = Self {
            ledger,
            store,
            phase: GamePhase::Betting,
            bet_amount: 0,
            wager: 0,
            score: None,
        };
        engine.ensure_default_bet();
        engine
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn total_points(&self) -> u64 {
        self.ledger.total_points()
    }

    pub fn ledger(&self) -> &BettingLedger {
        &self.ledger
    }

    pub fn history(&self) -> &[HistoryItem] {
        self.ledger.history()
    }

    pub fn bet_amount(&self) -> u64 {
        self.bet_amount
    }

    /// Points at stake in the current round (0 outside Rolling/Result)
    pub fn wager(&self) -> u64 {
        self.wager
    }

    /// Result of the last settled round, while in Result
    pub fn score(&self) -> Option<&RoundScore> {
        self.score.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether `amount` could be wagered right now
    pub fn can_bet(&self, amount: u64) -> bool {
        amount > 0 && amount <= self.ledger.total_points()
    }

    /// Whether a preset button should be enabled
    pub fn preset_enabled(&self, preset: u64) -> bool {
        self.phase == GamePhase::Betting && self.can_bet(preset)
    }

    /// Select a bet. Ignored outside Betting or if unaffordable.
    pub fn select_bet(&mut self, amount: u64) -> bool {
        if self.phase != GamePhase::Betting || !self.can_bet(amount) {
            return false;
        }
        self.bet_amount = amount;
        true
    }

    /// Select one of [`PRESET_BETS`]
    pub fn select_preset(&mut self, preset: u64) -> bool {
        PRESET_BETS.contains(&preset) && self.select_bet(preset)
    }

    /// Select a typed-in amount
    pub fn apply_custom_bet(&mut self, input: &str) -> bool {
        parse_custom_bet(input).is_some_and(|amount| self.select_bet(amount))
    }

    /// With no bet chosen and points available, pick the lowest affordable
    /// preset, or 1 if none fits
    pub fn ensure_default_bet(&mut self) {
        if self.phase != GamePhase::Betting || self.bet_amount != 0 {
            return;
        }
        let total = self.ledger.total_points();
        if total == 0 {
            return;
        }
        self.bet_amount = PRESET_BETS
            .iter()
            .copied()
            .find(|preset| *preset <= total)
            .unwrap_or(1);
    }

    /// Debit the selected bet and start rolling. No-op unless in Betting with
    /// `0 < bet <= total_points`.
    pub fn place_bet(&mut self) -> bool {
        if self.phase != GamePhase::Betting || !self.can_bet(self.bet_amount) {
            return false;
        }
        if !self.ledger.subtract_points(self.bet_amount) {
            return false;
        }
        self.wager = self.bet_amount;
        self.phase = GamePhase::Rolling;
        self.persist();
        log::info!(
            "Bet placed: {} ({} points left)",
            self.wager,
            self.ledger.total_points()
        );
        true
    }

    /// Settle the rolling round with the dice values read off the table.
    /// Ignored outside Rolling.
    pub fn handle_dice_result(&mut self, dice: [u8; DICE_COUNT]) -> Option<RoundScore> {
        if self.phase != GamePhase::Rolling {
            return None;
        }

        let score = evaluate_roll(self.wager, dice);
        if score.is_win() {
            self.ledger.add_points(score.payout);
        }
        self.ledger.add_history(HistoryItem {
            amount: self.wager,
            dice,
            win: score.is_win(),
            payout: score.payout,
        });
        self.score = Some(score);
        self.phase = GamePhase::Result;
        self.persist();

        log::info!(
            "Dice {:?} (total {}): {:?}, payout {}",
            dice,
            score.total,
            score.outcome,
            score.payout
        );
        Some(score)
    }

    /// Leave the result screen for the next round. Ignored outside Result.
    pub fn reset(&mut self) -> bool {
        if self.phase != GamePhase::Result {
            return false;
        }
        self.phase = GamePhase::Betting;
        self.score = None;
        self.wager = 0;
        self.ensure_default_bet();
        true
    }

    /// Restore the starting balance
    pub fn reset_points(&mut self) {
        self.ledger.reset_points();
        self.persist();
        self.ensure_default_bet();
    }

    pub fn clear_history(&mut self) {
        self.ledger.clear_history();
        self.persist();
    }

    /// Write-through save; failures never reach the caller
    fn persist(&mut self) {
        if let Err(e) = self.ledger.save(&mut self.store) {
            log::warn!("Failed to save ledger: {}", e);
        }
    }
}
