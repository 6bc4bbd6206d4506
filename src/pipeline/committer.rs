//! Token commit rules: cooldown plus consecutive-consistency gating.
//!
//! Second debounce layer on top of the smoother's window vote. The window
//! answers "is this the current gesture"; the cooldown and streak here
//! answer "has enough wall-clock time passed since we last committed", so a
//! held gesture cannot flood the output buffer.

use crate::defaults;
use crate::pipeline::types::{CommitAction, StableDecision, TokenKind};
use std::time::{Duration, Instant};

/// Configuration for the token committer.
#[derive(Debug, Clone, Copy)]
pub struct CommitterConfig {
    /// Consecutive stable decisions of the same letter required before it is
    /// appended. Control tokens bypass this gate.
    pub min_consistency: u32,
    /// Minimum spacing between two commits.
    pub cooldown: Duration,
}

impl Default for CommitterConfig {
    fn default() -> Self {
        Self {
            min_consistency: defaults::MIN_CONSISTENCY,
            cooldown: Duration::from_secs_f32(defaults::COOLDOWN_SECS),
        }
    }
}

/// Maps stable decisions to commit actions.
pub struct TokenCommitter {
    config: CommitterConfig,
    last_commit: Option<Instant>,
    streak_label: Option<String>,
    streak: u32,
}

impl TokenCommitter {
    /// Creates a committer with the given configuration.
    pub fn new(config: CommitterConfig) -> Self {
        Self {
            config,
            last_commit: None,
            streak_label: None,
            streak: 0,
        }
    }

    fn in_cooldown(&self, now: Instant) -> bool {
        match self.last_commit {
            Some(last) => now.duration_since(last) < self.config.cooldown,
            None => false,
        }
    }

    fn record_commit(&mut self, now: Instant) {
        self.last_commit = Some(now);
        self.streak = 0;
        self.streak_label = None;
    }

    /// Applies the commit rules to one stable decision.
    ///
    /// Control tokens (space, delete) act immediately under the cooldown.
    /// Letters additionally require `min_consistency` consecutive decisions
    /// of the same label; while only the cooldown blocks, the streak is
    /// retained so the commit fires as soon as the cooldown expires.
    pub fn commit(&mut self, decision: &StableDecision, now: Instant) -> CommitAction {
        match TokenKind::from_label(&decision.label) {
            TokenKind::Nothing | TokenKind::Unknown => CommitAction::Ignore,
            TokenKind::Space => {
                if self.in_cooldown(now) {
                    return CommitAction::Ignore;
                }
                self.record_commit(now);
                CommitAction::InsertSpace
            }
            TokenKind::Delete => {
                if self.in_cooldown(now) {
                    return CommitAction::Ignore;
                }
                self.record_commit(now);
                CommitAction::DeleteLast
            }
            TokenKind::Letter(c) => {
                if self.streak_label.as_deref() == Some(decision.label.as_str()) {
                    self.streak += 1;
                } else {
                    self.streak_label = Some(decision.label.clone());
                    self.streak = 1;
                }

                if self.streak >= self.config.min_consistency && !self.in_cooldown(now) {
                    self.record_commit(now);
                    CommitAction::AppendChar(c)
                } else {
                    CommitAction::Ignore
                }
            }
        }
    }
}
