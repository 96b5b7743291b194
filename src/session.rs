//! Money and round bookkeeping.
//!
//! [`Session`] is the pure state machine behind a game: it debits drops,
//! credits rewards and tracks whether a ball is in flight.  It knows nothing
//! about bodies; [`crate::round`] pairs each transition with the matching
//! change to the [`crate::world::SimulationWorld`].

use bevy::prelude::*;

use crate::bucket::BucketTable;
use crate::config::GameConfig;
use crate::constants::CURRENCY;
use crate::error::{DropError, SessionError};

/// Whether a ball is currently in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundState {
    #[default]
    Idle,
    BallInFlight,
}

/// How a round ended, as reported by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Bucket(usize),
    Lost,
}

/// Resolved outcome with its payout.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeKind {
    Bucket {
        index: usize,
        reward: i64,
        message: String,
    },
    Lost {
        message: String,
    },
}

impl OutcomeKind {
    pub fn reward(&self) -> i64 {
        match self {
            OutcomeKind::Bucket { reward, .. } => *reward,
            OutcomeKind::Lost { .. } => 0,
        }
    }

    pub fn bucket_index(&self) -> Option<usize> {
        match self {
            OutcomeKind::Bucket { index, .. } => Some(*index),
            OutcomeKind::Lost { .. } => None,
        }
    }
}

/// What one round produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub outcome: OutcomeKind,
    pub new_balance: i64,
}

impl RoundResult {
    /// Player-facing status text: the bucket message, with the payout appended
    /// when there is one.
    pub fn status_text(&self) -> String {
        match &self.outcome {
            OutcomeKind::Bucket {
                reward, message, ..
            } if *reward > 0 => format!("{message} +{reward}{CURRENCY}!"),
            OutcomeKind::Bucket { message, .. } | OutcomeKind::Lost { message } => message.clone(),
        }
    }
}

/// Balance, cost and round state for the running game.
///
/// The balance is signed and never clamped; a negative cost or reward in the
/// configuration is honoured as written.
#[derive(Resource, Debug, Clone)]
pub struct Session {
    balance: i64,
    initial_balance: i64,
    cost_per_drop: i64,
    buckets: BucketTable,
    lost_message: String,
    round: RoundState,
    rounds_played: u64,
    total_won: i64,
}

impl FromWorld for Session {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<GameConfig>().cloned().unwrap_or_default();
        Session::new(&config)
    }
}

impl Session {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            balance: config.rules.initial_money,
            initial_balance: config.rules.initial_money,
            cost_per_drop: config.rules.cost_per_drop,
            buckets: BucketTable::from_config(config),
            lost_message: config.rules.lost_message.clone(),
            round: RoundState::Idle,
            rounds_played: 0,
            total_won: 0,
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn cost_per_drop(&self) -> i64 {
        self.cost_per_drop
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    pub fn is_idle(&self) -> bool {
        self.round == RoundState::Idle
    }

    pub fn buckets(&self) -> &BucketTable {
        &self.buckets
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    pub fn total_won(&self) -> i64 {
        self.total_won
    }

    /// Pay for a drop and enter `BallInFlight`.
    ///
    /// The round state is checked before funds, so a ball in flight is
    /// reported even when the player is also broke.  On error nothing
    /// changes.
    pub fn request_drop(&mut self) -> Result<(), DropError> {
        if self.round != RoundState::Idle {
            return Err(DropError::RoundInProgress);
        }
        if self.balance < self.cost_per_drop {
            return Err(DropError::InsufficientFunds {
                balance: self.balance,
                cost: self.cost_per_drop,
            });
        }
        self.balance -= self.cost_per_drop;
        self.round = RoundState::BallInFlight;
        Ok(())
    }

    /// Credit the outcome and return to `Idle`.
    ///
    /// A bucket index outside the table is treated as lost.
    pub fn resolve(&mut self, outcome: Outcome) -> Result<RoundResult, SessionError> {
        if self.round != RoundState::BallInFlight {
            return Err(SessionError::NoRoundInFlight);
        }

        let outcome = match outcome {
            Outcome::Bucket(index) => match self.buckets.get(index) {
                Some(bucket) => OutcomeKind::Bucket {
                    index,
                    reward: bucket.reward,
                    message: bucket.message.clone(),
                },
                None => {
                    warn!(
                        "bucket index {index} out of range (0..{}); treating as lost",
                        self.buckets.len()
                    );
                    self.lost()
                }
            },
            Outcome::Lost => self.lost(),
        };

        let reward = outcome.reward();
        self.balance += reward;
        self.total_won += reward;
        self.rounds_played += 1;
        self.round = RoundState::Idle;

        Ok(RoundResult {
            outcome,
            new_balance: self.balance,
        })
    }

    /// Start over with the initial balance.  Only legal while idle.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.round != RoundState::Idle {
            return Err(SessionError::RoundInProgress);
        }
        self.balance = self.initial_balance;
        self.rounds_played = 0;
        self.total_won = 0;
        Ok(())
    }

    fn lost(&self) -> OutcomeKind {
        OutcomeKind::Lost {
            message: self.lost_message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(balance: i64) -> Session {
        let mut config = GameConfig::default();
        config.rules.initial_money = balance;
        Session::new(&config)
    }

    #[test]
    fn drop_debits_cost_and_enters_flight() {
        let mut session = session_with(10);
        assert_eq!(session.request_drop(), Ok(()));
        assert_eq!(session.balance(), 9);
        assert_eq!(session.round(), RoundState::BallInFlight);
    }

    #[test]
    fn broke_player_cannot_drop() {
        let mut session = session_with(0);
        assert_eq!(
            session.request_drop(),
            Err(DropError::InsufficientFunds {
                balance: 0,
                cost: 1
            })
        );
        assert_eq!(session.balance(), 0);
        assert!(session.is_idle());
    }

    #[test]
    fn second_drop_while_in_flight_is_refused() {
        let mut session = session_with(10);
        session.request_drop().unwrap();
        assert_eq!(session.request_drop(), Err(DropError::RoundInProgress));
        assert_eq!(session.balance(), 9);
    }

    #[test]
    fn round_state_is_checked_before_funds() {
        let mut session = session_with(1);
        session.request_drop().unwrap();
        assert_eq!(session.request_drop(), Err(DropError::RoundInProgress));
        assert_eq!(session.balance(), 0);
        assert_eq!(session.round(), RoundState::BallInFlight);
    }

    #[test]
    fn jackpot_follows_the_balance_law() {
        let mut session = session_with(10);
        session.request_drop().unwrap();
        let result = session.resolve(Outcome::Bucket(3)).unwrap();
        assert_eq!(result.new_balance, 10 - 1 + 25);
        assert_eq!(result.outcome.bucket_index(), Some(3));
        assert_eq!(result.status_text(), "** JACKPOT! ** +25€!");
        assert!(session.is_idle());
        assert_eq!(session.rounds_played(), 1);
        assert_eq!(session.total_won(), 25);
    }

    #[test]
    fn zero_reward_bucket_shows_message_only() {
        let mut session = session_with(10);
        session.request_drop().unwrap();
        let result = session.resolve(Outcome::Bucket(0)).unwrap();
        assert_eq!(result.new_balance, 9);
        assert_eq!(result.status_text(), session.buckets().get(0).unwrap().message);
    }

    #[test]
    fn lost_ball_pays_nothing() {
        let mut session = session_with(10);
        session.request_drop().unwrap();
        let result = session.resolve(Outcome::Lost).unwrap();
        assert_eq!(result.new_balance, 9);
        assert_eq!(result.status_text(), "Ball lost!");
    }

    #[test]
    fn out_of_range_bucket_counts_as_lost() {
        let mut session = session_with(10);
        session.request_drop().unwrap();
        let result = session.resolve(Outcome::Bucket(99)).unwrap();
        assert!(matches!(result.outcome, OutcomeKind::Lost { .. }));
        assert_eq!(result.new_balance, 9);
    }

    #[test]
    fn resolving_while_idle_is_an_error() {
        let mut session = session_with(10);
        assert_eq!(
            session.resolve(Outcome::Lost),
            Err(SessionError::NoRoundInFlight)
        );
        assert_eq!(session.balance(), 10);
    }

    #[test]
    fn restart_restores_initial_balance_only_when_idle() {
        let mut session = session_with(3);
        session.request_drop().unwrap();
        assert_eq!(session.restart(), Err(SessionError::RoundInProgress));
        session.resolve(Outcome::Bucket(3)).unwrap();
        assert_eq!(session.balance(), 27);
        assert_eq!(session.restart(), Ok(()));
        assert_eq!(session.balance(), 3);
        assert_eq!(session.rounds_played(), 0);
    }

    #[test]
    fn balance_may_go_negative_with_negative_rewards() {
        let mut config = GameConfig::default();
        config.rules.initial_money = 1;
        config.rules.bucket_rewards = vec![-5, 1, 2, 25, 2, 1, 0];
        let mut session = Session::new(&config);
        session.request_drop().unwrap();
        assert_eq!(session.resolve(Outcome::Bucket(0)).unwrap().new_balance, -5);
    }
}
