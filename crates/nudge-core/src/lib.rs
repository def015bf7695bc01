//! # Nudge Core Library
//!
//! Decides which notification to show, when to show it, and whether now is
//! a good moment at all. The library is synchronous and does no network
//! I/O; the `nudge` CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Priority**: pure scoring functions that turn contact, goal, streak
//!   and suggestion signals into a level, a clamped score and an expiry
//! - **Timing**: a per-category online model learning at which hours and
//!   weekdays the user engages
//! - **Context**: a gate scoring the user's current situation, plus
//!   declarative rules refining it
//! - **Queue**: candidates in dispatch order with lazy expiry
//! - **Dispatch**: the glue applying quota, throttling, gate and rules,
//!   and feeding delivery outcomes back into timing
//! - **Storage**: SQLite persistence for timing models and TOML configuration
//!
//! ## Key Components
//!
//! - [`score_contact`], [`score_goal`], [`score_streak`], [`score_suggestion`]
//! - [`TimingModel`] and [`TimingCoordinator`]
//! - [`ContextGate`] and [`ContextRuleSet`]
//! - [`PriorityQueue`]
//! - [`Dispatcher`]

pub mod context;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod priority;
pub mod queue;
pub mod storage;
pub mod timing;

pub use context::{
    ContextGate, ContextHistory, ContextRule, ContextRuleSet, GateDecision, UserContext,
};
pub use dispatch::{DispatchOutcome, Dispatcher, HoldReason};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::DeliveryEvent;
pub use priority::{
    score_contact, score_goal, score_streak, score_suggestion, ContactFrequency,
    NotificationPriority, PriorityLevel,
};
pub use queue::{PriorityQueue, PriorityQueueItem, QueueStatistics};
pub use storage::{Config, SqliteTimingStore, TimingStore};
pub use timing::{TimingCoordinator, TimingModel};
