//! Adaptive delivery timing.
//!
//! One [`TimingModel`] per notification category learns when the user
//! engages; the [`TimingCoordinator`] owns those models and serializes
//! updates per category.

mod coordinator;
mod model;

pub use coordinator::TimingCoordinator;
pub use model::{
    TimingModel, DAYS_PER_WEEK, DEFAULT_DECAY_FACTOR, HOURS_PER_DAY, LEARNING_RATE,
    NEUTRAL_ENGAGEMENT,
};
