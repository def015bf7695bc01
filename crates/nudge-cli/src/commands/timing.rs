//! Learned timing models stored in the local database.

use clap::Subcommand;
use serde_json::json;

use nudge_core::{Config, DeliveryEvent, SqliteTimingStore, TimingCoordinator};

use super::{parse_at, print_json};

#[derive(Subcommand)]
pub enum TimingAction {
    /// Show the model for a category
    Show { category: String },
    /// List categories with a stored model
    List,
    /// Predict the best delivery time for a category
    Predict {
        category: String,
        /// Search window in hours (default from config)
        #[arg(long)]
        within: Option<u32>,
        /// Start of the window (RFC 3339, default now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Feed a delivery event (JSON) into its category's model
    Record {
        /// e.g. {"type":"Opened","category":"goal","notification_id":"n1",...}
        event: String,
    },
    /// Forget everything learned for a category
    Reset { category: String },
    /// Age every model toward neutral
    Decay {
        /// Decay factor in (0, 1] (default from config)
        #[arg(long)]
        factor: Option<f64>,
    },
}

fn open() -> Result<TimingCoordinator, Box<dyn std::error::Error>> {
    let store = SqliteTimingStore::open()?;
    tracing::debug!("opened timing store");
    Ok(TimingCoordinator::with_store(store))
}

pub fn run(action: TimingAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimingAction::Show { category } => {
            let model = open()?.snapshot(&category)?;
            print_json(&json!({
                "model": model,
                "engagementScore": model.engagement_score(),
                "isModelReady": model.is_model_ready(),
            }))?;
        }
        TimingAction::List => {
            let timing = open()?;
            for category in timing.categories()? {
                let model = timing.snapshot(&category)?;
                println!(
                    "{category}\tsent={}\topened={}\tconfidence={:.2}",
                    model.total_sent(),
                    model.total_opened(),
                    model.confidence_score()
                );
            }
        }
        TimingAction::Predict {
            category,
            within,
            at,
        } => {
            let within = within
                .unwrap_or_else(|| Config::load_or_default().timing.prediction_window_hours);
            let now = parse_at(at.as_deref())?;
            match open()?.predict_best_time(&category, &now, within)? {
                Some(best) => println!("{}", best.to_rfc3339()),
                None => println!("model not ready; send now"),
            }
        }
        TimingAction::Record { event } => {
            let event: DeliveryEvent = serde_json::from_str(&event)?;
            open()?.apply(&event)?;
            println!("recorded {} for {}", event.notification_id(), event.category());
        }
        TimingAction::Reset { category } => {
            open()?.reset(&category)?;
            println!("timing model reset: {category}");
        }
        TimingAction::Decay { factor } => {
            let factor = factor.unwrap_or_else(|| Config::load_or_default().timing.decay_factor);
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(format!("decay factor must be in (0, 1], got {factor}").into());
            }
            let timing = open()?;
            timing.apply_decay_all(factor)?;
            println!("decayed {} models by {factor}", timing.categories()?.len());
        }
    }
    Ok(())
}
