use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Delivery outcome reported back by the delivery layer.
///
/// Timestamps keep the user's UTC offset so the timing model learns local
/// hours and weekdays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeliveryEvent {
    Sent {
        category: String,
        notification_id: String,
        at: DateTime<FixedOffset>,
    },
    Opened {
        category: String,
        notification_id: String,
        sent_at: DateTime<FixedOffset>,
        opened_at: DateTime<FixedOffset>,
    },
    Dismissed {
        category: String,
        notification_id: String,
        sent_at: DateTime<FixedOffset>,
        dismissed_at: DateTime<FixedOffset>,
    },
}

impl DeliveryEvent {
    pub fn category(&self) -> &str {
        match self {
            DeliveryEvent::Sent { category, .. }
            | DeliveryEvent::Opened { category, .. }
            | DeliveryEvent::Dismissed { category, .. } => category,
        }
    }

    pub fn notification_id(&self) -> &str {
        match self {
            DeliveryEvent::Sent { notification_id, .. }
            | DeliveryEvent::Opened { notification_id, .. }
            | DeliveryEvent::Dismissed { notification_id, .. } => notification_id,
        }
    }
}
