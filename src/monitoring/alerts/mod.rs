//! Alert storage, acknowledgement and notification

mod channels;
mod manager;
mod types;

pub use channels::{NotificationChannel, WebhookChannel};
pub use manager::{AlertManager, MAX_ALERTS};
pub use types::AlertStats;
