//! Channel dashboard - Implements DashboardPort over a tokio mpsc channel
//!
//! The monitor task sends events; the presentation owns the receiver.

use application::error::ApplicationError;
use application::ports::{DashboardPort, MonitorEvent};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Default number of events buffered between monitor and renderer
pub const DEFAULT_DASHBOARD_CAPACITY: usize = 16;

/// Sending half of the monitor event channel
#[derive(Debug, Clone)]
pub struct ChannelDashboard {
    sender: mpsc::Sender<MonitorEvent>,
}

impl ChannelDashboard {
    /// Create a dashboard and the receiver its events arrive on
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<MonitorEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl DashboardPort for ChannelDashboard {
    async fn publish(&self, event: MonitorEvent) -> Result<(), ApplicationError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| ApplicationError::DashboardClosed("event receiver dropped".to_string()))
    }
}
