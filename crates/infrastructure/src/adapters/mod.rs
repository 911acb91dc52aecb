//! Adapters implementing application ports

mod channel_dashboard;
mod mvg_departure_adapter;

pub use channel_dashboard::{ChannelDashboard, DEFAULT_DASHBOARD_CAPACITY};
pub use mvg_departure_adapter::MvgDepartureAdapter;
