//! The Início and Análise tabs: balance cards, the filtered transaction list,
//! the CSV export buttons and the charts.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod list;

pub use handlers::{DashboardState, get_analytics_page, get_dashboard_page};
