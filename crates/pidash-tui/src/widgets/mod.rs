pub mod status_indicator;
pub mod usage_gauge;
