pub(crate) mod insights;
pub mod views;

pub use super::evaluation::MatchQuality;
pub use views::MatchabilityReport;

pub(crate) use insights::build_report;
