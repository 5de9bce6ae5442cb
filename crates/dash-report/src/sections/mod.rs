//! Report section data structures.

pub mod activity;
pub mod churn;
pub mod cohort;
pub mod export;
pub mod overview;
pub mod revenue;
pub mod series;
pub mod top_users;

pub use activity::ActivitySection;
pub use churn::{ChurnRow, ChurnSection};
pub use cohort::CohortSection;
pub use export::ExportSection;
pub use overview::{AppliedFilter, OverviewSection};
pub use revenue::RevenueSection;
pub use series::{CountPoint, ValuePoint};
pub use top_users::{TopUserRow, TopUsersSection};
