//! Domain models for the Bardo dashboard.
//!
//! # Core Concepts
//!
//! ## Planning
//!
//! - [`Category`]: The closed set of work streams every view is split by.
//! - [`Roster`]: The team members resourcing tables are populated for.
//! - [`Milestone`]: A quarterly deliverable with a raw allocation string.
//! - [`WeeklyTask`]: One person's planned work for a week.
//!
//! ## Derived
//!
//! - [`ResourcingTable`]: Quarterly category × person grid, recomputed from
//!   milestones and capped at 100 per cell.
//! - [`WeeklyResourcing`]: Person × category sums of a week's tasks, uncapped.
//!
//! ## Logs
//!
//! - [`DailyEntry`]: Free-text standup notes keyed by date and person.
//! - [`WeekSnapshot`]: Copies of weekly plans kept for the history view.

mod category;
mod daily;
mod history;
mod milestone;
mod percent;
mod resourcing;
mod task;

pub use category::*;
pub use daily::*;
pub use history::*;
pub use milestone::*;
pub use resourcing::*;
pub use task::*;
