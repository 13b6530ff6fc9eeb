//! The resourcing allocation model.
//!
//! Everything here is pure: functions take the documents they need and return
//! new values, and none of them fail. Persistence lives in [`crate::dashboard`].

mod calendar;
mod parser;
mod quarterly;
mod render;
mod weekly;

pub use calendar::*;
pub(crate) use parser::parse_percent;
pub use parser::{format_allocations, parse_allocations};
pub use quarterly::compute_quarterly_from_milestones;
pub use render::{render_resourcing, render_weekly};
pub use weekly::compute_weekly_resourcing;
