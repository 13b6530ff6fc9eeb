use crate::models::{Category, MilestonesDoc, ResourcingTable, Roster};

use super::parse_allocations;

/// Rebuild a quarter's resourcing table from its milestones.
///
/// Every milestone's allocation is added into its (category, person) cell and
/// each cell is then capped at 100. Over-allocation is capped, not rescaled.
/// The result never depends on a previous table, so calling this again on
/// the same milestones gives the same table.
pub fn compute_quarterly_from_milestones(
    milestones: &MilestonesDoc,
    quarter: &str,
    roster: &Roster,
) -> ResourcingTable {
    let mut table = ResourcingTable::zeroed(roster);

    if let Some(by_category) = milestones.get(quarter) {
        for category in Category::ALL {
            let Some(items) = by_category.get(&category) else {
                continue;
            };
            for milestone in items {
                for entry in parse_allocations(milestone.raw_allocation()) {
                    table.add(category, &entry.person, entry.percent);
                }
            }
        }
    }

    table.clamp();
    table
}
