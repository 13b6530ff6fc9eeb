use crate::models::{Roster, WeekPlan, WeeklyResourcing};

/// Sum a week's task percentages per person and category.
///
/// No cap is applied: a person planned for more than 100% stays that way so
/// the dashboard can flag them. Roster members without tasks still get an
/// (empty) row.
pub fn compute_weekly_resourcing(tasks_by_category: &WeekPlan, roster: &Roster) -> WeeklyResourcing {
    let mut weekly = WeeklyResourcing::with_roster(roster);

    for (category, tasks) in tasks_by_category {
        for task in tasks {
            weekly.add(&task.person, *category, task.percent);
        }
    }

    weekly
}
