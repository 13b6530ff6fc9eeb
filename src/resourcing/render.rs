//! Fixed-width text grids for terminal output.

use crate::models::{Category, ResourcingTable, WeeklyResourcing};

const PERSON: &str = "Person";
const TOTAL: &str = "Total";
const OVER_ALLOCATED: char = '!';

fn column_width(title: &str) -> usize {
    title.len().max(4)
}

fn name_width<'a>(names: impl Iterator<Item = &'a String>) -> usize {
    names.map(String::len).max().unwrap_or(0).max(PERSON.len())
}

fn push_header(output: &mut String, width: usize, extra: Option<&str>) {
    output.push_str(&format!("{:<width$}", PERSON));
    for category in Category::ALL {
        let title = category.as_str();
        output.push_str(&format!("  {:>w$}", title, w = column_width(title)));
    }
    if let Some(title) = extra {
        output.push_str(&format!("  {:>w$}", title, w = column_width(title)));
    }
    output.push('\n');
}

fn push_cell(output: &mut String, title: &str, value: u32) {
    output.push_str(&format!(
        "  {:>w$}",
        format!("{}%", value),
        w = column_width(title)
    ));
}

/// Render a quarterly table, one row per person.
///
/// Example output:
/// ```text
/// Person  Materials  Fabrication  Durability  ScaleUp  Operations
/// Alice         40%           0%          0%       0%          0%
/// Bob            0%         100%          0%       0%          0%
/// ```
pub fn render_resourcing(table: &ResourcingTable) -> String {
    let people = table.people();
    let width = name_width(people.iter());

    let mut output = String::new();
    push_header(&mut output, width, None);
    for person in &people {
        output.push_str(&format!("{:<width$}", person));
        for category in Category::ALL {
            push_cell(&mut output, category.as_str(), table.get(category, person));
        }
        output.push('\n');
    }
    output
}

/// Render weekly sums with a total column. Over-allocated rows end in `!`.
pub fn render_weekly(weekly: &WeeklyResourcing) -> String {
    let width = name_width(weekly.people());

    let mut output = String::new();
    push_header(&mut output, width, Some(TOTAL));
    for person in weekly.people() {
        output.push_str(&format!("{:<width$}", person));
        for category in Category::ALL {
            push_cell(&mut output, category.as_str(), weekly.get(person, category));
        }
        push_cell(&mut output, TOTAL, weekly.total(person));
        if weekly.is_over_allocated(person) {
            output.push(' ');
            output.push(OVER_ALLOCATED);
        }
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Roster;

    #[test]
    fn renders_one_row_per_person() {
        let mut table = ResourcingTable::zeroed(&Roster::new(["Alice", "Bob"]));
        table.add(Category::Materials, "Alice", 40);
        table.add(Category::Fabrication, "Bob", 100);

        let output = render_resourcing(&table);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "Person  Materials  Fabrication  Durability  ScaleUp  Operations"
        );
        assert_eq!(
            lines[1],
            "Alice         40%           0%          0%       0%          0%"
        );
        assert_eq!(
            lines[2],
            "Bob            0%         100%          0%       0%          0%"
        );
    }

    #[test]
    fn marks_over_allocated_weeks() {
        let mut weekly = WeeklyResourcing::with_roster(&Roster::new(["Alice", "Bob"]));
        weekly.add("Bob", Category::Durability, 120);

        let output = render_weekly(&weekly);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Total"));
        assert!(!lines[1].ends_with('!'));
        assert!(lines[2].starts_with("Bob"));
        assert!(lines[2].ends_with("120% !"));
    }
}
