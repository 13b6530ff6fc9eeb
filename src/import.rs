//! Milestone import from tabular rows.
//!
//! Rows arrive already split into fields (a spreadsheet export converted to
//! JSON, for instance). Only the mapping from rows to milestones lives here.

use uuid::Uuid;

use crate::models::{Category, Milestone, MilestoneRow, MilestonesDoc};
use crate::resourcing::parse_percent;

const UNTITLED: &str = "(untitled)";

/// Build a fresh milestones document from import rows.
///
/// Rows with an unknown or missing category are skipped. Rows without a
/// quarter land in `default_quarter`. Every quarter present in the result
/// carries a (possibly empty) list for every category.
pub fn milestones_from_rows(rows: Vec<MilestoneRow>, default_quarter: &str) -> MilestonesDoc {
    let mut doc = MilestonesDoc::new();
    ensure_quarter(&mut doc, default_quarter);

    let mut skipped = 0usize;
    for row in rows {
        let Some(category) = row.category.as_deref().and_then(Category::from_str) else {
            skipped += 1;
            continue;
        };

        let quarter = non_empty(row.quarter.as_deref())
            .unwrap_or(default_quarter)
            .to_string();
        let milestone = milestone_from_row(row);

        ensure_quarter(&mut doc, &quarter);
        if let Some(items) = doc.get_mut(&quarter).and_then(|q| q.get_mut(&category)) {
            items.push(milestone);
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "skipped import rows without a known category");
    }
    doc
}

fn milestone_from_row(row: MilestoneRow) -> Milestone {
    let title = non_empty(row.title.as_deref())
        .unwrap_or(UNTITLED)
        .to_string();
    let id = match non_empty(row.id.as_deref()) {
        Some(id) => id.to_string(),
        None => generate_id(&title),
    };
    let people = row.people.unwrap_or_default();
    let resourcing = match non_empty(row.resourcing.as_deref()) {
        Some(raw) => raw.to_string(),
        None => people.clone(),
    };

    Milestone {
        id,
        title,
        date: row.date.unwrap_or_default(),
        people,
        resourcing,
        progress: row.progress.as_deref().map(parse_percent).unwrap_or(0),
    }
}

/// Id for a milestone that did not come with one: the title plus six random
/// characters.
pub fn generate_id(title: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", title, &suffix[..6])
}

fn ensure_quarter(doc: &mut MilestonesDoc, quarter: &str) {
    let by_category = doc.entry(quarter.to_string()).or_default();
    for category in Category::ALL {
        by_category.entry(category).or_default();
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(quarter: &str, category: &str, title: &str) -> MilestoneRow {
        MilestoneRow {
            quarter: Some(quarter.to_string()),
            category: Some(category.to_string()),
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn groups_rows_by_quarter_and_category() {
        let doc = milestones_from_rows(
            vec![
                row("Q425", "Materials", "Binder study"),
                row("Q126", "Operations", "Line audit"),
                row("Q425", "Materials", "Filler sweep"),
            ],
            "Q425",
        );

        assert_eq!(doc["Q425"][&Category::Materials].len(), 2);
        assert_eq!(doc["Q126"][&Category::Operations][0].title, "Line audit");
        assert!(doc["Q126"][&Category::Materials].is_empty());
        assert_eq!(doc["Q425"].len(), Category::ALL.len());
    }

    #[test]
    fn skips_unknown_categories() {
        let doc = milestones_from_rows(vec![row("Q425", "Marketing", "Launch")], "Q425");
        assert!(doc["Q425"].values().all(Vec::is_empty));
    }

    #[test]
    fn fills_in_missing_fields() {
        let mut r = row("", "Durability", "");
        r.people = Some("Mike;Cyril".to_string());
        r.progress = Some("not a number".to_string());

        let doc = milestones_from_rows(vec![r], "Q425");
        let m = &doc["Q425"][&Category::Durability][0];
        assert_eq!(m.title, "(untitled)");
        assert!(m.id.starts_with("(untitled)-"));
        assert_eq!(m.id.len(), "(untitled)-".len() + 6);
        assert_eq!(m.resourcing, "Mike;Cyril");
        assert_eq!(m.progress, 0);
    }

    #[test]
    fn keeps_given_ids_and_clamps_progress() {
        let mut r = row("Q425", "ScaleUp", "Pilot line");
        r.id = Some("pilot".to_string());
        r.progress = Some("140".to_string());
        r.resourcing = Some("SamL:50".to_string());
        r.people = Some("SamL;SamW".to_string());

        let doc = milestones_from_rows(vec![r], "Q425");
        let m = &doc["Q425"][&Category::ScaleUp][0];
        assert_eq!(m.id, "pilot");
        assert_eq!(m.progress, 100);
        assert_eq!(m.resourcing, "SamL:50");
        assert_eq!(m.people, "SamL;SamW");
    }

    #[test]
    fn accepts_numeric_progress_in_rows() {
        let rows: Vec<MilestoneRow> = serde_json::from_value(serde_json::json!([
            { "category": "Materials", "title": "Binder study", "progress": 50 },
            { "category": "Materials", "title": "Filler sweep", "progress": "40%" },
            { "category": "Materials", "title": "Resin swap", "progress": null }
        ]))
        .unwrap();

        let doc = milestones_from_rows(rows, "Q425");
        let progress: Vec<u32> = doc["Q425"][&Category::Materials]
            .iter()
            .map(|m| m.progress)
            .collect();
        assert_eq!(progress, vec![50, 40, 0]);
    }
}
