use bardo_dashboard::store::{DocumentStore, SqliteStore};
use serde_json::json;
use speculate2::speculate;

speculate! {
    before {
        let store = SqliteStore::open_memory().expect("Failed to create in-memory store");
        store.migrate().expect("Failed to run migrations");
    }

    describe "get" {
        it "returns None for a missing document" {
            let doc = store.get("dashboard/milestones").expect("Query failed");
            assert!(doc.is_none());
        }

        it "returns what was stored" {
            store.set("dashboard/dailyLogs", &json!({ "2025-11-03": { "Mike": { "today": "kiln" } } }), false)
                .expect("Failed to store");

            let doc = store.get("dashboard/dailyLogs").expect("Query failed");
            assert_eq!(doc, Some(json!({ "2025-11-03": { "Mike": { "today": "kiln" } } })));
        }
    }

    describe "set" {
        it "replaces the document without merge" {
            store.set("dashboard/resourcing", &json!({ "Q425": { "Materials": {} } }), false)
                .expect("Failed to store");
            store.set("dashboard/resourcing", &json!({ "Q126": {} }), false)
                .expect("Failed to store");

            let doc = store.get("dashboard/resourcing").expect("Query failed");
            assert_eq!(doc, Some(json!({ "Q126": {} })));
        }

        it "merges nested objects with merge" {
            store.set("dashboard/history/weeks", &json!({ "2025-W45": { "quarter": "Q425" } }), true)
                .expect("Failed to store");
            store.set("dashboard/history/weeks", &json!({ "2025-W46": { "quarter": "Q425" } }), true)
                .expect("Failed to store");

            let doc = store.get("dashboard/history/weeks").expect("Query failed").unwrap();
            assert!(doc.get("2025-W45").is_some());
            assert!(doc.get("2025-W46").is_some());
        }

        it "keeps documents at different paths apart" {
            store.set("dashboard/milestones", &json!({ "Q425": {} }), true).expect("Failed to store");
            store.set("dashboard/weeklyPlans", &json!({ "Q425": {} }), true).expect("Failed to store");

            let paths = store.paths().expect("Query failed");
            assert_eq!(paths, vec!["dashboard/milestones", "dashboard/weeklyPlans"]);
        }
    }

    describe "open" {
        it "persists documents across reopen" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("nested").join("dashboard.db");

            {
                let store = SqliteStore::open(path.clone()).expect("Failed to open");
                store.migrate().expect("Failed to migrate");
                store.set("dashboard/milestones", &json!({ "Q425": {} }), false).expect("Failed to store");
            }

            let reopened = SqliteStore::open(path).expect("Failed to reopen");
            reopened.migrate().expect("Failed to migrate");
            let doc = reopened.get("dashboard/milestones").expect("Query failed");
            assert_eq!(doc, Some(json!({ "Q425": {} })));
        }
    }
}
