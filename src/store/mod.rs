use anyhow::Result;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::{Project, ProjectDraft};
use crate::storage::Storage;

/// Key the full project list is stored under.
pub const STORAGE_KEY: &str = "projects";

/// Why a load fell back to the sample records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read stored projects: {0}")]
    Read(#[source] anyhow::Error),
    #[error("failed to decode stored projects: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Single source of truth for the project list.
///
/// Holds the ordered in-memory list and writes the whole list back to
/// storage after every mutation. Reads happen once, at construction.
pub struct ProjectStore<S: Storage> {
    storage: S,
    projects: Vec<Project>,
}

impl<S: Storage> ProjectStore<S> {
    /// Load the project list from storage.
    ///
    /// An absent key, an unreadable value, or undecodable data all fall
    /// back to the fixed sample records. A cold start never fails.
    pub fn load(storage: S) -> Self {
        let projects = match Self::read_stored(&storage) {
            Ok(Some(projects)) => {
                info!(count = projects.len(), "loaded projects from storage");
                projects
            }
            Ok(None) => {
                info!("no stored projects, starting with sample data");
                sample_projects()
            }
            Err(err) => {
                warn!(%err, "stored projects unusable, starting with sample data");
                sample_projects()
            }
        };

        Self { storage, projects }
    }

    fn read_stored(storage: &S) -> Result<Option<Vec<Project>>, LoadError> {
        let Some(raw) = storage.read(STORAGE_KEY).map_err(LoadError::Read)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Append a new record built from `draft` and persist.
    pub fn create(&mut self, draft: ProjectDraft) -> Project {
        let project = Project::new(draft);
        self.projects.push(project.clone());
        self.persist();
        project
    }

    /// Replace the fields of the record with `id`, keeping its id and
    /// position, and persist. Returns `false` when no record matches;
    /// the list is left untouched in that case.
    pub fn update(&mut self, id: &str, draft: ProjectDraft) -> bool {
        let Some(project) = self.projects.iter_mut().find(|p| p.id == id) else {
            warn!(id, "update targeted a project that no longer exists");
            return false;
        };
        project.apply(draft);
        self.persist();
        true
    }

    /// Remove the record with `id` and persist. Returns `false` when no
    /// record matches; the list is left untouched in that case.
    ///
    /// Confirmation is the caller's concern; by the time this runs the
    /// user has already agreed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        if self.projects.len() == before {
            warn!(id, "delete targeted a project that no longer exists");
            return false;
        }
        self.persist();
        true
    }

    // Write the full list back under the fixed key. Failures are
    // reported and swallowed: the in-memory list stays authoritative
    // for the rest of the session.
    fn persist(&self) {
        let payload = match serde_json::to_string(&self.projects) {
            Ok(payload) => payload,
            Err(err) => {
                error!(%err, "failed to serialize projects, skipping persist");
                return;
            }
        };
        if let Err(err) = self.storage.write(STORAGE_KEY, &payload) {
            error!(%err, "failed to persist projects, in-memory list unchanged");
        }
    }
}

/// Fixed records shown on first launch or when stored data is unusable.
pub fn sample_projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".to_string(),
            project_name: "IBCP".to_string(),
            contract_id: "C-98765".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid sample date"),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            tfp: "Project Lead".to_string(),
            boc_fp: "Client Manager".to_string(),
        },
        Project {
            id: "2".to_string(),
            project_name: "TOC".to_string(),
            contract_id: "C-12345".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid sample date"),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 14),
            tfp: "Tech Lead".to_string(),
            boc_fp: "Business Analyst".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use anyhow::anyhow;
    use chrono::{Duration, Local};

    use super::*;
    use crate::deadline::{Urgency, days_remaining};

    /// In-memory stand-in for the file-backed storage.
    struct MemoryStorage {
        values: RefCell<HashMap<String, String>>,
    }

    impl MemoryStorage {
        fn empty() -> Self {
            Self {
                values: RefCell::new(HashMap::new()),
            }
        }

        fn seeded(key: &str, value: &str) -> Self {
            let storage = Self::empty();
            storage
                .values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            storage
        }
    }

    impl Storage for MemoryStorage {
        fn read(&self, key: &str) -> Result<Option<String>> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn write(&self, key: &str, value: &str) -> Result<()> {
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    /// Storage whose writes always fail, for the fire-and-forget path.
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    fn draft(name: &str) -> ProjectDraft {
        ProjectDraft {
            project_name: name.to_string(),
            contract_id: "C-1".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30),
            tfp: "TFP".to_string(),
            boc_fp: "BOC".to_string(),
        }
    }

    #[test]
    fn empty_storage_falls_back_to_samples() {
        let store = ProjectStore::load(MemoryStorage::empty());
        let names: Vec<_> = store.projects().iter().map(|p| p.project_name.as_str()).collect();
        assert_eq!(names, ["IBCP", "TOC"]);
    }

    #[test]
    fn corrupt_storage_falls_back_to_samples() {
        let store = ProjectStore::load(MemoryStorage::seeded(STORAGE_KEY, "not json"));
        assert_eq!(store.projects().len(), 2);
    }

    #[test]
    fn unreadable_storage_falls_back_to_samples() {
        let store = ProjectStore::load(BrokenStorage);
        assert_eq!(store.projects().len(), 2);
    }

    #[test]
    fn persisted_list_round_trips() {
        let mut store = ProjectStore::load(MemoryStorage::empty());
        store.create(draft("Gamma"));
        let expected = store.projects().to_vec();

        let raw = store.storage.read(STORAGE_KEY).unwrap().unwrap();
        let reloaded = ProjectStore::load(MemoryStorage::seeded(STORAGE_KEY, &raw));
        assert_eq!(reloaded.projects(), expected.as_slice());
    }

    #[test]
    fn create_appends_with_a_fresh_id() {
        let mut store = ProjectStore::load(MemoryStorage::empty());
        let existing: Vec<_> = store.projects().iter().map(|p| p.id.clone()).collect();

        let created = store.create(draft("Gamma"));
        assert!(!existing.contains(&created.id));
        assert_eq!(store.projects().last().unwrap().id, created.id);
        assert_eq!(store.projects().len(), 3);
    }

    #[test]
    fn update_replaces_fields_in_place() {
        let mut store = ProjectStore::load(MemoryStorage::empty());
        let target = store.projects()[0].id.clone();
        let untouched = store.projects()[1].clone();

        let mut changed = draft("Renamed");
        changed.contract_id = "C-999".to_string();
        assert!(store.update(&target, changed));

        let updated = &store.projects()[0];
        assert_eq!(updated.id, target);
        assert_eq!(updated.project_name, "Renamed");
        assert_eq!(updated.contract_id, "C-999");
        assert_eq!(store.projects()[1], untouched);
    }

    #[test]
    fn update_of_unknown_id_is_a_noop() {
        let mut store = ProjectStore::load(MemoryStorage::empty());
        let before = store.projects().to_vec();
        assert!(!store.update("ghost", draft("Renamed")));
        assert_eq!(store.projects(), before.as_slice());
    }

    #[test]
    fn delete_removes_exactly_the_match() {
        let mut store = ProjectStore::load(MemoryStorage::empty());
        store.create(draft("Gamma"));
        let victim = store.projects()[1].id.clone();
        let kept: Vec<_> = store
            .projects()
            .iter()
            .filter(|p| p.id != victim)
            .cloned()
            .collect();

        assert!(store.delete(&victim));
        assert_eq!(store.projects(), kept.as_slice());
    }

    #[test]
    fn delete_of_unknown_id_is_a_noop() {
        let mut store = ProjectStore::load(MemoryStorage::empty());
        let before = store.projects().to_vec();
        assert!(!store.delete("ghost"));
        assert_eq!(store.projects(), before.as_slice());
    }

    #[test]
    fn mutations_survive_a_failing_writer() {
        let mut store = ProjectStore {
            storage: BrokenStorage,
            projects: sample_projects(),
        };
        store.create(draft("Gamma"));
        assert_eq!(store.projects().len(), 3);
    }

    #[test]
    fn created_project_due_in_three_days_is_urgent() {
        let mut store = ProjectStore::load(MemoryStorage::empty());
        let today = Local::now().date_naive();

        let mut soon = draft("Gamma");
        soon.end_date = Some(today + Duration::days(3));
        let created = store.create(soon);

        assert_eq!(store.projects().len(), 3);
        let badge = days_remaining(created.end_date, today);
        assert_eq!(badge.days, 3);
        assert_eq!(badge.urgency, Some(Urgency::Urgent));
    }
}
