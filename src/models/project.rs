use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Field names are kept camelCase to stay compatible with previously
// persisted data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub project_name: String,
    pub contract_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub tfp: String,
    pub boc_fp: String,
}

impl Project {
    /// Build a new record from a draft, assigning it a fresh id.
    pub fn new(draft: ProjectDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_name: draft.project_name,
            contract_id: draft.contract_id,
            start_date: draft.start_date,
            end_date: draft.end_date,
            tfp: draft.tfp,
            boc_fp: draft.boc_fp,
        }
    }

    /// Replace every field except the id.
    pub fn apply(&mut self, draft: ProjectDraft) {
        self.project_name = draft.project_name;
        self.contract_id = draft.contract_id;
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.tfp = draft.tfp;
        self.boc_fp = draft.boc_fp;
    }

    pub fn draft(&self) -> ProjectDraft {
        ProjectDraft {
            project_name: self.project_name.clone(),
            contract_id: self.contract_id.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            tfp: self.tfp.clone(),
            boc_fp: self.boc_fp.clone(),
        }
    }
}

/// The field set submitted by the project form: everything but the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub project_name: String,
    pub contract_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub tfp: String,
    pub boc_fp: String,
}

impl ProjectDraft {
    /// Required-ness check used by the form: all text fields non-empty
    /// and an end date chosen.
    pub fn is_complete(&self) -> bool {
        !self.project_name.trim().is_empty()
            && !self.contract_id.trim().is_empty()
            && !self.tfp.trim().is_empty()
            && !self.boc_fp.trim().is_empty()
            && self.end_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProjectDraft {
        ProjectDraft {
            project_name: "IBCP".into(),
            contract_id: "C-98765".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            tfp: "Project Lead".into(),
            boc_fp: "Client Manager".into(),
        }
    }

    #[test]
    fn new_assigns_distinct_ids() {
        let a = Project::new(draft());
        let b = Project::new(draft());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn apply_preserves_id() {
        let mut project = Project::new(draft());
        let id = project.id.clone();
        let mut updated = draft();
        updated.project_name = "TOC".into();
        project.apply(updated);
        assert_eq!(project.id, id);
        assert_eq!(project.project_name, "TOC");
    }

    #[test]
    fn completeness_requires_every_field() {
        assert!(draft().is_complete());

        let mut missing_name = draft();
        missing_name.project_name = "  ".into();
        assert!(!missing_name.is_complete());

        let mut missing_end = draft();
        missing_end.end_date = None;
        assert!(!missing_end.is_complete());
    }
}
