use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::calc::GRADE_FLOOR;

/// One student on the session roster. Identity is the album number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub album_number: String,
    pub name: String,
    pub surname: String,
    #[serde(default = "default_grade")]
    pub proposed_grade: f64,
}

impl Student {
    pub fn new(album_number: impl Into<String>, name: impl Into<String>, surname: impl Into<String>) -> Self {
        Student {
            album_number: album_number.into(),
            name: name.into(),
            surname: surname.into(),
            proposed_grade: GRADE_FLOOR,
        }
    }
}

fn default_grade() -> f64 {
    GRADE_FLOOR
}

/// A gradable task. Update/delete match on the full (description, grade)
/// pair; the description alone is the natural key the ledger records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    pub grade: f64,
}

impl Task {
    pub fn same_identity(&self, other: &Task) -> bool {
        self.description == other.description && self.grade == other.grade
    }
}

/// Station number -> ordered album numbers. Integer keys serialize as JSON
/// object keys ("1", "2", ...), matching the persisted document layout.
pub type StationAssignments = BTreeMap<u32, Vec<String>>;

/// Album number -> descriptions of tasks marked passed.
pub type PassedTasks = BTreeMap<String, BTreeSet<String>>;
