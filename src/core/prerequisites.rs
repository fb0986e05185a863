use crate::domain::model::{CompletedCourse, Course};
use std::collections::HashSet;

/// 回傳候選課程尚未修畢的先修課程代碼，保留課程本身的先修順序。
///
/// 只比對已修課程集合；待確認或已註冊的課程不算滿足先修條件。
pub fn check_prerequisites(candidate: &Course, completed_codes: &HashSet<String>) -> Vec<String> {
    candidate
        .prerequisites
        .iter()
        .filter(|code| !completed_codes.contains(code.as_str()))
        .cloned()
        .collect()
}

/// The student's completed courses. Built once per session and never mutated.
#[derive(Debug, Clone, Default)]
pub struct CompletedCourses {
    records: Vec<CompletedCourse>,
    codes: HashSet<String>,
}

impl CompletedCourses {
    pub fn from_records(records: impl IntoIterator<Item = CompletedCourse>) -> Self {
        let mut seen_ids = HashSet::new();
        let records: Vec<CompletedCourse> = records
            .into_iter()
            .filter(|record| seen_ids.insert(record.id.clone()))
            .collect();
        let codes = records.iter().map(|r| r.code.clone()).collect();

        Self { records, codes }
    }

    pub fn codes(&self) -> &HashSet<String> {
        &self.codes
    }

    pub fn records(&self) -> &[CompletedCourse] {
        &self.records
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn total_credits(&self) -> u32 {
        self.records
            .iter()
            .fold(0u32, |total, r| total.saturating_add(r.credits))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
