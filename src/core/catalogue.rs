use crate::core::credits::MAX_COURSE_CREDITS;
use crate::core::prerequisites::CompletedCourses;
use crate::core::registration::RegistrationEngine;
use crate::core::schedule::parse_schedule;
use crate::domain::model::{CompletedCourse, Course, SelectionState, Term, Weekday};
use crate::domain::ports::Clock;
use crate::utils::error::{RegistrarError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_unique_ids, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// 唯讀課程目錄。`history` 收錄已不再開設、但可能出現在已修清單中的課程。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub history: Vec<CompletedCourse>,
}

/// 瀏覽目錄時的篩選條件，未設定的欄位不篩選
#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
    pub search: Option<String>,
    pub department: Option<String>,
    pub term: Option<Term>,
    pub day: Option<Weekday>,
}

impl Catalogue {
    pub fn new(courses: Vec<Course>, history: Vec<CompletedCourse>) -> Self {
        Self { courses, history }
    }

    /// 依副檔名解析目錄內容（`.json` 或 `.toml`）
    pub fn from_bytes(path: &str, data: &[u8]) -> Result<Self> {
        let is_json = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let catalogue: Catalogue = if is_json {
            serde_json::from_slice(data)?
        } else {
            let content = std::str::from_utf8(data).map_err(|e| RegistrarError::TomlError {
                source_name: path.to_string(),
                message: format!("catalogue is not valid UTF-8: {}", e),
            })?;
            toml::from_str(content).map_err(|e| RegistrarError::TomlError {
                source_name: path.to_string(),
                message: e.to_string(),
            })?
        };

        tracing::debug!(
            "Parsed catalogue {}: {} courses, {} history records",
            path,
            catalogue.courses.len(),
            catalogue.history.len()
        );
        Ok(catalogue)
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Course> {
        self.get(id).ok_or_else(|| RegistrarError::UnknownCourseError {
            course_id: id.to_string(),
        })
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.code == code)
    }

    pub fn departments(&self) -> Vec<&str> {
        self.courses
            .iter()
            .map(|c| c.department.as_str())
            .filter(|d| !d.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn terms(&self) -> Vec<Term> {
        self.courses
            .iter()
            .map(|c| c.term)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 將已修課程 id 解析為紀錄：先查目錄，再查歷史課程；未知的 id 會被略過。
    pub fn resolve_completed(&self, completed_ids: &[String]) -> CompletedCourses {
        let records = completed_ids.iter().filter_map(|id| {
            let record = self
                .get(id)
                .map(CompletedCourse::from)
                .or_else(|| self.history.iter().find(|h| &h.id == id).cloned());
            if record.is_none() {
                tracing::warn!("Completed course id '{}' not found in catalogue or history", id);
            }
            record
        });

        CompletedCourses::from_records(records)
    }

    /// 目錄篩選，並排除已在待確認或已註冊清單中的課程。
    pub fn query<'a, C: Clock>(
        &'a self,
        query: &CourseQuery,
        engine: &RegistrationEngine<C>,
    ) -> Vec<&'a Course> {
        let search = query.search.as_deref().map(str::to_lowercase);

        self.courses
            .iter()
            .filter(|course| {
                search.as_deref().is_none_or(|needle| {
                    course.title.to_lowercase().contains(needle)
                        || course.code.to_lowercase().contains(needle)
                        || course.professor.to_lowercase().contains(needle)
                })
            })
            .filter(|course| {
                query
                    .department
                    .as_deref()
                    .is_none_or(|department| course.department == department)
            })
            .filter(|course| query.term.is_none_or(|term| course.term == term))
            .filter(|course| {
                query.day.is_none_or(|day| {
                    parse_schedule(&course.schedule).is_some_and(|s| s.days.contains(&day))
                })
            })
            .filter(|course| engine.selection_state(&course.id) == SelectionState::NotSelected)
            .collect()
    }
}

impl Validate for Catalogue {
    fn validate(&self) -> Result<()> {
        validate_unique_ids(
            "catalogue.courses",
            self.courses
                .iter()
                .map(|c| c.id.as_str())
                .chain(self.history.iter().map(|h| h.id.as_str())),
        )?;

        for course in &self.courses {
            validate_non_empty_string("catalogue.courses.id", &course.id)?;
            validate_non_empty_string("catalogue.courses.code", &course.code)?;
            validate_range(
                &format!("catalogue.courses.{}.credits", course.id),
                course.credits,
                1,
                MAX_COURSE_CREDITS,
            )?;
            for prerequisite in &course.prerequisites {
                validate_non_empty_string(
                    &format!("catalogue.courses.{}.prerequisites", course.id),
                    prerequisite,
                )?;
            }
        }

        for record in &self.history {
            validate_non_empty_string("catalogue.history.code", &record.code)?;
            validate_range(
                &format!("catalogue.history.{}.credits", record.id),
                record.credits,
                1,
                MAX_COURSE_CREDITS,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credits::RegistrationPolicy;
    use crate::core::test_support::{course, course_with};
    use crate::domain::model::Season;

    fn sample() -> Catalogue {
        let mut french = course_with("5", "FREN2001", 3, "TTh 13:00-14:15", &[]);
        french.title = "Advanced French Language".to_string();
        french.department = "French Studies".to_string();
        french.professor = "Marie Dubois".to_string();

        let mut later = course("7", "Fri 9:00-12:00");
        later.term = Term::new(Season::Fall, 2026);

        Catalogue::new(
            vec![course("1", "Mon/Wed 10:00-11:15"), french, course("3", "TBA"), later],
            vec![CompletedCourse {
                id: "comp-1".to_string(),
                code: "CS1010".to_string(),
                title: "Introduction to Computer Science".to_string(),
                credits: 3,
                professor: String::new(),
            }],
        )
    }

    #[test]
    fn test_resolve_completed_uses_catalogue_then_history() {
        let catalogue = sample();
        let ids = vec!["5".to_string(), "comp-1".to_string(), "missing".to_string()];
        let completed = catalogue.resolve_completed(&ids);

        assert_eq!(completed.len(), 2);
        assert!(completed.contains_code("FREN2001"));
        assert!(completed.contains_code("CS1010"));
        assert_eq!(completed.total_credits(), 6);
    }

    #[test]
    fn test_query_filters_and_excludes_selected() {
        let catalogue = sample();
        let mut engine = RegistrationEngine::new(CompletedCourses::default(), RegistrationPolicy::default());

        let query = CourseQuery {
            search: Some("dubois".to_string()),
            ..Default::default()
        };
        let ids: Vec<&str> = catalogue.query(&query, &engine).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["5"]);

        let query = CourseQuery {
            day: Some(Weekday::Mon),
            ..Default::default()
        };
        assert_eq!(catalogue.query(&query, &engine).len(), 1);

        engine.add_pending(catalogue.require("1").unwrap()).unwrap();
        assert!(catalogue.query(&query, &engine).is_empty());

        let query = CourseQuery {
            term: Some(Term::new(Season::Fall, 2026)),
            ..Default::default()
        };
        let ids: Vec<&str> = catalogue.query(&query, &engine).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["7"]);
    }

    #[test]
    fn test_departments_and_terms_are_sorted_and_unique() {
        let catalogue = sample();
        assert_eq!(catalogue.departments(), vec!["Computer Science", "French Studies"]);
        assert_eq!(
            catalogue.terms(),
            vec![Term::new(Season::Spring, 2026), Term::new(Season::Fall, 2026)]
        );
    }

    #[test]
    fn test_validate_rejects_bad_records() {
        assert!(sample().validate().is_ok());

        let mut catalogue = sample();
        catalogue.courses[0].credits = 0;
        assert!(catalogue.validate().is_err());

        let mut catalogue = sample();
        catalogue.courses[0].credits = u32::MAX;
        assert!(matches!(
            catalogue.validate(),
            Err(RegistrarError::InvalidConfigValueError { .. })
        ));

        let mut catalogue = sample();
        catalogue.history[0].id = "1".to_string();
        assert!(catalogue.validate().is_err());
    }

    #[test]
    fn test_require_unknown_course() {
        let err = sample().require("404").unwrap_err();
        assert!(matches!(err, RegistrarError::UnknownCourseError { .. }));
    }

    #[test]
    fn test_from_bytes_reads_json_and_toml() {
        let json = br#"{"courses":[{"id":"1","code":"CS3010","credits":3,"schedule":"Mon 9:00-10:00","term":"Spring 2026","availableSpots":4,"prerequisites":["CS2020"]}]}"#;
        let catalogue = Catalogue::from_bytes("catalogue.json", json).unwrap();
        assert_eq!(catalogue.courses[0].available_spots, 4);
        assert_eq!(catalogue.courses[0].prerequisites, vec!["CS2020".to_string()]);

        let toml = br#"
[[courses]]
id = "1"
code = "CS3010"
credits = 3
schedule = "Mon 9:00-10:00"
term = "Fall 2027"

[[history]]
id = "comp-1"
code = "CS1010"
title = "Introduction to Computer Science"
credits = 3
"#;
        let catalogue = Catalogue::from_bytes("catalogue.toml", toml).unwrap();
        assert_eq!(catalogue.courses[0].term, Term::new(Season::Fall, 2027));
        assert_eq!(catalogue.history.len(), 1);

        assert!(Catalogue::from_bytes("broken.toml", b"[[courses]]\nid = ").is_err());
    }
}
