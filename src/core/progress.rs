use crate::core::catalogue::Catalogue;
use crate::core::prerequisites::CompletedCourses;
use crate::core::registration::RegistrationEngine;
use crate::domain::ports::Clock;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_GRADUATION_CREDITS: u32 = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeRequirement {
    pub id: String,
    pub category: String,
    pub required_credits: u32,
    /// 指定必修課程代碼；為空時僅以學分計算
    #[serde(default)]
    pub required_courses: Vec<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreePlan {
    #[serde(default = "default_graduation_credits")]
    pub graduation_credits: u32,
    #[serde(default)]
    pub requirements: Vec<DegreeRequirement>,
}

fn default_graduation_credits() -> u32 {
    DEFAULT_GRADUATION_CREDITS
}

impl Default for DegreePlan {
    fn default() -> Self {
        Self {
            graduation_credits: DEFAULT_GRADUATION_CREDITS,
            requirements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementProgress {
    pub id: String,
    pub category: String,
    pub required_credits: u32,
    pub completed_credits: u32,
    pub remaining_credits: u32,
    pub needed_courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeProgress {
    pub graduation_credits: u32,
    pub completed_credits: u32,
    pub registered_credits: u32,
    pub remaining_credits: u32,
    pub percent_complete: f64,
    pub requirements: Vec<RequirementProgress>,
    /// Catalogue course codes neither completed nor registered.
    pub remaining_courses: Vec<String>,
}

impl DegreePlan {
    pub fn progress<C: Clock>(
        &self,
        catalogue: &Catalogue,
        engine: &RegistrationEngine<C>,
    ) -> DegreeProgress {
        let completed = engine.completed();
        let completed_credits = completed.total_credits();

        let percent_complete = if self.graduation_credits == 0 {
            100.0
        } else {
            (f64::from(completed_credits) / f64::from(self.graduation_credits) * 100.0).min(100.0)
        };

        let requirements = self
            .requirements
            .iter()
            .map(|requirement| requirement_progress(requirement, completed))
            .collect();

        let registered_codes: HashSet<&str> = engine
            .registered()
            .iter()
            .map(|r| r.course.code.as_str())
            .collect();
        let remaining_courses = catalogue
            .courses
            .iter()
            .filter(|c| !completed.contains_code(&c.code) && !registered_codes.contains(c.code.as_str()))
            .map(|c| c.code.clone())
            .collect();

        DegreeProgress {
            graduation_credits: self.graduation_credits,
            completed_credits,
            registered_credits: engine.credit_totals().registered,
            remaining_credits: self.graduation_credits.saturating_sub(completed_credits),
            percent_complete,
            requirements,
            remaining_courses,
        }
    }
}

fn requirement_progress(
    requirement: &DegreeRequirement,
    completed: &CompletedCourses,
) -> RequirementProgress {
    let (completed_credits, needed_courses) = if requirement.required_courses.is_empty() {
        (
            completed.total_credits().min(requirement.required_credits),
            Vec::new(),
        )
    } else {
        let earned = completed
            .records()
            .iter()
            .filter(|r| requirement.required_courses.contains(&r.code))
            .map(|r| r.credits)
            .sum::<u32>()
            .min(requirement.required_credits);
        let needed = requirement
            .required_courses
            .iter()
            .filter(|code| !completed.contains_code(code))
            .cloned()
            .collect();
        (earned, needed)
    };

    RequirementProgress {
        id: requirement.id.clone(),
        category: requirement.category.clone(),
        required_credits: requirement.required_credits,
        completed_credits,
        remaining_credits: requirement.required_credits - completed_credits,
        needed_courses,
    }
}

impl Validate for DegreePlan {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_unique_ids(
            "degree.requirements",
            self.requirements.iter().map(|r| r.id.as_str()),
        )?;
        for requirement in &self.requirements {
            validate_non_empty_string("degree.requirements.category", &requirement.category)?;
            validate_positive_number(
                &format!("degree.requirements.{}.required_credits", requirement.id),
                requirement.required_credits,
                1,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credits::RegistrationPolicy;
    use crate::core::test_support::course_with;
    use crate::domain::model::CompletedCourse;

    fn record(id: &str, code: &str, credits: u32) -> CompletedCourse {
        CompletedCourse {
            id: id.to_string(),
            code: code.to_string(),
            title: String::new(),
            credits,
            professor: String::new(),
        }
    }

    fn plan() -> DegreePlan {
        DegreePlan {
            graduation_credits: 128,
            requirements: vec![
                DegreeRequirement {
                    id: "major".to_string(),
                    category: "Major Requirements".to_string(),
                    required_credits: 45,
                    required_courses: vec!["CS2015".to_string(), "CS3010".to_string(), "CS3020".to_string()],
                    description: String::new(),
                },
                DegreeRequirement {
                    id: "language".to_string(),
                    category: "Language Requirements".to_string(),
                    required_credits: 12,
                    required_courses: Vec::new(),
                    description: String::new(),
                },
            ],
        }
    }

    #[test]
    fn test_progress_counts_completed_and_registered() {
        let catalogue = Catalogue::new(
            vec![
                course_with("1", "CS3010", 3, "Mon 9:00-10:00", &[]),
                course_with("2", "CS3020", 4, "Tue 9:00-10:00", &[]),
                course_with("3", "CS2015", 4, "Wed 9:00-10:00", &[]),
            ],
            Vec::new(),
        );
        let completed = CompletedCourses::from_records([
            record("3", "CS2015", 4),
            record("comp-6", "FREN1010", 4),
        ]);
        let mut engine = RegistrationEngine::new(completed, RegistrationPolicy::default());
        engine.add_pending(catalogue.require("1").unwrap()).unwrap();
        engine.confirm_pending("1");

        let progress = plan().progress(&catalogue, &engine);

        assert_eq!(progress.completed_credits, 8);
        assert_eq!(progress.registered_credits, 3);
        assert_eq!(progress.remaining_credits, 120);
        assert!((progress.percent_complete - 6.25).abs() < f64::EPSILON);
        assert_eq!(progress.remaining_courses, vec!["CS3020".to_string()]);

        let major = &progress.requirements[0];
        assert_eq!(major.completed_credits, 4);
        assert_eq!(major.remaining_credits, 41);
        assert_eq!(major.needed_courses, vec!["CS3010".to_string(), "CS3020".to_string()]);

        let language = &progress.requirements[1];
        assert_eq!(language.completed_credits, 8);
        assert_eq!(language.remaining_credits, 4);
    }

    #[test]
    fn test_remaining_credits_saturate() {
        let completed = CompletedCourses::from_records([record("a", "A", 10)]);
        let engine = RegistrationEngine::new(completed, RegistrationPolicy::default());
        let plan = DegreePlan {
            graduation_credits: 6,
            requirements: Vec::new(),
        };

        let progress = plan.progress(&Catalogue::default(), &engine);
        assert_eq!(progress.remaining_credits, 0);
        assert_eq!(progress.percent_complete, 100.0);
    }

    #[test]
    fn test_validate_plan() {
        assert!(plan().validate().is_ok());

        let mut invalid = plan();
        invalid.requirements[1].id = "major".to_string();
        assert!(invalid.validate().is_err());
    }
}
