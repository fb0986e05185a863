use crate::config::toml_config::{ActionConfig, ActionKind, SessionConfig};
use crate::core::catalogue::Catalogue;
use crate::core::credits::LoadStatus;
use crate::core::progress::{DegreePlan, DegreeProgress};
use crate::core::registration::RegistrationEngine;
use crate::domain::model::{ConfirmOutcome, CreditTotals, PendingCourse, RegisteredCourse, StudentProfile};
use crate::domain::ports::{Clock, SystemClock};
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ActionOutcome {
    Added,
    Rejected { kind: &'static str, message: String },
    Confirmed(ConfirmOutcome),
    Removed { was_pending: bool },
    Dropped { was_registered: bool },
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionRecord {
    pub action: ActionKind,
    pub course: String,
    pub outcome: ActionOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub student: StudentProfile,
    pub actions: Vec<ActionRecord>,
    pub pending: Vec<PendingCourse>,
    pub registered: Vec<RegisteredCourse>,
    pub credits: CreditTotals,
    pub load_status: LoadStatus,
    pub progress: DegreeProgress,
}

/// 呈現層與引擎之間的協作者：持有唯讀目錄，並把操作轉交給狀態機。
pub struct Session<C: Clock = SystemClock> {
    student: StudentProfile,
    catalogue: Catalogue,
    degree: DegreePlan,
    engine: RegistrationEngine<C>,
    history: Vec<ActionRecord>,
}

impl Session<SystemClock> {
    pub fn new(config: &SessionConfig, catalogue: Catalogue) -> Self {
        Self::with_clock(config, catalogue, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(config: &SessionConfig, catalogue: Catalogue, clock: C) -> Self {
        let completed = catalogue.resolve_completed(&config.student.completed_courses);
        tracing::info!(
            "Session for {} {}: {} completed courses ({} credits)",
            config.student.first_name,
            config.student.last_name,
            completed.len(),
            completed.total_credits()
        );

        Self {
            student: config.student.clone(),
            catalogue,
            degree: config.degree.clone(),
            engine: RegistrationEngine::with_clock(completed, config.registration, clock),
            history: Vec::new(),
        }
    }

    /// 執行單一操作。只有 `add` 需要目錄中存在該課程；其餘操作對未知 id 不做任何事。
    pub fn apply(&mut self, action: &ActionConfig) -> Result<ActionOutcome> {
        let outcome = match action.action {
            ActionKind::Add => {
                let course = self.catalogue.require(&action.course)?;
                match self.engine.add_pending(course) {
                    Ok(()) => ActionOutcome::Added,
                    Err(e) => ActionOutcome::Rejected {
                        kind: e.kind(),
                        message: e.to_string(),
                    },
                }
            }
            ActionKind::Confirm => ActionOutcome::Confirmed(self.engine.confirm_pending(&action.course)),
            ActionKind::Remove => ActionOutcome::Removed {
                was_pending: self.engine.remove_pending(&action.course).is_some(),
            },
            ActionKind::Drop => ActionOutcome::Dropped {
                was_registered: self.engine.drop_registered(&action.course).is_some(),
            },
        };

        self.history.push(ActionRecord {
            action: action.action,
            course: action.course.clone(),
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    pub fn run(&mut self, actions: &[ActionConfig]) -> Result<SessionReport> {
        for action in actions {
            let outcome = self.apply(action)?;
            tracing::debug!("{} {} -> {:?}", action.action, action.course, outcome);
        }
        Ok(self.report())
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            student: self.student.clone(),
            actions: self.history.clone(),
            pending: self.engine.pending().to_vec(),
            registered: self.engine.registered().to_vec(),
            credits: self.engine.credit_totals(),
            load_status: self.engine.load_status(),
            progress: self.degree.progress(&self.catalogue, &self.engine),
        }
    }

    pub fn engine(&self) -> &RegistrationEngine<C> {
        &self.engine
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::course_with;
    use crate::domain::model::CompletedCourse;
    use crate::domain::ports::FixedClock;
    use crate::utils::error::RegistrarError;
    use chrono::{TimeZone, Utc};

    fn action(action: ActionKind, course: &str) -> ActionConfig {
        ActionConfig {
            action,
            course: course.to_string(),
        }
    }

    fn session() -> Session<FixedClock> {
        let mut config = SessionConfig::default();
        config.student.completed_courses = vec!["comp-1".to_string()];

        let catalogue = Catalogue::new(
            vec![
                course_with("1", "CS3010", 3, "Mon/Wed 10:00-11:15", &["CS1010"]),
                course_with("2", "CS3020", 3, "Mon 10:30-11:30", &[]),
                course_with("3", "CS4000", 3, "Fri 9:00-12:00", &["CS3010"]),
            ],
            vec![CompletedCourse {
                id: "comp-1".to_string(),
                code: "CS1010".to_string(),
                title: "Introduction to Computer Science".to_string(),
                credits: 3,
                professor: String::new(),
            }],
        );
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 12, 9, 0, 0).unwrap());
        Session::with_clock(&config, catalogue, clock)
    }

    #[test]
    fn test_scripted_session_report() {
        let mut session = session();
        let report = session
            .run(&[
                action(ActionKind::Add, "1"),
                action(ActionKind::Add, "2"),
                action(ActionKind::Add, "3"),
                action(ActionKind::Confirm, "1"),
                action(ActionKind::Drop, "9"),
            ])
            .unwrap();

        assert_eq!(report.actions[0].outcome, ActionOutcome::Added);
        assert!(matches!(
            report.actions[1].outcome,
            ActionOutcome::Rejected { kind: "overlap", .. }
        ));
        assert!(matches!(
            report.actions[2].outcome,
            ActionOutcome::Rejected { kind: "prerequisite_not_fulfilled", .. }
        ));
        assert_eq!(
            report.actions[3].outcome,
            ActionOutcome::Confirmed(ConfirmOutcome::Registered)
        );
        assert_eq!(
            report.actions[4].outcome,
            ActionOutcome::Dropped { was_registered: false }
        );
        assert_eq!(report.registered.len(), 1);
        assert!(report.pending.is_empty());
        assert_eq!(report.credits.combined, 3);
        assert_eq!(report.progress.completed_credits, 3);
        assert_eq!(report.progress.remaining_courses, vec!["CS3020".to_string(), "CS4000".to_string()]);
    }

    #[test]
    fn test_adding_unknown_course_is_an_error() {
        let mut session = session();
        let err = session.apply(&action(ActionKind::Add, "404")).unwrap_err();
        assert!(matches!(err, RegistrarError::UnknownCourseError { .. }));
        assert!(session.report().actions.is_empty());
    }

    #[test]
    fn test_remove_reports_whether_course_was_pending() {
        let mut session = session();
        session.apply(&action(ActionKind::Add, "2")).unwrap();

        assert_eq!(
            session.apply(&action(ActionKind::Remove, "2")).unwrap(),
            ActionOutcome::Removed { was_pending: true }
        );
        assert_eq!(
            session.apply(&action(ActionKind::Remove, "2")).unwrap(),
            ActionOutcome::Removed { was_pending: false }
        );
    }
}
