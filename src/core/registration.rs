use crate::core::credits::{check_credit_ceiling, sum_credits, LoadStatus, RegistrationPolicy};
use crate::core::overlap::check_overlap;
use crate::core::prerequisites::{check_prerequisites, CompletedCourses};
use crate::domain::model::{
    ConfirmOutcome, Course, CreditTotals, PendingCourse, RegisteredCourse, SelectionState,
};
use crate::domain::ports::{Clock, SystemClock};
use crate::utils::error::RegistrationError;

/// 註冊狀態機：擁有待確認與已註冊兩個集合，所有變更都經過四個操作。
///
/// 每個課程 id 的狀態為 `NotSelected -> Pending -> Registered`，
/// 另有 `Pending -> NotSelected`（移除或確認時被捨棄）與 `Registered -> NotSelected`（退選）。
pub struct RegistrationEngine<C: Clock = SystemClock> {
    policy: RegistrationPolicy,
    completed: CompletedCourses,
    pending: Vec<PendingCourse>,
    registered: Vec<RegisteredCourse>,
    clock: C,
}

impl RegistrationEngine<SystemClock> {
    pub fn new(completed: CompletedCourses, policy: RegistrationPolicy) -> Self {
        Self::with_clock(completed, policy, SystemClock)
    }
}

impl<C: Clock> RegistrationEngine<C> {
    pub fn with_clock(completed: CompletedCourses, policy: RegistrationPolicy, clock: C) -> Self {
        Self {
            policy,
            completed,
            pending: Vec::new(),
            registered: Vec::new(),
            clock,
        }
    }

    /// 依固定順序驗證候選課程，回傳第一個失敗結果；不會變更狀態。
    ///
    /// Order: already selected, prerequisites, overlap with registered,
    /// overlap with pending, credit ceiling over registered + pending.
    pub fn validate_candidate(&self, course: &Course) -> Result<(), RegistrationError> {
        let state = self.selection_state(&course.id);
        if state != SelectionState::NotSelected {
            return Err(RegistrationError::DuplicateCourseError {
                course_id: course.id.clone(),
                state,
            });
        }

        let missing = check_prerequisites(course, self.completed.codes());
        if !missing.is_empty() {
            return Err(RegistrationError::PrerequisiteError { missing });
        }

        if let Some(conflict) = check_overlap(course, &self.registered) {
            return Err(overlap_error(conflict));
        }

        if let Some(conflict) = check_overlap(course, &self.pending) {
            return Err(overlap_error(conflict));
        }

        let selected = self
            .registered
            .iter()
            .map(AsRef::<Course>::as_ref)
            .chain(self.pending.iter().map(AsRef::<Course>::as_ref));
        check_credit_ceiling(course, selected, self.policy.credit_ceiling)
    }

    pub fn add_pending(&mut self, course: &Course) -> Result<(), RegistrationError> {
        if let Err(e) = self.validate_candidate(course) {
            tracing::warn!("Rejected {} ({}): {}", course.code, e.kind(), e);
            return Err(e);
        }

        self.pending.push(PendingCourse {
            course: course.clone(),
            pending_at: self.clock.now(),
        });
        tracing::debug!(
            "Added {} to pending ({} credits pending)",
            course.code,
            self.credit_totals().pending
        );

        Ok(())
    }

    /// 確認待確認課程。只重新檢查與已註冊課程的時間衝突；
    /// 若有衝突，該課程直接從待確認清單移除，不回傳錯誤。
    pub fn confirm_pending(&mut self, id: &str) -> ConfirmOutcome {
        let Some(index) = self.pending.iter().position(|p| p.course.id == id) else {
            tracing::debug!("Confirm ignored: course {} is not pending", id);
            return ConfirmOutcome::NotPending;
        };

        let entry = self.pending.remove(index);

        if let Some(conflict) = check_overlap(&entry.course, &self.registered) {
            tracing::warn!(
                "Discarded pending {}: overlaps registered {}",
                entry.course.code,
                conflict.code
            );
            return ConfirmOutcome::Discarded {
                conflicting_course_id: conflict.id.clone(),
            };
        }

        tracing::info!("Registered {}", entry.course.code);
        self.registered.push(RegisteredCourse {
            course: entry.course,
            registered_at: self.clock.now(),
        });

        ConfirmOutcome::Registered
    }

    pub fn remove_pending(&mut self, id: &str) -> Option<PendingCourse> {
        let index = self.pending.iter().position(|p| p.course.id == id)?;
        let removed = self.pending.remove(index);
        tracing::debug!("Removed {} from pending", removed.course.code);
        Some(removed)
    }

    pub fn drop_registered(&mut self, id: &str) -> Option<RegisteredCourse> {
        let index = self.registered.iter().position(|r| r.course.id == id)?;
        let dropped = self.registered.remove(index);
        tracing::info!(
            "Dropped {} ({} credits freed)",
            dropped.course.code,
            dropped.course.credits
        );
        Some(dropped)
    }

    pub fn pending(&self) -> &[PendingCourse] {
        &self.pending
    }

    pub fn registered(&self) -> &[RegisteredCourse] {
        &self.registered
    }

    pub fn completed(&self) -> &CompletedCourses {
        &self.completed
    }

    pub fn policy(&self) -> &RegistrationPolicy {
        &self.policy
    }

    pub fn selection_state(&self, id: &str) -> SelectionState {
        if self.registered.iter().any(|r| r.course.id == id) {
            SelectionState::Registered
        } else if self.pending.iter().any(|p| p.course.id == id) {
            SelectionState::Pending
        } else {
            SelectionState::NotSelected
        }
    }

    pub fn credit_totals(&self) -> CreditTotals {
        let registered = sum_credits(&self.registered);
        let pending = sum_credits(&self.pending);
        CreditTotals {
            registered,
            pending,
            combined: registered.saturating_add(pending),
        }
    }

    pub fn load_status(&self) -> LoadStatus {
        self.policy.load_status(self.credit_totals().combined)
    }
}

fn overlap_error(conflict: &Course) -> RegistrationError {
    RegistrationError::OverlapError {
        conflicting_course_id: conflict.id.clone(),
        conflicting_code: conflict.code.clone(),
        conflicting_schedule: conflict.schedule.clone(),
    }
}
