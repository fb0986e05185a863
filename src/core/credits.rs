use crate::domain::model::Course;
use crate::utils::error::RegistrationError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CREDIT_CEILING: u32 = 18;
pub const DEFAULT_RECOMMENDED_MIN_CREDITS: u32 = 12;
/// 單一課程可宣告的最大學分，目錄驗證時使用
pub const MAX_COURSE_CREDITS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPolicy {
    /// 待確認加已註冊的學分上限
    #[serde(default = "default_credit_ceiling")]
    pub credit_ceiling: u32,
    /// 建議的最低學分，僅供顯示，不會被強制
    #[serde(default = "default_recommended_min_credits")]
    pub recommended_min_credits: u32,
}

fn default_credit_ceiling() -> u32 {
    DEFAULT_CREDIT_CEILING
}

fn default_recommended_min_credits() -> u32 {
    DEFAULT_RECOMMENDED_MIN_CREDITS
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            credit_ceiling: DEFAULT_CREDIT_CEILING,
            recommended_min_credits: DEFAULT_RECOMMENDED_MIN_CREDITS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadStatus {
    BelowRecommended,
    Recommended,
    AtCeiling,
}

impl RegistrationPolicy {
    pub fn load_status(&self, combined_credits: u32) -> LoadStatus {
        if combined_credits >= self.credit_ceiling {
            LoadStatus::AtCeiling
        } else if combined_credits >= self.recommended_min_credits {
            LoadStatus::Recommended
        } else {
            LoadStatus::BelowRecommended
        }
    }
}

pub fn sum_credits<'a, T>(courses: impl IntoIterator<Item = &'a T>) -> u32
where
    T: AsRef<Course> + 'a,
{
    courses
        .into_iter()
        .fold(0u32, |total, c| total.saturating_add(c.as_ref().credits))
}

/// 加入候選課程後的總學分若超過上限，回傳 `CreditLimitError`。
pub fn check_credit_ceiling<'a, T>(
    candidate: &Course,
    existing: impl IntoIterator<Item = &'a T>,
    ceiling: u32,
) -> Result<(), RegistrationError>
where
    T: AsRef<Course> + 'a,
{
    let current = sum_credits(existing);
    // 溢位時視為超過上限
    let total = current.checked_add(candidate.credits).unwrap_or(u32::MAX);

    if total > ceiling {
        return Err(RegistrationError::CreditLimitError {
            current,
            adding: candidate.credits,
            total,
            ceiling,
        });
    }

    Ok(())
}
