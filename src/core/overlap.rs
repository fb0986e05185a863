use crate::core::schedule::parse_schedule;
use crate::domain::model::Course;

/// 依 `existing` 的順序，回傳第一個與候選課程時間衝突的課程。
///
/// 任一方的時間字串無法解析時，該組合不比較，也不會回報衝突。
pub fn check_overlap<'a, T>(
    candidate: &Course,
    existing: impl IntoIterator<Item = &'a T>,
) -> Option<&'a Course>
where
    T: AsRef<Course> + 'a,
{
    let candidate_schedule = parse_schedule(&candidate.schedule)?;

    existing
        .into_iter()
        .map(AsRef::<Course>::as_ref)
        .find(|course| {
            parse_schedule(&course.schedule)
                .is_some_and(|schedule| candidate_schedule.conflicts_with(&schedule))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::course;

    #[test]
    fn test_reports_first_conflict_in_given_order() {
        let existing = vec![
            course("1", "Tue 10:00-11:00"),
            course("2", "Mon 10:30-11:30"),
            course("3", "Mon/Wed 11:00-12:00"),
        ];
        let candidate = course("9", "Mon/Wed 10:00-11:15");

        let conflict = check_overlap(&candidate, &existing).unwrap();
        assert_eq!(conflict.id, "2");

        let reversed: Vec<Course> = existing.into_iter().rev().collect();
        let conflict = check_overlap(&candidate, &reversed).unwrap();
        assert_eq!(conflict.id, "3");
    }

    #[test]
    fn test_back_to_back_is_not_a_conflict() {
        let existing = vec![course("1", "Mon 11:15-12:30")];
        let candidate = course("2", "Mon/Wed 10:00-11:15");
        assert!(check_overlap(&candidate, &existing).is_none());
    }

    #[test]
    fn test_unparseable_schedules_never_conflict() {
        let existing = vec![course("1", "TBA"), course("2", "Mon 10:00-11:00")];
        assert!(check_overlap(&course("3", "TBA"), &existing).is_none());

        let conflict = check_overlap(&course("4", "Mon 10:30-11:30"), &existing).unwrap();
        assert_eq!(conflict.id, "2");
    }

    #[test]
    fn test_empty_collection_has_no_conflict() {
        let existing: Vec<Course> = Vec::new();
        assert!(check_overlap(&course("1", "Mon 10:00-11:00"), &existing).is_none());
    }
}
