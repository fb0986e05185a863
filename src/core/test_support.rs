use crate::domain::model::{Course, Season, Term};

pub(crate) fn course(id: &str, schedule: &str) -> Course {
    course_with(id, &format!("C{}", id), 3, schedule, &[])
}

pub(crate) fn course_with(
    id: &str,
    code: &str,
    credits: u32,
    schedule: &str,
    prerequisites: &[&str],
) -> Course {
    Course {
        id: id.to_string(),
        code: code.to_string(),
        title: format!("{} title", code),
        credits,
        professor: "Staff".to_string(),
        schedule: schedule.to_string(),
        location: "Combes 101".to_string(),
        available_spots: 10,
        total_spots: 25,
        department: "Computer Science".to_string(),
        description: String::new(),
        term: Term::new(Season::Spring, 2026),
        prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
    }
}
