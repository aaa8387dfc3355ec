//! Pure collection reducers behind every store mutation.
//!
//! # Responsibility
//! - Compute the next collection from (current collection, argument).
//! - Stay free of persistence and notification side effects.
//!
//! # Invariants
//! - Relative order of untouched records is preserved.
//! - `id` equality is the only targeting key; every matching record is
//!   affected, including duplicates.

use crate::model::course::{Course, CourseId};

/// Returns a new collection with `course` appended at the end.
pub fn append(courses: &[Course], course: Course) -> Vec<Course> {
    let mut next = Vec::with_capacity(courses.len() + 1);
    next.extend_from_slice(courses);
    next.push(course);
    next
}

/// Returns every record whose id differs from `id`.
pub fn remove_by_id(courses: &[Course], id: CourseId) -> Vec<Course> {
    courses
        .iter()
        .filter(|course| course.id != id)
        .cloned()
        .collect()
}

/// Returns the collection with `completed` flipped on each record matching `id`.
pub fn toggle_by_id(courses: &[Course], id: CourseId) -> Vec<Course> {
    courses
        .iter()
        .map(|course| {
            if course.id == id {
                course.toggled()
            } else {
                course.clone()
            }
        })
        .collect()
}

/// Returns whether any record carries `id`.
pub fn contains_id(courses: &[Course], id: CourseId) -> bool {
    courses.iter().any(|course| course.id == id)
}

#[cfg(test)]
mod tests {
    use super::{append, contains_id, remove_by_id, toggle_by_id};
    use crate::model::course::Course;

    fn sample() -> Vec<Course> {
        vec![
            Course::new(1, "Math"),
            Course::new(2, "Art"),
            Course::new(3, "History"),
        ]
    }

    #[test]
    fn append_keeps_existing_order() {
        let next = append(&sample(), Course::new(4, "Music"));
        let ids = next.iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(!next[3].completed);
    }

    #[test]
    fn remove_preserves_survivor_order() {
        let next = remove_by_id(&sample(), 2);
        let ids = next.iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn remove_and_toggle_absent_id_are_noops() {
        let courses = sample();
        assert_eq!(remove_by_id(&courses, 99), courses);
        assert_eq!(toggle_by_id(&courses, 99), courses);
        assert!(!contains_id(&courses, 99));
    }

    #[test]
    fn toggle_flips_only_matching_record_and_is_an_involution() {
        let courses = sample();
        let once = toggle_by_id(&courses, 3);
        assert!(once[2].completed);
        assert_eq!(once[0], courses[0]);
        assert_eq!(once[1], courses[1]);

        let twice = toggle_by_id(&once, 3);
        assert_eq!(twice, courses);
    }

    #[test]
    fn duplicate_ids_are_all_affected() {
        let courses = vec![
            Course::new(5, "A"),
            Course::new(6, "B"),
            Course::new(5, "C"),
        ];

        let toggled = toggle_by_id(&courses, 5);
        assert!(toggled[0].completed);
        assert!(!toggled[1].completed);
        assert!(toggled[2].completed);

        let removed = remove_by_id(&courses, 5);
        assert_eq!(removed.len(), courses.len() - 2);
        assert_eq!(removed[0].title, "B");
    }
}
