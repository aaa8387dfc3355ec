use coursetrack_core::model::course_reducer::{append, remove_by_id, toggle_by_id};
use coursetrack_core::{Course, CourseId, CourseStore, MemoryStorage, Snapshot, SnapshotRepository};
use proptest::prelude::*;

// Narrow id range so generated collections regularly share ids.
fn course_strategy() -> impl Strategy<Value = Course> {
    (0u64..8, "\\PC{1,12}", any::<bool>()).prop_map(|(id, title, completed)| Course {
        id,
        title,
        completed,
    })
}

fn courses_strategy() -> impl Strategy<Value = Vec<Course>> {
    proptest::collection::vec(course_strategy(), 0..24)
}

proptest! {
    #[test]
    fn snapshot_encode_decode_round_trips(courses in courses_strategy()) {
        let raw = Snapshot::from_courses(&courses).encode().unwrap();
        let decoded = Snapshot::decode(&raw).unwrap();
        prop_assert_eq!(decoded.into_courses(), courses);
    }

    #[test]
    fn repository_restores_what_it_saved(courses in courses_strategy()) {
        let mut repo = SnapshotRepository::new(MemoryStorage::new(), "courses");
        repo.save_courses(&courses).unwrap();
        prop_assert_eq!(repo.load_courses().unwrap(), Some(courses));
    }

    #[test]
    fn toggle_flips_exactly_matching_records(courses in courses_strategy(), id in 0u64..10) {
        let toggled = toggle_by_id(&courses, id);
        prop_assert_eq!(toggled.len(), courses.len());
        for (before, after) in courses.iter().zip(&toggled) {
            prop_assert_eq!(after.id, before.id);
            prop_assert_eq!(&after.title, &before.title);
            prop_assert_eq!(after.completed, before.completed ^ (before.id == id));
        }
        prop_assert_eq!(toggle_by_id(&toggled, id), courses);
    }

    #[test]
    fn remove_drops_matches_and_keeps_survivor_order(
        courses in courses_strategy(),
        id in 0u64..10,
    ) {
        let matches = courses.iter().filter(|course| course.id == id).count();
        let remaining = remove_by_id(&courses, id);

        prop_assert_eq!(remaining.len(), courses.len() - matches);
        let survivors = courses
            .iter()
            .filter(|course| course.id != id)
            .cloned()
            .collect::<Vec<_>>();
        prop_assert_eq!(remaining, survivors);
    }

    #[test]
    fn absent_id_is_a_noop(courses in courses_strategy()) {
        let absent: CourseId = 100;
        prop_assert_eq!(remove_by_id(&courses, absent), courses.clone());
        prop_assert_eq!(toggle_by_id(&courses, absent), courses);
    }

    #[test]
    fn append_places_course_last(courses in courses_strategy(), course in course_strategy()) {
        let next = append(&courses, course.clone());
        prop_assert_eq!(&next[..courses.len()], courses.as_slice());
        prop_assert_eq!(next.last(), Some(&course));
    }

    #[test]
    fn store_add_assigns_fresh_ids(titles in proptest::collection::vec("[a-zA-Z]{1,10}", 1..16)) {
        let mut store = CourseStore::open(MemoryStorage::new());
        for title in &titles {
            let created = store.add(title.as_str()).unwrap();
            prop_assert_eq!(store.courses().last(), Some(&created));
            prop_assert!(!created.completed);
            let same_id = store.courses().iter().filter(|c| c.id == created.id).count();
            prop_assert_eq!(same_id, 1);
        }
        prop_assert_eq!(store.courses().len(), titles.len());
    }
}
