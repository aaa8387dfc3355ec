//! Course store: the canonical, persisted course collection.
//!
//! # Responsibility
//! - Own the ordered collection and the id counter.
//! - Apply add/remove/toggle through pure reducers.
//! - Persist the full snapshot and notify subscribers after every change.
//!
//! # Invariants
//! - Order of effects per mutation: in-memory swap, persist, notify.
//! - Persist and notify run synchronously before the mutation returns.
//! - Remove/toggle on an absent id touch neither storage nor subscribers.
//! - A failed write keeps the in-memory change and still notifies.
//! - Ids handed out by the counter exceed every id in the collection.
//! - Once the counter runs past `CourseId::MAX`, `add` reuses the smallest
//!   unused id instead of wrapping.

use crate::config::StoreConfig;
use crate::model::course::{validate_title, Course, CourseId, CourseValidationError};
use crate::model::course_reducer::{append, contains_id, remove_by_id, toggle_by_id};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::repo::storage::{SnapshotStorage, StorageError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for course mutations.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected; nothing changed.
    Validation(CourseValidationError),
    /// Change applied in memory and announced, but not persisted.
    ///
    /// `course` carries the record created by `add`, if any.
    PersistenceWriteFailed {
        source: StorageError,
        course: Option<Course>,
    },
    /// Snapshot could not be read; in-memory collection left unchanged.
    PersistenceReadFailed(StorageError),
    /// Every id is taken.
    IdSpaceExhausted,
}

impl StoreError {
    /// Course created in memory despite the error, when there is one.
    pub fn applied_course(&self) -> Option<&Course> {
        match self {
            Self::PersistenceWriteFailed { course, .. } => course.as_ref(),
            _ => None,
        }
    }

    fn write_failed(source: StorageError) -> Self {
        Self::PersistenceWriteFailed {
            source,
            course: None,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::PersistenceWriteFailed { source, .. } => {
                write!(f, "persisting courses failed: {source}")
            }
            Self::PersistenceReadFailed(err) => write!(f, "restoring courses failed: {err}"),
            Self::IdSpaceExhausted => write!(f, "no unused course id left"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::PersistenceWriteFailed { source, .. } => Some(source),
            Self::PersistenceReadFailed(err) => Some(err),
            Self::IdSpaceExhausted => None,
        }
    }
}

impl From<CourseValidationError> for StoreError {
    fn from(value: CourseValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Course]) + Send>;

/// Persisted course collection with a synchronous change feed.
pub struct CourseStore<S: SnapshotStorage> {
    courses: Vec<Course>,
    /// `None` once the counter has handed out `CourseId::MAX`.
    next_id: Option<CourseId>,
    repo: SnapshotRepository<S>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: SnapshotStorage> CourseStore<S> {
    /// Opens a store over `storage` using the default configuration.
    pub fn open(storage: S) -> Self {
        Self::open_with_config(storage, &StoreConfig::default())
    }

    /// Opens a store and restores the persisted snapshot once.
    ///
    /// An unreadable snapshot is logged and the store starts empty; the slot
    /// is left untouched until the next mutation overwrites it.
    pub fn open_with_config(storage: S, config: &StoreConfig) -> Self {
        let repo = SnapshotRepository::new(storage, config.storage_key.as_str());
        let courses = match repo.load_courses() {
            Ok(Some(courses)) => {
                info!(
                    "event=store_restore module=store status=ok count={}",
                    courses.len()
                );
                courses
            }
            Ok(None) => {
                info!("event=store_restore module=store status=empty");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=store_restore module=store status=error error_code=persistence_read_failed error={}",
                    err
                );
                Vec::new()
            }
        };

        Self {
            next_id: next_id_after(&courses, Some(1)),
            courses,
            repo,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current collection in insertion order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Id the next `add` will assign, or `None` when every id is taken.
    pub fn next_id(&self) -> Option<CourseId> {
        self.next_id.or_else(|| smallest_unused_id(&self.courses))
    }

    pub fn storage(&self) -> &S {
        self.repo.storage()
    }

    pub fn into_storage(self) -> S {
        self.repo.into_storage()
    }

    /// Creates a course from a form title and appends it.
    ///
    /// # Errors
    /// - `Validation` for an empty title; nothing is created.
    /// - `IdSpaceExhausted` when no id is free; nothing is created.
    /// - `PersistenceWriteFailed` when the snapshot write fails; the course is
    ///   still appended, announced, and carried in the error.
    pub fn add(&mut self, title: impl Into<String>) -> StoreResult<Course> {
        let title = title.into();
        validate_title(&title)?;

        let id = self.allocate_id()?;
        let course = Course::new(id, title);
        let next = append(&self.courses, course.clone());
        debug!("event=course_add module=store course_id={id}");
        match self.commit(next) {
            Ok(()) => Ok(course),
            Err(StoreError::PersistenceWriteFailed { source, .. }) => {
                Err(StoreError::PersistenceWriteFailed {
                    source,
                    course: Some(course),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Appends a caller-built course, keeping its id.
    ///
    /// Duplicate ids are accepted; later toggle/remove calls affect every
    /// record sharing the id.
    pub fn insert(&mut self, course: Course) -> StoreResult<()> {
        course.validate()?;

        self.next_id = next_id_after(std::slice::from_ref(&course), self.next_id);
        debug!("event=course_insert module=store course_id={}", course.id);
        let next = append(&self.courses, course);
        self.commit(next)
    }

    /// Removes every course with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: CourseId) -> StoreResult<()> {
        if !contains_id(&self.courses, id) {
            debug!("event=course_remove module=store status=noop course_id={id}");
            return Ok(());
        }
        debug!("event=course_remove module=store course_id={id}");
        let next = remove_by_id(&self.courses, id);
        self.commit(next)
    }

    /// Flips `completed` on every course with `id`. Absent ids are a no-op.
    pub fn toggle(&mut self, id: CourseId) -> StoreResult<()> {
        if !contains_id(&self.courses, id) {
            debug!("event=course_toggle module=store status=noop course_id={id}");
            return Ok(());
        }
        debug!("event=course_toggle module=store course_id={id}");
        let next = toggle_by_id(&self.courses, id);
        self.commit(next)
    }

    /// Empties the collection and deletes the storage slot.
    ///
    /// The id counter keeps counting so cleared ids are never reissued
    /// within this process.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.courses.clear();
        let persisted = self.repo.clear().map_err(|err| {
            error!(
                "event=store_clear module=store status=error error_code=persistence_write_failed error={}",
                err
            );
            StoreError::write_failed(err)
        });
        if persisted.is_ok() {
            info!("event=store_clear module=store status=ok");
        }
        self.notify();
        persisted
    }

    /// Re-reads the storage slot, replacing the in-memory collection.
    ///
    /// # Errors
    /// - `PersistenceReadFailed` when the slot cannot be read or decoded; the
    ///   current collection is kept.
    pub fn reload(&mut self) -> StoreResult<()> {
        let restored = self
            .repo
            .load_courses()
            .map_err(StoreError::PersistenceReadFailed)?
            .unwrap_or_default();

        self.next_id = next_id_after(&restored, self.next_id);
        self.courses = restored;
        info!(
            "event=store_reload module=store status=ok count={}",
            self.courses.len()
        );
        self.notify();
        Ok(())
    }

    /// Registers a listener called with the collection after every change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&[Course]) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drops a listener. Returns `false` when it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn allocate_id(&mut self) -> StoreResult<CourseId> {
        match self.next_id {
            Some(id) => {
                self.next_id = id.checked_add(1);
                if self.next_id.is_none() {
                    warn!("event=id_counter module=store status=exhausted");
                }
                Ok(id)
            }
            None => smallest_unused_id(&self.courses).ok_or(StoreError::IdSpaceExhausted),
        }
    }

    fn commit(&mut self, next: Vec<Course>) -> StoreResult<()> {
        self.courses = next;
        let persisted = self.repo.save_courses(&self.courses).map_err(|err| {
            error!(
                "event=store_persist module=store status=error error_code=persistence_write_failed count={} error={}",
                self.courses.len(),
                err
            );
            StoreError::write_failed(err)
        });
        self.notify();
        persisted
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.courses);
        }
    }
}

/// Smallest counter value above every id in `courses`, starting at `floor`.
///
/// `None` when `floor` is already `None` or some id is `CourseId::MAX`.
fn next_id_after(courses: &[Course], floor: Option<CourseId>) -> Option<CourseId> {
    courses.iter().try_fold(floor?, |next, course| {
        Some(next.max(course.id.checked_add(1)?))
    })
}

fn smallest_unused_id(courses: &[Course]) -> Option<CourseId> {
    let mut used = courses.iter().map(|course| course.id).collect::<Vec<_>>();
    used.sort_unstable();
    used.dedup();

    let mut candidate: CourseId = 1;
    for id in used {
        if id < candidate {
            continue;
        }
        if id > candidate {
            break;
        }
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}
