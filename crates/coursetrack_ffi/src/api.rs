//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the course form and course list actions to Dart via FRB.
//! - Own the single process-wide course store holder.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - All store access goes through one mutex, so each call observes the
//!   result of the previous one.
//! - The store is opened against exactly one database path per process.

use coursetrack_core::{
    core_version as core_version_inner, default_log_level, init_logging as init_logging_inner,
    ping as ping_inner, validate_title, Course, CourseId, CourseStore, SqliteStorage, StoreError,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const COURSE_DB_FILE_NAME: &str = "coursetrack.sqlite3";
const COURSE_DB_PATH_ENV: &str = "COURSETRACK_DB_PATH";
const EMPTY_TITLE_MESSAGE: &str = "Please enter a title";

static COURSE_STORE: OnceLock<StoreHolder> = OnceLock::new();

struct StoreHolder {
    db_path: PathBuf,
    store: Mutex<CourseStore<SqliteStorage>>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive); empty
///   selects the build default (`debug` or `info`).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = if level.trim().is_empty() {
        default_log_level()
    } else {
        level.as_str()
    };
    match init_logging_inner(level, log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens the course store against `db_path`.
///
/// Without this call the store opens lazily on first use, at
/// `$COURSETRACK_DB_PATH` or a file in the temp directory.
///
/// # FFI contract
/// - Idempotent for the same path.
/// - Returns an error message when the store is already open elsewhere.
/// - Never panics; returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn course_store_init(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    match store_holder(Some(PathBuf::from(trimmed))) {
        Ok(_) => String::new(),
        Err(err) => err,
    }
}

/// One row of the course list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseItem {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

impl From<&Course> for CourseItem {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            completed: course.completed,
        }
    }
}

/// List response envelope for the course list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseListResponse {
    /// Whether the list could be read.
    pub ok: bool,
    /// Courses in insertion order.
    pub items: Vec<CourseItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope for form and list actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseActionResponse {
    /// Whether the change was applied and persisted.
    pub ok: bool,
    /// Affected course ID, when known.
    pub course_id: Option<u64>,
    /// Human-readable response message; shown to the user on failure.
    pub message: String,
}

impl CourseActionResponse {
    fn success(message: impl Into<String>, course_id: CourseId) -> Self {
        Self {
            ok: true,
            course_id: Some(course_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>, course_id: Option<CourseId>) -> Self {
        Self {
            ok: false,
            course_id,
            message: message.into(),
        }
    }
}

/// Submits the "add course" form.
///
/// # FFI contract
/// - Empty titles fail with `Please enter a title` and create nothing.
/// - On success returns the store-assigned course ID.
/// - When the course was created but could not be saved, returns `ok=false`
///   together with the new course ID, so callers do not resubmit.
#[flutter_rust_bridge::frb(sync)]
pub fn course_form_submit(title: String) -> CourseActionResponse {
    if validate_title(&title).is_err() {
        return CourseActionResponse::failure(EMPTY_TITLE_MESSAGE, None);
    }

    to_submit_response(with_course_store(|store| store.add(title)))
}

/// Returns every course for the list view.
#[flutter_rust_bridge::frb(sync)]
pub fn course_list() -> CourseListResponse {
    match with_course_store(|store| {
        store
            .courses()
            .iter()
            .map(CourseItem::from)
            .collect::<Vec<_>>()
    }) {
        Ok(items) => {
            let message = if items.is_empty() {
                "No courses.".to_string()
            } else {
                format!("{} course(s).", items.len())
            };
            CourseListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => CourseListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("course_list failed: {err}"),
        },
    }
}

/// Flips the completion checkbox of course `id`. Unknown IDs are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn course_toggle(id: u64) -> CourseActionResponse {
    to_action_response(
        "course_toggle",
        "Course toggled.",
        id,
        with_course_store(|store| store.toggle(id)),
    )
}

/// Removes course `id` from the list. Unknown IDs are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn course_remove(id: u64) -> CourseActionResponse {
    to_action_response(
        "course_remove",
        "Course removed.",
        id,
        with_course_store(|store| store.remove(id)),
    )
}

fn to_submit_response(
    result: Result<Result<Course, StoreError>, String>,
) -> CourseActionResponse {
    match result {
        Ok(Ok(course)) => CourseActionResponse::success("Course added.", course.id),
        Ok(Err(StoreError::Validation(_))) => {
            CourseActionResponse::failure(EMPTY_TITLE_MESSAGE, None)
        }
        Ok(Err(err)) => match err.applied_course() {
            Some(course) => CourseActionResponse::failure(
                format!("Course added but not saved: {err}"),
                Some(course.id),
            ),
            None => {
                CourseActionResponse::failure(format!("course_form_submit failed: {err}"), None)
            }
        },
        Err(err) => {
            CourseActionResponse::failure(format!("course_form_submit failed: {err}"), None)
        }
    }
}

fn to_action_response(
    operation: &str,
    message: &str,
    id: CourseId,
    result: Result<Result<(), StoreError>, String>,
) -> CourseActionResponse {
    match result.and_then(|applied| applied.map_err(|err| err.to_string())) {
        Ok(()) => CourseActionResponse::success(message, id),
        Err(err) => CourseActionResponse::failure(format!("{operation} failed: {err}"), Some(id)),
    }
}

fn default_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(COURSE_DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(COURSE_DB_FILE_NAME)
}

fn store_holder(requested: Option<PathBuf>) -> Result<&'static StoreHolder, String> {
    if let Some(holder) = COURSE_STORE.get() {
        return ensure_same_path(holder, requested.as_ref());
    }

    let db_path = requested.clone().unwrap_or_else(default_db_path);
    let storage = SqliteStorage::open(&db_path)
        .map_err(|err| format!("course DB open failed: {err}"))?;
    let opened = StoreHolder {
        db_path,
        store: Mutex::new(CourseStore::open(storage)),
    };

    // Another thread may have won the race; its holder is authoritative.
    if COURSE_STORE.set(opened).is_err() {
        warn!("event=store_init module=ffi status=raced");
    }
    let holder = COURSE_STORE
        .get()
        .ok_or_else(|| "course store unavailable".to_string())?;
    ensure_same_path(holder, requested.as_ref())
}

fn ensure_same_path(
    holder: &'static StoreHolder,
    requested: Option<&PathBuf>,
) -> Result<&'static StoreHolder, String> {
    match requested {
        Some(path) if *path != holder.db_path => Err(format!(
            "course store already open at `{}`; refusing to switch to `{}`",
            holder.db_path.display(),
            path.display()
        )),
        _ => Ok(holder),
    }
}

fn with_course_store<T>(
    f: impl FnOnce(&mut CourseStore<SqliteStorage>) -> T,
) -> Result<T, String> {
    let holder = store_holder(None)?;
    let mut store = holder
        .store
        .lock()
        .map_err(|_| "course store lock poisoned".to_string())?;
    Ok(f(&mut store))
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, course_form_submit, course_list, course_remove, course_store_init,
        course_toggle, init_logging, ping, to_submit_response, EMPTY_TITLE_MESSAGE,
    };
    use coursetrack_core::{Course, CourseValidationError, StorageError, StoreError};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn test_db_path() -> PathBuf {
        std::env::temp_dir().join(format!(
            "coursetrack-ffi-test-{}.sqlite3",
            std::process::id()
        ))
    }

    fn init_test_store() {
        let error = course_store_init(test_db_path().to_string_lossy().into_owned());
        assert!(error.is_empty(), "{error}");
    }

    fn unique_title(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let log_dir = std::env::temp_dir().join("coursetrack-ffi-unused-logs");
        let error = init_logging(
            "verbose".to_string(),
            log_dir.to_string_lossy().into_owned(),
        );
        assert!(error.contains("unsupported log level"), "{error}");
    }

    #[test]
    fn init_logging_empty_level_uses_build_default() {
        let error = init_logging(String::new(), "tmp/logs".to_string());
        assert!(error.contains("absolute"), "{error}");
        assert!(!error.contains("log level"), "{error}");
    }

    #[test]
    fn unsaved_course_still_reports_its_id() {
        let err = StoreError::PersistenceWriteFailed {
            source: StorageError::Io(std::io::Error::other("quota exceeded")),
            course: Some(Course::new(7, "Math")),
        };

        let response = to_submit_response(Ok(Err(err)));
        assert!(!response.ok);
        assert_eq!(response.course_id, Some(7));
        assert!(response.message.contains("not saved"), "{}", response.message);
    }

    #[test]
    fn submit_response_maps_validation_and_store_errors() {
        let invalid = to_submit_response(Ok(Err(StoreError::Validation(
            CourseValidationError::EmptyTitle,
        ))));
        assert_eq!(invalid.message, EMPTY_TITLE_MESSAGE);
        assert_eq!(invalid.course_id, None);

        let exhausted = to_submit_response(Ok(Err(StoreError::IdSpaceExhausted)));
        assert!(!exhausted.ok);
        assert_eq!(exhausted.course_id, None);

        let unavailable = to_submit_response(Err("course store lock poisoned".to_string()));
        assert!(unavailable.message.contains("lock poisoned"));
    }

    #[test]
    fn course_store_init_is_idempotent_and_rejects_other_paths() {
        init_test_store();
        init_test_store();

        let other = std::env::temp_dir().join("coursetrack-ffi-other.sqlite3");
        let error = course_store_init(other.to_string_lossy().into_owned());
        assert!(error.contains("refusing to switch"), "{error}");
        assert!(!course_store_init("  ".to_string()).is_empty());
    }

    #[test]
    fn empty_form_submit_is_rejected_without_creating() {
        init_test_store();

        let response = course_form_submit(String::new());
        assert!(!response.ok);
        assert_eq!(response.message, "Please enter a title");
        assert_eq!(response.course_id, None);

        let whitespace = course_form_submit("   ".to_string());
        assert!(!whitespace.ok);
        assert!(course_list()
            .items
            .iter()
            .all(|item| !item.title.trim().is_empty()));
    }

    #[test]
    fn submitted_course_can_be_toggled_and_removed() {
        init_test_store();
        let title = unique_title("course");
        let created = course_form_submit(title.clone());
        assert!(created.ok, "{}", created.message);
        let id = created.course_id.expect("submit should return course_id");

        let listed = course_list();
        let item = listed
            .items
            .iter()
            .find(|item| item.id == id)
            .expect("created course should be listed");
        assert_eq!(item.title, title);
        assert!(!item.completed);

        let toggled = course_toggle(id);
        assert!(toggled.ok, "{}", toggled.message);
        let item = course_list()
            .items
            .into_iter()
            .find(|item| item.id == id)
            .expect("toggled course should be listed");
        assert!(item.completed);

        let removed = course_remove(id);
        assert!(removed.ok, "{}", removed.message);
        assert!(course_list().items.iter().all(|item| item.id != id));
    }

    #[test]
    fn unknown_ids_are_noops() {
        init_test_store();
        assert!(course_toggle(u64::MAX).ok);
        assert!(course_remove(u64::MAX).ok);
    }
}
