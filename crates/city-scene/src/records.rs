//! Record loading and file watching.
//!
//! Loads the records JSON at startup, watches the containing directory for
//! changes, and emits [`RecordsUpdatedEvent`] whenever a fresh set lands.
//! The R key forces a reload.

use bevy::prelude::*;
use notify::{Event as NotifyEvent, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

use city_events::RecordSet;

use crate::settings::SceneSettings;

/// Plugin for loading records from disk.
pub struct RecordsPlugin;

impl Plugin for RecordsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RecordStore>()
            .add_event::<RecordsUpdatedEvent>()
            .add_systems(Update, (check_record_updates, handle_reload_key));
    }
}

/// The most recently loaded record set.
#[derive(Resource, Default)]
pub struct RecordStore {
    /// Parsed records, once a load has succeeded.
    pub set: Option<RecordSet>,
    /// Any error from the last load attempt.
    pub last_error: Option<String>,
}

impl RecordStore {
    pub fn has_records(&self) -> bool {
        self.set.is_some()
    }
}

/// Event emitted when the record set changes.
#[derive(Event)]
pub struct RecordsUpdatedEvent;

/// File watching state stored in Local (doesn't need Send+Sync).
#[derive(Default)]
struct WatcherState {
    watcher: Option<RecommendedWatcher>,
    rx: Option<Receiver<Result<NotifyEvent, notify::Error>>>,
    initialized: bool,
}

impl WatcherState {
    /// Initialize the watcher and perform the initial load.
    /// Returns true if records were loaded (caller should send the event).
    fn ensure_initialized(&mut self, path: &Path, store: &mut RecordStore) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;

        let watch_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = channel();
        match RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            notify::Config::default(),
        ) {
            Ok(mut watcher) => {
                if watch_dir.exists() {
                    if let Err(e) = watcher.watch(&watch_dir, RecursiveMode::NonRecursive) {
                        tracing::warn!("Failed to watch directory {:?}: {}", watch_dir, e);
                    } else {
                        tracing::info!("Watching directory: {:?}", watch_dir);
                    }
                } else {
                    tracing::info!(
                        "Records directory {:?} does not exist yet, reload with R once it does",
                        watch_dir
                    );
                }
                self.watcher = Some(watcher);
                self.rx = Some(rx);
            }
            Err(e) => {
                tracing::error!("Failed to create file watcher: {}", e);
            }
        }

        load_records_file(path, store)
    }
}

/// System to perform the initial load and react to file changes.
fn check_record_updates(
    mut watcher_state: Local<WatcherState>,
    settings: Res<SceneSettings>,
    mut store: ResMut<RecordStore>,
    mut events: EventWriter<RecordsUpdatedEvent>,
) {
    if watcher_state.ensure_initialized(&settings.records_path, &mut store) {
        events.send(RecordsUpdatedEvent);
    }

    let Some(ref rx) = watcher_state.rx else {
        return;
    };

    let mut reload = false;
    while let Ok(result) = rx.try_recv() {
        match result {
            Ok(event) => {
                let target = settings.records_path.file_name();
                let is_relevant = event.paths.iter().any(|p| p.file_name() == target);
                if is_relevant
                    && matches!(
                        event.kind,
                        notify::EventKind::Modify(_) | notify::EventKind::Create(_)
                    )
                {
                    tracing::debug!("Detected records change: {:?}", event.paths);
                    reload = true;
                }
            }
            Err(e) => {
                tracing::warn!("File watcher error: {}", e);
            }
        }
    }

    if reload && load_records_file(&settings.records_path, &mut store) {
        events.send(RecordsUpdatedEvent);
    }
}

/// Handle R key to force reload.
fn handle_reload_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<SceneSettings>,
    mut store: ResMut<RecordStore>,
    mut events: EventWriter<RecordsUpdatedEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        tracing::info!("Manual records reload triggered");
        if load_records_file(&settings.records_path, &mut store) {
            events.send(RecordsUpdatedEvent);
        }
    }
}

/// Load and parse the records file into the store.
fn load_records_file(path: &Path, store: &mut RecordStore) -> bool {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<RecordSet>(&contents) {
            Ok(set) => {
                tracing::info!("Loaded {} records from {:?}", set.len(), path);
                store.set = Some(set);
                store.last_error = None;
                true
            }
            Err(e) => {
                let error_msg = format!("Failed to parse records file: {}", e);
                tracing::error!("{}", error_msg);
                store.last_error = Some(error_msg);
                false
            }
        },
        Err(e) => {
            let error_msg = format!("Failed to read records file {:?}: {}", path, e);
            tracing::warn!("{}", error_msg);
            store.last_error = Some(error_msg);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_records_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = r#"{
            "primary_timeline": [{"id": "job_a", "title": "Job A"}],
            "interests": [{"id": "int_a", "title": "Interest A"}]
        }"#;
        file.write_all(json.as_bytes()).unwrap();

        let mut store = RecordStore::default();
        assert!(load_records_file(file.path(), &mut store));
        assert!(store.has_records());
        let set = store.set.unwrap();
        assert_eq!(set.primary_timeline.len(), 1);
        assert_eq!(set.interests.len(), 1);
        assert!(set.projects.is_empty());
    }

    #[test]
    fn test_load_records_file_missing() {
        let mut store = RecordStore::default();
        assert!(!load_records_file(Path::new("/nonexistent/records.json"), &mut store));
        assert!(!store.has_records());
        assert!(store.last_error.is_some());
    }

    #[test]
    fn test_load_records_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let mut store = RecordStore::default();
        assert!(!load_records_file(file.path(), &mut store));
        assert!(store.last_error.is_some());
    }
}
