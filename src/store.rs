//! Shared state store
//!
//! Every operation runs load → mutate → save while holding the store's lock,
//! so concurrent requests in one process cannot overwrite each other's
//! updates. One `StateStore` per state file per process; share it with `Arc`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::highscores::HighScores;
use crate::names::NamePicker;
use crate::persistence::FileStorage;
use crate::platform::{Clock, SystemClock};
use crate::request::{ScoreSubmission, SpeedSubmission};
use crate::settings::Speed;
use crate::state::GameState;

pub struct StateStore {
    storage: FileStorage,
    clock: Box<dyn Clock>,
    /// Held for the whole read-modify-write; also owns the name RNG
    names: Mutex<NamePicker>,
}

impl StateStore {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_parts(config, SystemClock, NamePicker::new())
    }

    /// Store with a fixed clock source and name sequence
    pub fn with_parts(config: StoreConfig, clock: impl Clock + 'static, names: NamePicker) -> Self {
        info!("State store at {:?}", config.path);
        Self {
            storage: FileStorage::new(config.path),
            clock: Box::new(clock),
            names: Mutex::new(names),
        }
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// Current state. Falls back to defaults if the file is missing or bad.
    pub fn get_state(&self) -> GameState {
        let _guard = self.lock();
        self.load_locked().unwrap_or_else(|e| {
            warn!("{e}, using defaults");
            GameState::default()
        })
    }

    /// Same as [`get_state`](Self::get_state)
    pub fn load(&self) -> GameState {
        self.get_state()
    }

    /// Overwrite the stored state
    pub fn save(&self, state: &GameState) -> Result<()> {
        let _guard = self.lock();
        self.storage.write(state)
    }

    /// Record a score and return the persisted leaderboard.
    ///
    /// A missing score is rejected; nothing is written in that case.
    pub fn record_score(&self, score: Option<u64>, name: Option<&str>) -> Result<HighScores> {
        let state = self.update(|state, names| {
            state.record_score(score, name, self.clock.as_ref(), names)
        })?;
        Ok(state.highscores)
    }

    /// Validate a raw score request, then [`record_score`](Self::record_score)
    pub fn submit_score(&self, request: &ScoreSubmission) -> Result<HighScores> {
        let score = request.score().inspect_err(|e| {
            debug!("Rejected score submission: {e}");
        })?;
        self.record_score(Some(score), request.name())
    }

    /// Set the speed. Out-of-range or absent values are ignored, which still
    /// counts as success; only storage failures return an error.
    pub fn set_speed(&self, speed: Option<i64>) -> Result<bool> {
        let state = self.update(|state, _| Ok(state.set_speed(speed)))?;
        if speed.and_then(Speed::new).is_none() {
            debug!("Speed update {speed:?} ignored, keeping {}", state.speed);
        }
        Ok(true)
    }

    pub fn submit_speed(&self, request: &SpeedSubmission) -> Result<bool> {
        self.set_speed(request.speed())
    }

    /// Run one locked read-modify-write. The file is only rewritten when the
    /// state actually changed, and never when it could not be read.
    fn update<F>(&self, mutate: F) -> Result<GameState>
    where
        F: FnOnce(GameState, &mut NamePicker) -> Result<GameState>,
    {
        let mut names = self.lock();
        let current = self.load_locked()?;
        let next = mutate(current.clone(), &mut *names)?;
        if next != current {
            self.storage.write(&next)?;
        }
        Ok(next)
    }

    /// Missing and corrupt files give defaults; a corrupt file is moved
    /// aside first. A file that exists but cannot be read is an error, so
    /// callers never overwrite data they could not see.
    fn load_locked(&self) -> Result<GameState> {
        match self.storage.read() {
            Ok(Some(state)) => Ok(state),
            Ok(None) => {
                debug!("No state file at {:?}, using defaults", self.path());
                Ok(GameState::default())
            }
            Err(StoreError::Corrupt { path, source }) => {
                warn!("State file {path:?} is corrupt ({source}), using defaults");
                match self.storage.quarantine() {
                    Ok(moved) => warn!("Corrupt state file moved to {moved:?}"),
                    Err(e) => warn!("Could not move corrupt state file aside: {e}"),
                }
                Ok(GameState::default())
            }
            Err(e) => Err(e),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NamePicker> {
        // The file is the source of truth, so a panic mid-update leaves
        // nothing in memory to distrust.
        self.names.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_HIGH_SCORES;
    use crate::error::ValidationError;
    use crate::names::DEFAULT_NAMES;
    use crate::platform::FixedClock;
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> StateStore {
        StateStore::with_parts(
            StoreConfig::new(dir.path().join("snake_config.json")),
            FixedClock::new(1_700_000_000),
            NamePicker::from_seed(3),
        )
    }

    fn scores(board: &HighScores) -> Vec<u64> {
        board.iter().map(|e| e.score).collect()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        assert_eq!(store.get_state(), GameState::default());
        // Reading never creates the file
        assert!(!store.path().exists());
    }

    #[test]
    fn test_record_example_sequence() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let board = store.record_score(Some(100), Some("A")).unwrap();
        assert_eq!(scores(&board), vec![100]);

        let board = store.record_score(Some(50), Some("B")).unwrap();
        assert_eq!(scores(&board), vec![100, 50]);

        let board = store.record_score(Some(200), None).unwrap();
        assert_eq!(scores(&board), vec![200, 100, 50]);
        assert!(DEFAULT_NAMES.contains(&board.entries()[0].name.as_str()));

        // Persisted, not just returned
        let reloaded = test_store(&dir).get_state();
        assert_eq!(reloaded.highscores, board);
        assert_eq!(reloaded.speed.get(), 5);
    }

    #[test]
    fn test_invalid_score_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let err = store.record_score(None, Some("A")).unwrap_err();
        assert!(err.is_validation());

        let err = store
            .submit_score(&ScoreSubmission::new("ten", Some("A")))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::NonNumericScore(_))
        ));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_submit_score() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let body: ScoreSubmission =
            serde_json::from_str(r#"{"score": 12, "name": "Zed"}"#).unwrap();
        let board = store.submit_score(&body).unwrap();
        assert_eq!(board.entries()[0].name, "Zed");
        assert_eq!(board.entries()[0].timestamp, 1_700_000_000);
    }

    #[test]
    fn test_set_speed() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        assert!(store.set_speed(Some(4)).unwrap());
        assert_eq!(store.get_state().speed.get(), 4);

        // Out of range: still success, value unchanged
        assert!(store.set_speed(Some(11)).unwrap());
        assert_eq!(store.get_state().speed.get(), 4);

        assert!(store.submit_speed(&SpeedSubmission::default()).unwrap());
        assert_eq!(store.get_state().speed.get(), 4);
    }

    #[test]
    fn test_speed_and_scores_coexist() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.record_score(Some(9), Some("A")).unwrap();
        store.set_speed(Some(8)).unwrap();
        let state = store.get_state();
        assert_eq!(state.speed.get(), 8);
        assert_eq!(scores(&state.highscores), vec![9]);
    }

    #[test]
    fn test_eleventh_low_score_dropped() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        for score in 1..=10 {
            store.record_score(Some(score * 10), Some("p")).unwrap();
        }
        let before = store.get_state();
        let board = store.record_score(Some(1), Some("late")).unwrap();
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board, before.highscores);
    }

    #[test]
    fn test_tie_keeps_earlier_rank() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.record_score(Some(70), Some("first")).unwrap();
        let board = store.record_score(Some(70), Some("second")).unwrap();
        let names: Vec<_> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_save_load_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.record_score(Some(5), Some("A")).unwrap();
        store.set_speed(Some(2)).unwrap();

        let before = fs::read(store.path()).unwrap();
        store.save(&store.load()).unwrap();
        let after = fs::read(store.path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_corrupt_file_falls_back_and_is_kept() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        fs::write(store.path(), "not json").unwrap();

        assert_eq!(store.get_state(), GameState::default());
        let kept = dir.path().join("snake_config.json.corrupt");
        assert_eq!(fs::read_to_string(kept).unwrap(), "not json");

        // The store keeps working afterwards
        let board = store.record_score(Some(3), Some("A")).unwrap();
        assert_eq!(scores(&board), vec![3]);
    }

    #[test]
    fn test_invalid_utf8_file_is_kept() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let bytes: &[u8] =
            b"{\"speed\":5,\"highscores\":[{\"score\":999,\"timestamp\":0,\"name\":\"\xff\xfe\"}]}";
        fs::write(store.path(), bytes).unwrap();

        let board = store.record_score(Some(1), Some("x")).unwrap();
        assert_eq!(scores(&board), vec![1]);

        let kept = dir.path().join("snake_config.json.corrupt");
        assert_eq!(fs::read(kept).unwrap(), bytes);
    }

    #[test]
    fn test_unreadable_file_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        // A directory where the state file should be cannot be read as one
        let path = dir.path().join("snake_config.json");
        fs::create_dir(&path).unwrap();
        let store = StateStore::with_parts(
            StoreConfig::new(&path),
            FixedClock::new(0),
            NamePicker::from_seed(0),
        );

        assert_eq!(store.get_state(), GameState::default());

        let err = store.record_score(Some(5), Some("x")).unwrap_err();
        assert!(matches!(err, StoreError::Unreadable { .. }));
        assert!(matches!(
            store.set_speed(Some(3)),
            Err(StoreError::Unreadable { .. })
        ));
        assert!(path.is_dir());
        assert!(!dir.path().join("snake_config.json.corrupt").exists());
    }

    #[test]
    fn test_unwritable_returns_pending_state() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::with_parts(
            StoreConfig::new(dir.path().join("gone").join("state.json")),
            FixedClock::new(0),
            NamePicker::from_seed(0),
        );

        let err = store.record_score(Some(42), Some("A")).unwrap_err();
        let pending = err.into_pending_state().unwrap();
        assert_eq!(scores(&pending.highscores), vec![42]);
        assert_eq!(store.get_state(), GameState::default());
    }

    #[test]
    fn test_concurrent_records_no_lost_updates() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(test_store(&dir));

        let handles: Vec<_> = (0..24u64)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store.record_score(Some(i * 3 + 1), None).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut expected: Vec<u64> = (0..24u64).map(|i| i * 3 + 1).collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.truncate(MAX_HIGH_SCORES);
        assert_eq!(scores(&store.get_state().highscores), expected);
    }

    #[test]
    fn test_concurrent_records_fewer_than_window() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(test_store(&dir));

        thread::scope(|s| {
            for i in 0..6u64 {
                let store = &store;
                s.spawn(move || store.record_score(Some(i), Some("t")).unwrap());
            }
        });

        assert_eq!(scores(&store.get_state().highscores), vec![5, 4, 3, 2, 1, 0]);
    }
}
