use std::{
    collections::HashMap,
    future::Future,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use thiserror::Error;
use tokio::sync::{Mutex as KeyLock, OwnedMutexGuard};

use super::progress::UserProgress;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize progress: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_owned(),
            source,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable per-user progress, keyed by the chat platform's user id.
pub trait ProgressStore: Send + Sync {
    fn get(&self, user_id: u64) -> impl Future<Output = StoreResult<UserProgress>> + Send;

    fn increment_quiz_count(&self, user_id: u64) -> impl Future<Output = StoreResult<()>> + Send;

    fn increment_correct_answer(
        &self,
        user_id: u64,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Counts one answered question and, if `is_correct`, one correct answer,
    /// in a single update.
    fn record_answer(
        &self,
        user_id: u64,
        is_correct: bool,
    ) -> impl Future<Output = StoreResult<UserProgress>> + Send;
}

/// Stores every user in its own `<state_dir>/<user_id>.json`.
///
/// The file is the only source of truth: each operation reloads it while
/// holding that user's lock, so concurrent updates for one user never lose
/// increments and different users never wait on each other.
#[derive(Debug)]
pub struct FileStore {
    state_dir: PathBuf,
    locks: Mutex<HashMap<u64, Arc<KeyLock<()>>>>,
}

impl FileStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn user_file_path(&self, user_id: u64) -> PathBuf {
        self.state_dir.join(format!("{user_id}.json"))
    }

    async fn lock_user(&self, user_id: u64) -> UserGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(user_id).or_default())
        };
        UserGuard {
            locks: &self.locks,
            user_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    async fn ensure_state_dir(&self) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.state_dir)
            .await
            .map_err(|e| StoreError::io(&self.state_dir, e))
    }

    /// `None` when the file does not exist yet. Unparseable content is
    /// logged and read as a fresh record.
    async fn load(&self, path: &Path) -> StoreResult<Option<UserProgress>> {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        match serde_json::from_slice(&data) {
            Ok(progress) => Ok(Some(progress)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt progress file, starting from zero");
                Ok(Some(UserProgress::default()))
            }
        }
    }

    async fn save(&self, path: &Path, progress: &UserProgress) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(progress)?;
        let tmp = path.with_extension("json.tmp");

        if let Err(e) = tokio::fs::write(&tmp, data).await {
            remove_stale(&tmp).await;
            return Err(StoreError::io(&tmp, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            remove_stale(&tmp).await;
            return Err(StoreError::io(path, e));
        }
        Ok(())
    }

    async fn update<F>(&self, user_id: u64, mutate: F) -> StoreResult<UserProgress>
    where
        F: FnOnce(&mut UserProgress) + Send,
    {
        let _guard = self.lock_user(user_id).await;
        self.ensure_state_dir().await?;

        let path = self.user_file_path(user_id);
        let mut progress = self.load(&path).await?.unwrap_or_default();
        mutate(&mut progress);
        self.save(&path, &progress).await?;

        tracing::debug!(
            user_id,
            quiz_count = progress.quiz_count(),
            correct_count = progress.correct_count(),
            "progress updated"
        );
        Ok(progress)
    }
}

/// Holds one user's lock and drops that user's map entry once nobody else
/// holds or waits for it.
struct UserGuard<'a> {
    locks: &'a Mutex<HashMap<u64, Arc<KeyLock<()>>>>,
    user_id: u64,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserGuard<'_> {
    fn drop(&mut self) {
        // the owned guard keeps its own reference to the lock
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.user_id);
        }
    }
}

async fn remove_stale(tmp: &Path) {
    if let Err(e) = tokio::fs::remove_file(tmp).await {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!(path = %tmp.display(), error = %e, "failed to remove temporary progress file");
        }
    }
}

impl ProgressStore for FileStore {
    async fn get(&self, user_id: u64) -> StoreResult<UserProgress> {
        let _guard = self.lock_user(user_id).await;
        self.ensure_state_dir().await?;

        let path = self.user_file_path(user_id);
        match self.load(&path).await? {
            Some(progress) => Ok(progress),
            None => {
                let progress = UserProgress::default();
                self.save(&path, &progress).await?;
                tracing::info!(user_id, "created progress file");
                Ok(progress)
            }
        }
    }

    async fn increment_quiz_count(&self, user_id: u64) -> StoreResult<()> {
        self.update(user_id, UserProgress::increment_quiz_count)
            .await
            .map(|_| ())
    }

    async fn increment_correct_answer(&self, user_id: u64) -> StoreResult<()> {
        self.update(user_id, UserProgress::increment_correct_answer)
            .await
            .map(|_| ())
    }

    async fn record_answer(&self, user_id: u64, is_correct: bool) -> StoreResult<UserProgress> {
        self.update(user_id, |progress| progress.record_answer(is_correct))
            .await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn user_files_live_under_state_dir() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.user_file_path(42), dir.path().join("42.json"));
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.increment_quiz_count(5).await.unwrap();

        assert!(dir.path().join("5.json").exists());
        assert!(!dir.path().join("5.json.tmp").exists());
    }

    #[tokio::test]
    async fn same_user_shares_one_lock() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let guard = store.lock_user(1).await;
        let other_user = store.lock_user(2).await;
        drop(other_user);

        let lock = store.locks.lock().unwrap().get(&1).cloned().unwrap();
        assert!(lock.try_lock().is_err());
        assert!(!store.locks.lock().unwrap().contains_key(&2));
        drop(guard);
        assert!(lock.try_lock().is_ok());
    }

    #[tokio::test]
    async fn released_locks_are_pruned() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        for user_id in 0..50 {
            store.record_answer(user_id, true).await.unwrap();
            store.get(user_id).await.unwrap();
        }
        assert!(store.locks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn waiting_user_keeps_its_lock_entry() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let first = store.lock_user(9).await;
        let waiting = store.lock_user(9);
        tokio::pin!(waiting);
        assert!(poll_once(waiting.as_mut()).await.is_none());

        drop(first);
        assert!(store.locks.lock().unwrap().contains_key(&9));
        let second = waiting.await;
        drop(second);
        assert!(store.locks.lock().unwrap().is_empty());
    }

    async fn poll_once<F: std::future::Future + Unpin>(fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            out = fut => Some(out),
            _ = std::future::ready(()) => None,
        }
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        // a directory in place of the user file makes the rename fail
        std::fs::create_dir(store.user_file_path(6)).unwrap();

        let err = store
            .save(&store.user_file_path(6), &UserProgress::new(1, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!dir.path().join("6.json.tmp").exists());
    }
}
