//! Session data structures

use std::path::{Path, PathBuf};
use tracing::debug;

use super::message::{Message, MessageRecord};
use crate::jsonl;

/// An ordered, append-only conversation log.
///
/// History holds serialized records, never live [`Message`] builders. With
/// auto-sync enabled every appended record is also written as one line to
/// the target file.
#[derive(Debug, Default)]
pub struct Session {
    history: Vec<MessageRecord>,
    auto_sync: Option<PathBuf>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session seeded from a previous dump
    pub fn from_history(history: Vec<MessageRecord>) -> Self {
        Self {
            history,
            auto_sync: None,
        }
    }

    /// Read a JSONL history file into a new session.
    ///
    /// Auto-sync stays disabled; use [`Session::enable_auto_sync`] to both
    /// load and keep persisting.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let history = jsonl::read_jsonl_file(path)?;
        debug!("Loaded {} records from {}", history.len(), path.display());
        Ok(Self::from_history(history))
    }

    /// Copy of the history in chronological order
    pub fn dump(&self) -> Vec<MessageRecord> {
        self.history.clone()
    }

    pub fn history(&self) -> &[MessageRecord] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// The file appended records are mirrored to, if any
    pub fn auto_sync_path(&self) -> Option<&Path> {
        self.auto_sync.as_deref()
    }

    /// Build a message; it is not appended
    pub fn new_message(&self, role: impl Into<String>) -> Message {
        Message::new(role)
    }

    /// Build a message and run `build` on it; it is not appended
    pub fn new_message_with<F>(&self, role: impl Into<String>, build: F) -> Message
    where
        F: FnOnce(Message) -> Message,
    {
        build(Message::new(role))
    }

    /// Start mirroring appends to `path`.
    ///
    /// See [`Session::enable_auto_sync_with`]; no initializer runs here.
    pub fn enable_auto_sync<P: AsRef<Path>>(&mut self, path: P) -> crate::Result<()> {
        self.enable_auto_sync_with(path, |_| Ok(()))
    }

    /// Start mirroring appends to `path`.
    ///
    /// If `path` exists its records replace the in-memory history and `init`
    /// is not called. Otherwise the target is armed first and then `init`
    /// runs, so anything it appends (a system prompt, say) is persisted.
    /// On-disk and in-memory history are never merged.
    pub fn enable_auto_sync_with<P, F>(&mut self, path: P, init: F) -> crate::Result<()>
    where
        P: AsRef<Path>,
        F: FnOnce(&mut Session) -> crate::Result<()>,
    {
        let path = path.as_ref();

        if path.exists() {
            let history = jsonl::read_jsonl_file(path)?;
            debug!(
                "Auto-sync reloaded {} records from {}",
                history.len(),
                path.display()
            );
            self.history = history;
            self.auto_sync = Some(path.to_path_buf());
            Ok(())
        } else {
            debug!("Auto-sync armed for new file {}", path.display());
            self.auto_sync = Some(path.to_path_buf());
            init(self)
        }
    }

    /// Append a message.
    ///
    /// The record is pushed to history and, with auto-sync enabled, written
    /// to the target file before this returns. Write failures propagate.
    pub fn append(&mut self, message: impl Into<MessageRecord>) -> crate::Result<()> {
        let record = message.into();
        self.history.push(record);
        self.sync_last()
    }

    /// Append the message returned by `build`, which sees the session as it
    /// is before the append
    pub fn append_with<F>(&mut self, build: F) -> crate::Result<()>
    where
        F: FnOnce(&Session) -> Message,
    {
        let message = build(self);
        self.append(message)
    }

    fn sync_last(&self) -> crate::Result<()> {
        let (Some(path), Some(record)) = (&self.auto_sync, self.history.last()) else {
            return Ok(());
        };
        jsonl::append_jsonl_record(path, record)
    }
}

/// Clones carry the history only; auto-sync stays with the original so two
/// sessions never write to the same file.
impl Clone for Session {
    fn clone(&self) -> Self {
        Self::from_history(self.history.clone())
    }
}
