//! Inbox discovery and conversation loading.
//!
//! An inbox is a directory with one folder per conversation. Each folder
//! holds `message_1.json`, `message_2.json`, … (or a single legacy
//! `message.json`). Folders without such a file are not conversations and
//! are skipped silently.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatstats::inbox::InboxReader;
//! use chatstats::config::InboxConfig;
//!
//! let reader = InboxReader::new("messages/inbox")
//!     .with_config(InboxConfig::new().with_filter("alice"));
//!
//! let inbox = reader.load_all()?;
//! for conv in &inbox.conversations {
//!     println!("{}: {} messages", conv.display_title(), conv.message_count());
//! }
//! # Ok::<(), chatstats::ChatstatsError>(())
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::Conversation;
use crate::config::InboxConfig;
use crate::error::{ChatstatsError, Result};
use crate::parsing::messenger::{MessengerExport, parse_messenger_message};

/// Legacy single-file export name.
pub const LEGACY_MESSAGE_FILE: &str = "message.json";

/// Default inbox location relative to the working directory.
pub const DEFAULT_INBOX_DIR: &str = "messages/inbox";

/// File name of the `n`-th export part (1-based).
pub fn message_file_name(n: usize) -> String {
    format!("message_{n}.json")
}

/// Export files of a conversation folder, in part order.
///
/// Parts are read from `message_1.json` upwards until the first gap. When no
/// numbered part exists, a legacy `message.json` is used instead.
pub fn conversation_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for n in 1.. {
        let path = dir.join(message_file_name(n));
        if !path.is_file() {
            break;
        }
        files.push(path);
    }
    if files.is_empty() {
        let legacy = dir.join(LEGACY_MESSAGE_FILE);
        if legacy.is_file() {
            files.push(legacy);
        }
    }
    files
}

/// Resolves the inbox directory: the given folder, or `messages/inbox` in the
/// current directory when none is given.
pub fn resolve_inbox_dir(folder: Option<&Path>) -> Result<PathBuf> {
    let dir = folder.map_or_else(|| PathBuf::from(DEFAULT_INBOX_DIR), Path::to_path_buf);
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(ChatstatsError::InboxNotFound(dir))
    }
}

/// Parses a single export file's content into a conversation.
pub fn parse_export_str(folder: &str, content: &str, fix_encoding: bool) -> Result<Conversation> {
    let export: MessengerExport =
        serde_json::from_str(content).map_err(|e| ChatstatsError::parse(e, None))?;
    Ok(conversation_from_parts(folder, vec![export], fix_encoding))
}

fn conversation_from_parts(
    folder: &str,
    parts: Vec<MessengerExport>,
    fix_encoding: bool,
) -> Conversation {
    let mut conversation = Conversation::new(folder);
    for part in parts {
        if let Some(title) = part.title(fix_encoding) {
            conversation.title = Some(title);
        }
        for name in part.participant_names(fix_encoding) {
            if !conversation.is_participant(&name) {
                conversation.participants.push(name);
            }
        }
        conversation.messages.extend(
            part.messages
                .iter()
                .map(|m| parse_messenger_message(m, fix_encoding)),
        );
    }
    // Exports list messages newest first
    conversation.sort_messages();
    conversation
}

/// Conversations loaded from an inbox, plus the folders that were skipped
/// because their files failed to parse.
#[derive(Debug, Default)]
pub struct Inbox {
    pub conversations: Vec<Conversation>,
    pub skipped: Vec<SkippedConversation>,
}

impl Inbox {
    /// Total number of messages over all conversations.
    pub fn total_messages(&self) -> usize {
        self.conversations.iter().map(Conversation::message_count).sum()
    }

    /// Folder name → display title.
    pub fn titles(&self) -> BTreeMap<String, String> {
        self.conversations
            .iter()
            .map(|c| (c.folder.clone(), c.display_title().to_string()))
            .collect()
    }
}

/// A conversation folder that could not be loaded.
#[derive(Debug, Clone)]
pub struct SkippedConversation {
    pub folder: String,
    pub reason: String,
}

/// Reads conversations from an inbox directory.
#[derive(Debug, Clone)]
pub struct InboxReader {
    root: PathBuf,
    config: InboxConfig,
}

impl InboxReader {
    /// Creates a reader with default configuration.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: InboxConfig::default(),
        }
    }

    /// Sets the loading configuration.
    #[must_use]
    pub fn with_config(mut self, config: InboxConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the inbox root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &InboxConfig {
        &self.config
    }

    /// Names of conversation folders matching the filters, sorted.
    pub fn discover(&self) -> Result<Vec<String>> {
        let mut folders = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.config.matches(&name) {
                continue;
            }
            if conversation_files(&entry.path()).is_empty() {
                debug!(folder = %name, "no export file, skipping");
                continue;
            }
            folders.push(name);
        }
        folders.sort();
        Ok(folders)
    }

    /// Loads one conversation folder, merging all of its export parts.
    pub fn load(&self, folder: &str) -> Result<Conversation> {
        let dir = self.root.join(folder);
        let mut parts = Vec::new();
        for path in conversation_files(&dir) {
            let content = fs::read_to_string(&path)?;
            let part: MessengerExport = serde_json::from_str(&content)
                .map_err(|e| ChatstatsError::parse(e, Some(path.clone())))?;
            parts.push(part);
        }
        Ok(conversation_from_parts(folder, parts, self.config.fix_encoding))
    }

    /// Loads every matching conversation.
    ///
    /// With `skip_invalid` set, folders that fail to load are recorded in
    /// [`Inbox::skipped`]; otherwise the first failure is returned.
    pub fn load_all(&self) -> Result<Inbox> {
        let mut inbox = Inbox::default();
        for folder in self.discover()? {
            match self.load(&folder) {
                Ok(conversation) => inbox.conversations.push(conversation),
                Err(e) if self.config.skip_invalid => {
                    warn!(folder = %folder, error = %e, "skipping conversation");
                    inbox.skipped.push(SkippedConversation {
                        folder,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        debug!(
            loaded = inbox.conversations.len(),
            skipped = inbox.skipped.len(),
            "inbox loaded"
        );
        Ok(inbox)
    }
}
