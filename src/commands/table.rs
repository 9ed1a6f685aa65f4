//! Command table: maps chat commands to currency pairs.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating a command table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Command at index {index} ({command:?}) must start with '/' and contain no whitespace")]
    InvalidCommand { index: usize, command: String },

    #[error("Duplicate command found: {command}")]
    DuplicateCommand { command: String },

    #[error("Command {command} has invalid pair id {pair_id:?} (expected e.g. USD-BRL)")]
    InvalidPairId { command: String, pair_id: String },

    #[error("Command {command} has lookup key {lookup_key:?}, expected {expected:?}")]
    LookupKeyMismatch {
        command: String,
        lookup_key: String,
        expected: String,
    },

    #[error("Command {command} has an empty display name")]
    EmptyDisplayName { command: String },

    #[error("No commands configured")]
    NoCommands,

    #[error("Failed to read command table file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse command table file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// A single chat command bound to a currency pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandEntry {
    /// Chat command, including the leading slash (e.g. `/dolar`).
    pub command: String,

    /// Dash-separated pair used in the quotes URL (e.g. `USD-BRL`).
    pub pair_id: String,

    /// Outer key of the quotes response (e.g. `USDBRL`).
    pub lookup_key: String,

    /// Name shown in the reply (e.g. `dólar`).
    pub display_name: String,
}

impl CommandEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(command: &str, pair_id: &str, lookup_key: &str, display_name: &str) -> Self {
        Self {
            command: command.to_owned(),
            pair_id: pair_id.to_owned(),
            lookup_key: lookup_key.to_owned(),
            display_name: display_name.to_owned(),
        }
    }

    /// Lookup key derived from the pair id (`USD-BRL` → `USDBRL`).
    #[must_use]
    pub fn expected_lookup_key(&self) -> String {
        self.pair_id.replace('-', "")
    }

    fn validate(&self, index: usize) -> Result<(), TableError> {
        if !self.command.starts_with('/')
            || self.command.len() < 2
            || self.command.contains(char::is_whitespace)
        {
            return Err(TableError::InvalidCommand {
                index,
                command: self.command.clone(),
            });
        }

        if !is_valid_pair_id(&self.pair_id) {
            return Err(TableError::InvalidPairId {
                command: self.command.clone(),
                pair_id: self.pair_id.clone(),
            });
        }

        let expected = self.expected_lookup_key();
        if self.lookup_key != expected {
            return Err(TableError::LookupKeyMismatch {
                command: self.command.clone(),
                lookup_key: self.lookup_key.clone(),
                expected,
            });
        }

        if self.display_name.trim().is_empty() {
            return Err(TableError::EmptyDisplayName {
                command: self.command.clone(),
            });
        }

        Ok(())
    }
}

/// `AAA-BBB`: two non-empty ASCII alphanumeric codes joined by one dash.
fn is_valid_pair_id(pair_id: &str) -> bool {
    let is_code = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric());
    pair_id
        .split_once('-')
        .is_some_and(|(base, quote)| is_code(base) && is_code(quote))
}

/// On-disk representation of a command table.
#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    commands: Vec<CommandEntry>,
}

/// Immutable command lookup table.
///
/// Entries keep their declaration order for the help text; lookups go
/// through an exact-match index.
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
    index: HashMap<String, usize>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::from_entries(vec![
            CommandEntry::new("/dolar", "USD-BRL", "USDBRL", "dólar"),
            CommandEntry::new("/euro", "EUR-BRL", "EURBRL", "euro"),
            CommandEntry::new("/libra", "GBP-BRL", "GBPBRL", "libra"),
        ])
    }
}

impl CommandTable {
    /// Builds a table from entries. The first entry wins for duplicate commands.
    #[must_use]
    pub fn from_entries(entries: Vec<CommandEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            index.entry(entry.command.clone()).or_insert(i);
        }
        Self { entries, index }
    }

    /// Loads a table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path)?;
        let file: TableFile = serde_json::from_str(&content)?;
        Ok(Self::from_entries(file.commands))
    }

    /// Saves the table to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let file = TableFile {
            commands: self.entries.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Looks up a command. Exact, case-sensitive match only.
    #[must_use]
    pub fn get(&self, command: &str) -> Option<&CommandEntry> {
        self.index.get(command).map(|&i| &self.entries[i])
    }

    /// Returns the entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Help reply listing every supported command.
    #[must_use]
    pub fn help_text(&self) -> String {
        let commands: Vec<&str> = self.entries.iter().map(|e| e.command.as_str()).collect();
        format!(
            "Olá, veja as cotações através dos comandos {}.",
            commands.join(", ")
        )
    }

    /// Validates all entries.
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), TableError> {
        self.validate_all().into_iter().find_map(Result::err).map_or(Ok(()), Err)
    }

    /// Returns one validation result per entry.
    #[must_use]
    pub fn validate_all(&self) -> Vec<Result<(), TableError>> {
        if self.entries.is_empty() {
            return vec![Err(TableError::NoCommands)];
        }

        let mut seen = HashSet::new();
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                if !seen.insert(entry.command.as_str()) {
                    return Err(TableError::DuplicateCommand {
                        command: entry.command.clone(),
                    });
                }
                entry.validate(index)
            })
            .collect()
    }

    /// Creates an example table for users to reference.
    #[must_use]
    pub fn example() -> Self {
        let mut entries = Self::default().entries;
        entries.push(CommandEntry::new("/iene", "JPY-BRL", "JPYBRL", "iene"));
        Self::from_entries(entries)
    }
}
