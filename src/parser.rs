//! Reading the Asphyxia NeDB file.
//!
//! The database is newline-delimited JSON, one document per line, holding every
//! collection the plugin stores. Only `music` documents are plays.

use crate::{Error, Result};
use serde_json::{Map, Value};
use std::{fs, path::Path};
use tracing::debug;

/// `collection` value of documents that are plays
pub const MUSIC_COLLECTION: &str = "music";
/// `__s` value of documents owned by a player profile
pub const PROFILE_SOURCE: &str = "plugins_profile";

/// One raw document from the database, fields left untyped.
#[derive(Debug, Clone, PartialEq)]
pub struct Play {
    fields: Map<String, Value>,
}

impl Play {
    pub fn new(fields: Map<String, Value>) -> Self {
        Play { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn collection(&self) -> Option<&str> {
        self.get_str("collection")
    }

    /// Profile reference of the owner
    pub fn refid(&self) -> Option<&str> {
        self.get_str("__refid")
    }

    pub fn source(&self) -> Option<&str> {
        self.get_str("__s")
    }

    pub fn is_music(&self) -> bool {
        self.collection() == Some(MUSIC_COLLECTION)
    }

    pub fn belongs_to(&self, profile_id: &str) -> bool {
        self.refid() == Some(profile_id) && self.source() == Some(PROFILE_SOURCE)
    }
}

impl TryFrom<Value> for Play {
    type Error = Value;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Play::new(fields)),
            other => Err(other),
        }
    }
}

/// Plays in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayList {
    pub plays: Vec<Play>,
}

impl PlayList {
    /// Parses a whole database. The first line that is not a JSON object aborts.
    pub fn parse(content: &str) -> Result<PlayList> {
        let mut plays = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let play = document(line, idx + 1)?;
            if play.is_music() {
                plays.push(play);
            }
        }

        debug!("Loaded {} plays", plays.len());
        Ok(PlayList { plays })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<PlayList> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content)
    }

    /// Keeps the plays owned by `profile_id`, preserving order.
    pub fn for_user(self, profile_id: &str) -> PlayList {
        let plays = self
            .plays
            .into_iter()
            .filter(|play| play.belongs_to(profile_id))
            .collect();

        PlayList { plays }
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Play> {
        self.plays.iter()
    }
}

impl<'a> IntoIterator for &'a PlayList {
    type Item = &'a Play;
    type IntoIter = std::slice::Iter<'a, Play>;

    fn into_iter(self) -> Self::IntoIter {
        self.plays.iter()
    }
}

fn document(line: &str, line_no: usize) -> Result<Play> {
    let value: Value = serde_json::from_str(line).map_err(|source| Error::Parse {
        line: line_no,
        source,
    })?;

    Play::try_from(value).map_err(|_| Error::NotAnObject { line: line_no })
}
