//! Kamaitachi batch-manual document and writing it out

use crate::convert::ScoreRecord;
use crate::{Error, Result};
use serde_derive::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    pub game: String,
    pub playtype: String,
    pub service: String,
}

impl Default for Meta {
    fn default() -> Self {
        Meta {
            game: "sdvx".to_string(),
            playtype: "Single".to_string(),
            service: "Asphyxia".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BatchManual {
    pub meta: Meta,
    pub scores: Vec<ScoreRecord>,
}

impl BatchManual {
    pub fn new(scores: Vec<ScoreRecord>) -> Self {
        BatchManual {
            meta: Meta::default(),
            scores,
        }
    }

    /// Compact JSON, no pretty-printing
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Truncates and rewrites `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json.as_bytes()).map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{ClearType, Difficulty, MatchType, Optional};

    #[test]
    fn empty_batch_has_static_meta() {
        assert_eq!(
            BatchManual::new(Vec::new()).to_json().unwrap(),
            r#"{"meta":{"game":"sdvx","playtype":"Single","service":"Asphyxia"},"scores":[]}"#
        );
    }

    #[test]
    fn scores_keep_their_order() {
        let score = |id: &str| ScoreRecord {
            match_type: MatchType::SdvxInGameId,
            identifier: id.to_string(),
            score: 10,
            lamp: ClearType::UltimateChain,
            difficulty: Difficulty::Maximum,
            time_achieved: 1,
            optional: Some(Optional { ex_score: 3 }),
        };
        let batch = BatchManual::new(vec![score("b"), score("a")]);
        let json = batch.to_json().unwrap();

        assert!(json.find("\"b\"").unwrap() < json.find("\"a\"").unwrap());
        assert!(!json.contains('\n'));
        assert_eq!(serde_json::from_str::<BatchManual>(&json).unwrap(), batch);
    }
}
