//! Mapping one Asphyxia play onto a Kamaitachi score.

use crate::parser::Play;
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Code the plugin stored for a lamp or difficulty that has no Kamaitachi equivalent
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown code {0}")]
pub struct UnknownCode(pub i64);

/// Lamp of a play, stored by the plugin as `clear` (1..=6)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClearType {
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "CLEAR")]
    Clear,
    #[serde(rename = "EXCESSIVE CLEAR")]
    ExcessiveClear,
    #[serde(rename = "ULTIMATE CHAIN")]
    UltimateChain,
    #[serde(rename = "PERFECT ULTIMATE CHAIN")]
    PerfectUltimateChain,
    #[serde(rename = "MAXXIVE CLEAR")]
    MaxxiveClear,
}

impl ClearType {
    pub const ALL: [ClearType; 6] = [
        ClearType::Failed,
        ClearType::Clear,
        ClearType::ExcessiveClear,
        ClearType::UltimateChain,
        ClearType::PerfectUltimateChain,
        ClearType::MaxxiveClear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClearType::Failed => "FAILED",
            ClearType::Clear => "CLEAR",
            ClearType::ExcessiveClear => "EXCESSIVE CLEAR",
            ClearType::UltimateChain => "ULTIMATE CHAIN",
            ClearType::PerfectUltimateChain => "PERFECT ULTIMATE CHAIN",
            ClearType::MaxxiveClear => "MAXXIVE CLEAR",
        }
    }
}

impl TryFrom<i64> for ClearType {
    type Error = UnknownCode;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ClearType::Failed),
            2 => Ok(ClearType::Clear),
            3 => Ok(ClearType::ExcessiveClear),
            4 => Ok(ClearType::UltimateChain),
            5 => Ok(ClearType::PerfectUltimateChain),
            6 => Ok(ClearType::MaxxiveClear),
            _ => Err(UnknownCode(code)),
        }
    }
}

impl fmt::Display for ClearType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Chart difficulty, stored by the plugin as `type` (0..=4)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    #[serde(rename = "NOV")]
    Novice,
    #[serde(rename = "ADV")]
    Advanced,
    #[serde(rename = "EXH")]
    Exhaust,
    /// INF/GRV/HVN/VVD/XCD, whichever the song carries
    #[serde(rename = "ANY_INF")]
    AnyInf,
    #[serde(rename = "MXM")]
    Maximum,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Novice,
        Difficulty::Advanced,
        Difficulty::Exhaust,
        Difficulty::AnyInf,
        Difficulty::Maximum,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Novice => "NOV",
            Difficulty::Advanced => "ADV",
            Difficulty::Exhaust => "EXH",
            Difficulty::AnyInf => "ANY_INF",
            Difficulty::Maximum => "MXM",
        }
    }
}

impl TryFrom<i64> for Difficulty {
    type Error = UnknownCode;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Difficulty::Novice),
            1 => Ok(Difficulty::Advanced),
            2 => Ok(Difficulty::Exhaust),
            3 => Ok(Difficulty::AnyInf),
            4 => Ok(Difficulty::Maximum),
            _ => Err(UnknownCode(code)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How Kamaitachi looks the song up: by the game's own music id
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    #[serde(rename = "sdvxInGameID")]
    SdvxInGameId,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Optional {
    #[serde(rename = "exScore")]
    pub ex_score: i64,
}

/// A score in Kamaitachi batch-manual form
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub match_type: MatchType,
    pub identifier: String,
    pub score: i64,
    pub lamp: ClearType,
    pub difficulty: Difficulty,
    /// Unix epoch, milliseconds
    pub time_achieved: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<Optional>,
}

/// Why a play was left out of the export
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Skip {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value {value} for field `{field}`")]
    InvalidField { field: &'static str, value: Value },

    #[error("unknown clear type {code} for song {song}")]
    UnknownClearType { song: String, code: Value },

    #[error("unknown difficulty type {code} for song {song}")]
    UnknownDifficulty { song: String, code: Value },
}

/// Converts one play. Never panics; anything unusable comes back as a [`Skip`].
pub fn convert_play(play: &Play) -> Result<ScoreRecord, Skip> {
    let score = int_field(play, "score")?;
    let ex_score = ex_score(play)?;

    let mid = field(play, "mid")?;
    let identifier = text(mid).ok_or_else(|| invalid("mid", mid))?;

    let created_at = play
        .get("createdAt")
        .and_then(|wrapper| wrapper.get("$$date"))
        .ok_or(Skip::MissingField("createdAt.$$date"))?;
    let time_achieved = int(created_at).ok_or_else(|| invalid("createdAt.$$date", created_at))?;

    let clear = field(play, "clear")?;
    let lamp = code(clear)
        .and_then(|c| ClearType::try_from(c).ok())
        .ok_or_else(|| Skip::UnknownClearType {
            song: identifier.clone(),
            code: clear.clone(),
        })?;

    let chart = field(play, "type")?;
    let difficulty = code(chart)
        .and_then(|c| Difficulty::try_from(c).ok())
        .ok_or_else(|| Skip::UnknownDifficulty {
            song: identifier.clone(),
            code: chart.clone(),
        })?;

    Ok(ScoreRecord {
        match_type: MatchType::SdvxInGameId,
        identifier,
        score,
        lamp,
        difficulty,
        time_achieved,
        optional: ex_score.map(|ex_score| Optional { ex_score }),
    })
}

/// EX score is only exported when the plugin recorded a positive one
fn ex_score(play: &Play) -> Result<Option<i64>, Skip> {
    match play.get("exscore") {
        None | Some(Value::Null) => Ok(None),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => {
            let ex_score = int(value).ok_or_else(|| invalid("exscore", value))?;
            Ok(Some(ex_score).filter(|&ex| ex > 0))
        }
        Some(value) => Err(invalid("exscore", value)),
    }
}

fn field<'a>(play: &'a Play, name: &'static str) -> Result<&'a Value, Skip> {
    play.get(name).ok_or(Skip::MissingField(name))
}

fn int_field(play: &Play, name: &'static str) -> Result<i64, Skip> {
    let value = field(play, name)?;
    int(value).ok_or_else(|| invalid(name, value))
}

fn invalid(field: &'static str, value: &Value) -> Skip {
    Skip::InvalidField {
        field,
        value: value.clone(),
    }
}

/// Lenient integer coercion: integers, finite floats (truncated), booleans,
/// and strings holding a base-10 integer.
fn int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Enumeration codes have to be integral numbers; "2" is not 2.
fn code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn play(value: Value) -> Play {
        Play::try_from(value).unwrap()
    }

    fn base() -> Value {
        json!({
            "collection": "music",
            "__refid": "U1",
            "__s": "plugins_profile",
            "score": 9000000,
            "exscore": 0,
            "mid": "42",
            "clear": 2,
            "type": 0,
            "createdAt": { "$$date": 1700000000000i64 }
        })
    }

    fn with(field: &str, value: Value) -> Play {
        let mut raw = base();
        raw[field] = value;
        play(raw)
    }

    fn without(field: &str) -> Play {
        let mut raw = base();
        raw.as_object_mut().unwrap().remove(field);
        play(raw)
    }

    #[test]
    fn converts_documented_example() {
        let record = convert_play(&play(base())).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"matchType":"sdvxInGameID","identifier":"42","score":9000000,"lamp":"CLEAR","difficulty":"NOV","timeAchieved":1700000000000}"#
        );
    }

    #[test]
    fn every_clear_code_maps_to_its_label() {
        let labels = [
            "FAILED",
            "CLEAR",
            "EXCESSIVE CLEAR",
            "ULTIMATE CHAIN",
            "PERFECT ULTIMATE CHAIN",
            "MAXXIVE CLEAR",
        ];
        for (code, label) in (1..=6i64).zip(labels.iter()) {
            let lamp = ClearType::try_from(code).unwrap();
            assert_eq!(lamp.label(), *label);
            assert_eq!(serde_json::to_value(lamp).unwrap(), json!(label));

            let record = convert_play(&with("clear", json!(code))).unwrap();
            assert_eq!(record.lamp, lamp);
        }
        assert_eq!(ClearType::ALL.len(), labels.len());
    }

    #[test]
    fn every_difficulty_code_maps_to_its_label() {
        let labels = ["NOV", "ADV", "EXH", "ANY_INF", "MXM"];
        for (code, label) in (0..=4i64).zip(labels.iter()) {
            let difficulty = Difficulty::try_from(code).unwrap();
            assert_eq!(difficulty.to_string(), *label);
            assert_eq!(serde_json::to_value(difficulty).unwrap(), json!(label));

            let record = convert_play(&with("type", json!(code))).unwrap();
            assert_eq!(record.difficulty, difficulty);
        }
        assert_eq!(Difficulty::ALL.len(), labels.len());
    }

    #[test]
    fn unknown_codes_are_skips() {
        for code in [0i64, 7, -1, 100] {
            assert_eq!(ClearType::try_from(code), Err(UnknownCode(code)));
            assert!(matches!(
                convert_play(&with("clear", json!(code))),
                Err(Skip::UnknownClearType { ref song, .. }) if song == "42"
            ));
        }
        for code in [-1i64, 5, 9] {
            assert_eq!(Difficulty::try_from(code), Err(UnknownCode(code)));
            assert!(matches!(
                convert_play(&with("type", json!(code))),
                Err(Skip::UnknownDifficulty { .. })
            ));
        }
    }

    #[test]
    fn string_codes_are_unknown() {
        assert!(matches!(
            convert_play(&with("clear", json!("2"))),
            Err(Skip::UnknownClearType { .. })
        ));
        assert!(matches!(
            convert_play(&with("type", json!(1.5))),
            Err(Skip::UnknownDifficulty { .. })
        ));
    }

    #[test]
    fn integral_float_code_is_accepted() {
        let record = convert_play(&with("clear", json!(3.0))).unwrap();
        assert_eq!(record.lamp, ClearType::ExcessiveClear);
    }

    #[test]
    fn ex_score_block_only_when_positive() {
        let none = convert_play(&with("exscore", json!(0))).unwrap();
        assert_eq!(none.optional, None);

        let negative = convert_play(&with("exscore", json!(-5))).unwrap();
        assert_eq!(negative.optional, None);

        let missing = convert_play(&without("exscore")).unwrap();
        assert_eq!(missing.optional, None);

        let null = convert_play(&with("exscore", Value::Null)).unwrap();
        assert_eq!(null.optional, None);

        let some = convert_play(&with("exscore", json!(120))).unwrap();
        assert_eq!(some.optional, Some(Optional { ex_score: 120 }));
        let json = serde_json::to_value(&some).unwrap();
        assert_eq!(json["optional"], json!({ "exScore": 120 }));
    }

    #[test]
    fn non_numeric_ex_score_is_a_skip() {
        assert_eq!(
            convert_play(&with("exscore", json!("lots"))),
            Err(Skip::InvalidField {
                field: "exscore",
                value: json!("lots")
            })
        );
    }

    #[test]
    fn missing_required_fields_are_skips() {
        assert_eq!(
            convert_play(&without("score")),
            Err(Skip::MissingField("score"))
        );
        assert_eq!(convert_play(&without("mid")), Err(Skip::MissingField("mid")));
        assert_eq!(
            convert_play(&without("createdAt")),
            Err(Skip::MissingField("createdAt.$$date"))
        );
        assert_eq!(
            convert_play(&without("clear")),
            Err(Skip::MissingField("clear"))
        );
        assert_eq!(
            convert_play(&without("type")),
            Err(Skip::MissingField("type"))
        );
    }

    #[test]
    fn coerces_loose_field_types() {
        let mut raw = base();
        raw["score"] = json!("8500000");
        raw["mid"] = json!(1234);
        raw["createdAt"] = json!({ "$$date": 1700000000000.9 });
        let record = convert_play(&play(raw)).unwrap();

        assert_eq!(record.score, 8500000);
        assert_eq!(record.identifier, "1234");
        assert_eq!(record.time_achieved, 1700000000000);
    }

    #[test]
    fn uncoercible_score_is_a_skip() {
        assert!(matches!(
            convert_play(&with("score", json!({ "nested": true }))),
            Err(Skip::InvalidField { field: "score", .. })
        ));
        assert!(matches!(
            convert_play(&with("mid", Value::Null)),
            Err(Skip::InvalidField { field: "mid", .. })
        ));
    }
}
