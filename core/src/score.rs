use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ScoreError;

/// Best result across sessions. Each field is tracked independently.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BestScores {
    pub best_moves: Option<u32>,
    /// Seconds
    pub best_time: Option<u64>,
}

impl BestScores {
    /// Folds in a finished session, returns whether either field improved.
    pub fn improve(&mut self, moves: u32, secs: u64) -> bool {
        let mut updated = false;
        if self.best_moves.is_none_or(|best| moves < best) {
            self.best_moves = Some(moves);
            updated = true;
        }
        if self.best_time.is_none_or(|best| secs < best) {
            self.best_time = Some(secs);
            updated = true;
        }
        updated
    }
}

/// Only a JSON object is a record; any other value reads as both fields absent.
impl<'de> Deserialize<'de> for BestScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let Some(record) = value.as_object() else {
            log::warn!("Score record is not an object, ignoring it");
            return Ok(Self::default());
        };
        Ok(Self {
            best_moves: lenient_count(record.get("best_moves")),
            best_time: lenient_count(record.get("best_time")),
        })
    }
}

/// Anything that is not a non-negative integer in range reads as absent.
fn lenient_count<T: TryFrom<u64>>(value: Option<&Value>) -> Option<T> {
    value
        .and_then(Value::as_u64)
        .and_then(|count| T::try_from(count).ok())
}

/// Durable home of the best-score record.
pub trait ScoreStore {
    /// A missing record loads as both fields absent.
    fn load(&self) -> Result<BestScores, ScoreError>;

    /// Overwrites both fields together.
    fn save(&mut self, scores: &BestScores) -> Result<(), ScoreError>;
}

/// Record kept as a small JSON object on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonScoreFile {
    path: PathBuf,
}

impl JsonScoreFile {
    pub const DEFAULT_PATH: &'static str = "scores.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonScoreFile {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl ScoreStore for JsonScoreFile {
    fn load(&self) -> Result<BestScores, ScoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("no score record at {}", self.path.display());
                return Ok(BestScores::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&mut self, scores: &BestScores) -> Result<(), ScoreError> {
        let text = serde_json::to_string(scores)?;
        std::fs::write(&self.path, text)?;
        log::debug!("saved scores to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the record for the lifetime of the process only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InMemoryScores {
    scores: BestScores,
    saves: usize,
}

impl InMemoryScores {
    pub fn new(scores: BestScores) -> Self {
        Self { scores, saves: 0 }
    }

    pub fn scores(&self) -> BestScores {
        self.scores
    }

    /// How many times the record was written.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ScoreStore for InMemoryScores {
    fn load(&self) -> Result<BestScores, ScoreError> {
        Ok(self.scores)
    }

    fn save(&mut self, scores: &BestScores) -> Result<(), ScoreError> {
        self.scores = *scores;
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "pairflip-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    fn parse(text: &str) -> BestScores {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn parses_full_record() {
        assert_eq!(
            parse(r#"{"best_moves": 24, "best_time": 95}"#),
            BestScores {
                best_moves: Some(24),
                best_time: Some(95)
            }
        );
    }

    #[test]
    fn partial_and_malformed_fields_read_as_absent() {
        assert_eq!(
            parse(r#"{"best_moves": 24}"#),
            BestScores {
                best_moves: Some(24),
                best_time: None
            }
        );
        assert_eq!(
            parse(r#"{"best_moves": "many", "best_time": 12}"#),
            BestScores {
                best_moves: None,
                best_time: Some(12)
            }
        );
        assert_eq!(
            parse(r#"{"best_moves": -3, "best_time": 1.5, "extra": true}"#),
            BestScores::default()
        );
        assert_eq!(parse(r#"{"best_moves": null}"#), BestScores::default());
        assert_eq!(
            parse(r#"{"best_moves": 5000000000, "best_time": 5000000000}"#),
            BestScores {
                best_moves: None,
                best_time: Some(5_000_000_000)
            }
        );
    }

    #[test]
    fn non_object_record_reads_as_absent() {
        assert_eq!(parse("[3, 4]"), BestScores::default());
        assert_eq!(parse("42"), BestScores::default());
        assert_eq!(parse(r#""best""#), BestScores::default());
        assert_eq!(parse("null"), BestScores::default());
    }

    #[test]
    fn improve_updates_fields_independently() {
        let mut best = BestScores {
            best_moves: Some(20),
            best_time: Some(60),
        };

        assert!(best.improve(18, 90));
        assert_eq!(best.best_moves, Some(18));
        assert_eq!(best.best_time, Some(60));

        assert!(best.improve(30, 45));
        assert_eq!(best.best_moves, Some(18));
        assert_eq!(best.best_time, Some(45));
    }

    #[test]
    fn ties_do_not_improve() {
        let mut best = BestScores {
            best_moves: Some(20),
            best_time: Some(60),
        };

        assert!(!best.improve(20, 60));
    }

    #[test]
    fn empty_record_always_improves() {
        let mut best = BestScores::default();

        assert!(best.improve(40, 300));
        assert_eq!(best.best_moves, Some(40));
        assert_eq!(best.best_time, Some(300));
    }

    #[test]
    fn json_file_missing_loads_empty() {
        let store = JsonScoreFile::new(temp_path("missing"));

        assert_eq!(store.load().unwrap(), BestScores::default());
    }

    #[test]
    fn json_file_round_trips() {
        let path = temp_path("roundtrip");
        let mut store = JsonScoreFile::new(&path);
        let scores = BestScores {
            best_moves: Some(31),
            best_time: None,
        };

        store.save(&scores).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let loaded = store.load().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(text, r#"{"best_moves":31,"best_time":null}"#);
        assert_eq!(loaded, scores);
    }

    #[test]
    fn json_file_garbage_is_an_error() {
        let path = temp_path("garbage");
        std::fs::write(&path, "not json").unwrap();
        let result = JsonScoreFile::new(&path).load();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ScoreError::Json(_))));
    }

    #[test]
    fn in_memory_counts_saves() {
        let mut store = InMemoryScores::default();
        let scores = BestScores {
            best_moves: Some(1),
            best_time: Some(2),
        };

        store.save(&scores).unwrap();

        assert_eq!(store.load().unwrap(), scores);
        assert_eq!(store.saves(), 1);
    }
}
