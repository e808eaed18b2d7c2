use crate::app_dirs::AppDirs;
use crate::curriculum::{Difficulty, ExerciseId, ExerciseKind, GenerationIndex};
use crate::error::Result;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

const DAY_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS completions (
        id TEXT PRIMARY KEY,
        kind TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        idx INTEGER NOT NULL,
        completed_at TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS activity (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL,
        kind TEXT NOT NULL,
        day TEXT NOT NULL,
        completed_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_activity_day ON activity(day);
    CREATE TABLE IF NOT EXISTS cursors (
        kind TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        idx INTEGER NOT NULL,
        PRIMARY KEY (kind, difficulty)
    );
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub id: ExerciseId,
    pub completed_at: DateTime<Local>,
}

/// Lifetime completions of one kind and their mean per active day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindAverage {
    pub kind: ExerciseKind,
    pub total: u32,
    pub per_day: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Averages {
    /// Distinct days with at least one completion
    pub active_days: u32,
    pub total: u32,
    pub kinds: Vec<KindAverage>,
}

impl Averages {
    pub fn per_day(&self, kind: ExerciseKind) -> f64 {
        self.kinds
            .iter()
            .find(|k| k.kind == kind)
            .map_or(0.0, |k| k.per_day)
    }
}

/// How a day's count compares with the daily average, in rounded percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "trend", content = "percent", rename_all = "lowercase")]
pub enum Trend {
    Above(u32),
    Below(u32),
    Average,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Above(p) => write!(f, "+{p}%"),
            Trend::Below(p) => write!(f, "-{p}%"),
            Trend::Average => write!(f, "average"),
        }
    }
}

/// `None` while there is no average to compare against
pub fn compare_to_average(current: u32, average: f64) -> Option<Trend> {
    if average <= 0.0 {
        return None;
    }
    let current = f64::from(current);
    let percent = |diff: f64| (diff / average * 100.0).round() as u32;
    Some(if current > average {
        Trend::Above(percent(current - average))
    } else if current < average {
        Trend::Below(percent(average - current))
    } else {
        Trend::Average
    })
}

/// Consecutive days with at least one completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}

#[derive(Debug)]
pub struct ProgressStore {
    conn: Connection,
}

impl ProgressStore {
    /// Open the on-disk store, or an in-memory one when that fails
    pub fn open_default() -> Result<Self> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("drillgen_progress.db"));
        Self::open(&path).or_else(|e| {
            warn!(
                "progress store at {} unavailable ({e}); progress will not be saved",
                path.display()
            );
            Self::in_memory()
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(ProgressStore { conn })
    }

    pub fn mark_complete(&mut self, id: &ExerciseId) -> Result<bool> {
        self.mark_complete_at(id, Local::now())
    }

    /// Returns false when the exercise was already complete; the activity
    /// log only grows on new completions.
    pub fn mark_complete_at(&mut self, id: &ExerciseId, at: DateTime<Local>) -> Result<bool> {
        let key = id.to_string();
        let timestamp = at.with_timezone(&Utc).to_rfc3339();
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            r#"
            INSERT OR IGNORE INTO completions (id, kind, difficulty, idx, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                key,
                id.kind.to_string(),
                id.difficulty.to_string(),
                id.index.get(),
                timestamp,
            ],
        )?;
        if inserted == 0 {
            return Ok(false);
        }

        tx.execute(
            "INSERT INTO activity (id, kind, day, completed_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                key,
                id.kind.to_string(),
                at.format(DAY_FORMAT).to_string(),
                timestamp,
            ],
        )?;
        tx.commit()?;
        debug!("completed {key}");
        Ok(true)
    }

    pub fn is_completed(&self, id: &ExerciseId) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM completions WHERE id = ?1",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Clear a completion so the exercise can be taken again
    pub fn retake(&self, id: &ExerciseId) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM completions WHERE id = ?1", [id.to_string()])?;
        Ok(removed > 0)
    }

    pub fn completed_ids(&self, kind: ExerciseKind) -> Result<Vec<ExerciseId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM completions WHERE kind = ?1 ORDER BY difficulty, idx")?;
        let ids = stmt
            .query_map([kind.to_string()], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        ids.iter().map(|s| s.parse()).collect()
    }

    /// Most recent completions first. Timestamps are stored in UTC so the
    /// text order is the time order across offset changes.
    pub fn history(&self, limit: usize) -> Result<Vec<Completion>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, completed_at FROM activity ORDER BY completed_at DESC, seq DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map([limit as i64], |row| {
                let timestamp_str: String = row.get(1)?;
                let completed_at = DateTime::parse_from_rfc3339(&timestamp_str)
                    .map_err(|_| {
                        rusqlite::Error::InvalidColumnType(
                            1,
                            "completed_at".to_string(),
                            rusqlite::types::Type::Text,
                        )
                    })?
                    .with_timezone(&Local);
                Ok((row.get::<_, String>(0)?, completed_at))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, completed_at)| Ok(Completion { id: id.parse()?, completed_at }))
            .collect()
    }

    pub fn cursor(&self, kind: ExerciseKind, difficulty: Difficulty) -> Result<GenerationIndex> {
        let idx: Option<u64> = self
            .conn
            .query_row(
                "SELECT idx FROM cursors WHERE kind = ?1 AND difficulty = ?2",
                [kind.to_string(), difficulty.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(GenerationIndex(idx.unwrap_or(0)))
    }

    pub fn set_cursor(
        &self,
        kind: ExerciseKind,
        difficulty: Difficulty,
        index: GenerationIndex,
    ) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO cursors (kind, difficulty, idx) VALUES (?1, ?2, ?3)
            ON CONFLICT(kind, difficulty) DO UPDATE SET idx = excluded.idx
            "#,
            params![kind.to_string(), difficulty.to_string(), index.get()],
        )?;
        Ok(())
    }

    /// Completions logged on `date`, per kind, in kind order
    pub fn daily_counts(&self, date: NaiveDate) -> Result<Vec<(ExerciseKind, u32)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT kind, COUNT(*) FROM activity WHERE day = ?1 GROUP BY kind")?;
        let rows = stmt
            .query_map([date.format(DAY_FORMAT).to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut counts = rows
            .into_iter()
            .map(|(kind, n)| Ok((kind.parse::<ExerciseKind>()?, n)))
            .collect::<Result<Vec<_>>>()?;
        counts.sort_by_key(|(kind, _)| *kind);
        Ok(counts)
    }

    /// Lifetime totals per kind, averaged over the days with any activity
    pub fn averages(&self) -> Result<Averages> {
        let active_days: u32 =
            self.conn
                .query_row("SELECT COUNT(DISTINCT day) FROM activity", [], |row| row.get(0))?;

        let mut stmt = self
            .conn
            .prepare("SELECT kind, COUNT(*) FROM activity GROUP BY kind")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut kinds = rows
            .into_iter()
            .map(|(kind, total)| {
                Ok(KindAverage {
                    kind: kind.parse()?,
                    total,
                    per_day: if active_days == 0 {
                        0.0
                    } else {
                        f64::from(total) / f64::from(active_days)
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;
        kinds.sort_by_key(|k| k.kind);

        Ok(Averages {
            active_days,
            total: kinds.iter().map(|k| k.total).sum(),
            kinds,
        })
    }

    /// A streak is alive while its last active day is today or yesterday.
    pub fn streak(&self, today: NaiveDate) -> Result<Streak> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT day FROM activity ORDER BY day")?;
        let days = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .filter_map(|d| NaiveDate::parse_from_str(&d, DAY_FORMAT).ok())
            .collect::<Vec<_>>();
        Ok(streak_from_days(&days, today))
    }
}

/// `days` must be sorted ascending and free of duplicates
fn streak_from_days(days: &[NaiveDate], today: NaiveDate) -> Streak {
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for &day in days.iter().filter(|d| **d <= today) {
        run = match prev {
            Some(p) if day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(day);
    }

    let current = match prev {
        Some(last) if today - last <= Duration::days(1) => run,
        _ => 0,
    };
    Streak { current, best }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn id(kind: ExerciseKind, index: u64) -> ExerciseId {
        ExerciseId::new(kind, Difficulty::Basic, index)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn mark_and_query_completion() {
        let mut store = ProgressStore::in_memory().unwrap();
        let a = id(ExerciseKind::Sentences, 3);
        assert!(!store.is_completed(&a).unwrap());
        assert!(store.mark_complete(&a).unwrap());
        assert!(store.is_completed(&a).unwrap());
        assert!(!store.mark_complete(&a).unwrap());
        assert_eq!(store.history(10).unwrap().len(), 1);
    }

    #[test]
    fn retake_clears_completion_but_keeps_history() {
        let mut store = ProgressStore::in_memory().unwrap();
        let a = id(ExerciseKind::Vocabulary, 0);
        store.mark_complete(&a).unwrap();
        assert!(store.retake(&a).unwrap());
        assert!(!store.is_completed(&a).unwrap());
        assert!(!store.retake(&a).unwrap());
        assert_eq!(store.history(10).unwrap()[0].id, a);
    }

    #[test]
    fn completed_ids_filter_by_kind() {
        let mut store = ProgressStore::in_memory().unwrap();
        store.mark_complete(&id(ExerciseKind::Reading, 2)).unwrap();
        store.mark_complete(&id(ExerciseKind::Reading, 1)).unwrap();
        store.mark_complete(&id(ExerciseKind::Scramble, 1)).unwrap();
        let ids = store.completed_ids(ExerciseKind::Reading).unwrap();
        assert_eq!(ids, vec![id(ExerciseKind::Reading, 1), id(ExerciseKind::Reading, 2)]);
    }

    #[test]
    fn cursors_default_to_zero_and_persist() {
        let store = ProgressStore::in_memory().unwrap();
        let matching_cursor = |d| store.cursor(ExerciseKind::Matching, d).unwrap();
        assert_eq!(matching_cursor(Difficulty::Medium), GenerationIndex(0));
        store
            .set_cursor(ExerciseKind::Matching, Difficulty::Medium, GenerationIndex(9))
            .unwrap();
        store
            .set_cursor(ExerciseKind::Matching, Difficulty::Medium, GenerationIndex(10))
            .unwrap();
        assert_eq!(matching_cursor(Difficulty::Medium), GenerationIndex(10));
        assert_eq!(matching_cursor(Difficulty::Basic), GenerationIndex(0));
    }

    #[test]
    fn daily_counts_group_by_kind() {
        let mut store = ProgressStore::in_memory().unwrap();
        store.mark_complete_at(&id(ExerciseKind::Sentences, 0), at(2026, 3, 1, 9)).unwrap();
        store.mark_complete_at(&id(ExerciseKind::Sentences, 1), at(2026, 3, 1, 10)).unwrap();
        store.mark_complete_at(&id(ExerciseKind::Vocabulary, 0), at(2026, 3, 1, 11)).unwrap();
        store.mark_complete_at(&id(ExerciseKind::Vocabulary, 1), at(2026, 3, 2, 11)).unwrap();

        let counts = store.daily_counts(day(2026, 3, 1)).unwrap();
        assert_eq!(counts, vec![(ExerciseKind::Vocabulary, 1), (ExerciseKind::Sentences, 2)]);
        assert!(store.daily_counts(day(2026, 3, 5)).unwrap().is_empty());
    }

    #[test]
    fn history_is_newest_first() {
        let mut store = ProgressStore::in_memory().unwrap();
        store.mark_complete_at(&id(ExerciseKind::Reading, 0), at(2026, 3, 1, 9)).unwrap();
        store.mark_complete_at(&id(ExerciseKind::Reading, 1), at(2026, 3, 2, 9)).unwrap();
        let history = store.history(1).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, id(ExerciseKind::Reading, 1));
    }

    #[test]
    fn completion_and_activity_are_written_together() {
        let mut store = ProgressStore::in_memory().unwrap();
        store
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_activity BEFORE INSERT ON activity
                 BEGIN SELECT RAISE(ABORT, 'full'); END;",
            )
            .unwrap();
        let a = id(ExerciseKind::Reading, 4);
        assert!(store.mark_complete(&a).is_err());
        assert!(!store.is_completed(&a).unwrap());
    }

    #[test]
    fn timestamps_are_stored_in_utc() {
        let mut store = ProgressStore::in_memory().unwrap();
        let when = at(2026, 3, 29, 9);
        store.mark_complete_at(&id(ExerciseKind::Reading, 0), when).unwrap();
        let stored: String = store
            .conn
            .query_row("SELECT completed_at FROM activity", [], |row| row.get(0))
            .unwrap();
        assert!(stored.ends_with("+00:00"), "{stored}");
        assert_eq!(store.history(1).unwrap()[0].completed_at, when);
    }

    #[test]
    fn history_follows_time_not_insertion() {
        let mut store = ProgressStore::in_memory().unwrap();
        store.mark_complete_at(&id(ExerciseKind::Reading, 1), at(2026, 3, 2, 9)).unwrap();
        store.mark_complete_at(&id(ExerciseKind::Reading, 0), at(2026, 3, 1, 9)).unwrap();
        let history = store.history(2).unwrap();
        assert_eq!(history[0].id, id(ExerciseKind::Reading, 1));
        assert_eq!(history[1].id, id(ExerciseKind::Reading, 0));
    }

    #[test]
    fn averages_over_active_days() {
        let mut store = ProgressStore::in_memory().unwrap();
        assert_eq!(store.averages().unwrap(), Averages::default());

        store.mark_complete_at(&id(ExerciseKind::Vocabulary, 0), at(2026, 4, 1, 9)).unwrap();
        store.mark_complete_at(&id(ExerciseKind::Vocabulary, 1), at(2026, 4, 1, 10)).unwrap();
        store.mark_complete_at(&id(ExerciseKind::Vocabulary, 2), at(2026, 4, 3, 9)).unwrap();
        store.mark_complete_at(&id(ExerciseKind::Matching, 0), at(2026, 4, 3, 9)).unwrap();

        let averages = store.averages().unwrap();
        assert_eq!(averages.active_days, 2);
        assert_eq!(averages.total, 4);
        assert_eq!(
            averages.kinds,
            vec![
                KindAverage { kind: ExerciseKind::Vocabulary, total: 3, per_day: 1.5 },
                KindAverage { kind: ExerciseKind::Matching, total: 1, per_day: 0.5 },
            ]
        );
        assert_eq!(averages.per_day(ExerciseKind::Reading), 0.0);
    }

    #[test]
    fn comparison_with_average() {
        assert_eq!(compare_to_average(3, 2.0), Some(Trend::Above(50)));
        assert_eq!(compare_to_average(1, 4.0), Some(Trend::Below(75)));
        assert_eq!(compare_to_average(2, 2.0), Some(Trend::Average));
        assert_eq!(compare_to_average(5, 0.0), None);
        assert_eq!(Trend::Above(50).to_string(), "+50%");
        assert_eq!(Trend::Below(75).to_string(), "-75%");
    }

    #[test]
    fn streak_counts_consecutive_days() {
        let days = [
            day(2026, 1, 1),
            day(2026, 1, 2),
            day(2026, 1, 3),
            day(2026, 1, 7),
            day(2026, 1, 8),
        ];
        assert_eq!(streak_from_days(&days, day(2026, 1, 8)), Streak { current: 2, best: 3 });
        assert_eq!(streak_from_days(&days, day(2026, 1, 9)), Streak { current: 2, best: 3 });
        assert_eq!(streak_from_days(&days, day(2026, 1, 10)), Streak { current: 0, best: 3 });
        assert_eq!(streak_from_days(&[], day(2026, 1, 10)), Streak::default());
    }

    #[test]
    fn streak_from_store() {
        let mut store = ProgressStore::in_memory().unwrap();
        store.mark_complete_at(&id(ExerciseKind::Listening, 0), at(2026, 5, 10, 8)).unwrap();
        store.mark_complete_at(&id(ExerciseKind::Listening, 1), at(2026, 5, 11, 8)).unwrap();
        store.mark_complete_at(&id(ExerciseKind::Listening, 2), at(2026, 5, 11, 20)).unwrap();
        assert_eq!(store.streak(day(2026, 5, 11)).unwrap(), Streak { current: 2, best: 2 });
    }
}
