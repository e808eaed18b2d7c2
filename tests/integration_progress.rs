// On-disk progress store behaviour across reopen, using temporary files.

use chrono::{Local, TimeZone};
use drillgen::progress::{ProgressStore, Streak};
use drillgen::{Difficulty, ExerciseId, ExerciseKind, GenerationIndex};
use tempfile::tempdir;

#[test]
fn progress_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("progress.db");
    let id = ExerciseId::new(ExerciseKind::Vocabulary, Difficulty::Intermediate, 12);

    {
        let mut store = ProgressStore::open(&path).unwrap();
        store.mark_complete(&id).unwrap();
        store
            .set_cursor(ExerciseKind::Vocabulary, Difficulty::Intermediate, GenerationIndex(13))
            .unwrap();
    }

    let store = ProgressStore::open(&path).unwrap();
    assert!(store.is_completed(&id).unwrap());
    assert_eq!(
        store.cursor(ExerciseKind::Vocabulary, Difficulty::Intermediate).unwrap(),
        GenerationIndex(13)
    );
    assert_eq!(store.completed_ids(ExerciseKind::Vocabulary).unwrap(), vec![id]);
}

#[test]
fn ids_use_progress_key_format() {
    let dir = tempdir().unwrap();
    let mut store = ProgressStore::open(&dir.path().join("p.db")).unwrap();
    let id: ExerciseId = "matching_medium_4".parse().unwrap();
    store.mark_complete(&id).unwrap();
    let history = store.history(5).unwrap();
    assert_eq!(history[0].id.to_string(), "matching_medium_4");
}

#[test]
fn streak_survives_retake() {
    let dir = tempdir().unwrap();
    let mut store = ProgressStore::open(&dir.path().join("p.db")).unwrap();
    let first = ExerciseId::new(ExerciseKind::Reading, Difficulty::Basic, 0);
    let second = ExerciseId::new(ExerciseKind::Reading, Difficulty::Basic, 1);
    store
        .mark_complete_at(&first, Local.with_ymd_and_hms(2026, 9, 1, 10, 0, 0).unwrap())
        .unwrap();
    store
        .mark_complete_at(&second, Local.with_ymd_and_hms(2026, 9, 2, 10, 0, 0).unwrap())
        .unwrap();
    store.retake(&first).unwrap();

    let today = chrono::NaiveDate::from_ymd_opt(2026, 9, 3).unwrap();
    assert_eq!(store.streak(today).unwrap(), Streak { current: 2, best: 2 });
    assert_eq!(store.averages().unwrap().per_day(ExerciseKind::Reading), 1.0);
}
