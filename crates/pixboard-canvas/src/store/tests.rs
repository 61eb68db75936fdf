//! Tests for store module

use super::*;
use crate::canvas::filled_grid;
use crate::color::Color;
use crate::edit::NewEdit;
use crate::error::Error;
use chrono::{Duration, Utc};
use futures::TryStreamExt;

fn white_grid(width: u32, height: u32) -> crate::canvas::Grid {
    filled_grid(width, height, &Color::white())
}

async fn backends() -> Vec<Box<dyn CanvasStore>> {
    vec![
        Box::new(SqliteCanvasStore::in_memory().await.unwrap()),
        Box::new(MemoryCanvasStore::new()),
    ]
}

#[test]
fn test_default_data_dir() {
    let dir = default_data_dir();
    assert!(dir.to_string_lossy().contains("pixboard"));
    assert!(default_db_path().ends_with("pixboard.db"));
}

#[tokio::test]
async fn test_insert_and_load_canvas() {
    for store in backends().await {
        let created = store
            .insert_canvas("A", 3, 2, true, &white_grid(3, 2))
            .await
            .unwrap();
        assert!(created.id > 0);

        let loaded = store.load_canvas(created.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "A");
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert!(loaded.history_enabled);
        assert_eq!(loaded.grid(), created.grid());

        assert!(store.load_canvas(created.id + 100).await.unwrap().is_none());
        assert_eq!(store.find_canvas_id("A").await.unwrap(), Some(created.id));
        assert_eq!(store.find_canvas_id("B").await.unwrap(), None);
    }
}

#[tokio::test]
async fn test_duplicate_name() {
    for store in backends().await {
        store
            .insert_canvas("dup", 1, 1, false, &white_grid(1, 1))
            .await
            .unwrap();
        let err = store
            .insert_canvas("dup", 2, 2, false, &white_grid(2, 2))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::DuplicateName(ref n) if n == "dup"),
            "{} returned {err:?}",
            store.name()
        );
    }
}

#[tokio::test]
async fn test_list_canvases() {
    for store in backends().await {
        store
            .insert_canvas("one", 1, 1, false, &white_grid(1, 1))
            .await
            .unwrap();
        store
            .insert_canvas("two", 2, 3, true, &white_grid(2, 3))
            .await
            .unwrap();

        let list = store.list_canvases().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "one");
        assert_eq!(list[1].name, "two");
        assert_eq!((list[1].width, list[1].height), (2, 3));
        assert!(list[1].history_enabled);
    }
}

#[tokio::test]
async fn test_commit_write_appends_and_updates() {
    for store in backends().await {
        let mut canvas = store
            .insert_canvas("A", 2, 2, true, &white_grid(2, 2))
            .await
            .unwrap();

        let red = Color::parse("ff0000").unwrap();
        let prior = canvas.replace(1, 1, red.clone());
        let record = store
            .commit_write(&canvas, Some(NewEdit::now(1, 1, prior)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.canvas_id, canvas.id);
        assert_eq!((record.x, record.y), (1, 1));
        assert_eq!(record.color, Color::white());

        let loaded = store.load_canvas(canvas.id).await.unwrap().unwrap();
        assert_eq!(loaded.color_at(1, 1), Some(&red));
        assert_eq!(store.count_edits(canvas.id).await.unwrap(), 1);
    }
}

#[tokio::test]
async fn test_commit_write_without_history() {
    for store in backends().await {
        let mut canvas = store
            .insert_canvas("plain", 2, 2, false, &white_grid(2, 2))
            .await
            .unwrap();
        canvas.replace(0, 0, Color::parse("000000").unwrap());

        let record = store.commit_write(&canvas, None).await.unwrap();
        assert!(record.is_none());
        assert_eq!(store.count_edits(canvas.id).await.unwrap(), 0);

        let loaded = store.load_canvas(canvas.id).await.unwrap().unwrap();
        assert_eq!(loaded.color_at(0, 0).unwrap().as_str(), "000000");
    }
}

#[tokio::test]
async fn test_commit_write_unknown_canvas_leaves_no_edit() {
    for store in backends().await {
        let canvas = store
            .insert_canvas("real", 1, 1, true, &white_grid(1, 1))
            .await
            .unwrap();
        let ghost = crate::canvas::Canvas::from_parts(
            canvas.id + 41,
            "ghost",
            1,
            1,
            true,
            white_grid(1, 1),
            Utc::now(),
        )
        .unwrap();

        let err = store
            .commit_write(&ghost, Some(NewEdit::now(0, 0, Color::white())))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(store.count_edits(ghost.id).await.unwrap(), 0);
    }
}

#[tokio::test]
async fn test_list_descending_order() {
    for store in backends().await {
        let canvas = store
            .insert_canvas("log", 3, 1, true, &white_grid(3, 1))
            .await
            .unwrap();
        let other = store
            .insert_canvas("other", 1, 1, true, &white_grid(1, 1))
            .await
            .unwrap();

        let base = Utc::now();
        let colors = ["111111", "222222", "333333"];
        for (i, hex) in colors.iter().enumerate() {
            let edit = NewEdit {
                x: i as u32,
                y: 0,
                prior: Color::parse(*hex).unwrap(),
                created_at: base + Duration::seconds(i as i64),
            };
            store.commit_write(&canvas, Some(edit)).await.unwrap();
        }
        store
            .commit_write(&other, Some(NewEdit::now(0, 0, Color::white())))
            .await
            .unwrap();

        let records: Vec<_> = store
            .list_descending(canvas.id)
            .try_collect()
            .await
            .unwrap();
        let got: Vec<&str> = records.iter().map(|r| r.color.as_str()).collect();
        assert_eq!(got, vec!["333333", "222222", "111111"]);

        // restartable: a second pass sees the same sequence
        let again: Vec<_> = store
            .list_descending(canvas.id)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(records, again);
    }
}

#[tokio::test]
async fn test_list_descending_follows_commit_order() {
    for store in backends().await {
        let canvas = store
            .insert_canvas("tie", 1, 1, true, &white_grid(1, 1))
            .await
            .unwrap();
        let now = Utc::now();
        // same instant, then a clock that stepped back an hour
        let stamps = [now, now, now - Duration::hours(1)];
        for (hex, at) in ["aaaaaa", "bbbbbb", "cccccc"].iter().zip(stamps) {
            let edit = NewEdit {
                x: 0,
                y: 0,
                prior: Color::parse(*hex).unwrap(),
                created_at: at,
            };
            store.commit_write(&canvas, Some(edit)).await.unwrap();
        }

        let records: Vec<_> = store
            .list_descending(canvas.id)
            .try_collect()
            .await
            .unwrap();
        let got: Vec<&str> = records.iter().map(|r| r.color.as_str()).collect();
        assert_eq!(got, vec!["cccccc", "bbbbbb", "aaaaaa"], "{}", store.name());
        assert_eq!(
            records[0].created_at.timestamp_micros(),
            stamps[2].timestamp_micros()
        );
    }
}
