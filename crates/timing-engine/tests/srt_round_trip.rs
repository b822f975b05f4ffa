//! File-level import/export through the engine.

use cuekit_formats::SubtitleFormat;
use cuekit_timing_engine::{ExportOptions, SubtitleEngine, SyncParams};
use cuekit_track_model::EntryDraft;

const LESSON: &str = "\
1
00:00:00,000 --> 00:00:02,500
Welcome to the course

2
00:00:02,750 --> 00:00:05,125
In this lesson
we cover timing

3
01:02:03,004 --> 01:02:05,999
See you next time
";

#[tokio::test]
async fn test_srt_import_export_preserves_entries() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("lesson.srt");
    let output = dir.path().join("lesson.out.srt");
    tokio::fs::write(&input, LESSON).await.unwrap();

    let mut engine = SubtitleEngine::default();
    let track = engine.create_track("en-US", "English", true);
    assert_eq!(engine.import_srt(&track, &input).await.unwrap(), 3);

    engine
        .export(&ExportOptions {
            format: SubtitleFormat::Srt,
            output_path: output.clone(),
            track_id: track.clone(),
            include_formatting: false,
        })
        .await
        .unwrap();

    let mut reloaded = SubtitleEngine::default();
    let copy = reloaded.create_track("en-US", "English", true);
    assert_eq!(reloaded.import_srt(&copy, &output).await.unwrap(), 3);

    let original = &engine.track(&track).unwrap().entries;
    let round_tripped = &reloaded.track(&copy).unwrap().entries;
    for (a, b) in original.iter().zip(round_tripped) {
        assert_eq!(a.text, b.text);
        assert!((a.start_time - b.start_time).abs() < 0.0005);
        assert!((a.end_time - b.end_time).abs() < 0.0005);
    }
    assert_eq!(round_tripped[1].text, "In this lesson\nwe cover timing");
}

#[tokio::test]
async fn test_export_markers_per_format() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = SubtitleEngine::default();
    let track = engine.create_track("pt-BR", "Português", true);
    engine
        .add_entry(&track, EntryDraft::new(0.0, 2.0, "Olá"))
        .unwrap();

    let vtt_path = dir.path().join("out.vtt");
    engine
        .export(&ExportOptions {
            format: SubtitleFormat::Vtt,
            output_path: vtt_path.clone(),
            track_id: track.clone(),
            include_formatting: false,
        })
        .await
        .unwrap();
    let vtt = tokio::fs::read_to_string(&vtt_path).await.unwrap();
    assert!(vtt.starts_with("WEBVTT\n\n"));
    assert!(vtt.contains("00:00:00.000 --> 00:00:02.000"));

    let ass_path = dir.path().join("out.ass");
    engine
        .export(&ExportOptions {
            format: SubtitleFormat::Ass,
            output_path: ass_path.clone(),
            track_id: track.clone(),
            include_formatting: false,
        })
        .await
        .unwrap();
    let ass = tokio::fs::read_to_string(&ass_path).await.unwrap();
    assert!(ass.contains("[Script Info]"));
    assert!(ass.contains("[V4+ Styles]"));
    assert!(ass.contains("Title: Português"));
    assert!(ass.contains("Dialogue: 0,0:00:00.00,0:00:02.00,Default,,0,0,0,,Olá"));
}

#[tokio::test]
async fn test_vtt_file_import_and_resync() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("clip.vtt");
    tokio::fs::write(
        &input,
        "WEBVTT\n\nintro\n00:01.000 --> 00:03.000 align:start\nHi\n\n00:00:04.000 --> 00:00:05.000\nBye\n",
    )
    .await
    .unwrap();

    let mut engine = SubtitleEngine::default();
    let track = engine.create_track("en-US", "English", true);
    assert_eq!(engine.import_file(&track, &input).await.unwrap(), 2);

    assert!(engine
        .sync_track(
            &track,
            SyncParams {
                offset: -2.0,
                speed_factor: 1.0
            }
        )
        .unwrap());
    let entries = &engine.track(&track).unwrap().entries;
    assert_eq!(entries[0].start_time, 0.0);
    assert!((entries[0].end_time - 1.0).abs() < 1e-9);
    assert!((entries[1].start_time - 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_export_missing_track_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let engine = SubtitleEngine::default();
    let err = engine
        .export(&ExportOptions {
            format: SubtitleFormat::Srt,
            output_path: dir.path().join("x.srt"),
            track_id: "track-missing".to_string(),
            include_formatting: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, cuekit_common::CuekitError::NotFound { .. }));
    assert!(!dir.path().join("x.srt").exists());
}
