//! Pipeline integration tests
//!
//! Drive whole jobs through the binary's wiring with a scripted tool runner.

mod common;

use common::{job_args, ScriptedRunner, TestHarness};
use std::fs;
use std::sync::Arc;

#[tokio::test]
async fn test_local_job_end_to_end() {
    let harness = TestHarness::new();
    let runner = Arc::new(ScriptedRunner::new());
    let executor = harness.executor(runner.clone());
    let input = harness.input_file("holiday.mov");

    let spec = job_args("Holiday 2024!", &input, "400,800,1600")
        .into_spec()
        .unwrap();
    let report = executor.run(&spec).await.unwrap();

    assert_eq!(report.safe_name, "Holiday2024");
    assert_eq!(report.source, std::path::PathBuf::from(&input));
    assert_eq!(runner.programs(), ["ffmpeg", "ffmpeg", "ffmpeg", "ffmpeg"]);

    let root = executor.context().storage.media_root().join("Holiday2024");
    assert_eq!(report.workspace, root);
    assert!(root.join("mp4/video.mp4").is_file());
    for i in 1..=3 {
        assert!(root.join(format!("hls/stream_{i}/playlist.m3u8")).is_file());
        assert!(root.join(format!("hls/stream_{i}/segment_0.ts")).is_file());
    }
    assert!(!root.join("src").exists());

    let manifest = fs::read_to_string(root.join("hls/manifest.m3u8")).unwrap();
    let expected = "#EXTM3U\n\
        #EXT-X-VERSION:3\n\
        #EXT-X-STREAM-INF:BANDWIDTH=409600,RESOLUTION=640x360,CODECS=\"avc1.64000c,mp4a.40.2\"\n\
        stream_1/playlist.m3u8\n\
        #EXT-X-STREAM-INF:BANDWIDTH=819200,RESOLUTION=640x360,CODECS=\"avc1.64000c,mp4a.40.2\"\n\
        stream_2/playlist.m3u8\n\
        #EXT-X-STREAM-INF:BANDWIDTH=1638400,RESOLUTION=640x360,CODECS=\"avc1.64000c,mp4a.40.2\"\n\
        stream_3/playlist.m3u8\n";
    assert_eq!(manifest, expected);
}

#[tokio::test]
async fn test_url_input_is_downloaded_before_stripping() {
    let harness = TestHarness::new();
    let runner = Arc::new(ScriptedRunner::new());
    let executor = harness.executor(runner.clone());

    let spec = job_args("promo", "https://videos.example.com/2024/promo.mp4", "1000")
        .into_spec()
        .unwrap();
    let report = executor.run(&spec).await.unwrap();

    assert!(report.downloaded);
    assert_eq!(runner.programs(), ["wget", "ffmpeg", "ffmpeg"]);

    let calls = runner.calls();
    let target = report.source.to_string_lossy().into_owned();
    assert!(target.ends_with("promo/src/promo.mp4"), "{target}");
    assert_eq!(calls[0].get_args()[..3], ["-q", "-O", target.as_str()]);
    assert!(calls[1].get_args().contains(&target));
}

#[tokio::test]
async fn test_rerun_is_idempotent_by_wipe() {
    let harness = TestHarness::new();
    let executor = harness.executor(Arc::new(ScriptedRunner::new()));
    let input = harness.input_file("clip.mp4");

    let first = executor
        .run(&job_args("clip", &input, "300,600,900").into_spec().unwrap())
        .await
        .unwrap();
    let second = executor
        .run(&job_args("clip", &input, "300,600").into_spec().unwrap())
        .await
        .unwrap();

    assert_eq!(first.workspace, second.workspace);
    assert!(!second.workspace.join("hls/stream_3").exists());
    let manifest = fs::read_to_string(&second.manifest_path).unwrap();
    assert_eq!(manifest.lines().count(), 2 + 2 * 2);
}

#[tokio::test]
async fn test_segment_failure_leaves_manifest_unwritten() {
    let harness = TestHarness::new();
    let runner = Arc::new(ScriptedRunner::failing(|cmd| {
        cmd.get_args().iter().any(|a| a == "800k")
    }));
    let executor = harness.executor(runner);
    let input = harness.input_file("clip.mp4");

    let err = executor
        .run(&job_args("clip", &input, "400,800").into_spec().unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 70);
    assert!(err.to_string().contains("stream_2 (800k)"), "{err}");

    let root = executor.context().storage.media_root().join("clip");
    assert!(root.join("hls/stream_1/playlist.m3u8").exists());
    assert!(!root.join("hls/manifest.m3u8").exists());
}

#[tokio::test]
async fn test_fetch_failure_stops_the_job() {
    let harness = TestHarness::new();
    let runner = Arc::new(ScriptedRunner::failing(|cmd| cmd.program_name() == "wget"));
    let executor = harness.executor(runner.clone());

    let err = executor
        .run(&job_args("remote", "http://host/missing.mp4", "500").into_spec().unwrap())
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Stage failed [fetch]"), "{err}");
    assert_eq!(runner.programs(), ["wget"]);
}

#[tokio::test]
async fn test_names_that_sanitize_alike_share_a_workspace() {
    let harness = TestHarness::new();
    let executor = harness.executor(Arc::new(ScriptedRunner::new()));
    let input = harness.input_file("clip.mp4");

    let a = executor
        .run(&job_args("my show", &input, "500").into_spec().unwrap())
        .await
        .unwrap();
    let b = executor
        .run(&job_args("my/show", &input, "500").into_spec().unwrap())
        .await
        .unwrap();

    assert_eq!(a.safe_name, "myshow");
    assert_eq!(a.workspace, b.workspace);
}

#[test]
fn test_unusable_name_is_rejected_before_any_work() {
    let err = job_args("!!!", "/tmp/in.mp4", "500").into_spec().unwrap_err();
    assert!(matches!(err, streamify_core::Error::Validation(_)));
}
