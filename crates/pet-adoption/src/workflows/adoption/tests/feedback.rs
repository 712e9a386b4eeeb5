use std::fs;

use super::common::*;
use crate::config::{FeedbackConfig, FeedbackSinkKind};
use crate::workflows::adoption::feedback::{
    ConfiguredFeedbackSender, ConsoleFeedbackAdapter, FeedbackError, FeedbackSender,
    FileFeedbackAdapter,
};

#[test]
fn console_adapter_formats_feedback_line() {
    let adapter = ConsoleFeedbackAdapter::new(Vec::new());
    adapter
        .send_feedback(&adopter_id("bob"), &pet_id(), "Not enough yard space")
        .expect("console write");

    let written = String::from_utf8(adapter.into_inner()).expect("utf8 output");
    assert_eq!(
        written,
        "[Console] Feedback to bob about rex: Not enough yard space\n"
    );
}

#[test]
fn file_adapter_appends_one_line_per_feedback() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("feedback_log.txt");
    let adapter = FileFeedbackAdapter::new(&path);

    adapter
        .send_feedback(&adopter_id("bob"), &pet_id(), "Not enough yard space")
        .expect("first append");
    adapter
        .send_feedback(&adopter_id("carol"), &pet_id(), "Another family was chosen")
        .expect("second append");

    let contents = fs::read_to_string(&path).expect("log readable");
    assert_eq!(
        contents,
        "bob - rex: Not enough yard space\ncarol - rex: Another family was chosen\n"
    );
}

#[test]
fn file_adapter_surfaces_open_failures() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing").join("feedback_log.txt");
    let adapter = FileFeedbackAdapter::new(&path);

    match adapter.send_feedback(&adopter_id("bob"), &pet_id(), "text") {
        Err(FeedbackError::Io { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("expected io failure, got {other:?}"),
    }
}

#[test]
fn configured_sender_follows_sink_kind() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("configured.txt");
    let config = FeedbackConfig {
        sink: FeedbackSinkKind::File,
        log_path: path.clone(),
    };

    let sender = ConfiguredFeedbackSender::from_config(&config);
    assert!(matches!(sender, ConfiguredFeedbackSender::File(_)));
    sender
        .send_feedback(&adopter_id("alice"), &pet_id(), "Maybe next time")
        .expect("append");
    assert_eq!(
        fs::read_to_string(&path).expect("readable"),
        "alice - rex: Maybe next time\n"
    );

    let console = ConfiguredFeedbackSender::from_config(&FeedbackConfig {
        sink: FeedbackSinkKind::Console,
        log_path: path,
    });
    assert!(matches!(console, ConfiguredFeedbackSender::Console(_)));
}
