//! Integration tests for the dialog/host wire format

use capturer_core::protocol::{
    AudioConstraint, AudioSettings, CapturePayload, DialogMessage, HostReply, MediaConstraint,
    Outcome, Rejection, SourceList,
};
use capturer_core::types::VideoSource;
use serde_json::{json, Value};

fn to_json(msg: &DialogMessage) -> Value {
    let bytes = msg.to_bytes();
    serde_json::from_slice(&bytes[..bytes.len() - 1]).expect("Should be valid JSON")
}

fn payload(audio: AudioConstraint, nodes: Option<Vec<&str>>) -> CapturePayload {
    CapturePayload {
        video: MediaConstraint::desktop(Some("screen:0".into())),
        audio,
        selected_audio_nodes: nodes.map(|n| n.into_iter().map(String::from).collect()),
    }
}

#[test]
fn test_request_json_format() {
    assert_eq!(to_json(&DialogMessage::GetSources), json!({"type": "getSources"}));
    assert_eq!(
        to_json(&DialogMessage::GetAudioSettings),
        json!({"type": "getAudioSettings"})
    );
}

#[test]
fn test_settings_changed_json_format() {
    let msg = DialogMessage::SettingsChanged {
        screen_share_store: AudioSettings { audio: true },
    };
    assert_eq!(
        to_json(&msg),
        json!({"type": "settingsChanged", "screenShareStore": {"audio": true}})
    );
}

#[test]
fn test_accept_outcome_json_format() {
    let msg = DialogMessage::CloseView {
        outcome: Outcome::Accept(payload(AudioConstraint::Desktop, Some(vec!["node:mic1"]))),
    };
    assert_eq!(
        to_json(&msg),
        json!({
            "type": "closeView",
            "outcome": {
                "video": {"mandatory": {"chromeMediaSource": "desktop", "chromeMediaSourceId": "screen:0"}},
                "audio": {"mandatory": {"chromeMediaSource": "desktop"}},
                "selectedAudioNodes": ["node:mic1"]
            }
        })
    );
}

#[test]
fn test_audio_off_and_null_nodes() {
    let msg = DialogMessage::CloseView {
        outcome: Outcome::Accept(payload(AudioConstraint::Off, None)),
    };
    let json = to_json(&msg);
    assert_eq!(json["outcome"]["audio"], json!(false));
    assert_eq!(json["outcome"]["selectedAudioNodes"], Value::Null);
}

#[test]
fn test_empty_nodes_stay_a_list() {
    let msg = DialogMessage::CloseView {
        outcome: Outcome::Accept(payload(AudioConstraint::Off, Some(vec![]))),
    };
    assert_eq!(to_json(&msg)["outcome"]["selectedAudioNodes"], json!([]));
}

#[test]
fn test_rejections_json_format() {
    let reason = DialogMessage::CloseView {
        outcome: Outcome::cancelled(),
    };
    assert_eq!(to_json(&reason)["outcome"], json!("Permission denied"));

    let error = DialogMessage::CloseView {
        outcome: Outcome::error(&capturer_core::CapturerError::EnumerationFailure),
    };
    assert_eq!(
        to_json(&error)["outcome"],
        json!({"message": "Unknown sources list."})
    );
}

#[test]
fn test_outcome_roundtrip_keeps_variant() {
    for outcome in [
        Outcome::Accept(payload(AudioConstraint::Desktop, Some(vec!["a", "b"]))),
        Outcome::Accept(payload(AudioConstraint::Off, None)),
        Outcome::reason("Permission denied"),
        Outcome::Reject(Rejection::Error {
            message: "boom".into(),
        }),
    ] {
        let msg = DialogMessage::CloseView {
            outcome: outcome.clone(),
        };
        let bytes = msg.to_bytes();
        let parsed = DialogMessage::from_bytes(&bytes[..bytes.len() - 1]).expect("Should parse");
        assert_eq!(parsed, msg);
    }
}

#[test]
fn test_sources_reply_parsing() {
    let raw = br#"{"type":"sources","list":{"sources":[{"id":"screen:0","name":"Entire Screen","thumbnail":"data:image/png;base64,AA=="}],"audioForced":true,"audioNodes":["node:1"]}}"#;
    let reply = HostReply::from_bytes(raw).expect("Should parse");
    let HostReply::Sources { list: Some(list) } = reply else {
        panic!("Expected sources reply");
    };
    assert!(list.audio_forced);
    assert_eq!(list.audio_nodes, Some(vec!["node:1".to_string()]));
    assert_eq!(list.sources[0].thumbnail.to_data_url(), "data:image/png;base64,AA==");
    assert!(list.sources[0].app_icon.is_none());
}

#[test]
fn test_null_sources_reply() {
    let reply = HostReply::from_bytes(br#"{"type":"sources","list":null}"#).expect("Should parse");
    assert_eq!(reply, HostReply::Sources { list: None });
}

#[test]
fn test_minimal_source_list_defaults() {
    let list: SourceList =
        serde_json::from_str(r#"{"sources":[{"id":"window:1:0","name":"Editor"}]}"#)
            .expect("Should parse");
    assert!(!list.audio_forced);
    assert!(list.audio_nodes.is_none());
    assert_eq!(list.find("window:1:0"), Some(&VideoSource::new("window:1:0", "Editor")));
}

#[test]
fn test_audio_settings_reply() {
    let reply = HostReply::AudioSettings(AudioSettings { audio: true });
    let bytes = reply.to_bytes();
    let text = std::str::from_utf8(&bytes[..bytes.len() - 1]).expect("Should be valid UTF-8");
    assert_eq!(text, r#"{"type":"audioSettings","audio":true}"#);
}

#[test]
fn test_audio_constraint_accepts_true() {
    let audio: AudioConstraint = serde_json::from_str("true").expect("Should parse");
    assert_eq!(audio, AudioConstraint::Desktop);
}

#[test]
fn test_invalid_message_parsing() {
    assert!(DialogMessage::from_bytes(b"not valid json").is_err());
    assert!(HostReply::from_bytes(br#"{"type":"nope"}"#).is_err());
}

#[test]
fn test_bytes_have_newline_terminator() {
    assert_eq!(DialogMessage::GetSources.to_bytes().last(), Some(&b'\n'));
    assert_eq!(HostReply::error("x").to_bytes().last(), Some(&b'\n'));
}
