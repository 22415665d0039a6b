// Unit tests for delimiter framing

use serde::{Deserialize, Serialize};
use tasks_service::core::errors::TasksError;
use tasks_service::store::framing::{decode_frames, encode_frame, TASK_DELIMITER};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Note {
    body: String,
}

#[test]
fn test_framing_is_record_type_agnostic() {
    let mut contents = String::new();
    contents.push_str(&encode_frame(&Note { body: "one".to_string() }).unwrap());
    contents.push_str(&encode_frame(&Note { body: "two".to_string() }).unwrap());

    assert!(contents.ends_with(TASK_DELIMITER));
    let notes: Vec<Note> = decode_frames(&contents).unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[1].body, "two");
}

#[test]
fn test_whitespace_chunk_is_skipped() {
    let contents = format!("{{\"body\":\"one\"}}{d}\n{d}", d = TASK_DELIMITER);
    let notes: Vec<Note> = decode_frames(&contents).unwrap();
    assert_eq!(notes, vec![Note { body: "one".to_string() }]);
}

#[test]
fn test_wrong_shape_is_corruption() {
    let contents = format!("{{\"title\":\"x\"}}{}", TASK_DELIMITER);
    let result = decode_frames::<Note>(&contents);
    assert!(matches!(result, Err(TasksError::StoreCorruption { index: 0, offset: 0, .. })));
}
