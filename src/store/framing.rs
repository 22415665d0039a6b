// Delimiter framing for the task log
//
// File layout: ser(r1) DELIM ser(r2) DELIM ... ser(rn) DELIM
//
// There is no escaping. A record whose serialized form contains the delimiter
// would silently split into two broken chunks, so encode_frame refuses it.

use crate::core::errors::TasksError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Marker separating records in the task log
pub const TASK_DELIMITER: &str = "TASK_SPLIT";

/// Serialize one record and append the delimiter
pub fn encode_frame<T: Serialize>(record: &T) -> Result<String, TasksError> {
    let mut frame = serde_json::to_string(record)
        .map_err(|e| TasksError::Validation(format!("Record cannot be serialized: {}", e)))?;

    if frame.contains(TASK_DELIMITER) {
        return Err(TasksError::Validation(format!(
            "Record must not contain the reserved marker '{}'",
            TASK_DELIMITER
        )));
    }

    frame.push_str(TASK_DELIMITER);
    Ok(frame)
}

/// Decode every record in `contents`, in file order.
///
/// Empty or whitespace-only chunks (the dangling piece after the final
/// delimiter, or a doubled delimiter) carry no record and are skipped. A final
/// chunk without a trailing delimiter is decoded like any other.
///
/// The first chunk that fails to decode aborts the whole read: the caller gets
/// `StoreCorruption` with the chunk index and byte offset, never a partial list.
pub fn decode_frames<T: DeserializeOwned>(contents: &str) -> Result<Vec<T>, TasksError> {
    let mut records = Vec::new();
    let mut offset = 0;

    for (index, chunk) in contents.split(TASK_DELIMITER).enumerate() {
        let chunk_offset = offset;
        offset += chunk.len() + TASK_DELIMITER.len();

        if chunk.trim().is_empty() {
            continue;
        }

        let record = serde_json::from_str(chunk).map_err(|e| TasksError::StoreCorruption {
            index,
            offset: chunk_offset,
            reason: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Decode raw file bytes, reporting invalid UTF-8 as corruption
pub fn decode_bytes<T: DeserializeOwned>(bytes: Vec<u8>) -> Result<Vec<T>, TasksError> {
    let contents = String::from_utf8(bytes).map_err(|e| {
        let valid_up_to = e.utf8_error().valid_up_to();
        let index = e.as_bytes()[..valid_up_to]
            .windows(TASK_DELIMITER.len())
            .filter(|w| *w == TASK_DELIMITER.as_bytes())
            .count();
        TasksError::StoreCorruption {
            index,
            offset: valid_up_to,
            reason: "invalid UTF-8".to_string(),
        }
    })?;

    decode_frames(&contents)
}
