//! Event batch serialization.
//!
//! Re-replication transports history as opaque blobs and only decodes a
//! batch when it needs to read a run link: the back-link on a started event
//! or the forward link on a continued-as-new event. [`HistorySerializer`]
//! is that decoding seam; the production implementation is
//! [`BincodeHistorySerializer`], the compact binary encoding the platform
//! stamps as [`EncodingType::Bincode`].
//!
//! Blobs tagged with any other encoding fail with an encoding error rather
//! than being guessed at.

use crate::apply::{DataBlob, EncodingType};
use crate::error::{RereplicationError, Result};
use crate::event::HistoryEvent;

/// Serialize and deserialize batches of history events.
///
/// Implementations must be safe for concurrent use; the re-replicator
/// shares one instance across all in-flight calls.
pub trait HistorySerializer: Send + Sync {
    /// Encode an ordered batch of events under the given encoding tag.
    fn serialize_batch(&self, events: &[HistoryEvent], encoding: EncodingType)
        -> Result<DataBlob>;

    /// Decode a blob back into its ordered batch of events.
    fn deserialize_batch(&self, blob: &DataBlob) -> Result<Vec<HistoryEvent>>;
}

/// Bincode-backed serializer for the recognized binary encoding.
#[derive(Debug, Default, Clone)]
pub struct BincodeHistorySerializer;

impl BincodeHistorySerializer {
    pub fn new() -> Self {
        Self
    }
}

impl HistorySerializer for BincodeHistorySerializer {
    fn serialize_batch(
        &self,
        events: &[HistoryEvent],
        encoding: EncodingType,
    ) -> Result<DataBlob> {
        match encoding {
            EncodingType::Bincode => {
                let data = bincode::serialize(events)
                    .map_err(|e| RereplicationError::Encoding(e.to_string()))?;
                Ok(DataBlob {
                    encoding_type: EncodingType::Bincode,
                    data,
                })
            }
            other => Err(RereplicationError::Encoding(format!(
                "unsupported encoding: {:?}",
                other
            ))),
        }
    }

    fn deserialize_batch(&self, blob: &DataBlob) -> Result<Vec<HistoryEvent>> {
        match blob.encoding_type {
            EncodingType::Bincode => bincode::deserialize(&blob.data)
                .map_err(|e| RereplicationError::Encoding(e.to_string())),
            other => Err(RereplicationError::Encoding(format!(
                "unsupported encoding: {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;

    fn sample_batch() -> Vec<HistoryEvent> {
        vec![
            HistoryEvent::started(1, 123, 1_700_000_000_000_000_000, Some("prev-run".into())),
            HistoryEvent::new(2, 123, 1_700_000_000_000_000_001, EventType::DecisionTaskScheduled),
            HistoryEvent::continued_as_new(3, 123, 1_700_000_000_000_000_002, "next-run"),
        ]
    }

    #[test]
    fn test_serialize_then_deserialize() {
        let serializer = BincodeHistorySerializer::new();
        let batch = sample_batch();

        let blob = serializer
            .serialize_batch(&batch, EncodingType::Bincode)
            .unwrap();
        assert_eq!(blob.encoding_type, EncodingType::Bincode);
        assert!(!blob.data.is_empty());

        let decoded = serializer.deserialize_batch(&blob).unwrap();
        assert_eq!(decoded, batch);
    }

    #[test]
    fn test_serialize_rejects_json_tag() {
        let serializer = BincodeHistorySerializer::new();
        let err = serializer
            .serialize_batch(&sample_batch(), EncodingType::Json)
            .unwrap_err();
        assert!(matches!(err, RereplicationError::Encoding(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_deserialize_rejects_json_tag() {
        let serializer = BincodeHistorySerializer::new();
        let blob = DataBlob {
            encoding_type: EncodingType::Json,
            data: b"[]".to_vec(),
        };
        let err = serializer.deserialize_batch(&blob).unwrap_err();
        assert!(matches!(err, RereplicationError::Encoding(_)));
    }

    #[test]
    fn test_deserialize_rejects_malformed_payload() {
        let serializer = BincodeHistorySerializer::new();
        let blob = DataBlob::bincode(b"definitely not a batch".to_vec());
        let err = serializer.deserialize_batch(&blob).unwrap_err();
        assert!(matches!(err, RereplicationError::Encoding(_)));
    }

    #[test]
    fn test_empty_batch_round_trips() {
        let serializer = BincodeHistorySerializer::new();
        let blob = serializer
            .serialize_batch(&[], EncodingType::Bincode)
            .unwrap();
        let decoded = serializer.deserialize_batch(&blob).unwrap();
        assert!(decoded.is_empty());
    }
}
