//! Property-based tests using proptest.
//!
//! These verify invariants that should hold for all inputs: per-run bound
//! derivation and the identity nature of the wire-shape conversions.

use std::collections::HashMap;

use proptest::prelude::*;

use history_rereplicator::codec::{BincodeHistorySerializer, HistorySerializer};
use history_rereplicator::convert::{
    data_blob_from_source, data_blob_to_source, replication_info_from_source,
    replication_info_to_source,
};
use history_rereplicator::event::{END_EVENT_ID, FIRST_EVENT_ID};
use history_rereplicator::range::event_id_range;
use history_rereplicator::{apply, source};

proptest! {
    /// When the span stays within one run, the caller's bounds pass
    /// through untouched regardless of how they relate to the sentinels.
    #[test]
    fn same_run_span_bounds_pass_through(
        begin_event_id in any::<i64>(),
        end_event_id in any::<i64>(),
    ) {
        let (first, next) =
            event_id_range("run-1", "run-1", begin_event_id, "run-1", end_event_id);
        prop_assert_eq!(first, begin_event_id);
        prop_assert_eq!(next, end_event_id);
    }

    /// The begin run of a multi-run span is unbounded above.
    #[test]
    fn begin_run_is_unbounded_above(begin_event_id in any::<i64>(), end_event_id in any::<i64>()) {
        let (first, next) =
            event_id_range("run-1", "run-1", begin_event_id, "run-2", end_event_id);
        prop_assert_eq!(first, begin_event_id);
        prop_assert_eq!(next, END_EVENT_ID);
    }

    /// The end run of a multi-run span starts at the first event.
    #[test]
    fn end_run_starts_at_first_event(begin_event_id in any::<i64>(), end_event_id in any::<i64>()) {
        let (first, next) =
            event_id_range("run-2", "run-1", begin_event_id, "run-2", end_event_id);
        prop_assert_eq!(first, FIRST_EVENT_ID);
        prop_assert_eq!(next, end_event_id);
    }

    /// Intermediate runs are always wanted whole, whatever the span bounds.
    #[test]
    fn intermediate_run_is_wanted_whole(
        current in "[a-f0-9]{8}",
        begin_event_id in any::<i64>(),
        end_event_id in any::<i64>(),
    ) {
        let (first, next) =
            event_id_range(&current, "run-1", begin_event_id, "run-2", end_event_id);
        prop_assert_eq!(first, FIRST_EVENT_ID);
        prop_assert_eq!(next, END_EVENT_ID);
    }

    /// Blob conversion is a two-way identity on the recognized encoding.
    #[test]
    fn blob_conversion_round_trips(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let public = source::DataBlob::bincode(data.clone());
        let internal = data_blob_from_source(&public).unwrap();
        prop_assert_eq!(&internal.data, &data);
        let back = data_blob_to_source(&internal).unwrap();
        prop_assert_eq!(back, public);
    }

    /// Replication-info conversion is identity on keys and fields in both
    /// directions.
    #[test]
    fn replication_info_conversion_round_trips(
        entries in proptest::collection::hash_map(
            "[a-z]{1,12}",
            (any::<i64>(), any::<i64>()),
            0..8,
        )
    ) {
        let public: HashMap<String, source::ReplicationInfo> = entries
            .iter()
            .map(|(cluster, (version, last_event_id))| {
                (
                    cluster.clone(),
                    source::ReplicationInfo {
                        version: *version,
                        last_event_id: *last_event_id,
                    },
                )
            })
            .collect();

        let internal = replication_info_from_source(&public);
        prop_assert_eq!(internal.len(), public.len());
        for (cluster, entry) in &public {
            prop_assert_eq!(internal[cluster].version, entry.version);
            prop_assert_eq!(internal[cluster].last_event_id, entry.last_event_id);
        }

        let back = replication_info_to_source(&internal);
        prop_assert_eq!(back, public);
    }

    /// Arbitrary bytes never panic the deserializer; they either decode or
    /// fail with an encoding error.
    #[test]
    fn deserializer_is_total_on_garbage(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let serializer = BincodeHistorySerializer::new();
        let blob = apply::DataBlob::bincode(data);
        let _ = serializer.deserialize_batch(&blob);
    }
}
