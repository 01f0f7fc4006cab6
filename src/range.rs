//! Per-run event-bound derivation.
//!
//! A multi-run span is delimited by `(begin_run_id, begin_event_id)` and
//! `(end_run_id, end_event_id)`. Only the boundary runs are partial: the
//! begin run starts at the caller's first event, the end run stops at the
//! caller's bound, and every run in between is wanted whole. All bounds are
//! the half-open `[first_event_id, next_event_id)` convention of the
//! raw-history RPC.

use crate::event::{END_EVENT_ID, FIRST_EVENT_ID};

/// Derive the `(first_event_id, next_event_id)` fetch range for one run of
/// a multi-run span.
///
/// | `current_run_id` is … | range |
/// |---|---|
/// | the only run (begin == end) | `(begin_event_id, end_event_id)` |
/// | the begin run of a chain | `(begin_event_id, END_EVENT_ID)` |
/// | the end run of a chain | `(FIRST_EVENT_ID, end_event_id)` |
/// | an intermediate run | `(FIRST_EVENT_ID, END_EVENT_ID)` |
pub fn event_id_range(
    current_run_id: &str,
    begin_run_id: &str,
    begin_event_id: i64,
    end_run_id: &str,
    end_event_id: i64,
) -> (i64, i64) {
    if begin_run_id == end_run_id {
        return (begin_event_id, end_event_id);
    }
    if current_run_id == begin_run_id {
        return (begin_event_id, END_EVENT_ID);
    }
    if current_run_id == end_run_id {
        return (FIRST_EVENT_ID, end_event_id);
    }
    (FIRST_EVENT_ID, END_EVENT_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEGIN_RUN: &str = "00001111-2222-3333-4444-555566667777";
    const END_RUN: &str = "00001111-2222-3333-4444-555566668888";

    #[test]
    fn test_begin_run_of_chain() {
        let (first, next) = event_id_range(BEGIN_RUN, BEGIN_RUN, 144, END_RUN, 1);
        assert_eq!(first, 144);
        assert_eq!(next, END_EVENT_ID);
    }

    #[test]
    fn test_intermediate_run_of_chain() {
        let (first, next) = event_id_range("some other run", BEGIN_RUN, 144, END_RUN, 1);
        assert_eq!(first, FIRST_EVENT_ID);
        assert_eq!(next, END_EVENT_ID);
    }

    #[test]
    fn test_end_run_of_chain() {
        let (first, next) = event_id_range(END_RUN, BEGIN_RUN, 144, END_RUN, 1);
        assert_eq!(first, FIRST_EVENT_ID);
        assert_eq!(next, 1);
    }

    #[test]
    fn test_single_run_span() {
        // When begin and end are the same run the caller's bounds pass
        // through untouched, sentinels or not.
        let (first, next) = event_id_range(BEGIN_RUN, BEGIN_RUN, 144, BEGIN_RUN, 244);
        assert_eq!(first, 144);
        assert_eq!(next, 244);
    }

    #[test]
    fn test_single_run_span_with_sentinels() {
        let (first, next) = event_id_range(
            BEGIN_RUN,
            BEGIN_RUN,
            FIRST_EVENT_ID,
            BEGIN_RUN,
            END_EVENT_ID,
        );
        assert_eq!(first, FIRST_EVENT_ID);
        assert_eq!(next, END_EVENT_ID);
    }
}
