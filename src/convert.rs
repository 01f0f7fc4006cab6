//! Conversions between the two wire shapes.
//!
//! The source-cluster (public) API and the destination-cluster (internal)
//! API use structurally identical but nominally distinct blob and
//! replication-info types. These crossings are the only place a value
//! changes sides, which keeps accidental cross-wiring out of the traversal
//! code.
//!
//! Blob conversion is identity on `(encoding_type, data)`; an encoding tag
//! this component doesn't recognize fails instead of passing through.
//! Replication-info conversion is identity on keys and scalar fields and
//! cannot fail.

use std::collections::HashMap;

use crate::apply;
use crate::error::{RereplicationError, Result};
use crate::source;

/// Convert a public blob into the internal shape.
pub fn data_blob_from_source(blob: &source::DataBlob) -> Result<apply::DataBlob> {
    let encoding_type = match blob.encoding_type {
        source::EncodingType::Bincode => apply::EncodingType::Bincode,
        source::EncodingType::Json => {
            return Err(RereplicationError::Encoding(
                "unrecognized public blob encoding: json".to_string(),
            ))
        }
    };
    Ok(apply::DataBlob {
        encoding_type,
        data: blob.data.clone(),
    })
}

/// Convert an internal blob into the public shape.
pub fn data_blob_to_source(blob: &apply::DataBlob) -> Result<source::DataBlob> {
    let encoding_type = match blob.encoding_type {
        apply::EncodingType::Bincode => source::EncodingType::Bincode,
        apply::EncodingType::Json => {
            return Err(RereplicationError::Encoding(
                "unrecognized internal blob encoding: json".to_string(),
            ))
        }
    };
    Ok(source::DataBlob {
        encoding_type,
        data: blob.data.clone(),
    })
}

/// Convert a public replication-info map into the internal shape.
pub fn replication_info_from_source(
    info: &HashMap<String, source::ReplicationInfo>,
) -> HashMap<String, apply::ReplicationInfo> {
    info.iter()
        .map(|(cluster, entry)| {
            (
                cluster.clone(),
                apply::ReplicationInfo {
                    version: entry.version,
                    last_event_id: entry.last_event_id,
                },
            )
        })
        .collect()
}

/// Convert an internal replication-info map into the public shape.
pub fn replication_info_to_source(
    info: &HashMap<String, apply::ReplicationInfo>,
) -> HashMap<String, source::ReplicationInfo> {
    info.iter()
        .map(|(cluster, entry)| {
            (
                cluster.clone(),
                source::ReplicationInfo {
                    version: entry.version,
                    last_event_id: entry.last_event_id,
                },
            )
        })
        .collect()
}
