//! Call-site deduplication decisions

use std::collections::hash_map::Entry;

use super::{gen_hash, HistoryRecord, RecordHistory, RecordMode};
use crate::domain::CallerInfo;

/// Allow a message only the first time its call site runs.
///
/// Only the call site gates the decision; the message is hashed and stored
/// but later messages are suppressed whatever their content.
pub fn log_once(history: &RecordHistory, site: &CallerInfo, msg: &str) -> bool {
    let id = gen_hash(&site.site_key());
    history.with_records(|records| match records.entry(id) {
        Entry::Occupied(_) => false,
        Entry::Vacant(slot) => {
            slot.insert(HistoryRecord {
                msg_hash: gen_hash(msg),
                mode: RecordMode::LogOnce,
            });
            true
        }
    })
}

/// Allow a message when it differs from the last one allowed at its call site.
pub fn log_on_change(history: &RecordHistory, site: &CallerInfo, msg: &str) -> bool {
    let id = gen_hash(&site.site_key());
    let msg_hash = gen_hash(msg);
    history.with_records(|records| match records.entry(id) {
        Entry::Occupied(mut slot) => {
            let record = slot.get_mut();
            if record.msg_hash == msg_hash {
                return false;
            }
            record.msg_hash = msg_hash;
            true
        }
        Entry::Vacant(slot) => {
            slot.insert(HistoryRecord {
                msg_hash,
                mode: RecordMode::LogOnChange,
            });
            true
        }
    })
}
