use std::cmp::Reverse;

use crate::document::EditRequest;

/// Order a batch so that no edit moves the offsets another still relies on.
///
/// Positional edits run highest offset first. A stable sort keeps emission
/// order among equal offsets. Document-wide replacements have no offset and
/// run last.
pub fn sequence_requests(mut requests: Vec<EditRequest>) -> Vec<EditRequest> {
    requests.sort_by_key(|request| match request.offset_key() {
        Some(offset) => (0, Reverse(offset)),
        None => (1, Reverse(0)),
    });
    requests
}
