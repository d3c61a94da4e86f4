//! Decision: is a derivative run needed at all?

use crate::domain::{DatastreamId, Pid};
use crate::ports::ObjectStore;

/// True when the derivative is absent, or when regeneration is forced.
///
/// Pure read; nothing is written.
pub fn should_generate(
    store: &dyn ObjectStore,
    pid: &Pid,
    derivative: &DatastreamId,
    force: bool,
) -> bool {
    force || !store.has_datastream(pid, derivative)
}
