//! The storage interface shared by every resource.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use tasknest_core::error::Result;
use tasknest_core::types::{Todo, User};

/// A persistable record with a stable identity.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: PartialEq + Debug + Send + Sync;

    fn id(&self) -> &Self::Id;

    /// Numeric position in the id sequence, for records whose ids come from
    /// [`Store::allocate_id`].
    fn sequence(&self) -> Option<u64> {
        None
    }
}

impl Record for User {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }
}

impl Record for Todo {
    type Id = u64;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn sequence(&self) -> Option<u64> {
        Some(self.id)
    }
}

/// Result of a conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<R> {
    /// The write happened; carries the record as stored.
    Written(R),
    /// No record has the requested id.
    Missing,
    /// Another record conflicts; nothing was written.
    Conflict,
}

impl<R> WriteOutcome<R> {
    pub fn into_written(self) -> Option<R> {
        match self {
            WriteOutcome::Written(r) => Some(r),
            _ => None,
        }
    }
}

/// A collection of records of one kind.
///
/// Every method is atomic with respect to every other method on the same
/// store: the conditional writes re-check their condition under the same
/// critical section that performs the write, so check-then-act races between
/// concurrent requests cannot slip a duplicate in.
pub trait Store<R: Record>: Send + Sync {
    /// Every record, in insertion order.
    fn list(&self) -> Result<Vec<R>>;

    /// First record matching `predicate`.
    fn find(&self, predicate: &dyn Fn(&R) -> bool) -> Result<Option<R>>;

    /// Append `record` unconditionally.
    fn insert(&self, record: R) -> Result<R>;

    /// Append `record` unless an existing record satisfies `conflicts`.
    fn insert_unique(&self, record: R, conflicts: &dyn Fn(&R) -> bool) -> Result<WriteOutcome<R>>;

    /// Apply `mutate` to the record with `id`.
    fn update(&self, id: &R::Id, mutate: &mut dyn FnMut(&mut R)) -> Result<Option<R>>;

    /// Apply `mutate` to the record with `id` unless some *other* record
    /// satisfies `conflicts`.
    fn update_unique(
        &self,
        id: &R::Id,
        conflicts: &dyn Fn(&R) -> bool,
        mutate: &mut dyn FnMut(&mut R),
    ) -> Result<WriteOutcome<R>>;

    /// Remove and return the record with `id`.
    fn delete(&self, id: &R::Id) -> Result<Option<R>>;

    /// Next value of a monotonically increasing id sequence, starting at 1.
    /// Values are never handed out twice, even after the records holding
    /// them are deleted.
    fn allocate_id(&self) -> Result<u64>;

    /// Discard in-memory state and re-read from the backing storage.
    fn reload(&self) -> Result<()>;
}
