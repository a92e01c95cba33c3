use core::any::{Any, TypeId};
use core::fmt;
use std::collections::HashMap;

use crate::Dst;

/// A request-scoped carrier for values resolved earlier in a call chain.
///
/// Entries are keyed by their concrete type, so a value can only be read
/// back through the same type that stored it — callers cannot forge or
/// overwrite entries they do not know the type of, and there is no
/// global mutable state involved.
///
/// Its main use is handing a resolved [`Dst`] down a call chain so lower
/// layers do not have to recompute (or cannot recompute, lacking the
/// sharder) the destination:
///
/// ```
/// use snowshard::{Dst, ShardContext};
///
/// let dst = Dst {
///     db_suffix: 0,
///     tb_suffix: 0,
///     db: "db_0".into(),
///     tb: "table_0".into(),
/// };
///
/// let ctx = ShardContext::new().with_dst(dst.clone());
/// assert_eq!(ctx.dst(), Some(&dst));
/// assert_eq!(ShardContext::new().dst(), None);
/// ```
#[derive(Default)]
pub struct ShardContext {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ShardContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under its type, replacing any previous value of
    /// the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a previously stored value of type `T`, if any.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref())
    }

    /// Builder-style variant of [`insert`](Self::insert) for a [`Dst`].
    pub fn with_dst(mut self, dst: Dst) -> Self {
        self.insert(dst);
        self
    }

    /// Returns the attached destination, if one was set.
    pub fn dst(&self) -> Option<&Dst> {
        self.get::<Dst>()
    }
}

impl fmt::Debug for ShardContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardContext")
            .field("entries", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dst(db_suffix: u64) -> Dst {
        Dst {
            db_suffix,
            tb_suffix: 0,
            db: format!("db_{db_suffix}"),
            tb: "table_0".into(),
        }
    }

    #[test]
    fn empty_context_has_no_destination() {
        assert_eq!(ShardContext::new().dst(), None);
    }

    #[test]
    fn attached_destination_is_retrievable() {
        let ctx = ShardContext::new().with_dst(sample_dst(3));
        assert_eq!(ctx.dst(), Some(&sample_dst(3)));
    }

    #[test]
    fn later_insert_replaces_the_earlier_one() {
        let mut ctx = ShardContext::new().with_dst(sample_dst(1));
        ctx.insert(sample_dst(2));
        assert_eq!(ctx.dst(), Some(&sample_dst(2)));
    }

    #[test]
    fn entries_are_isolated_by_type() {
        let mut ctx = ShardContext::new().with_dst(sample_dst(1));
        ctx.insert(7u32);

        assert_eq!(ctx.get::<u32>(), Some(&7));
        assert_eq!(ctx.get::<u64>(), None);
        assert_eq!(ctx.dst(), Some(&sample_dst(1)));
    }
}
