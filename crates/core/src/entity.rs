//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether the entity is visible to normal reads.
    ///
    /// Soft-deleted entities stay physically stored but report `false` here.
    fn is_live(&self) -> bool {
        true
    }
}
