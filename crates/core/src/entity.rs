//! Entity trait: the common face of roles and users.

/// Named, activatable directory record. Listing filters match on this.
pub trait Entity {
    /// Human-readable name, unique per entity kind for roles and users.
    fn name(&self) -> &str;

    fn is_active(&self) -> bool;
}
