//! Collision fix-up applied to placed walls and the shared floor.

use mazewright_core::{ColliderShape, FloorSurface, WallPrototype};

/// Volume attached to wall instances whose prototype carries none.
pub(crate) const DEFAULT_WALL_COLLIDER: ColliderShape = ColliderShape::Box;

/// Volume attached to a floor that carries none. Static geometry stays non-convex.
pub(crate) const DEFAULT_FLOOR_COLLIDER: ColliderShape = ColliderShape::Mesh { convex: false };

/// Collider every instance of `prototype` must carry.
pub(crate) fn wall_collider(prototype: &WallPrototype) -> ColliderShape {
    prototype.collider.unwrap_or(DEFAULT_WALL_COLLIDER)
}

/// Attaches [`DEFAULT_FLOOR_COLLIDER`] when the floor has no collider.
///
/// Returns the attached shape, or `None` when the floor was already collidable.
pub(crate) fn ensure_floor_collider(floor: &mut FloorSurface) -> Option<ColliderShape> {
    if floor.collider.is_some() {
        return None;
    }

    floor.collider = Some(DEFAULT_FLOOR_COLLIDER);
    log::info!("floor surface had no collider; attached static mesh collider");
    Some(DEFAULT_FLOOR_COLLIDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prototype_collider_is_kept() {
        let prototype = WallPrototype {
            collider: Some(ColliderShape::Mesh { convex: true }),
            ..WallPrototype::default()
        };
        assert_eq!(wall_collider(&prototype), ColliderShape::Mesh { convex: true });
    }

    #[test]
    fn bare_prototype_gets_a_box() {
        assert_eq!(wall_collider(&WallPrototype::default()), ColliderShape::Box);
    }

    #[test]
    fn floor_repair_is_idempotent() {
        let mut floor = FloorSurface::default();
        assert_eq!(ensure_floor_collider(&mut floor), Some(DEFAULT_FLOOR_COLLIDER));
        assert_eq!(floor.collider, Some(ColliderShape::Mesh { convex: false }));
        assert_eq!(ensure_floor_collider(&mut floor), None);
    }
}
