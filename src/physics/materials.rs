use std::collections::HashMap;

use bevy_rapier3d::rapier::prelude::*;

/// Material tag carried by every collider (stored in the collider's `user_data`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u16);

impl MaterialId {
    pub const TRACK: MaterialId = MaterialId(1);
    pub const BALL: MaterialId = MaterialId(2);

    pub fn to_user_data(self) -> u128 {
        self.0 as u128
    }

    /// Colliders without a recognisable tag resolve to `None`.
    pub fn from_user_data(data: u128) -> Option<Self> {
        u16::try_from(data).ok().filter(|v| *v != 0).map(MaterialId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.0,
        }
    }
}

/// Unordered material pair -> contact coefficients.
///
/// Installed as the pipeline's physics hooks: every solver contact between two tagged colliders
/// gets the pair's coefficients, whichever collider the narrow phase lists first.
#[derive(Debug, Clone, Default)]
pub struct ContactMaterialTable {
    pairs: HashMap<(MaterialId, MaterialId), ContactMaterial>,
    default: ContactMaterial,
}

#[inline]
fn key(a: MaterialId, b: MaterialId) -> (MaterialId, MaterialId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl ContactMaterialTable {
    pub fn with_default(default: ContactMaterial) -> Self {
        Self {
            pairs: HashMap::new(),
            default,
        }
    }

    pub fn insert(&mut self, a: MaterialId, b: MaterialId, material: ContactMaterial) {
        self.pairs.insert(key(a, b), material);
    }

    pub fn get(&self, a: MaterialId, b: MaterialId) -> ContactMaterial {
        self.pairs.get(&key(a, b)).copied().unwrap_or(self.default)
    }

    pub fn default_material(&self) -> ContactMaterial {
        self.default
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn resolve(&self, c1: Option<&Collider>, c2: Option<&Collider>) -> ContactMaterial {
        let tag = |c: Option<&Collider>| c.and_then(|c| MaterialId::from_user_data(c.user_data));
        match (tag(c1), tag(c2)) {
            (Some(a), Some(b)) => self.get(a, b),
            _ => self.default,
        }
    }
}

impl PhysicsHooks for ContactMaterialTable {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let m = self.resolve(
            context.colliders.get(context.collider1),
            context.colliders.get(context.collider2),
        );
        for contact in context.solver_contacts.iter_mut() {
            contact.friction = m.friction;
            contact.restitution = m.restitution;
        }
    }
}
