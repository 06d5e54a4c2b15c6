use fxhash::FxHashSet;

/// Symmetric relation over entity type tags deciding which pairs are tested.
///
/// An unrestricted relation (the default) allows every pair.
#[derive(Debug, Clone, Default)]
pub struct CollisionGroups {
    pairs: FxHashSet<(u32, u32)>,
    denied: FxHashSet<(u32, u32)>,
    restricted: bool,
}

#[inline(always)]
fn key(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl CollisionGroups {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn none() -> Self {
        Self {
            restricted: true,
            ..Self::default()
        }
    }

    pub fn from_pairs<I: IntoIterator<Item = (u32, u32)>>(pairs: I) -> Self {
        let mut groups = Self::none();
        for (a, b) in pairs {
            groups.allow(a, b);
        }
        groups
    }

    pub fn with(mut self, a: u32, b: u32) -> Self {
        self.allow(a, b);
        self
    }

    /// Lets `a`/`b` collide. On an unrestricted relation this only undoes an
    /// earlier `disallow`; start from `none()` for an allow-list.
    pub fn allow(&mut self, a: u32, b: u32) {
        self.denied.remove(&key(a, b));
        if self.restricted {
            self.pairs.insert(key(a, b));
        }
    }

    /// Excludes `a`/`b` without restricting the rest of the relation.
    pub fn disallow(&mut self, a: u32, b: u32) {
        self.pairs.remove(&key(a, b));
        self.denied.insert(key(a, b));
    }

    /// Lets `entity_type` collide with each of `others`.
    pub fn set_groups(&mut self, entity_type: u32, others: &[u32]) {
        for &other in others {
            self.allow(entity_type, other);
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    #[inline(always)]
    pub fn allows(&self, a: u32, b: u32) -> bool {
        let pair = key(a, b);
        (!self.restricted || self.pairs.contains(&pair)) && !self.denied.contains(&pair)
    }
}
