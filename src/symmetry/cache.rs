use std::collections::HashMap;

use super::catalog::WallpaperGroup;
use super::set::AffineTransformSet;
use super::tiling::generate_tiling;
use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::error::SymmetryError;

/// Full argument tuple of one tiling request. Floats are keyed by bit
/// pattern, so any differing value is a distinct key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilingKey {
    group: WallpaperGroup,
    nx: i32,
    ny: i32,
    d: u32,
    t: u32,
    x: u32,
    y: u32,
}

impl TilingKey {
    pub fn new(group: WallpaperGroup, nx: i32, ny: i32, d: f32, t: f32, x: f32, y: f32) -> Self {
        Self {
            group,
            nx,
            ny,
            d: d.to_bits(),
            t: t.to_bits(),
            x: x.to_bits(),
            y: y.to_bits(),
        }
    }
}

/// Memoizes tilings by their full parameter tuple, evicting the least
/// recently used entries once the capacity is exceeded.
#[derive(Debug)]
pub struct TransformCache {
    /// Cached tilings by parameter tuple
    entries: HashMap<TilingKey, AffineTransformSet>,
    /// Generation at which each entry was last used
    last_used: HashMap<TilingKey, u64>,
    /// Bumped on every lookup for LRU tracking
    generation: u64,
    /// Maximum number of tilings to keep
    max_entries: usize,
    misses: u64,
}

impl Default for TransformCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl TransformCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            last_used: HashMap::new(),
            generation: 0,
            max_entries: max_entries.max(1),
            misses: 0,
        }
    }

    /// Returns the tiling for the given tuple, generating it on a miss.
    #[allow(clippy::too_many_arguments)]
    pub fn get_or_generate(
        &mut self,
        group: WallpaperGroup,
        nx: i32,
        ny: i32,
        d: f32,
        t: f32,
        x: f32,
        y: f32,
    ) -> Result<AffineTransformSet, SymmetryError> {
        self.generation += 1;
        let key = TilingKey::new(group, nx, ny, d, t, x, y);

        if let Some(set) = self.entries.get(&key) {
            self.last_used.insert(key, self.generation);
            return Ok(set.clone());
        }

        self.misses += 1;
        let set = generate_tiling(group.spec(), nx, ny, d, t, x, y)?;
        self.entries.insert(key, set.clone());
        self.last_used.insert(key, self.generation);
        self.prune_if_needed();

        Ok(set)
    }

    /// Resolves `name` against the catalog, then goes through the cache.
    #[allow(clippy::too_many_arguments)]
    pub fn generate_symmetry(
        &mut self,
        name: &str,
        nx: i32,
        ny: i32,
        d: f32,
        t: f32,
        x: f32,
        y: f32,
    ) -> Result<AffineTransformSet, SymmetryError> {
        let group: WallpaperGroup = name.parse()?;
        self.get_or_generate(group, nx, ny, d, t, x, y)
    }

    fn prune_if_needed(&mut self) {
        if self.entries.len() <= self.max_entries {
            return;
        }

        let mut by_age: Vec<(TilingKey, u64)> =
            self.last_used.iter().map(|(k, g)| (*k, *g)).collect();
        by_age.sort_by_key(|(_, generation)| *generation);

        let to_remove = by_age.len() - self.max_entries;
        for (key, _) in by_age.iter().take(to_remove) {
            self.entries.remove(key);
            self.last_used.remove(key);
        }
    }

    pub fn contains(&self, key: &TilingKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_used.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of requests that had to run the generator.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit() {
        let mut cache = TransformCache::new(10);
        let first = cache
            .get_or_generate(WallpaperGroup::P6m, 4, 4, 100.0, 0.0, 10.0, 20.0)
            .unwrap();
        let second = cache
            .get_or_generate(WallpaperGroup::P6m, 4, 4, 100.0, 0.0, 10.0, 20.0)
            .unwrap();

        assert_eq!(first, second);
        assert!(first.shares_storage_with(&second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_any_changed_field_misses() {
        let mut cache = TransformCache::new(16);
        cache
            .get_or_generate(WallpaperGroup::P4, 4, 4, 100.0, 0.0, 10.0, 20.0)
            .unwrap();

        let variants = [
            TilingKey::new(WallpaperGroup::P4m, 4, 4, 100.0, 0.0, 10.0, 20.0),
            TilingKey::new(WallpaperGroup::P4, 5, 4, 100.0, 0.0, 10.0, 20.0),
            TilingKey::new(WallpaperGroup::P4, 4, 5, 100.0, 0.0, 10.0, 20.0),
            TilingKey::new(WallpaperGroup::P4, 4, 4, 101.0, 0.0, 10.0, 20.0),
            TilingKey::new(WallpaperGroup::P4, 4, 4, 100.0, 0.1, 10.0, 20.0),
            TilingKey::new(WallpaperGroup::P4, 4, 4, 100.0, 0.0, 11.0, 20.0),
            TilingKey::new(WallpaperGroup::P4, 4, 4, 100.0, 0.0, 10.0, 21.0),
        ];
        for key in &variants {
            assert!(!cache.contains(key));
        }
        assert!(cache.contains(&TilingKey::new(WallpaperGroup::P4, 4, 4, 100.0, 0.0, 10.0, 20.0)));
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = TransformCache::new(2);
        cache.get_or_generate(WallpaperGroup::P1, 2, 2, 10.0, 0.0, 0.0, 0.0).unwrap();
        cache.get_or_generate(WallpaperGroup::P2, 2, 2, 10.0, 0.0, 0.0, 0.0).unwrap();
        // touch p1 so p2 becomes the oldest
        cache.get_or_generate(WallpaperGroup::P1, 2, 2, 10.0, 0.0, 0.0, 0.0).unwrap();
        cache.get_or_generate(WallpaperGroup::P3, 2, 2, 10.0, 0.0, 0.0, 0.0).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&TilingKey::new(WallpaperGroup::P1, 2, 2, 10.0, 0.0, 0.0, 0.0)));
        assert!(!cache.contains(&TilingKey::new(WallpaperGroup::P2, 2, 2, 10.0, 0.0, 0.0, 0.0)));
        assert!(cache.contains(&TilingKey::new(WallpaperGroup::P3, 2, 2, 10.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let mut cache = TransformCache::default();
        let result = cache.generate_symmetry("p7", 2, 2, 10.0, 0.0, 0.0, 0.0);
        assert_eq!(result, Err(SymmetryError::UnknownGroup("p7".to_owned())));
        assert!(cache.is_empty());
    }
}
