use eschersketch::symmetry::{
    TilingParams, TransformCache, WallpaperGroup, catalog, generate_rosette, generate_symmetry_uncached,
    generate_tiling, identity_set,
};
use egui::Pos2;
use proptest::prelude::*;

fn group_strategy() -> impl Strategy<Value = WallpaperGroup> {
    proptest::sample::select(WallpaperGroup::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_tiling_size_and_fixed_center(
        group in group_strategy(),
        nx in 1i32..8,
        ny in 1i32..8,
        d in 10.0f32..200.0,
        t in -3.1f32..3.1,
        x in -500.0f32..500.0,
        y in -500.0f32..500.0,
    ) {
        let spec = group.spec();
        let set = generate_tiling(spec, nx, ny, d, t, x, y).unwrap();
        let params = TilingParams::new(nx, ny, d, t, x, y);
        prop_assert_eq!(set.len(), params.lattice_point_count() * spec.order());

        // the origin cell's identity operation maps the center to itself
        let origin_cell = params
            .lattice_indices()
            .position(|ij| ij == (0, 0))
            .unwrap();
        let center = Pos2::new(x, y);
        let image = set[origin_cell * spec.order()].apply(center);
        prop_assert!((image - center).length() < 1e-2);

        for transform in set.iter() {
            prop_assert!((transform.determinant().abs() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn prop_rosette_counts(
        nrot in 1i32..24,
        nref in 0i32..3,
        x in -500.0f32..500.0,
        y in -500.0f32..500.0,
        rot in -6.3f32..6.3,
    ) {
        let set = generate_rosette(nrot, nref, x, y, rot);
        let copies = if nref > 0 { 2 } else { 1 };
        prop_assert_eq!(set.len(), nrot as usize * copies);

        let mirrored = set.iter().filter(|t| t.determinant() < 0.0).count();
        prop_assert_eq!(mirrored, if nref > 0 { nrot as usize } else { 0 });

        let center = Pos2::new(x, y);
        for transform in set.iter() {
            prop_assert!((transform.apply(center) - center).length() < 1e-2);
        }
    }

    #[test]
    fn prop_cache_matches_direct_generation(
        group in group_strategy(),
        nx in 1i32..6,
        ny in 1i32..6,
        d in 10.0f32..200.0,
    ) {
        let mut cache = TransformCache::default();
        let cached = cache.get_or_generate(group, nx, ny, d, 0.3, 100.0, 80.0).unwrap();
        let direct = generate_symmetry_uncached(group.name(), nx, ny, d, 0.3, 100.0, 80.0).unwrap();
        prop_assert_eq!(cached, direct);
    }
}

#[test]
fn test_every_group_is_tileable() {
    assert_eq!(catalog().len(), 19);
    for spec in catalog() {
        let set = generate_tiling(spec, 1, 1, 50.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(set.len(), 9 * spec.order(), "{}", spec.name());
    }
}

#[test]
fn test_p4_small_grid() {
    let mut cache = TransformCache::default();
    let set = cache
        .generate_symmetry("p4", 2, 2, 100.0, 0.0, 0.0, 0.0)
        .unwrap();
    assert_eq!(set.len(), 36);
}

#[test]
fn test_identity_set_is_single_identity() {
    let set = identity_set();
    assert_eq!(set.len(), 1);
    let p = Pos2::new(3.0, -7.0);
    assert_eq!(set[0].apply(p), p);
}

#[test]
fn test_unknown_group_name() {
    assert!(generate_symmetry_uncached("p7", 2, 2, 100.0, 0.0, 0.0, 0.0).is_err());
    let mut cache = TransformCache::default();
    assert!(cache.generate_symmetry("p7", 2, 2, 100.0, 0.0, 0.0, 0.0).is_err());
    assert!(cache.is_empty());
}

#[test]
fn test_repeated_lookup_is_one_miss() {
    let mut cache = TransformCache::new(4);
    for _ in 0..3 {
        cache
            .get_or_generate(WallpaperGroup::Cmm, 4, 4, 60.0, 0.0, 0.0, 0.0)
            .unwrap();
    }
    assert_eq!(cache.misses(), 1);
}
