//! Demolition Tests - Area Damage, Collapse Lifecycle, and Scene Economy
//!
//! End-to-end coverage through the public API: damage cluster radii, the
//! collapse -> respawn tier-up loop, scrap flowing from impacts into the
//! economy, and save profiles surviving a disk round trip.

use std::sync::Arc;

use glam::Vec3;
use scrap_city::config::{DemolitionTuning, PerfMode};
use scrap_city::scene::DemolitionScene;
use scrap_city::systems::{
    ProjectileKind, SaveProfile, UpgradeEffects, UpgradeKind, load_or_fresh, load_profile,
    save_profile,
};
use scrap_city::world::{BlockPrototype, Building, CollapsePhase, DebrisPool, ScrapSource};

/// Tuning with the per-build HP roll pinned to a single value, so block
/// kills are deterministic.
fn pinned_tuning(hp: f32) -> DemolitionTuning {
    DemolitionTuning {
        block_hp_min: hp,
        block_hp_max: hp,
        ..DemolitionTuning::default()
    }
}

fn test_building(width: usize, depth: usize, height: usize, hp: f32) -> (Building, DebrisPool) {
    let building = Building::new(
        Vec3::ZERO,
        width,
        depth,
        height,
        1,
        pinned_tuning(hp),
        Arc::new(BlockPrototype::default()),
        fastrand::Rng::with_seed(11),
    );
    let debris = DebrisPool::new(64, fastrand::Rng::with_seed(12));
    (building, debris)
}

// ============================================================================
// Area Damage Shape
// ============================================================================

#[test]
fn test_area_damage_covers_axis_neighbors_but_not_diagonals() {
    let (mut building, mut debris) = test_building(4, 4, 6, 2.0);
    let mut awards = Vec::new();
    let effects = UpgradeEffects {
        damage: 1.5,
        radius: 1.2,
        ..UpgradeEffects::default()
    };
    // Interior block: all six axis neighbors exist.
    let impact = building.block_position(building.block_index(1, 2, 1));

    // First volley leaves every block in the cluster at 0.5 hp.
    let first = building.apply_area_damage(impact, &effects, &mut debris, &mut awards);
    assert_eq!(first, 0.0);
    assert_eq!(building.dead_blocks(), 0);
    assert!(awards.is_empty());

    // Second volley kills the struck block plus its six axis neighbors.
    // Diagonal neighbors sit sqrt(2) away, outside the 1.2 radius.
    let second = building.apply_area_damage(impact, &effects, &mut debris, &mut awards);
    assert_eq!(building.dead_blocks(), 7);
    assert!(
        (second - 7.0 * 0.28).abs() < 1e-9,
        "expected 7 block rewards, got {second}"
    );
    assert_eq!(awards.len(), 7);
    assert!(awards.iter().all(|a| a.source == ScrapSource::BlockDestroyed));

    // Volleys three through ten find nothing left alive in range.
    for volley in 3..=10 {
        let reward = building.apply_area_damage(impact, &effects, &mut debris, &mut awards);
        assert_eq!(reward, 0.0, "volley {volley} paid on a dead cluster");
    }
    assert_eq!(building.dead_blocks(), 7);
    assert_eq!(awards.len(), 7);
}

// ============================================================================
// Collapse Lifecycle
// ============================================================================

#[test]
fn test_collapse_triggers_at_threshold_and_respawns_bigger() {
    // 12 blocks: the 9th kill crosses the 70% threshold.
    let (mut building, mut debris) = test_building(3, 2, 2, 1.0);
    let mut awards = Vec::new();
    let effects = UpgradeEffects {
        damage: 100.0,
        radius: 0.1,
        ..UpgradeEffects::default()
    };

    let mut targets = Vec::new();
    for x in 0..3 {
        for y in 0..2 {
            for z in 0..2 {
                targets.push(building.block_position(building.block_index(x, y, z)));
            }
        }
    }

    for impact in targets.iter().take(8) {
        building.apply_area_damage(*impact, &effects, &mut debris, &mut awards);
    }
    assert_eq!(building.dead_blocks(), 8);
    assert!(matches!(building.phase(), CollapsePhase::Standing));

    building.apply_area_damage(targets[8], &effects, &mut debris, &mut awards);
    assert!(matches!(building.phase(), CollapsePhase::Collapsing { .. }));

    // Exactly one collapse bonus, worth the 3 remaining blocks.
    let bonuses: Vec<_> = awards
        .iter()
        .filter(|a| a.source == ScrapSource::CollapseBonus)
        .collect();
    assert_eq!(bonuses.len(), 1);
    assert!((bonuses[0].amount - 3.0 * 0.28 * 0.65).abs() < 1e-9);

    // Drive the collapse through respawn: tier 2 rebuilds a fresh,
    // slightly larger lattice with scaled hit points.
    for _ in 0..30 {
        building.update(0.1, 64, &mut debris);
    }
    assert_eq!(building.tier(), 2);
    assert!(matches!(building.phase(), CollapsePhase::Standing));
    assert_eq!(building.total_blocks(), 3 * 3 * 4);
    assert_eq!(building.alive_count(), building.total_blocks());
    assert!((building.max_hp() - 1.075).abs() < 1e-6);
}

// ============================================================================
// Scene Economy Flow
// ============================================================================

#[test]
fn test_scene_hitscan_shots_credit_block_rewards() {
    let profile = SaveProfile {
        perf_mode: PerfMode::Low,
        ..SaveProfile::fresh(0.0)
    };
    // Blocks at exactly 0.8 hp die to a single level-zero shot.
    let mut scene = DemolitionScene::new(&profile, pinned_tuning(0.8), 3);

    // Front faces of three columns on the first plot's 4x4 building.
    for (i, x) in [-21.5f32, -20.5, -19.5].iter().enumerate() {
        let reward = scene.fire_ray(Vec3::new(*x, 2.5, -30.0), Vec3::Z);
        assert!((reward - 0.28).abs() < 1e-9, "shot {i} paid {reward}");
    }
    assert!((scene.economy.scrap() - 3.0 * 0.28).abs() < 1e-9);

    let stats = scene.city.stats();
    assert_eq!(stats.alive_blocks, stats.total_blocks - 3);
}

#[test]
fn test_projectile_arc_lands_and_pays_through_the_scene() {
    let profile = SaveProfile {
        perf_mode: PerfMode::Low,
        ..SaveProfile::fresh(0.0)
    };
    let mut scene = DemolitionScene::new(&profile, pinned_tuning(0.8), 5);

    // Straight down onto the roof of the first building's (1, 0) column.
    scene.fire_projectile(
        Vec3::new(-20.5, 40.0, -21.5),
        Vec3::NEG_Y,
        30.0,
        ProjectileKind::Player,
    );
    for _ in 0..120 {
        scene.update(1.0 / 60.0);
    }

    assert!((scene.economy.scrap() - 0.28).abs() < 1e-9);
    assert_eq!(scene.projectiles.count_active(), 0);
}

// ============================================================================
// Save Profiles On Disk
// ============================================================================

#[test]
fn test_profile_survives_a_disk_round_trip() {
    let dir = std::env::temp_dir().join("scrap_city_roundtrip_test");
    let path = dir.join("profile.json");
    let _ = std::fs::remove_dir_all(&dir);

    let profile = SaveProfile::fresh(500.0);
    let mut scene = DemolitionScene::new(&profile, DemolitionTuning::default(), 9);
    scene.economy.add_scrap(100.0);
    assert!(scene.buy_upgrade(UpgradeKind::Radius));
    scene.toggle_perf_mode();

    let exported = scene.export_profile(1_234.5);
    save_profile(&path, &exported).unwrap();
    let loaded = load_profile(&path, 9_999.0).unwrap();
    assert_eq!(loaded, exported);

    let resumed = DemolitionScene::new(&loaded, DemolitionTuning::default(), 9);
    assert_eq!(resumed.perf_mode(), PerfMode::Low);
    assert_eq!(resumed.upgrades.level(UpgradeKind::Radius), 1);
    assert!((resumed.economy.scrap() - 82.0).abs() < 1e-9);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_corrupt_save_starts_fresh_and_still_plays() {
    let dir = std::env::temp_dir().join("scrap_city_corrupt_test");
    let path = dir.join("profile.json");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(&path, b"{not json").unwrap();

    let profile = load_or_fresh(&path, 42.0);
    assert_eq!(profile.scrap, 0.0);
    assert_eq!(profile.last_timestamp, 42.0);

    let mut scene = DemolitionScene::new(&profile, DemolitionTuning::default(), 1);
    scene.update(1.0 / 60.0);
    assert!(scene.city.stats().total_blocks > 0);

    let _ = std::fs::remove_dir_all(&dir);
}
