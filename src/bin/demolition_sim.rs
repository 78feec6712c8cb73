//! Demolition Sim - headless soak run
//!
//! Run with: `cargo run --bin demolition-sim [save-path]`
//!
//! Loads (or creates) a save profile, replays offline drone income, then
//! simulates the city at 60 fps for two minutes: aimed shots land every
//! 0.4s, upgrades are bought greedily, and HUD stats are logged once a
//! second. The profile is written back on exit, so repeated runs climb
//! tiers the same way a played session would.
//!
//! Set `RUST_LOG=debug` for per-shot reward lines.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec3;
use scrap_city::config::DemolitionTuning;
use scrap_city::scene::DemolitionScene;
use scrap_city::systems::{UpgradeKind, load_or_fresh, save_profile};

const FRAME_DT: f32 = 1.0 / 60.0;
const RUN_SECONDS: f32 = 120.0;
const SHOT_INTERVAL: f32 = 0.4;

fn unix_now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64())
}

fn fire_at_random_building(scene: &mut DemolitionScene, rng: &mut fastrand::Rng) {
    let Some(index) = scene.city.pick_random() else {
        return;
    };
    let building = scene.city.building(index);
    let target = building.origin()
        + Vec3::new(
            (rng.f32() - 0.5) * 2.0,
            1.0 + rng.f32() * building.height() as f32 * 0.6,
            (rng.f32() - 0.5) * 2.0,
        );
    let eye = scene.viewpoint();
    let reward = scene.fire_ray(eye, target - eye);
    if reward > 0.0 {
        log::debug!("shot reward +{reward:.2}");
    }
}

/// Buy the first upgrade we can comfortably afford, leaving a cash
/// buffer so the run never zeroes the bank in one purchase.
fn try_buy_something(scene: &mut DemolitionScene) {
    for kind in UpgradeKind::ALL {
        if scene.economy.scrap() >= scene.upgrades.cost(kind) * 1.5 && scene.buy_upgrade(kind) {
            log::info!(
                "bought {} (level {})",
                kind.name(),
                scene.upgrades.level(kind)
            );
            return;
        }
    }
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Stdout)
        .init();

    let save_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("scrap_city_save.json"), PathBuf::from);

    let now = unix_now_seconds();
    let profile = load_or_fresh(&save_path, now);
    log::info!(
        "profile: {:.1} scrap, perf {}, drone level {}",
        profile.scrap,
        profile.perf_mode.label(),
        profile.upgrades.drone
    );

    let seed = now.to_bits();
    let mut scene = DemolitionScene::new(&profile, DemolitionTuning::default(), seed);
    let offline = scene.apply_offline_gain(&profile, now);
    if offline > 0.0 {
        log::info!("offline drone income: +{offline:.1} scrap");
    }

    let mut rng = fastrand::Rng::with_seed(seed ^ 0x9E37_79B9_7F4A_7C15);
    let mut shot_timer = 0.0f32;
    let mut log_timer = 0.0f32;
    let mut elapsed = 0.0f32;

    while elapsed < RUN_SECONDS {
        scene.update(FRAME_DT);
        elapsed += FRAME_DT;

        shot_timer += FRAME_DT;
        if shot_timer >= SHOT_INTERVAL {
            shot_timer -= SHOT_INTERVAL;
            fire_at_random_building(&mut scene, &mut rng);
        }

        log_timer += FRAME_DT;
        if log_timer >= 1.0 {
            log_timer -= 1.0;
            let stats = scene.stats();
            log::info!(
                "t={elapsed:>5.1}s scrap={:.1} sps={:.2} alive={}/{} debris={}",
                stats.scrap,
                stats.scrap_per_second,
                stats.alive_blocks,
                stats.total_blocks,
                stats.debris_active
            );
            try_buy_something(&mut scene);
        }
    }

    let out = scene.export_profile(unix_now_seconds());
    match save_profile(&save_path, &out) {
        Ok(()) => log::info!("saved {} ({:.1} scrap)", save_path.display(), out.scrap),
        Err(err) => log::error!("save failed: {err}"),
    }
}
