use std::path::Path;

use ballistics::{
    load_def_database, parse_def_database, Block, DefDatabase, ProjectileDefId, ProjectileOwner,
    ProjectileSim, SimEventBus, SpawnRequest, TeamId, TileGrid, Unit, UnitArena, Vec2,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFS_ENV_VAR: &str = "SKIRMISH_DEFS";
const TICKS: u32 = 120;
const FIXED_DT: f32 = 1.0 / 60.0;
const TILE_SIZE: f32 = 8.0;

const DEFAULT_DEFS: &str = r#"{
    "teams": [
        { "name": "crux" },
        { "name": "verdant" }
    ],
    "projectiles": [
        {
            "name": "slug",
            "speed": 180.0,
            "lifetime": 1.5,
            "damage": 12.0,
            "knockback": 6.0,
            "hit_effect": "hit_spark",
            "despawn_effect": "flash"
        },
        {
            "name": "bolt",
            "speed": 240.0,
            "lifetime": 0.8,
            "damage": 5.0,
            "status": "shocked",
            "status_intensity": 0.5,
            "hit_effect": "flash"
        }
    ]
}"#;

fn main() {
    init_tracing();
    info!("=== Skirmish Startup ===");

    let defs = match load_defs() {
        Ok(defs) => defs,
        Err(err) => {
            error!(error = %err, "startup_failed");
            std::process::exit(1);
        }
    };
    info!(
        projectiles = defs.projectile_count(),
        teams = defs.team_count(),
        "definitions_loaded"
    );

    run_skirmish(&defs);
}

/// Two emplacements trade fire across a walled arena for a few seconds
/// of simulated time, logging per-tick event counts.
fn run_skirmish(defs: &DefDatabase) {
    let crux = TeamId(0);
    let verdant = TeamId(1);
    let slug = ProjectileDefId(0);
    let bolt = ProjectileDefId(1);

    let mut grid = TileGrid::new(64, 64, TILE_SIZE);
    for tile_y in 10..14 {
        grid.place_block(24, tile_y, Block::wall(verdant, 80.0))
            .expect("wall placement inside grid bounds");
    }

    let mut units = UnitArena::new();
    let gunner = units.spawn(Unit::grounded(crux, Vec2::new(40.0, 96.0)));
    units.spawn(Unit::grounded(verdant, Vec2::new(360.0, 96.0)));
    units.spawn(Unit::airborne(verdant, Vec2::new(320.0, 120.0)));

    let mut sim = ProjectileSim::new(256, FIXED_DT);
    let mut events = SimEventBus::new();

    for tick in 0..TICKS {
        // staggered volleys from the crux side
        if tick % 20 == 0 {
            sim.spawn(
                defs,
                &units,
                SpawnRequest::new(slug, crux, Vec2::new(48.0, 96.0), 0.0)
                    .with_owner(ProjectileOwner::Unit(gunner)),
                &mut events,
            );
        }
        if tick % 30 == 15 {
            sim.spawn(
                defs,
                &units,
                SpawnRequest::new(bolt, crux, Vec2::new(48.0, 104.0), 0.05),
                &mut events,
            );
        }

        sim.update(defs, &mut grid, &mut units, &mut events);
        events.finish_tick_rollover();

        let counts = events.last_tick_counts();
        if counts.total > 0 {
            info!(
                tick,
                active = sim.active_count(),
                spawned = counts.spawned,
                hit_tile = counts.hit_tile,
                hit_unit = counts.hit_unit,
                despawned = counts.despawned,
                block_damaged = counts.block_damaged,
                "tick_events"
            );
        }
    }

    info!(active = sim.active_count(), "skirmish_complete");
}

fn load_defs() -> Result<DefDatabase, ballistics::ContentError> {
    match std::env::var(DEFS_ENV_VAR) {
        Ok(path) => {
            info!(path = path.as_str(), "loading definitions from file");
            load_def_database(Path::new(&path))
        }
        Err(_) => parse_def_database(DEFAULT_DEFS),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
