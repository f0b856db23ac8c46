//! Arena Match Server
//!
//! Runs a scripted match against the in-memory world and logs what the
//! match engine decides. The mode comes from the first CLI argument, then
//! `GAME_MODENAME`, then the default.

use anyhow::{Context, Result};
use tracing::info;

use arena_match::{
    DeterministicRng, GameTime, MatchConfig, MatchEventData, MatchOrchestrator, MatchWorld, PlayerId,
    TICK_RATE, VERSION,
    config::MODE_ASSAULT,
    core::{volume::{Aabb, Cylinder}, Quat, Transform, Vec3},
    game::level::{CapturePoint, LevelContent, SpawnPoint, TeamBase},
};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn main() -> Result<()> {
    init_tracing();

    info!("Arena Match Server v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let mut config = MatchConfig::from_env();
    if let Some(mode) = std::env::args().nth(1) {
        config.set("game.modename", &mode).context("invalid mode argument")?;
    }
    // Short rounds so the demo finishes quickly
    for (key, value) in [
        ("game.dm.prematchtime", "3"),
        ("game.dm.roundlength", "60"),
        ("game.dm.postmatchtime", "3"),
        ("game.assault.prematchtime", "3"),
        ("game.assault.roundlength", "90"),
        ("game.assault.postmatchtime", "3"),
        ("game.respawndelay", "2"),
    ] {
        config.set(key, value).with_context(|| format!("setting {key}"))?;
    }

    demo_match(config);
    Ok(())
}

/// Two bases at either end of a lane with three capture points between them.
fn demo_level() -> LevelContent {
    // Each side faces down the lane toward the other
    let spawn = |team_index: usize, x: f32, z: f32| SpawnPoint {
        team_index,
        transform: Transform::new(Vec3::new(x, 0.0, z), Quat::from_yaw_degrees(-x.signum() * 90.0)),
    };
    let point = |name: &str, capture_index: i32, x: f32| {
        CapturePoint::new(name, capture_index, 8.0, Cylinder::new(Vec3::new(x, 0.0, 0.0), 3.0, 4.0))
            .with_spawns(vec![
                Transform::at(Vec3::new(x, 0.0, 6.0)),
                Transform::at(Vec3::new(x, 0.0, -6.0)),
            ])
    };

    LevelContent {
        spawn_points: vec![spawn(0, -60.0, 2.0), spawn(0, -60.0, -2.0), spawn(1, 60.0, 2.0), spawn(1, 60.0, -2.0)],
        team_bases: vec![
            TeamBase { team_index: 0, bounds: Aabb::new(Vec3::new(-60.0, 0.0, 0.0), Vec3::new(5.0, 5.0, 5.0)) },
            TeamBase { team_index: 1, bounds: Aabb::new(Vec3::new(60.0, 0.0, 0.0), Vec3::new(5.0, 5.0, 5.0)) },
        ],
        capture_points: vec![point("Gate", 1, -20.0), point("Bridge", 2, 0.0), point("Keep", 3, 20.0)],
    }
}

/// Demo function to drive the match engine.
fn demo_match(config: MatchConfig) {
    info!("=== Starting Demo Match ({}) ===", config.mode_name);

    let match_id = [7u8; 16];
    let mut rng = DeterministicRng::from_match_id(&match_id);
    let tick_interval = 1.0 / TICK_RATE as f32;
    let total_ticks = u64::from(TICK_RATE) * 180;

    let mut world = MatchWorld::new(demo_level());
    let player_ids: Vec<PlayerId> = (1..=6).map(|i| PlayerId::new([i; 16])).collect();
    for (i, id) in player_ids.iter().enumerate() {
        world.add_player(*id, format!("player{}", i + 1));
    }

    let assault = config.mode_name == MODE_ASSAULT;
    let mut orchestrator = MatchOrchestrator::with_rng(config, rng.clone());
    let mut now = GameTime::new(0, tick_interval);

    while now.tick < total_ticks {
        // Combat lands before the engine looks at the tick
        random_skirmish(&mut world, &mut rng, &player_ids, now);

        orchestrator.update(&mut world, now);
        let commands = orchestrator.take_commands();
        world.apply_commands(commands);

        if assault {
            march_attackers(&mut world, &mut rng);
        }

        for event in orchestrator.take_events() {
            match &event.data {
                MatchEventData::PointCaptured { captured, total, .. } => {
                    info!("Tick {}: point captured ({}/{})", event.tick, captured, total);
                }
                MatchEventData::MatchEnded { winning_team } => {
                    info!("Tick {}: match ended, winner {:?}", event.tick, winning_team);
                }
                _ => {}
            }
        }

        now = now.next();
    }

    info!("=== Match Results ===");
    for player in world.players.values() {
        info!(
            "{} ({}) team {:?}: score {}, {} kills, {} deaths",
            player.name, player.id, player.team_index, player.score, player.kills, player.deaths
        );
    }
    let hud = orchestrator.hud();
    info!("{} {} - {} {}", hud.team_name_0, hud.team_score_0, hud.team_score_1, hud.team_name_1);
}

/// Move every attacker onto the first unfinished capture point.
fn march_attackers(world: &mut MatchWorld, rng: &mut DeterministicRng) {
    let Some(target) = world
        .level
        .capture_points
        .iter()
        .filter(|p| p.captured < 1.0)
        .min_by_key(|p| p.capture_index)
        .map(|p| p.zone.base)
    else {
        return;
    };

    let attackers: Vec<_> = world
        .players
        .values()
        .filter(|p| p.team_index == Some(0))
        .filter_map(|p| p.controlled_entity)
        .collect();
    for entity in attackers {
        let jitter = Vec3::new(rng.next_range(-2.0, 2.0), 0.0, rng.next_range(-2.0, 2.0));
        world.set_position(entity, target + jitter);
    }
}

/// Occasionally one random player kills another.
fn random_skirmish(world: &mut MatchWorld, rng: &mut DeterministicRng, player_ids: &[PlayerId], now: GameTime) {
    if !rng.next_bool(0.01) {
        return;
    }
    let (Some(killer), Some(victim)) = (rng.choose(player_ids).copied(), rng.choose(player_ids).copied()) else {
        return;
    };
    if let Some(entity) = world.player(&victim).and_then(|p| p.controlled_entity) {
        world.damage(entity, 1000.0, Some(killer), now.tick);
    }
}
