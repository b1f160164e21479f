//! Board populator: sprite selection, random placement, flight curves and the
//! image-load gate.
//!
//! Every round draws `decoy_count` trainer sprites plus one pokemon target,
//! places each uniformly inside the safe band of the viewport, and gives each a
//! quadratic flight curve from the shared launch origin (bottom-centre) to its
//! slot.  Decoys and the target are indistinguishable until inspected.
//!
//! All randomness flows through a caller-supplied [`Rng`] so rounds are
//! reproducible under a seeded generator.

use crate::config::GameConfig;
use crate::constants::{CURVE_CX_DX, CURVE_CX_DY, CURVE_CY_DX_SQ, CURVE_CY_HEIGHT, CURVE_CY_JITTER};
use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

/// Logical size of the area sprites may occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Top-left corner of a sprite, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub top: f32,
    pub left: f32,
}

/// Quadratic Bézier flight from the launch origin to a sprite's slot.
///
/// `control` and `end` are offsets relative to `origin` (x = left, y = top).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CurvePath {
    pub origin: Position,
    pub control: Vec2,
    pub end: Vec2,
}

impl CurvePath {
    /// Absolute position at normalised time `t ∈ [0, 1]` (clamped).
    pub fn point_at(&self, t: f32) -> Position {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        // P0 = 0, so B(t) = 2ut·C + t²·E
        let offset = 2.0 * u * t * self.control + t * t * self.end;
        Position {
            top: self.origin.top + offset.y,
            left: self.origin.left + offset.x,
        }
    }

    pub fn destination(&self) -> Position {
        self.point_at(1.0)
    }
}

/// One sprite of a round.
#[derive(Debug, Clone, PartialEq)]
pub struct SpritePlacement {
    /// Asset path of the image to show.
    pub image: String,
    pub position: Position,
    pub path: CurvePath,
    pub is_target: bool,
}

/// A freshly populated board.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub target_index: usize,
    pub decoy_count: usize,
    pub sprites: Vec<SpritePlacement>,
}

impl Round {
    pub fn target(&self) -> &SpritePlacement {
        &self.sprites[self.target_index]
    }
}

/// Asset paths available to the populator.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SpritePool {
    pub trainers: Vec<String>,
    pub pokemon: Vec<String>,
}

impl SpritePool {
    /// `<dir>/<i>.png` for every index of both pools.
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            trainers: (0..config.trainer_pool_size)
                .map(|i| format!("{}/{i}.png", config.trainer_image_dir))
                .collect(),
            pokemon: (0..config.pokemon_pool_size)
                .map(|i| format!("{}/{i}.png", config.pokemon_image_dir))
                .collect(),
        }
    }
}

impl Default for SpritePool {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// Shared launch point: 80 % down the viewport, horizontally centred.
pub fn launch_origin(viewport: Viewport, config: &GameConfig) -> Position {
    Position {
        top: viewport.height * config.launch_height_fraction,
        left: viewport.width / 2.0 - config.sprite_size / 2.0,
    }
}

/// Uniform slot inside the safe band, floored to whole pixels.
///
/// A viewport too small for the band collapses to the band's minimum corner.
pub fn random_position<R: Rng + ?Sized>(
    rng: &mut R,
    viewport: Viewport,
    config: &GameConfig,
) -> Position {
    let margin = config.safe_margin;
    let size = config.sprite_size;
    let v_span = (viewport.height - margin * 4.0 - size).max(0.0);
    let h_span = (viewport.width - size - margin * 0.5).max(0.0);
    let top = (rng.gen::<f32>() * v_span).floor() + margin * 2.5;
    let left = (rng.gen::<f32>() * h_span).floor() + margin * 0.3;
    Position { top, left }
}

/// Control offset bending the flight from `origin` to `target`.
pub fn curve_control<R: Rng + ?Sized>(
    rng: &mut R,
    origin: Position,
    target: Position,
    viewport: Viewport,
) -> Vec2 {
    let dx = target.left - origin.left;
    let dy = target.top - origin.top;
    let cx = dx * CURVE_CX_DX + dy * CURVE_CX_DY;
    let cy = viewport.height * CURVE_CY_HEIGHT + dx * dx * CURVE_CY_DX_SQ
        - CURVE_CY_JITTER * rng.gen::<f32>();
    Vec2::new(cx, cy)
}

/// Build the next board: `decoy_count` decoys plus one target, all placed.
pub fn populate_round<R: Rng + ?Sized>(
    rng: &mut R,
    viewport: Viewport,
    pool: &SpritePool,
    config: &GameConfig,
) -> Round {
    let decoy_count = config.decoy_count;
    let mut images: Vec<String> = if pool.trainers.len() >= decoy_count {
        pool.trainers
            .choose_multiple(rng, decoy_count)
            .cloned()
            .collect()
    } else {
        (0..decoy_count)
            .filter_map(|_| pool.trainers.choose(rng).cloned())
            .collect()
    };

    let target_image = pool.pokemon.choose(rng).cloned().unwrap_or_default();
    let target_index = rng.gen_range(0..=images.len());
    images.insert(target_index, target_image);

    let origin = launch_origin(viewport, config);
    let sprites = images
        .into_iter()
        .enumerate()
        .map(|(i, image)| {
            let position = random_position(rng, viewport, config);
            let control = curve_control(rng, origin, position, viewport);
            SpritePlacement {
                image,
                position,
                path: CurvePath {
                    origin,
                    control,
                    end: Vec2::new(position.left - origin.left, position.top - origin.top),
                },
                is_target: i == target_index,
            }
        })
        .collect();

    Round {
        target_index,
        decoy_count,
        sprites,
    }
}

// ── Load gate ─────────────────────────────────────────────────────────────────

/// Result of polling a [`LoadGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Pending,
    /// Every image settled.
    Ready,
    /// Deadline passed with loads still outstanding; reveal anyway.
    TimedOut,
}

/// Join point for a round's image loads.
///
/// The board is revealed once every load has settled or the deadline passes,
/// whichever comes first.  The gate fires at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadGate {
    total: usize,
    deadline_secs: f64,
    fired: bool,
}

impl LoadGate {
    pub fn new(total: usize, now_secs: f64, timeout_secs: f64) -> Self {
        Self {
            total,
            deadline_secs: now_secs + timeout_secs,
            fired: false,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Poll with the number of settled (loaded or failed) images.
    ///
    /// Returns `Ready` / `TimedOut` exactly once, `Pending` otherwise.
    pub fn poll(&mut self, settled: usize, now_secs: f64) -> GateStatus {
        if self.fired {
            return GateStatus::Pending;
        }
        if settled >= self.total {
            self.fired = true;
            return GateStatus::Ready;
        }
        if now_secs >= self.deadline_secs {
            self.fired = true;
            return GateStatus::TimedOut;
        }
        GateStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn viewport() -> Viewport {
        Viewport {
            width: 1280.0,
            height: 720.0,
        }
    }

    #[test]
    fn round_has_one_target_among_decoys() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = GameConfig::default();
        let round = populate_round(&mut rng, viewport(), &SpritePool::default(), &config);

        assert_eq!(round.sprites.len(), config.decoy_count + 1);
        assert_eq!(round.decoy_count, 299);
        assert_eq!(round.sprites.iter().filter(|s| s.is_target).count(), 1);
        assert!(round.target().is_target);
        assert!(round.target().image.starts_with(&config.pokemon_image_dir));
        for (i, sprite) in round.sprites.iter().enumerate() {
            if i != round.target_index {
                assert!(sprite.image.starts_with(&config.trainer_image_dir));
            }
        }
    }

    #[test]
    fn decoys_are_distinct_when_pool_is_large_enough() {
        let mut rng = StdRng::seed_from_u64(11);
        let round = populate_round(
            &mut rng,
            viewport(),
            &SpritePool::default(),
            &GameConfig::default(),
        );
        let mut decoys: Vec<&str> = round
            .sprites
            .iter()
            .filter(|s| !s.is_target)
            .map(|s| s.image.as_str())
            .collect();
        decoys.sort_unstable();
        decoys.dedup();
        assert_eq!(decoys.len(), 299);
    }

    #[test]
    fn small_pool_repeats_decoys() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = GameConfig {
            decoy_count: 10,
            trainer_pool_size: 2,
            ..Default::default()
        };
        let round = populate_round(&mut rng, viewport(), &SpritePool::from_config(&config), &config);
        assert_eq!(round.sprites.len(), 11);
    }

    #[test]
    fn every_position_stays_inside_safe_band() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = GameConfig::default();
        let vp = viewport();
        for _ in 0..2_000 {
            let p = random_position(&mut rng, vp, &config);
            assert!(p.top >= config.safe_margin * 2.5);
            assert!(p.top + config.sprite_size <= vp.height - config.safe_margin * 1.5);
            assert!(p.left >= config.safe_margin * 0.3);
            assert!(p.left + config.sprite_size <= vp.width - config.safe_margin * 0.2);
        }
    }

    #[test]
    fn tiny_viewport_collapses_to_band_minimum() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = GameConfig::default();
        let p = random_position(
            &mut rng,
            Viewport {
                width: 10.0,
                height: 10.0,
            },
            &config,
        );
        assert_eq!(p.top, config.safe_margin * 2.5);
        assert_eq!(p.left, config.safe_margin * 0.3);
    }

    #[test]
    fn launch_origin_is_bottom_centre() {
        let config = GameConfig::default();
        let origin = launch_origin(viewport(), &config);
        assert_eq!(origin.top, 576.0);
        assert_eq!(origin.left, 640.0 - 35.0);
    }

    #[test]
    fn curve_starts_at_origin_and_ends_at_slot() {
        let mut rng = StdRng::seed_from_u64(5);
        let round = populate_round(
            &mut rng,
            viewport(),
            &SpritePool::default(),
            &GameConfig::default(),
        );
        for sprite in &round.sprites {
            let start = sprite.path.point_at(0.0);
            let end = sprite.path.destination();
            assert_eq!(start, sprite.path.origin);
            assert!((end.top - sprite.position.top).abs() < 1e-3);
            assert!((end.left - sprite.position.left).abs() < 1e-3);
        }
    }

    #[test]
    fn control_point_follows_arc_formula() {
        struct Fixed;
        impl rand::RngCore for Fixed {
            fn next_u32(&mut self) -> u32 {
                0
            }
            fn next_u64(&mut self) -> u64 {
                0
            }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill(0);
            }
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                dest.fill(0);
                Ok(())
            }
        }
        let origin = Position {
            top: 500.0,
            left: 100.0,
        };
        let target = Position {
            top: 300.0,
            left: 300.0,
        };
        let c = curve_control(&mut Fixed, origin, target, viewport());
        // dx = 200, dy = -200; random() = 0
        assert!((c.x - (100.0 + 60.0)).abs() < 1e-3);
        assert!((c.y - (-216.0 + 20.0)).abs() < 1e-3);
    }

    #[test]
    fn gate_waits_for_every_image() {
        let mut gate = LoadGate::new(300, 0.0, 10.0);
        assert_eq!(gate.poll(0, 0.1), GateStatus::Pending);
        assert_eq!(gate.poll(299, 1.0), GateStatus::Pending);
        assert_eq!(gate.poll(300, 1.1), GateStatus::Ready);
        assert_eq!(gate.poll(300, 1.2), GateStatus::Pending, "fires once");
    }

    #[test]
    fn gate_times_out_on_stalled_load() {
        let mut gate = LoadGate::new(300, 5.0, 10.0);
        assert_eq!(gate.poll(299, 14.9), GateStatus::Pending);
        assert_eq!(gate.poll(299, 15.0), GateStatus::TimedOut);
        assert!(gate.has_fired());
    }
}
