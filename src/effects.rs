//! Visual debris: explosion particles, asteroid outline segments, craft hull
//! fragments and exhaust puffs.
//!
//! ## Design
//!
//! The simulation only *creates* these; nothing in gameplay reads them back.
//! They are stepped by [`Effects::decay`] every tick, including while the
//! round is in game over, so explosions keep playing out during the restart
//! countdown.
//!
//! | Kind              | Moves | Expires                                  |
//! |-------------------|-------|------------------------------------------|
//! | [`Particle`]      | yes   | `life` reaches zero                      |
//! | [`DebrisLine`]    | yes   | `life` reaches zero                      |
//! | [`HullFragment`]  | spins | cleared on respawn / round restart       |
//! | [`ExhaustPuff`]   | grows | `life` reaches zero                      |

use crate::constants::*;
use crate::geometry::{heading, wrap_position};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub color: String,
}

/// One edge of a broken asteroid outline, drifting away from the old centre.
#[derive(Debug, Clone, PartialEq)]
pub struct DebrisLine {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Endpoints relative to `pos`.
    pub from: Vec2,
    pub to: Vec2,
    pub life: f32,
    pub color: String,
}

/// One edge of the destroyed craft hull.
#[derive(Debug, Clone, PartialEq)]
pub struct HullFragment {
    pub pos: Vec2,
    pub vel: Vec2,
    pub from: Vec2,
    pub to: Vec2,
    pub rotation: f32,
    /// Spin rate (rad/s).
    pub spin: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustKind {
    Main,
    Reverse,
    Side,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExhaustPuff {
    pub pos: Vec2,
    pub radius: f32,
    pub life: f32,
    pub kind: ExhaustKind,
}

// ── Container ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub debris: Vec<DebrisLine>,
    pub hull: Vec<HullFragment>,
    pub exhaust: Vec<ExhaustPuff>,
}

impl Effects {
    /// Radial burst of `count` particles.
    pub fn burst(&mut self, rng: &mut impl Rng, pos: Vec2, count: usize, color: &str) {
        for _ in 0..count {
            let angle = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(PARTICLE_SPEED.0..PARTICLE_SPEED.1);
            self.particles.push(Particle {
                pos,
                vel: heading(angle) * speed,
                life: PARTICLE_LIFE,
                color: color.to_string(),
            });
        }
    }

    /// Break an outline into edge segments that fly outward from `center`.
    pub fn shatter_outline(&mut self, center: Vec2, outline: &[Vec2], color: &str) {
        let n = outline.len();
        for i in 0..n {
            let from = outline[i];
            let to = outline[(i + 1) % n];
            let mid = (from + to) * 0.5;
            self.debris.push(DebrisLine {
                pos: center,
                vel: heading(mid.y.atan2(mid.x)),
                from,
                to,
                life: DEBRIS_LIFE,
                color: color.to_string(),
            });
        }
    }

    /// Replace any previous hull wreckage with the edges of `hull` (local points).
    pub fn shatter_hull(&mut self, rng: &mut impl Rng, center: Vec2, hull: &[Vec2; 3]) {
        self.hull.clear();
        for i in 0..3 {
            let angle = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(PARTICLE_SPEED.0..PARTICLE_SPEED.1);
            self.hull.push(HullFragment {
                pos: center,
                vel: heading(angle) * speed,
                from: hull[i],
                to: hull[(i + 1) % 3],
                rotation: 0.0,
                spin: rng.gen_range(-1.0..1.0),
            });
        }
    }

    pub fn puff(&mut self, pos: Vec2, kind: ExhaustKind) {
        let radius = if kind == ExhaustKind::Main { 2.0 } else { 1.0 };
        self.exhaust.push(ExhaustPuff {
            pos,
            radius,
            life: EXHAUST_LIFE,
            kind,
        });
    }

    /// Advance every record by `dt` seconds (`step` reference frames).
    pub fn decay(&mut self, dt: f32, step: f32) {
        for p in &mut self.particles {
            p.pos += p.vel * step;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);

        for d in &mut self.debris {
            d.pos += d.vel * step;
            d.life -= dt;
        }
        self.debris.retain(|d| d.life > 0.0);

        for f in &mut self.hull {
            f.pos += f.vel * step;
            f.rotation += f.spin * dt;
        }

        for e in &mut self.exhaust {
            e.life -= dt;
            e.radius += EXHAUST_GROWTH * dt;
        }
        self.exhaust.retain(|e| e.life > 0.0);
    }

    pub fn wrap(&mut self, width: f32, height: f32) {
        self.particles.iter_mut().for_each(|p| p.pos = wrap_position(p.pos, width, height));
        self.debris.iter_mut().for_each(|d| d.pos = wrap_position(d.pos, width, height));
        self.hull.iter_mut().for_each(|f| f.pos = wrap_position(f.pos, width, height));
        self.exhaust.iter_mut().for_each(|e| e.pos = wrap_position(e.pos, width, height));
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
            && self.debris.is_empty()
            && self.hull.is_empty()
            && self.exhaust.is_empty()
    }
}
