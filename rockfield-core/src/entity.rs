use core::f64::consts::TAU;
use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    degrees, ALIEN_PUSH_MULT, ALIEN_PUSH_RADII, BIG_ROCK_SCALE, BIG_ROCK_SPIN_DEGREES,
    DEBRIS_DEATH_PROB, DEBRIS_JITTER, DEBRIS_MIN_AGE, DEBRIS_SPIN_DEGREES, DEFAULT_LABEL_SECONDS,
    FIRE_RECOIL_MULT, MASS_ALIEN, MASS_BIG_ROCK, MASS_DEBRIS, MASS_MED_ROCK, MASS_PROJECTILE,
    MASS_SHIP, MASS_SMALL_ROCK, MAX_ALIEN_SPEED, MAX_CHARGE, MAX_SHIP_SPEED, MED_ROCK_SCALE,
    MED_ROCK_SPIN_DEGREES, PROJECTILE_RANGE_FRACTION, RECHARGE_TICKS, ROCK_BASE_RADIUS,
    ROCK_BREAK_PROB, ROCK_JITTER, ROCK_LIFE_TICKS, ROCK_POINTS, SCORE_ALIEN, SCORE_BIG_ROCK,
    SCORE_MED_ROCK, SCORE_SMALL_ROCK, SHIP_PUSH_MULT, SHIP_ROTATE_DEGREES, SHIP_START_ANGLE,
    SMALL_ROCK_SCALE, SMALL_ROCK_SPIN_DEGREES, SPARK_DEATH_PROB, SPARK_MAX_AGE, TICK_WRAP,
    TICK_WRAP_RESET,
};
use crate::context::{PlayArea, TickContext};
use crate::rng::SeededRng;
use crate::vector::{heading, limit_magnitude, rotate, rotated, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    BigRock,
    MedRock,
    SmallRock,
    Ship,
    Alien,
    Projectile,
    Debris,
    Spark,
    Thrust,
    Label,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        Self::BigRock,
        Self::MedRock,
        Self::SmallRock,
        Self::Ship,
        Self::Alien,
        Self::Projectile,
        Self::Debris,
        Self::Spark,
        Self::Thrust,
        Self::Label,
    ];

    /// Zero mass makes an entity transparent to collisions.
    pub fn mass(self) -> f64 {
        match self {
            Self::BigRock => MASS_BIG_ROCK,
            Self::MedRock => MASS_MED_ROCK,
            Self::SmallRock => MASS_SMALL_ROCK,
            Self::Ship => MASS_SHIP,
            Self::Alien => MASS_ALIEN,
            Self::Projectile => MASS_PROJECTILE,
            Self::Debris | Self::Spark => MASS_DEBRIS,
            Self::Thrust | Self::Label => 0.0,
        }
    }

    pub fn score_value(self) -> u32 {
        match self {
            Self::BigRock => SCORE_BIG_ROCK,
            Self::MedRock => SCORE_MED_ROCK,
            Self::SmallRock => SCORE_SMALL_ROCK,
            Self::Alien => SCORE_ALIEN,
            _ => 0,
        }
    }

    pub fn is_rock(self) -> bool {
        matches!(self, Self::BigRock | Self::MedRock | Self::SmallRock)
    }

    /// Kinds that may roam the Kuiper buffer beyond the play-area edges.
    pub fn can_enter_buffer(self) -> bool {
        !matches!(self, Self::Ship | Self::Projectile | Self::Label)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BigRock => "big_rock",
            Self::MedRock => "med_rock",
            Self::SmallRock => "small_rock",
            Self::Ship => "ship",
            Self::Alien => "alien",
            Self::Projectile => "projectile",
            Self::Debris => "debris",
            Self::Spark => "spark",
            Self::Thrust => "thrust",
            Self::Label => "label",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Font-size hint for label captions; the renderer picks the actual font.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontSize {
    #[default]
    Small,
    Medium,
    Large,
    HugeBold,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Left,
    #[default]
    Stop,
    Right,
}

impl Turn {
    /// `-1` turns left, `+1` right, anything else stops.
    pub fn from_signum(value: i32) -> Self {
        match value {
            -1 => Self::Left,
            1 => Self::Right,
            _ => Self::Stop,
        }
    }
}

const SHIP_HULL: [Vec2; 5] = [
    Vec2::new(0.0, -10.0),
    Vec2::new(7.0, 10.0),
    Vec2::new(0.0, 7.0),
    Vec2::new(-7.0, 10.0),
    Vec2::new(0.0, -10.0),
];
const SHIP_NOSE: Vec2 = Vec2::new(0.0, -14.0);
const SHIP_EXHAUST_CORNER: Vec2 = Vec2::new(3.0, 10.0);
const SHIP_EXHAUST_PLANE: Vec2 = Vec2::new(-6.0, 0.0);
const SHIP_EXHAUST_PARTICLES: usize = 2;

const ALIEN_HULL: [Vec2; 20] = [
    Vec2::new(5.0, -5.0),
    Vec2::new(10.0, -2.0),
    Vec2::new(10.0, 2.0),
    Vec2::new(8.0, 4.0),
    Vec2::new(-2.0, 4.0),
    Vec2::new(-2.0, 2.0),
    Vec2::new(2.0, 2.0),
    Vec2::new(2.0, 4.0),
    Vec2::new(-8.0, 4.0),
    Vec2::new(-10.0, 2.0),
    Vec2::new(-10.0, -2.0),
    Vec2::new(10.0, -2.0),
    Vec2::new(10.0, 2.0),
    Vec2::new(-10.0, 2.0),
    Vec2::new(-10.0, -2.0),
    Vec2::new(-5.0, -5.0),
    Vec2::new(0.0, -5.0),
    Vec2::new(-7.0, -2.0),
    Vec2::new(-5.0, -5.0),
    Vec2::new(5.0, -5.0),
];

const PROJECTILE_LINE: [Vec2; 2] = [Vec2::new(0.0, -2.0), Vec2::new(0.0, 2.0)];
const THRUST_LINE: [Vec2; 2] = [Vec2::new(0.0, 1.0), Vec2::new(0.0, -1.0)];
const DEBRIS_SHARD: [Vec2; 3] = [
    Vec2::new(0.0, 3.0),
    Vec2::new(3.0, 0.0),
    Vec2::new(-2.0, -3.0),
];

/// Flight controls and gun state of the player's ship.
#[derive(Clone, Debug, PartialEq)]
pub struct ShipState {
    alpha: f64,
    turn: Turn,
    thrusting: bool,
    fire_requested: bool,
    fire_lock: bool,
    just_fired: bool,
    fire_charge: i32,
    nose: Vec2,
    exhaust_corner: Vec2,
    exhaust_plane: Vec2,
}

impl ShipState {
    fn new() -> Self {
        Self {
            alpha: SHIP_START_ANGLE,
            turn: Turn::Stop,
            thrusting: false,
            fire_requested: false,
            fire_lock: false,
            just_fired: false,
            fire_charge: MAX_CHARGE,
            nose: rotated(SHIP_NOSE, SHIP_START_ANGLE),
            exhaust_corner: rotated(SHIP_EXHAUST_CORNER, SHIP_START_ANGLE),
            exhaust_plane: rotated(SHIP_EXHAUST_PLANE, SHIP_START_ANGLE),
        }
    }

    pub fn orientation(&self) -> f64 {
        self.alpha
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn set_turn(&mut self, turn: Turn) {
        self.turn = turn;
    }

    pub fn is_thrusting(&self) -> bool {
        self.thrusting
    }

    pub fn set_thrust(&mut self, on: bool) {
        self.thrusting = on;
    }

    /// Requests a shot on the next tick. Ignored while the fire lock is held,
    /// so one press yields one shot.
    pub fn fire(&mut self) {
        self.fire_requested |= !self.fire_lock;
    }

    /// Releases the fire lock (key up). `reset` also drops a pending request.
    pub fn release_fire_lock(&mut self, reset: bool) {
        self.fire_lock = false;
        if reset {
            self.fire_requested = false;
        }
    }

    pub fn just_fired(&self) -> bool {
        self.just_fired
    }

    pub fn fire_charge(&self) -> i32 {
        self.fire_charge
    }

    pub fn is_fire_locked(&self) -> bool {
        self.fire_lock
    }

    #[cfg(test)]
    pub(crate) fn set_fire_charge(&mut self, charge: i32) {
        self.fire_charge = charge;
    }

    /// Rebuilds the hull from the canonical shape at the current orientation,
    /// so repeated turning never accumulates rounding drift.
    fn reset_geometry(&mut self, points: &mut [Vec2]) {
        for (point, canonical) in points.iter_mut().zip(SHIP_HULL) {
            *point = rotated(canonical, self.alpha);
        }
        self.nose = rotated(SHIP_NOSE, self.alpha);
        self.exhaust_corner = rotated(SHIP_EXHAUST_CORNER, self.alpha);
        self.exhaust_plane = rotated(SHIP_EXHAUST_PLANE, self.alpha);
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Body {
    BigRock,
    MedRock,
    SmallRock,
    Ship(ShipState),
    Alien,
    Projectile,
    Debris,
    Spark,
    Thrust,
    Label { life: Duration },
}

/// One object in the engine's roster.
///
/// Polygon points are stored relative to `pos`; `dir` is the per-tick
/// velocity. Entities are built by the engine (or a [`TickContext`]) and never
/// outlive the roster that holds them.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    id: u64,
    body: Body,
    dead: bool,
    radius: f64,
    spin: f64,
    points: Vec<Vec2>,
    age: u32,
    born: Duration,
    caption: String,
    font_size: FontSize,
    pub pos: Vec2,
    pub dir: Vec2,
}

impl Entity {
    pub fn new(kind: EntityKind, id: u64, born: Duration, rng: &mut SeededRng) -> Self {
        let body = match kind {
            EntityKind::BigRock => Body::BigRock,
            EntityKind::MedRock => Body::MedRock,
            EntityKind::SmallRock => Body::SmallRock,
            EntityKind::Ship => Body::Ship(ShipState::new()),
            EntityKind::Alien => Body::Alien,
            EntityKind::Projectile => Body::Projectile,
            EntityKind::Debris => Body::Debris,
            EntityKind::Spark => Body::Spark,
            EntityKind::Thrust => Body::Thrust,
            EntityKind::Label => Body::Label {
                life: Duration::from_secs(DEFAULT_LABEL_SECONDS),
            },
        };

        let mut entity = Self {
            id,
            body,
            dead: false,
            radius: 0.0,
            spin: 0.0,
            points: Vec::new(),
            age: 0,
            born,
            caption: String::new(),
            font_size: FontSize::Small,
            pos: Vec2::ZERO,
            dir: Vec2::ZERO,
        };

        match kind {
            EntityKind::BigRock => entity.build_rock(BIG_ROCK_SPIN_DEGREES, BIG_ROCK_SCALE, rng),
            EntityKind::MedRock => entity.build_rock(MED_ROCK_SPIN_DEGREES, MED_ROCK_SCALE, rng),
            EntityKind::SmallRock => {
                entity.build_rock(SMALL_ROCK_SPIN_DEGREES, SMALL_ROCK_SCALE, rng)
            }
            EntityKind::Ship => {
                entity.points = SHIP_HULL
                    .iter()
                    .map(|point| rotated(*point, SHIP_START_ANGLE))
                    .collect();
            }
            EntityKind::Alien => entity.points = ALIEN_HULL.to_vec(),
            EntityKind::Projectile => entity.points = PROJECTILE_LINE.to_vec(),
            EntityKind::Debris | EntityKind::Spark => entity.build_debris(rng),
            EntityKind::Thrust => entity.points = THRUST_LINE.to_vec(),
            EntityKind::Label => {}
        }

        entity.radius = mean_radius(&entity.points);
        entity
    }

    /// A jittered circle of `ROCK_POINTS` points (last closes the loop).
    fn build_rock(&mut self, spin_degrees: f64, scale: f64, rng: &mut SeededRng) {
        self.spin = degrees(spin_degrees);
        if rng.coin() {
            self.spin = -self.spin;
        }

        let outline = ROCK_POINTS - 1;
        let step = TAU / outline as f64;
        let mut points = Vec::with_capacity(ROCK_POINTS);
        for n in 0..outline {
            let alpha = step * n as f64;
            let base = Vec2::new(alpha.sin(), alpha.cos()) * (ROCK_BASE_RADIUS * scale);
            points.push(jitter(base, ROCK_JITTER, rng));
        }
        points.push(points[0]);
        self.points = points;
    }

    fn build_debris(&mut self, rng: &mut SeededRng) {
        let mut points: Vec<Vec2> = DEBRIS_SHARD
            .iter()
            .map(|point| jitter(*point, DEBRIS_JITTER, rng))
            .collect();
        points.push(points[0]);
        self.points = points;

        let facing = TAU * rng.next_unit();
        self.rotate(facing);

        self.spin = degrees(DEBRIS_SPIN_DEGREES);
        if rng.coin() {
            self.spin = -self.spin;
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        match self.body {
            Body::BigRock => EntityKind::BigRock,
            Body::MedRock => EntityKind::MedRock,
            Body::SmallRock => EntityKind::SmallRock,
            Body::Ship(_) => EntityKind::Ship,
            Body::Alien => EntityKind::Alien,
            Body::Projectile => EntityKind::Projectile,
            Body::Debris => EntityKind::Debris,
            Body::Spark => EntityKind::Spark,
            Body::Thrust => EntityKind::Thrust,
            Body::Label { .. } => EntityKind::Label,
        }
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.kind().mass()
    }

    #[inline]
    pub fn score_value(&self) -> u32 {
        self.kind().score_value()
    }

    #[inline]
    pub fn is_rock(&self) -> bool {
        self.kind().is_rock()
    }

    #[inline]
    pub fn can_enter_buffer(&self) -> bool {
        self.kind().can_enter_buffer()
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn mark_dead(&mut self) {
        self.dead = true;
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Ticks this entity has advanced through.
    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn born(&self) -> Duration {
        self.born
    }

    /// Per-tick rotation applied by [`Entity::advance`].
    pub fn spin(&self) -> f64 {
        self.spin
    }

    /// Rotates the polygon in place about the entity's position.
    pub fn rotate(&mut self, radians: f64) {
        if radians != 0.0 {
            for point in &mut self.points {
                rotate(point, radians);
            }
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Polygon points relative to `pos`.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Absolute position of point `index`; the origin once dead or when
    /// `index` is out of range.
    pub fn point_at(&self, index: usize) -> Vec2 {
        match self.points.get(index) {
            Some(point) if !self.dead => *point + self.pos,
            _ => Vec2::ZERO,
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: FontSize) {
        self.font_size = size;
    }

    /// Label lifetime; `None` for every other kind.
    pub fn label_lifetime(&self) -> Option<Duration> {
        match self.body {
            Body::Label { life } => Some(life),
            _ => None,
        }
    }

    pub fn set_label_lifetime(&mut self, seconds: u64) {
        if let Body::Label { life } = &mut self.body {
            *life = Duration::from_secs(seconds);
        }
    }

    pub fn ship(&self) -> Option<&ShipState> {
        match &self.body {
            Body::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn ship_mut(&mut self) -> Option<&mut ShipState> {
        match &mut self.body {
            Body::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    /// Would touching `other` destroy this entity? Evaluated separately for
    /// each side of a collision.
    pub fn is_fatal_to(&self, other: &Entity, area: PlayArea, rng: &mut SeededRng) -> bool {
        if other.dead {
            return false;
        }

        match self.body {
            Body::BigRock | Body::MedRock | Body::SmallRock => {
                if other.kind() == EntityKind::Projectile && other.age > 2 {
                    return true;
                }
                // Grazes in the Kuiper buffer are harmless.
                if !area.contains(self.pos) {
                    return false;
                }
                let closing_speed = (self.dir - other.dir).length();
                closing_speed > MAX_SHIP_SPEED / 5.0
                    && (other.mass() > self.mass()
                        || (other.mass() == self.mass() && rng.coin()))
            }
            Body::Ship(_) => other.mass() > self.mass(),
            Body::Alien => {
                area.contains(self.pos)
                    && (other.kind() == EntityKind::Projectile || other.mass() > self.mass())
            }
            Body::Projectile => other.mass() > 0.0,
            Body::Debris | Body::Spark => other.kind() == EntityKind::Projectile,
            Body::Thrust | Body::Label { .. } => false,
        }
    }

    /// Age, move and spin: the part of a tick shared by every kind.
    fn advance_base(&mut self) {
        self.age += 1;
        if self.age == TICK_WRAP {
            self.age = TICK_WRAP_RESET;
        }
        self.pos += self.dir;
        self.rotate(self.spin);
    }

    /// One tick of behavior. Aliens only move here; steering away from a
    /// threat is [`Entity::flee`], applied once every position is current.
    pub fn advance(&mut self, ctx: &mut TickContext<'_>) {
        if self.dead {
            return;
        }
        self.advance_base();

        match self.body {
            Body::BigRock | Body::MedRock => {
                if self.age > ROCK_LIFE_TICKS && ctx.rng().chance(ROCK_BREAK_PROB) {
                    self.detonate(ctx);
                }
            }
            Body::SmallRock => {}
            Body::Ship(_) => self.advance_ship(ctx),
            Body::Alien => {}
            Body::Projectile => {
                let speed = self.dir.length();
                let range = PROJECTILE_RANGE_FRACTION * f64::from(ctx.area().min_dimension());
                self.dead = speed == 0.0 || speed * f64::from(self.age) > range;
            }
            Body::Debris => {
                if ctx.now().saturating_sub(self.born) > DEBRIS_MIN_AGE
                    && ctx.rng().chance(DEBRIS_DEATH_PROB)
                {
                    self.detonate(ctx);
                }
            }
            Body::Spark => {
                let roll = ctx.rng().next_unit();
                if roll < SPARK_DEATH_PROB || ctx.now().saturating_sub(self.born) > SPARK_MAX_AGE
                {
                    self.detonate(ctx);
                }
            }
            Body::Thrust => self.dead = self.age > 1,
            Body::Label { life } => self.dead = ctx.now().saturating_sub(self.born) > life,
        }
    }

    fn advance_ship(&mut self, ctx: &mut TickContext<'_>) {
        let Self {
            body,
            points,
            pos,
            dir,
            age,
            ..
        } = self;
        let Body::Ship(ship) = body else {
            return;
        };

        if ship.fire_charge < MAX_CHARGE && *age % RECHARGE_TICKS == 0 {
            ship.fire_charge += 1;
        }

        let step = degrees(SHIP_ROTATE_DEGREES);
        match ship.turn {
            Turn::Left => ship.alpha -= step,
            Turn::Right => ship.alpha += step,
            Turn::Stop => {}
        }
        if ship.turn != Turn::Stop {
            ship.reset_geometry(points);
        }

        if ship.thrusting {
            let push = heading(ship.alpha) * SHIP_PUSH_MULT;
            let exhaust = push * (-MAX_SHIP_SPEED / 2.0) + *dir;

            for _ in 0..SHIP_EXHAUST_PARTICLES {
                let along = ctx.rng().next_unit();
                let exit = ship.exhaust_plane * along + ship.exhaust_corner + *pos;
                ctx.spawn(EntityKind::Thrust, exit, exhaust)
                    .rotate(ship.alpha);
            }

            *dir += push;
            limit_magnitude(dir, MAX_SHIP_SPEED);
        }

        if ship.fire_requested && !ship.fire_lock && ship.fire_charge > 0 {
            let shot = heading(ship.alpha) * MAX_SHIP_SPEED + *dir;
            *dir -= shot * FIRE_RECOIL_MULT;

            ctx.spawn(EntityKind::Projectile, ship.nose + *pos, shot)
                .rotate(ship.alpha);

            ship.fire_lock = true;
            ship.just_fired = true;
            ship.fire_charge -= 1;
        } else {
            ship.fire_requested = false;
            ship.just_fired = false;
        }
    }

    /// Marks the entity dead and scatters its fragments.
    pub fn detonate(&mut self, ctx: &mut TickContext<'_>) {
        self.dead = true;

        match self.body {
            Body::BigRock => {
                self.spawn_fragments(ctx, EntityKind::MedRock, 2, 1.0);
                self.spawn_fragments(ctx, EntityKind::Spark, 5, 4.0);
            }
            Body::MedRock => {
                self.spawn_fragments(ctx, EntityKind::SmallRock, 2, 1.0);
                self.spawn_fragments(ctx, EntityKind::Spark, 3, 2.0);
            }
            Body::SmallRock | Body::Ship(_) | Body::Alien => {
                self.spawn_fragments(ctx, EntityKind::Debris, 5, 1.0);
            }
            Body::Projectile
            | Body::Debris
            | Body::Spark
            | Body::Thrust
            | Body::Label { .. } => {}
        }
    }

    /// Pushes a live alien away from `threat`, capped at its top speed.
    pub fn flee(&mut self, threat: Option<Vec2>) {
        if self.dead || !matches!(self.body, Body::Alien) {
            return;
        }
        self.dir += alien_push(self.pos, self.radius, threat);
        limit_magnitude(&mut self.dir, MAX_ALIEN_SPEED);
    }

    /// Spawns `count` entities of `kind` evenly around a circle of this
    /// entity's radius, each launched sideways at `speed_factor` on top of
    /// half this entity's velocity.
    pub fn spawn_fragments(
        &self,
        ctx: &mut TickContext<'_>,
        kind: EntityKind,
        count: usize,
        speed_factor: f64,
    ) {
        if count == 0 {
            return;
        }

        let mut launch = rotated(self.dir, TAU / 4.0);
        if launch != Vec2::ZERO {
            launch *= speed_factor / launch.length();
        }

        let mut offset = self.dir;
        if offset != Vec2::ZERO {
            offset *= self.radius / offset.length();
            rotate(&mut offset, TAU / 4.0);
        }

        let drift = self.dir / 2.0;
        let step = TAU / count as f64;
        for _ in 0..count {
            ctx.spawn(kind, self.pos + offset, drift + launch);
            rotate(&mut launch, step);
            rotate(&mut offset, step);
        }
    }
}

/// Position of the nearest live entity an alien should flee: anything heavier
/// than the alien, or the ship.
pub fn nearest_threat<'a>(
    alien: &Entity,
    candidates: impl IntoIterator<Item = &'a Entity>,
) -> Option<Vec2> {
    let mut nearest: Option<(f64, Vec2)> = None;

    for other in candidates {
        if other.dead || other.id == alien.id {
            continue;
        }
        if !(other.mass() > alien.mass() || other.kind() == EntityKind::Ship) {
            continue;
        }

        let distance = (alien.pos - other.pos).length();
        if nearest.map_or(true, |(best, _)| distance < best) {
            nearest = Some((distance, other.pos));
        }
    }

    nearest.map(|(_, pos)| pos)
}

/// Repulsion away from `threat`, falling off with the squared distance.
pub fn alien_push(pos: Vec2, radius: f64, threat: Option<Vec2>) -> Vec2 {
    let Some(threat) = threat else {
        return Vec2::ZERO;
    };

    let mut push = pos - threat;
    let distance = push.length();
    if distance > 0.0 {
        push *= ALIEN_PUSH_RADII * radius / (distance * distance);
    }
    push * ALIEN_PUSH_MULT
}

/// Mean distance of `points` from the origin.
pub fn mean_radius(points: &[Vec2]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let count = points.len() as f64;
    points.iter().map(|point| point.length() / count).sum()
}

fn jitter(point: Vec2, factor: f64, rng: &mut SeededRng) -> Vec2 {
    let dx = factor * point.x * rng.next_signed();
    let dy = factor * point.y * rng.next_signed();
    point + Vec2::new(dx, dy)
}

#[cfg(test)]
mod tests;
