use core::time::Duration;
use std::cell::Cell;

use crate::clock::{Clock, SystemClock};
use crate::config::{difficulty_in_range, EngineConfig};
use crate::constants::{
    half_max_ramp, ALIEN_CHEAT_CAP, ALIEN_PROB, DEFAULT_DIFFICULTY, DEFAULT_INITIAL_ROCKS,
    DEFAULT_PLAY_HEIGHT, DEFAULT_PLAY_WIDTH, DEMO_LIVES, END_GAME_PAUSE, EXTRA_LIFE_PROB,
    KUIPER_DIVISOR, MAX_CHARGE, MAX_SHIP_SPEED, REBOUND_LOOKAHEAD, REVIVE_PAUSE, ROCK_MAKE_PROB,
    ROCK_SPEED_MULT, STARTING_LIVES, TICK_WRAP, TICK_WRAP_RESET,
};
use crate::context::{PlayArea, TickContext};
use crate::entity::{nearest_threat, Entity, EntityKind, FontSize, ShipState, Turn};
use crate::error::RuleCode;
use crate::rng::SeededRng;
use crate::sim::{Checkpoint, Snapshot};
use crate::vector::{limit_magnitude, Vec2};

const DEMO_FIRE_PROB: f64 = 0.3;
const DEMO_CHANGE_PROB: f64 = 0.1;

/// The simulation: an owning roster of entities, the session counters, and
/// the deadlines that move a session between new life, play and game over.
///
/// Nothing here blocks. A poller calls [`Engine::tick`] at a fixed interval
/// and a renderer reads the roster between ticks.
pub struct Engine {
    roster: Vec<Entity>,
    pending: Vec<Entity>,
    rng: SeededRng,
    clock: Box<dyn Clock>,
    next_id: u64,
    tick_count: u32,
    ship_slot: Cell<Option<(usize, u64)>>,
    area: PlayArea,
    difficulty: f64,
    lives: i32,
    initial_rocks: usize,
    score: u32,
    last_score: u32,
    high_score: u32,
    active: bool,
    new_life_at: Option<Duration>,
    demo_end_at: Option<Duration>,
    game_over_at: Option<Duration>,
    explosion_sound: Option<EntityKind>,
    died_sound: bool,
    alien_sound: bool,
}

impl Engine {
    pub fn new(seed: u32) -> Self {
        Self::with_clock(seed, Box::new(SystemClock::new()))
    }

    pub fn with_clock(seed: u32, clock: Box<dyn Clock>) -> Self {
        Self {
            roster: Vec::new(),
            pending: Vec::new(),
            rng: SeededRng::new(seed),
            clock,
            next_id: 1,
            tick_count: 0,
            ship_slot: Cell::new(None),
            area: PlayArea::new(DEFAULT_PLAY_WIDTH, DEFAULT_PLAY_HEIGHT),
            difficulty: DEFAULT_DIFFICULTY,
            lives: 0,
            initial_rocks: DEFAULT_INITIAL_ROCKS,
            score: 0,
            last_score: 0,
            high_score: 0,
            active: false,
            new_life_at: None,
            demo_end_at: None,
            game_over_at: None,
            explosion_sound: None,
            died_sound: false,
            alien_sound: false,
        }
    }

    /// Engine sized and tuned by `config`. An out-of-range difficulty is
    /// ignored like any other [`Engine::set_difficulty`] call.
    pub fn from_config(seed: u32, config: &EngineConfig, clock: Box<dyn Clock>) -> Self {
        let mut engine = Self::with_clock(seed, clock);
        engine.set_play_area(config.play_area());
        engine.set_difficulty(config.difficulty);
        engine.initial_rocks = config.initial_rocks;
        engine
    }

    // Session control

    pub fn start_game(&mut self, rocks: usize) {
        self.begin_session(rocks, STARTING_LIVES, None, "NEW GAME");
        tracing::info!(rocks, seed_state = self.rng.state(), "game started");
    }

    /// Starts a self-playing demo. A length past the clock's range never ends
    /// on its own.
    pub fn start_demo(&mut self, seconds: u64, rocks: usize) {
        let end = self
            .clock
            .now()
            .checked_add(Duration::from_secs(seconds))
            .unwrap_or(Duration::MAX);
        self.begin_session(rocks, DEMO_LIVES, Some(end), "DEMO");
        tracing::info!(rocks, seconds, "demo started");
    }

    fn begin_session(&mut self, rocks: usize, lives: i32, demo_end: Option<Duration>, title: &str) {
        let now = self.clock.now();
        self.clear_roster();

        self.tick_count = 0;
        self.score = 0;
        self.game_over_at = None;
        self.active = true;
        self.demo_end_at = demo_end;
        self.initial_rocks = rocks;
        self.lives = lives;

        self.spawn_label(self.area.center(), Vec2::ZERO, title, FontSize::Medium);
        self.new_life_at = Some(now + REVIVE_PAUSE);
    }

    pub fn stop(&mut self) {
        if self.active {
            tracing::info!(score = self.score, "session stopped");
        }
        self.active = false;
        self.lives = 0;
        self.clear_roster();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_in_demo(&self) -> bool {
        self.active && self.demo_end_at.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.active && !self.is_in_demo()
    }

    /// True once the game-over label has been on screen long enough, or
    /// whenever the engine is inactive.
    pub fn is_game_over(&self) -> bool {
        !self.active || self.game_over_at.is_some_and(|at| self.clock.now() > at)
    }

    // Per-frame update

    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        let now = self.clock.now();

        if self.is_in_demo() {
            self.puppet_ship();
        }

        self.state_tick(now);

        if !self.is_in_demo() {
            self.last_score = self.score;
            self.high_score = self.high_score.max(self.score);
        }

        let mut ended = false;
        if let Some(at) = self.new_life_at {
            if now > at {
                self.new_life_at = None;
                if self.lives > 0 {
                    self.launch_life();
                } else {
                    ended = true;
                }
            }
        }
        ended |= self.is_in_demo() && self.demo_end_at.is_some_and(|end| now > end);

        if ended && self.game_over_at.is_none() {
            self.game_over_at = Some(now + END_GAME_PAUSE);
            let center = self.area.center();
            self.spawn_label(center, Vec2::ZERO, "GAME OVER", FontSize::Large);
            tracing::info!(
                score = self.score,
                demo = self.is_in_demo(),
                tick = self.tick_count,
                "game over"
            );
        }
    }

    /// Scripted randomness standing in for a player during demos.
    fn puppet_ship(&mut self) {
        let Some(index) = self.ship_index() else {
            return;
        };
        let rng = &mut self.rng;
        let Some(ship) = self.roster[index].ship_mut() else {
            return;
        };

        ship.release_fire_lock(true);
        if rng.chance(DEMO_FIRE_PROB) {
            ship.fire();
        }
        if rng.chance(DEMO_CHANGE_PROB) {
            ship.set_turn(Turn::Stop);
            ship.set_thrust(false);

            let action = rng.next_unit();
            if action < 0.2 {
                ship.set_thrust(true);
            } else if action < 0.5 {
                ship.set_turn(Turn::Left);
            } else if action < 0.8 {
                ship.set_turn(Turn::Right);
            }
        }
    }

    fn state_tick(&mut self, now: Duration) {
        self.tick_count += 1;
        if self.tick_count >= TICK_WRAP {
            self.tick_count = TICK_WRAP_RESET;
        }

        self.explosion_sound = None;
        self.died_sound = false;
        self.alien_sound = false;

        self.roster.retain(|entity| !entity.is_dead());

        // Entities spawned from here on sit out this tick's collision pass.
        let count = self.roster.len();
        for index in 0..count {
            self.advance_entity(index, now);
        }

        self.collide(count, now);
        self.spawn_arrivals();

        let area = self.area;
        for entity in &mut self.roster {
            entity.pos = area.wrap(entity.kind(), entity.pos);
        }

        tracing::trace!(tick = self.tick_count, roster = self.roster.len(), "state tick");
    }

    fn advance_entity(&mut self, index: usize, now: Duration) {
        let mut ctx = TickContext::new(
            &mut self.rng,
            now,
            self.area,
            &mut self.next_id,
            &mut self.pending,
        );
        self.roster[index].advance(&mut ctx);

        // Steer from where the alien now is, not where it started the tick.
        if self.roster[index].kind() == EntityKind::Alien {
            let threat = nearest_threat(&self.roster[index], &self.roster);
            self.roster[index].flee(threat);
        }
        self.roster.append(&mut self.pending);
    }

    fn collide(&mut self, count: usize, now: Duration) {
        for first in 0..count {
            for second in first + 1..count {
                if self.roster[first].is_dead() {
                    break;
                }
                if crashed(&self.roster[first], &self.roster[second]) {
                    self.resolve_crash(first, second, now);
                }
            }
        }
    }

    fn resolve_crash(&mut self, first: usize, second: usize, now: Duration) {
        let (head, tail) = self.roster.split_at_mut(second);
        let (a, b) = (&mut head[first], &mut tail[0]);

        if let Some((dir_a, dir_b)) = rebound(a, b) {
            a.dir = dir_a;
            b.dir = dir_b;
        }

        let a_dies = a.is_fatal_to(b, self.area, &mut self.rng);
        let b_dies = b.is_fatal_to(a, self.area, &mut self.rng);
        if !(a_dies || b_dies) {
            return;
        }

        let mut ctx = TickContext::new(
            &mut self.rng,
            now,
            self.area,
            &mut self.next_id,
            &mut self.pending,
        );
        if a_dies {
            a.detonate(&mut ctx);
        }
        if b_dies {
            b.detonate(&mut ctx);
        }

        let victim = if b_dies && a.kind() == EntityKind::Projectile {
            Some((b.kind(), b.pos, b.dir))
        } else if a_dies && b.kind() == EntityKind::Projectile {
            Some((a.kind(), a.pos, a.dir))
        } else {
            None
        };
        let losses = [(a_dies, a.kind()), (b_dies, b.kind())];
        self.roster.append(&mut self.pending);

        for (died, kind) in losses {
            if !died {
                continue;
            }
            if kind.is_rock() {
                self.note_explosion(kind);
            }
            if kind == EntityKind::Ship {
                self.lose_life(now);
            }
        }

        if let Some((kind, pos, dir)) = victim {
            let points = kind.score_value();
            if kind == EntityKind::Alien {
                self.reward_alien_kill(points, pos, dir);
            }
            self.score = self.score.saturating_add(points);
        }
    }

    /// Keeps the loudest rock explosion of the tick.
    fn note_explosion(&mut self, kind: EntityKind) {
        let louder = self
            .explosion_sound
            .map_or(true, |current| kind.mass() > current.mass());
        if louder {
            self.explosion_sound = Some(kind);
        }
    }

    fn lose_life(&mut self, now: Duration) {
        self.lives -= 1;
        self.died_sound = true;
        self.new_life_at = Some(now + REVIVE_PAUSE);
        tracing::debug!(lives = self.lives, tick = self.tick_count, "ship lost");
    }

    fn reward_alien_kill(&mut self, points: u32, pos: Vec2, dir: Vec2) {
        self.alien_sound = true;
        let caption = if self.rng.chance(EXTRA_LIFE_PROB) {
            self.lives += 1;
            String::from("EXTRA LIFE")
        } else {
            points.to_string()
        };
        tracing::debug!(caption = %caption, lives = self.lives, "alien destroyed");
        self.spawn_label(pos, dir, caption, FontSize::Small);
    }

    fn spawn_arrivals(&mut self) {
        let ramp = half_max_ramp(self.tick_count);

        if self.rng.chance(2.0 * self.difficulty * ROCK_MAKE_PROB * ramp) {
            self.spawn_in_buffer(EntityKind::BigRock, self.tick_count);
        }
        if self.rng.chance(ALIEN_PROB * ramp) && self.count_live(EntityKind::Alien) == 0 {
            self.spawn_in_buffer(EntityKind::Alien, 0);
        }
    }

    /// A fresh ship at the center and the opening rocks; every entity left
    /// over from the previous life is condemned.
    fn launch_life(&mut self) {
        for entity in &mut self.roster {
            entity.mark_dead();
        }
        for _ in 0..self.initial_rocks {
            self.spawn_in_buffer(EntityKind::BigRock, 0);
        }
        let center = self.area.center();
        self.spawn(EntityKind::Ship, center, Vec2::ZERO);
        tracing::debug!(lives = self.lives, rocks = self.initial_rocks, "ship launched");
    }

    fn clear_roster(&mut self) {
        self.roster.clear();
        self.pending.clear();
        self.ship_slot.set(None);
    }

    // Spawning

    /// Adds a new entity at the end of the roster and returns its index.
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2, dir: Vec2) -> usize {
        let id = self.next_id;
        self.next_id += 1;

        let mut entity = Entity::new(kind, id, self.clock.now(), &mut self.rng);
        entity.pos = pos;
        entity.dir = dir;
        self.roster.push(entity);
        self.roster.len() - 1
    }

    /// Spawns `kind` at a random spot in the Kuiper buffer, moving in a random
    /// direction. Later ticks (and harder levels) launch faster objects.
    pub fn spawn_in_buffer(&mut self, kind: EntityKind, tick: u32) -> usize {
        let index = self.spawn(kind, Vec2::ZERO, Vec2::ZERO);

        let speed = ROCK_SPEED_MULT * (0.5 + MAX_SHIP_SPEED * self.difficulty * half_max_ramp(tick));
        let dir = Vec2::new(
            speed * self.rng.next_signed(),
            speed * self.rng.next_signed(),
        );

        let (w, h) = (self.area.width, self.area.height);
        let (kw, kh) = (w / KUIPER_DIVISOR, h / KUIPER_DIVISOR);
        let pos = if self.rng.coin() {
            let x = if self.rng.coin() { -kw / 2 } else { w + kw / 2 };
            let y = self.rng.next_unit() * f64::from(h + 2 * kh) - f64::from(kh);
            Vec2::new(f64::from(x), y)
        } else {
            let x = self.rng.next_unit() * f64::from(w + 2 * kw) - f64::from(kw);
            let y = if self.rng.coin() { -kh / 2 } else { h + kh / 2 };
            Vec2::new(x, f64::from(y))
        };

        let entity = &mut self.roster[index];
        entity.pos = pos;
        entity.dir = dir;
        index
    }

    fn spawn_label(&mut self, pos: Vec2, dir: Vec2, caption: impl Into<String>, size: FontSize) {
        let index = self.spawn(EntityKind::Label, pos, dir);
        let label = &mut self.roster[index];
        label.set_caption(caption);
        label.set_font_size(size);
    }

    /// Detonates the entity at `index`, adding its fragments to the roster.
    pub fn detonate(&mut self, index: usize) {
        let now = self.clock.now();
        let mut ctx = TickContext::new(
            &mut self.rng,
            now,
            self.area,
            &mut self.next_id,
            &mut self.pending,
        );
        self.roster[index].detonate(&mut ctx);
        self.roster.append(&mut self.pending);
    }

    /// Cheat: one more alien, up to a cap of concurrent aliens.
    pub fn add_alien_cheat(&mut self) {
        if self.active && self.count_live(EntityKind::Alien) < ALIEN_CHEAT_CAP {
            self.spawn_in_buffer(EntityKind::Alien, 0);
            tracing::debug!("cheat alien added");
        }
    }

    pub fn count_live(&self, kind: EntityKind) -> usize {
        self.roster
            .iter()
            .filter(|entity| entity.kind() == kind && !entity.is_dead())
            .count()
    }

    // Ship controls

    /// Roster index of the live ship. The last hit is cached and re-checked by
    /// entity id, since purges shift indices.
    fn ship_index(&self) -> Option<usize> {
        if let Some((index, id)) = self.ship_slot.get() {
            if self
                .roster
                .get(index)
                .is_some_and(|entity| entity.id() == id && !entity.is_dead())
            {
                return Some(index);
            }
        }

        let index = self
            .roster
            .iter()
            .position(|entity| entity.kind() == EntityKind::Ship && !entity.is_dead());
        self.ship_slot
            .set(index.map(|index| (index, self.roster[index].id())));
        index
    }

    pub fn ship(&self) -> Option<&Entity> {
        self.ship_index().map(|index| &self.roster[index])
    }

    fn player_ship(&mut self) -> Option<&mut ShipState> {
        if self.is_in_demo() {
            return None;
        }
        let index = self.ship_index()?;
        self.roster[index].ship_mut()
    }

    pub fn turn(&mut self, turn: Turn) {
        if let Some(ship) = self.player_ship() {
            ship.set_turn(turn);
        }
    }

    pub fn set_thrust(&mut self, on: bool) {
        if let Some(ship) = self.player_ship() {
            ship.set_thrust(on);
        }
    }

    pub fn fire(&mut self) {
        if let Some(ship) = self.player_ship() {
            ship.fire();
        }
    }

    pub fn release_fire(&mut self) {
        if let Some(ship) = self.player_ship() {
            ship.release_fire_lock(false);
        }
    }

    pub fn fire_charge(&self) -> i32 {
        self.ship()
            .and_then(Entity::ship)
            .map_or(0, ShipState::fire_charge)
    }

    // Sounds

    /// The heaviest rock that exploded this tick. Reading consumes it.
    pub fn take_explosion_sound(&mut self) -> Option<EntityKind> {
        self.explosion_sound.take()
    }

    pub fn fire_sound(&self) -> bool {
        self.ship()
            .and_then(Entity::ship)
            .is_some_and(ShipState::just_fired)
    }

    pub fn thrust_sound(&self) -> bool {
        self.ship()
            .and_then(Entity::ship)
            .is_some_and(ShipState::is_thrusting)
    }

    pub fn alien_sound(&self) -> bool {
        self.alien_sound
    }

    pub fn died_sound(&self) -> bool {
        self.died_sound
    }

    // Counters and settings

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Score of the last non-demo tick; survives the end of a game.
    pub fn last_score(&self) -> u32 {
        self.last_score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn set_high_score(&mut self, score: u32) {
        self.high_score = score;
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    /// Accepts levels in `(0, 1]`; anything else keeps the current level.
    pub fn set_difficulty(&mut self, level: f64) {
        if difficulty_in_range(level) {
            self.difficulty = level;
        } else {
            tracing::debug!(level, kept = self.difficulty, "ignoring difficulty");
        }
    }

    pub fn play_area(&self) -> PlayArea {
        self.area
    }

    pub fn set_play_area(&mut self, area: PlayArea) {
        self.area = area;
    }

    pub fn min_dimension(&self) -> i32 {
        self.area.min_dimension()
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    // Roster access

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Entity at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn entity(&self, index: usize) -> &Entity {
        match self.roster.get(index) {
            Some(entity) => entity,
            None => panic!(
                "entity index {index} out of range for roster of {}",
                self.roster.len()
            ),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.roster.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.roster.get_mut(index)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.roster
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::capture(self)
    }

    pub fn validate(&self) -> Result<(), RuleCode> {
        if self.lives < 0 {
            return Err(RuleCode::LivesNonNegative);
        }
        if !difficulty_in_range(self.difficulty) {
            return Err(RuleCode::DifficultyRange);
        }
        if !self.active && !self.roster.is_empty() {
            return Err(RuleCode::InactiveRoster);
        }

        let mut ships = 0;
        for entity in &self.roster {
            let radius = entity.radius();
            if !radius.is_finite() || radius < 0.0 {
                return Err(RuleCode::EntityRadius);
            }
            if entity.is_dead() {
                continue;
            }
            if !self.area.holds(entity.kind(), entity.pos) {
                return Err(RuleCode::EntityBounds);
            }
            if let Some(ship) = entity.ship() {
                ships += 1;
                if !(0..=MAX_CHARGE).contains(&ship.fire_charge()) {
                    return Err(RuleCode::FireChargeRange);
                }
            }
        }
        if ships > 1 {
            return Err(RuleCode::ShipCount);
        }

        Ok(())
    }
}

/// Both alive, both massive, and touching.
pub fn crashed(a: &Entity, b: &Entity) -> bool {
    !a.is_dead()
        && !b.is_dead()
        && a.mass() > 0.0
        && b.mass() > 0.0
        && (a.pos - b.pos).length() <= a.radius() + b.radius()
}

/// Post-collision velocities for `a` and `b`, or `None` when the pair is
/// already separating. Momentum is conserved before the speed clamp.
pub fn rebound(a: &Entity, b: &Entity) -> Option<(Vec2, Vec2)> {
    let (mass_a, mass_b) = (a.mass(), b.mass());
    let mass = mass_a + mass_b;
    if mass <= 0.0 {
        return None;
    }

    let gap = a.pos - b.pos;
    let closing = gap.length() > (gap + REBOUND_LOOKAHEAD * (a.dir - b.dir)).length();
    if !closing {
        return None;
    }

    let (mut dir_a, mut dir_b) = rebound_velocities(a.dir, mass_a, b.dir, mass_b);
    limit_magnitude(&mut dir_a, MAX_SHIP_SPEED);
    limit_magnitude(&mut dir_b, MAX_SHIP_SPEED);
    Some((dir_a, dir_b))
}

/// One-dimensional elastic collision applied per component.
pub fn rebound_velocities(a: Vec2, mass_a: f64, b: Vec2, mass_b: f64) -> (Vec2, Vec2) {
    let mass = mass_a + mass_b;
    let dir_a = (a * (mass_a - mass_b) + 2.0 * b * mass_b) / mass;
    let dir_b = (b * (mass_b - mass_a) + 2.0 * a * mass_a) / mass;
    (dir_a, dir_b)
}
