use super::*;
use crate::constants::{DEFAULT_PLAY_HEIGHT, DEFAULT_PLAY_WIDTH};

const AREA: PlayArea = PlayArea::new(DEFAULT_PLAY_WIDTH, DEFAULT_PLAY_HEIGHT);

struct Bench {
    rng: SeededRng,
    next_id: u64,
    spawned: Vec<Entity>,
}

impl Bench {
    fn new(seed: u32) -> Self {
        Self {
            rng: SeededRng::new(seed),
            next_id: 1,
            spawned: Vec::new(),
        }
    }

    fn make(&mut self, kind: EntityKind, pos: Vec2, dir: Vec2) -> Entity {
        let id = self.next_id;
        self.next_id += 1;
        let mut entity = Entity::new(kind, id, Duration::ZERO, &mut self.rng);
        entity.pos = pos;
        entity.dir = dir;
        entity
    }

    fn advance_at(&mut self, entity: &mut Entity, now: Duration) {
        let mut ctx = TickContext::new(
            &mut self.rng,
            now,
            AREA,
            &mut self.next_id,
            &mut self.spawned,
        );
        entity.advance(&mut ctx);
    }

    fn advance(&mut self, entity: &mut Entity) {
        self.advance_at(entity, Duration::ZERO);
    }

    fn detonate(&mut self, entity: &mut Entity) {
        let mut ctx = TickContext::new(
            &mut self.rng,
            Duration::ZERO,
            AREA,
            &mut self.next_id,
            &mut self.spawned,
        );
        entity.detonate(&mut ctx);
    }

    fn count(&self, kind: EntityKind) -> usize {
        self.spawned.iter().filter(|e| e.kind() == kind).count()
    }
}

fn mid() -> Vec2 {
    AREA.center()
}

#[test]
fn rocks_are_closed_jittered_circles() {
    let mut bench = Bench::new(0x5EED);
    for (kind, scale) in [
        (EntityKind::BigRock, BIG_ROCK_SCALE),
        (EntityKind::MedRock, MED_ROCK_SCALE),
        (EntityKind::SmallRock, SMALL_ROCK_SCALE),
    ] {
        let rock = bench.make(kind, mid(), Vec2::ZERO);
        assert_eq!(rock.point_count(), ROCK_POINTS);
        assert_eq!(rock.points()[0], rock.points()[ROCK_POINTS - 1]);

        let nominal = ROCK_BASE_RADIUS * scale;
        assert!(
            (rock.radius() - nominal).abs() <= nominal * ROCK_JITTER,
            "{kind:?} radius {} strays from {nominal}",
            rock.radius()
        );
        assert!(rock.spin().abs() > 0.0);
    }
}

#[test]
fn big_rock_detonates_into_two_medium_rocks_and_five_sparks() {
    let mut bench = Bench::new(11);
    let mut rock = bench.make(EntityKind::BigRock, mid(), Vec2::new(1.0, 0.5));
    bench.detonate(&mut rock);

    assert!(rock.is_dead());
    assert_eq!(bench.spawned.len(), 7);
    assert_eq!(bench.count(EntityKind::MedRock), 2);
    assert_eq!(bench.count(EntityKind::Spark), 5);
}

#[test]
fn medium_rock_detonates_into_small_rocks_and_sparks() {
    let mut bench = Bench::new(12);
    let mut rock = bench.make(EntityKind::MedRock, mid(), Vec2::new(0.0, -2.0));
    bench.detonate(&mut rock);

    assert_eq!(bench.count(EntityKind::SmallRock), 2);
    assert_eq!(bench.count(EntityKind::Spark), 3);
}

#[test]
fn ships_aliens_and_small_rocks_leave_debris() {
    for kind in [EntityKind::SmallRock, EntityKind::Ship, EntityKind::Alien] {
        let mut bench = Bench::new(13);
        let mut entity = bench.make(kind, mid(), Vec2::new(0.3, 0.3));
        bench.detonate(&mut entity);
        assert_eq!(bench.count(EntityKind::Debris), 5, "{kind:?}");
        assert_eq!(bench.spawned.len(), 5, "{kind:?}");
    }
}

#[test]
fn fragments_of_a_resting_entity_share_its_position() {
    let mut bench = Bench::new(14);
    let mut rock = bench.make(EntityKind::BigRock, mid(), Vec2::ZERO);
    bench.detonate(&mut rock);

    for fragment in &bench.spawned {
        assert_eq!(fragment.pos, mid());
        assert_eq!(fragment.dir, Vec2::ZERO);
    }
}

#[test]
fn fragments_launch_sideways_at_the_requested_speed() {
    let mut bench = Bench::new(15);
    let dir = Vec2::new(2.0, 0.0);
    let rock = bench.make(EntityKind::MedRock, mid(), dir);
    let mut ctx = TickContext::new(
        &mut bench.rng,
        Duration::ZERO,
        AREA,
        &mut bench.next_id,
        &mut bench.spawned,
    );
    rock.spawn_fragments(&mut ctx, EntityKind::SmallRock, 2, 1.0);

    let drift = dir / 2.0;
    for fragment in &bench.spawned {
        let launch = fragment.dir - drift;
        assert!((launch.length() - 1.0).abs() < 1e-9);
        assert!(launch.dot(dir).abs() < 1e-9, "launch must be perpendicular");
        assert!(((fragment.pos - mid()).length() - rock.radius()).abs() < 1e-9);
    }
    // Two fragments sit on opposite sides.
    let gap = bench.spawned[0].pos - bench.spawned[1].pos;
    assert!((gap.length() - 2.0 * rock.radius()).abs() < 1e-9);
}

#[test]
fn empty_ship_gun_does_not_fire() {
    let mut bench = Bench::new(21);
    let mut ship = bench.make(EntityKind::Ship, mid(), Vec2::ZERO);
    let state = ship.ship_mut().expect("ship state");
    state.set_fire_charge(0);
    state.fire();

    bench.advance(&mut ship);

    assert_eq!(bench.count(EntityKind::Projectile), 0);
    assert_eq!(ship.ship().map(ShipState::fire_charge), Some(0));
    assert!(!ship.ship().is_some_and(ShipState::just_fired));
}

#[test]
fn one_press_fires_one_shot() {
    let mut bench = Bench::new(22);
    let mut ship = bench.make(EntityKind::Ship, mid(), Vec2::ZERO);

    ship.ship_mut().expect("ship state").fire();
    bench.advance(&mut ship);
    assert_eq!(bench.count(EntityKind::Projectile), 1);
    assert!(ship.ship().is_some_and(ShipState::just_fired));
    assert!(ship.ship().is_some_and(ShipState::is_fire_locked));
    assert_eq!(ship.ship().map(ShipState::fire_charge), Some(MAX_CHARGE - 1));

    // Holding the button does nothing more.
    ship.ship_mut().expect("ship state").fire();
    bench.advance(&mut ship);
    assert_eq!(bench.count(EntityKind::Projectile), 1);
    assert!(!ship.ship().is_some_and(ShipState::just_fired));

    // Release and press again.
    let state = ship.ship_mut().expect("ship state");
    state.release_fire_lock(false);
    state.fire();
    bench.advance(&mut ship);
    assert_eq!(bench.count(EntityKind::Projectile), 2);
}

#[test]
fn firing_recoils_the_ship_backwards() {
    let mut bench = Bench::new(23);
    let mut ship = bench.make(EntityKind::Ship, mid(), Vec2::ZERO);
    ship.ship_mut().expect("ship state").fire();
    bench.advance(&mut ship);

    let shot = &bench.spawned[0];
    assert!((shot.dir.length() - MAX_SHIP_SPEED).abs() < 1e-9);
    assert!(ship.dir.dot(shot.dir) < 0.0);
    assert!((ship.dir.length() - MAX_SHIP_SPEED * FIRE_RECOIL_MULT).abs() < 1e-9);
}

#[test]
fn gun_recharges_every_twelve_ticks() {
    let mut bench = Bench::new(24);
    let mut ship = bench.make(EntityKind::Ship, mid(), Vec2::ZERO);
    ship.ship_mut().expect("ship state").fire();
    bench.advance(&mut ship);
    assert_eq!(ship.ship().map(ShipState::fire_charge), Some(MAX_CHARGE - 1));

    while ship.age() < RECHARGE_TICKS {
        bench.advance(&mut ship);
    }
    assert_eq!(ship.ship().map(ShipState::fire_charge), Some(MAX_CHARGE));
}

#[test]
fn thrust_accelerates_and_sheds_exhaust() {
    let mut bench = Bench::new(25);
    let mut ship = bench.make(EntityKind::Ship, mid(), Vec2::ZERO);
    ship.ship_mut().expect("ship state").set_thrust(true);

    for _ in 0..200 {
        bench.advance(&mut ship);
        ship.pos = mid();
    }

    assert!((ship.dir.length() - MAX_SHIP_SPEED).abs() < 1e-9);
    assert_eq!(bench.count(EntityKind::Thrust), 400);
}

#[test]
fn turning_keeps_the_hull_shape() {
    let mut bench = Bench::new(26);
    let mut ship = bench.make(EntityKind::Ship, mid(), Vec2::ZERO);
    let radius = ship.radius();
    ship.ship_mut().expect("ship state").set_turn(Turn::Right);

    for _ in 0..40 {
        bench.advance(&mut ship);
    }

    let alpha = ship.ship().map_or(0.0, ShipState::orientation);
    assert!((alpha - (SHIP_START_ANGLE + 40.0 * degrees(SHIP_ROTATE_DEGREES))).abs() < 1e-9);
    for (point, canonical) in ship.points().iter().zip(SHIP_HULL) {
        assert!((*point - rotated(canonical, alpha)).length() < 1e-9);
    }
    assert!((mean_radius(ship.points()) - radius).abs() < 1e-9);
}

#[test]
fn resting_projectile_dies_on_next_tick() {
    let mut bench = Bench::new(31);
    let mut shot = bench.make(EntityKind::Projectile, mid(), Vec2::ZERO);
    bench.advance(&mut shot);
    assert!(shot.is_dead());
}

#[test]
fn projectile_range_is_three_quarters_of_the_short_side() {
    let mut bench = Bench::new(32);
    let mut shot = bench.make(EntityKind::Projectile, mid(), Vec2::new(10.0, 0.0));
    let range = PROJECTILE_RANGE_FRACTION * f64::from(AREA.min_dimension());

    let mut ticks = 0;
    while !shot.is_dead() {
        bench.advance(&mut shot);
        ticks += 1;
    }
    assert_eq!(f64::from(ticks), (range / 10.0).floor() + 1.0);
}

#[test]
fn thrust_particles_last_two_ticks() {
    let mut bench = Bench::new(33);
    let mut flame = bench.make(EntityKind::Thrust, mid(), Vec2::ZERO);
    bench.advance(&mut flame);
    assert!(!flame.is_dead());
    bench.advance(&mut flame);
    assert!(flame.is_dead());
}

#[test]
fn labels_expire_after_their_lifetime() {
    let mut bench = Bench::new(34);
    let mut label = bench.make(EntityKind::Label, mid(), Vec2::ZERO);
    label.set_label_lifetime(3);

    bench.advance_at(&mut label, Duration::from_secs(3));
    assert!(!label.is_dead());
    bench.advance_at(&mut label, Duration::from_millis(3_001));
    assert!(label.is_dead());
}

#[test]
fn sparks_never_outlive_one_second() {
    let mut bench = Bench::new(35);
    let mut spark = bench.make(EntityKind::Spark, mid(), Vec2::ZERO);
    bench.advance_at(&mut spark, Duration::from_millis(1_001));
    assert!(spark.is_dead());
    assert!(bench.spawned.is_empty());
}

#[test]
fn young_debris_survives() {
    let mut bench = Bench::new(36);
    let mut debris = bench.make(EntityKind::Debris, mid(), Vec2::ZERO);
    for _ in 0..100 {
        bench.advance_at(&mut debris, Duration::from_secs(1));
    }
    assert!(!debris.is_dead());
}

#[test]
fn slow_equal_mass_graze_is_harmless() {
    let mut bench = Bench::new(41);
    let a = bench.make(EntityKind::MedRock, mid(), Vec2::new(1.0, 0.0));
    let b = bench.make(EntityKind::MedRock, mid(), Vec2::new(0.5, 0.0));

    for _ in 0..64 {
        assert!(!a.is_fatal_to(&b, AREA, &mut bench.rng));
        assert!(!b.is_fatal_to(&a, AREA, &mut bench.rng));
    }
}

#[test]
fn fast_heavier_rock_crushes_lighter_one() {
    let mut bench = Bench::new(42);
    let small = bench.make(EntityKind::SmallRock, mid(), Vec2::new(2.0, 0.0));
    let big = bench.make(EntityKind::BigRock, mid(), Vec2::new(-2.0, 0.0));

    assert!(small.is_fatal_to(&big, AREA, &mut bench.rng));
    assert!(!big.is_fatal_to(&small, AREA, &mut bench.rng));
}

#[test]
fn rocks_in_the_buffer_shrug_off_crashes() {
    let mut bench = Bench::new(43);
    let outside = Vec2::new(-10.0, 50.0);
    let small = bench.make(EntityKind::SmallRock, outside, Vec2::new(5.0, 0.0));
    let big = bench.make(EntityKind::BigRock, outside, Vec2::new(-5.0, 0.0));
    assert!(!small.is_fatal_to(&big, AREA, &mut bench.rng));
}

#[test]
fn only_seasoned_projectiles_shatter_rocks_on_touch() {
    let mut bench = Bench::new(44);
    let rock = bench.make(EntityKind::BigRock, mid(), Vec2::ZERO);
    let mut shot = bench.make(EntityKind::Projectile, mid(), Vec2::new(1.0, 0.0));
    assert!(!rock.is_fatal_to(&shot, AREA, &mut bench.rng));

    for _ in 0..3 {
        bench.advance(&mut shot);
    }
    assert!(rock.is_fatal_to(&shot, AREA, &mut bench.rng));

    shot.mark_dead();
    assert!(!rock.is_fatal_to(&shot, AREA, &mut bench.rng));
}

#[test]
fn ship_dies_to_anything_heavier() {
    let mut bench = Bench::new(45);
    let ship = bench.make(EntityKind::Ship, mid(), Vec2::ZERO);
    let debris = bench.make(EntityKind::Debris, mid(), Vec2::ZERO);
    let alien = bench.make(EntityKind::Alien, mid(), Vec2::ZERO);

    assert!(!ship.is_fatal_to(&debris, AREA, &mut bench.rng));
    assert!(ship.is_fatal_to(&alien, AREA, &mut bench.rng));
}

#[test]
fn aliens_are_untouchable_outside_the_play_area() {
    let mut bench = Bench::new(46);
    let shot = bench.make(EntityKind::Projectile, mid(), Vec2::ZERO);
    let inside = bench.make(EntityKind::Alien, mid(), Vec2::ZERO);
    let outside = bench.make(EntityKind::Alien, Vec2::new(-20.0, -20.0), Vec2::ZERO);

    assert!(inside.is_fatal_to(&shot, AREA, &mut bench.rng));
    assert!(!outside.is_fatal_to(&shot, AREA, &mut bench.rng));
}

#[test]
fn massless_entities_are_never_fatal() {
    let mut bench = Bench::new(47);
    let rock = bench.make(EntityKind::BigRock, mid(), Vec2::ZERO);
    for kind in [EntityKind::Thrust, EntityKind::Label] {
        let entity = bench.make(kind, mid(), Vec2::ZERO);
        assert!(!entity.is_fatal_to(&rock, AREA, &mut bench.rng), "{kind:?}");
        assert_eq!(entity.mass(), 0.0);
    }
}

#[test]
fn dead_entities_report_origin_points() {
    let mut bench = Bench::new(51);
    let mut rock = bench.make(EntityKind::SmallRock, mid(), Vec2::ZERO);
    assert_eq!(rock.point_at(0), rock.points()[0] + mid());
    assert_eq!(rock.point_at(ROCK_POINTS), Vec2::ZERO);

    rock.mark_dead();
    assert_eq!(rock.point_at(0), Vec2::ZERO);
}

#[test]
fn aliens_flee_the_nearest_threat() {
    let mut bench = Bench::new(61);
    let alien = bench.make(EntityKind::Alien, mid(), Vec2::ZERO);
    let near = bench.make(EntityKind::BigRock, mid() + Vec2::new(30.0, 0.0), Vec2::ZERO);
    let far = bench.make(EntityKind::Ship, mid() - Vec2::new(0.0, 90.0), Vec2::ZERO);
    let mut dead = bench.make(EntityKind::BigRock, mid() + Vec2::new(1.0, 0.0), Vec2::ZERO);
    dead.mark_dead();
    let light = bench.make(EntityKind::Debris, mid() + Vec2::new(0.0, 2.0), Vec2::ZERO);

    let roster = [alien.clone(), near.clone(), far, dead, light];
    let threat = nearest_threat(&alien, &roster);
    assert_eq!(threat, Some(near.pos));

    let push = alien_push(alien.pos, alien.radius(), threat);
    assert!(push.x < 0.0);
    assert!(push.y.abs() < 1e-12);
    let expected = ALIEN_PUSH_RADII * alien.radius() / 30.0;
    assert!((push.length() - expected).abs() < 1e-9);
}

#[test]
fn alien_speed_is_capped() {
    let mut bench = Bench::new(62);
    let mut alien = bench.make(EntityKind::Alien, mid(), Vec2::new(7.9, 0.0));
    bench.advance(&mut alien);
    alien.flee(Some(alien.pos - Vec2::new(1.0, 0.0)));
    assert!(alien.dir.length() <= MAX_ALIEN_SPEED + 1e-9);
}

#[test]
fn only_live_aliens_flee() {
    let mut bench = Bench::new(63);
    let threat = Some(mid() + Vec2::new(5.0, 0.0));

    let mut rock = bench.make(EntityKind::BigRock, mid(), Vec2::ZERO);
    rock.flee(threat);
    assert_eq!(rock.dir, Vec2::ZERO);

    let mut alien = bench.make(EntityKind::Alien, mid(), Vec2::ZERO);
    alien.mark_dead();
    alien.flee(threat);
    assert_eq!(alien.dir, Vec2::ZERO);
}

#[test]
fn buffer_eligibility_by_kind() {
    let locked: Vec<_> = EntityKind::ALL
        .into_iter()
        .filter(|kind| !kind.can_enter_buffer())
        .collect();
    assert_eq!(
        locked,
        [EntityKind::Ship, EntityKind::Projectile, EntityKind::Label]
    );
}

#[test]
fn kinds_display_in_snake_case() {
    assert_eq!(EntityKind::BigRock.to_string(), "big_rock");
    assert_eq!(EntityKind::Thrust.to_string(), "thrust");
}
