use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::KUIPER_DIVISOR;
use crate::entity::{Entity, EntityKind};
use crate::rng::SeededRng;
use crate::vector::Vec2;

/// The nominal play rectangle, `[0, width] x [0, height]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: i32,
    pub height: i32,
}

impl PlayArea {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0
            && pos.x <= f64::from(self.width)
            && pos.y >= 0.0
            && pos.y <= f64::from(self.height)
    }

    #[inline]
    pub fn min_dimension(&self) -> i32 {
        self.width.min(self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(f64::from(self.width / 2), f64::from(self.height / 2))
    }

    /// Horizontal and vertical roaming margin past the edges. Kinds that may
    /// not enter the Kuiper buffer wrap exactly at the edge.
    #[inline]
    pub fn margin(&self, kind: EntityKind) -> (i32, i32) {
        if kind.can_enter_buffer() {
            (self.width / KUIPER_DIVISOR, self.height / KUIPER_DIVISOR)
        } else {
            (0, 0)
        }
    }

    /// Moves `pos` to the opposite side once it leaves the rectangle grown by
    /// the kind's margin. Wrapping lands on the far margin, not on the edge.
    pub fn wrap(&self, kind: EntityKind, pos: Vec2) -> Vec2 {
        let (mx, my) = self.margin(kind);
        let (mx, my) = (f64::from(mx), f64::from(my));
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let mut wrapped = pos;

        if wrapped.x < -mx {
            wrapped.x = w + mx;
        }
        if wrapped.y < -my {
            wrapped.y = h + my;
        }
        if wrapped.x > w + mx {
            wrapped.x = -mx;
        }
        if wrapped.y > h + my {
            wrapped.y = -my;
        }

        wrapped
    }

    /// Whether `pos` lies within the rectangle grown by the kind's margin.
    pub fn holds(&self, kind: EntityKind, pos: Vec2) -> bool {
        let (mx, my) = self.margin(kind);
        let (mx, my) = (f64::from(mx), f64::from(my));
        pos.x >= -mx
            && pos.x <= f64::from(self.width) + mx
            && pos.y >= -my
            && pos.y <= f64::from(self.height) + my
    }
}

/// Everything an entity may touch while it advances or detonates: the random
/// source, the current time, the play area, and a queue for new entities.
///
/// Entities spawned through the context are appended to the roster by the
/// engine, after the pass that created them.
pub struct TickContext<'a> {
    pub(crate) rng: &'a mut SeededRng,
    pub(crate) now: Duration,
    pub(crate) area: PlayArea,
    pub(crate) next_id: &'a mut u64,
    pub(crate) spawned: &'a mut Vec<Entity>,
}

impl<'a> TickContext<'a> {
    pub fn new(
        rng: &'a mut SeededRng,
        now: Duration,
        area: PlayArea,
        next_id: &'a mut u64,
        spawned: &'a mut Vec<Entity>,
    ) -> Self {
        Self {
            rng,
            now,
            area,
            next_id,
            spawned,
        }
    }

    #[inline]
    pub fn rng(&mut self) -> &mut SeededRng {
        self.rng
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[inline]
    pub fn area(&self) -> PlayArea {
        self.area
    }

    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2, dir: Vec2) -> &mut Entity {
        let id = *self.next_id;
        *self.next_id += 1;

        let mut entity = Entity::new(kind, id, self.now, self.rng);
        entity.pos = pos;
        entity.dir = dir;

        let index = self.spawned.len();
        self.spawned.push(entity);
        &mut self.spawned[index]
    }
}
