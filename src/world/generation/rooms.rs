//! Room and corridor dungeon generator
//!
//! Scatters a handful of rectangular rooms, drops any that crowd an existing
//! one, and links each accepted room to the one accepted before it.

use std::ops::Range;

use rand::Rng;

use crate::world::{Dungeon, Position, Room};

/// Number of placement attempts per dungeon (upper bound exclusive)
pub const ROOM_COUNT: Range<i32> = 4..7;
/// Room side length (upper bound exclusive)
pub const ROOM_SIZE: Range<i32> = 5..8;
/// Minimum distance between a room and the grid edge
pub const ROOM_MARGIN: i32 = 2;
/// Padding around accepted rooms that new rooms may not enter
pub const ROOM_BUFFER: i32 = 2;

/// Generate a dungeon with rooms and corridors.
///
/// Rejected candidates are not retried, so the dungeon may end up with fewer
/// rooms than were attempted, or none at all. In that case the start and end
/// positions stay at the origin.
pub fn generate_dungeon<R: Rng + ?Sized>(width: i32, height: i32, rng: &mut R) -> Dungeon {
    let mut dungeon = Dungeon::new(width, height);
    let attempts = rng.gen_range(ROOM_COUNT);

    for _ in 0..attempts {
        let Some(candidate) = sample_room(rng, dungeon.width(), dungeon.height()) else {
            continue;
        };

        let overlaps = dungeon
            .rooms()
            .iter()
            .any(|r| candidate.intersects(r, ROOM_BUFFER));
        if overlaps {
            log::trace!("Rejected room {:?}", candidate);
            continue;
        }

        let previous = dungeon.rooms().last().map(Room::center);
        dungeon.push_room(candidate);
        dungeon.carve_room(&candidate);

        // Connect to previous room
        if let Some(prev_center) = previous {
            dungeon.carve_corridor(prev_center, candidate.center(), rng);
        }
    }

    if let Some((start, end)) = endpoints(dungeon.rooms()) {
        dungeon.set_endpoints(start, end);
    }

    log::debug!(
        "Generated {}x{} dungeon: {} of {} rooms placed, start {:?}, end {:?}",
        dungeon.width(),
        dungeon.height(),
        dungeon.rooms().len(),
        attempts,
        dungeon.start_position(),
        dungeon.end_position()
    );

    dungeon
}

/// Sample a candidate room, or `None` when the grid is too small to hold one
/// of the sampled size inside the margins.
fn sample_room<R: Rng + ?Sized>(rng: &mut R, width: i32, height: i32) -> Option<Room> {
    let w = rng.gen_range(ROOM_SIZE);
    let h = rng.gen_range(ROOM_SIZE);

    let x_range = ROOM_MARGIN..width - w - ROOM_MARGIN;
    let y_range = ROOM_MARGIN..height - h - ROOM_MARGIN;
    if x_range.is_empty() || y_range.is_empty() {
        return None;
    }

    let x = rng.gen_range(x_range);
    let y = rng.gen_range(y_range);
    Some(Room::new(x, y, w, h))
}

/// Center of the first and last room, if any rooms exist
pub fn endpoints(rooms: &[Room]) -> Option<(Position, Position)> {
    Some((rooms.first()?.center(), rooms.last()?.center()))
}
