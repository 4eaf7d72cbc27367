//! Dungeon data structure
//!
//! The 2D tile grid for one generated floor, the rooms carved into it, and the
//! spawn/exit coordinates. The grid is only mutated through `&mut Dungeon`
//! while the generator is running; consumers get shared references.

use std::collections::{HashSet, VecDeque};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::position::Position;
use super::tile::Tile;

/// An axis-aligned rectangular room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Integer-rounded centroid
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Overlap test with `buffer` cells of padding around this room.
    /// Edges that touch count as intersecting.
    pub fn intersects(&self, other: &Room, buffer: i32) -> bool {
        self.x - buffer <= other.x + other.width
            && self.x + self.width + buffer >= other.x
            && self.y - buffer <= other.y + other.height
            && self.y + self.height + buffer >= other.y
    }
}

/// Cell count of a grid, computed in `usize` so large sides cannot overflow
fn cell_count(width: i32, height: i32) -> usize {
    width.max(0) as usize * height.max(0) as usize
}

/// A generated dungeon floor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dungeon {
    width: i32,
    height: i32,
    /// Row-major cells, `height * width` long
    tiles: Vec<Tile>,
    /// Accepted rooms in creation order
    rooms: Vec<Room>,
    start_position: Position,
    end_position: Position,
}

impl Dungeon {
    /// Create a new dungeon filled with walls
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; cell_count(width, height)],
            rooms: Vec::new(),
            start_position: Position::default(),
            end_position: Position::default(),
        }
    }

    /// Rebuild a dungeon from stored parts. Returns `None` when the tile
    /// count does not match the dimensions.
    pub fn from_parts(
        width: i32,
        height: i32,
        tiles: Vec<Tile>,
        rooms: Vec<Room>,
        start_position: Position,
        end_position: Position,
    ) -> Option<Self> {
        if width < 0 || height < 0 || tiles.len() != cell_count(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles,
            rooms,
            start_position,
            end_position,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn start_position(&self) -> Position {
        self.start_position
    }

    pub fn end_position(&self) -> Position {
        self.end_position
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// True for cells strictly inside the permanent outer wall ring
    #[inline]
    fn is_interior(&self, x: i32, y: i32) -> bool {
        x > 0 && x < self.width - 1 && y > 0 && y < self.height - 1
    }

    /// Get the tile at a position
    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        if self.in_bounds(x, y) {
            Some(self.tiles[self.xy_to_idx(x, y)])
        } else {
            None
        }
    }

    /// Iterate the grid row by row (`[y][x]` order)
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width.max(1) as usize)
    }

    /// Flat row-major view of every cell
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Check if a position can be stepped on
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).map_or(false, |t| t.is_walkable())
    }

    /// Center of a room
    pub fn room_center(&self, room: &Room) -> Position {
        room.center()
    }

    /// Turn a cell into floor unless it lies on the outer wall ring
    fn carve(&mut self, x: i32, y: i32) {
        if self.is_interior(x, y) {
            let idx = self.xy_to_idx(x, y);
            self.tiles[idx] = Tile::Floor;
        }
    }

    /// Carve every cell of a room into floor, leaving the outer ring intact
    pub fn carve_room(&mut self, room: &Room) {
        for y in room.y..room.y + room.height {
            for x in room.x..room.x + room.width {
                self.carve(x, y);
            }
        }
    }

    /// Carve a corridor as a random walk from `start` to `end`.
    ///
    /// Every step closes one unit of the remaining gap, so the walk takes
    /// exactly `|dx| + |dy|` steps. A coin flip per step decides whether the X
    /// or the Y gap is closed first. Each visited cell is widened by its left
    /// and right neighbours only. Returns the visited cells, ending at `end`.
    pub fn carve_corridor<R: Rng + ?Sized>(
        &mut self,
        start: Position,
        end: Position,
        rng: &mut R,
    ) -> Vec<Position> {
        let mut x = start.x;
        let mut y = start.y;
        let mut path = Vec::with_capacity(start.distance(&end) as usize);

        while x != end.x || y != end.y {
            if rng.gen_bool(0.5) {
                if x != end.x {
                    x += (end.x - x).signum();
                } else {
                    y += (end.y - y).signum();
                }
            } else if y != end.y {
                y += (end.y - y).signum();
            } else {
                x += (end.x - x).signum();
            }

            self.carve(x, y);
            self.carve(x - 1, y);
            self.carve(x + 1, y);
            path.push(Position::new(x, y));
        }

        path
    }

    pub(crate) fn push_room(&mut self, room: Room) {
        self.rooms.push(room);
    }

    pub(crate) fn set_endpoints(&mut self, start: Position, end: Position) {
        self.start_position = start;
        self.end_position = end;
    }

    /// All floor cells reachable from `from` by orthogonal steps
    pub fn reachable_from(&self, from: Position) -> HashSet<Position> {
        let mut seen = HashSet::new();
        if !self.is_walkable(from.x, from.y) {
            return seen;
        }

        let mut queue = VecDeque::new();
        seen.insert(from);
        queue.push_back(from);

        while let Some(pos) = queue.pop_front() {
            for next in pos.neighbors() {
                if self.is_walkable(next.x, next.y) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        seen
    }

    /// Whether a walkable path joins two positions
    pub fn is_connected(&self, a: Position, b: Position) -> bool {
        self.reachable_from(a).contains(&b)
    }

    /// Number of floor cells
    pub fn floor_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_walkable()).count()
    }

    /// Render the grid as text, one line per row
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for row in self.rows() {
            out.extend(row.iter().map(Tile::glyph));
            out.push('\n');
        }
        out
    }
}
