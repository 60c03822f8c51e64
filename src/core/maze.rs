//! Grid levels.
//!
//! Text rows where `#` is a wall block, `@` the spawn cell and `!` an entity
//! spawn; everything else is floor. Each wall block becomes an [`Object`]
//! holding only the faces that border open floor, so hidden faces never reach
//! the caster.
//!
//! World space is y-up: column `i` spans `x` in `[i*b, (i+1)*b]` and row `j`
//! spans `y` in `[-(j+1)*b, -j*b]`, so the first text row is the northmost.
use std::fs;
use std::path::Path;

use crate::core::geometry::{Coordinate, Edge, Object};
use crate::error::{RenderError, Result};
use crate::render::textures::TextureRef;

/// World units per grid cell.
pub const BLOCK_SIZE: f64 = 50.0;

const WALL: char = '#';
const FLOOR: char = ' ';
const SPAWN: char = '@';
const ENTITY: char = '!';

#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    cells: Vec<Vec<char>>,
    pub block_size: f64,
}

/// Parse maze text. Rows are padded with walls to equal length.
pub fn parse_maze(text: &str, block_size: f64) -> Result<Maze> {
    let mut grid: Vec<Vec<char>> = Vec::new();
    for line in text.lines() {
        let row: Vec<char> = line
            .trim_end()
            .chars()
            .map(|ch| match ch {
                WALL | SPAWN | ENTITY => ch,
                _ => FLOOR,
            })
            .collect();
        if !row.is_empty() {
            grid.push(row);
        }
    }
    if grid.is_empty() {
        return Err(RenderError::Maze("no rows".into()));
    }
    if !grid.iter().flatten().any(|&c| c == WALL) {
        return Err(RenderError::Maze("no wall cells".into()));
    }
    if !(block_size > 0.0) {
        return Err(RenderError::Maze(format!("block size must be positive, got {block_size}")));
    }

    let maxw = grid.iter().map(|r| r.len()).max().unwrap_or(0);
    for r in &mut grid {
        r.resize(maxw, WALL);
    }
    Ok(Maze { cells: grid, block_size })
}

/// Read and parse a maze file.
pub fn load_maze<P: AsRef<Path>>(path: P, block_size: f64) -> Result<Maze> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let maze = parse_maze(&text, block_size)?;
    log::info!("loaded maze {} ({}x{} cells)", path.display(), maze.cols(), maze.rows());
    Ok(maze)
}

impl Maze {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Out-of-grid cells count as walls.
    pub fn is_wall(&self, col: isize, row: isize) -> bool {
        if col < 0 || row < 0 {
            return true;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .is_none_or(|&c| c == WALL)
    }

    /// Centre of the first `@` cell.
    pub fn spawn(&self) -> Option<Coordinate> {
        self.cells.iter().enumerate().find_map(|(j, row)| {
            row.iter()
                .position(|&c| c == SPAWN)
                .map(|i| self.cell_center(i, j))
        })
    }

    /// Centres of every `!` cell, row by row.
    pub fn entity_spawns(&self) -> Vec<Coordinate> {
        let mut out = Vec::new();
        for (j, row) in self.cells.iter().enumerate() {
            for (i, &c) in row.iter().enumerate() {
                if c == ENTITY {
                    out.push(self.cell_center(i, j));
                }
            }
        }
        out
    }

    fn cell_center(&self, col: usize, row: usize) -> Coordinate {
        let b = self.block_size;
        Coordinate::new(col as f64 * b + b / 2.0, -(row as f64 * b + b / 2.0))
    }

    /// Grid cell containing a world point.
    fn cell_at(&self, wx: f64, wy: f64) -> (isize, isize) {
        let i = (wx / self.block_size).floor() as isize;
        let j = (-wy / self.block_size).floor() as isize;
        (i, j)
    }

    /// One object per wall block with at least one exposed face.
    ///
    /// Faces along the grid border are dropped along with faces shared by two
    /// wall blocks; neither can be seen from inside the level. Every face runs
    /// from the left to the right end as seen from the floor cell it faces,
    /// so textures are not mirrored.
    pub fn wall_objects(&self, texture: TextureRef, scale: i32) -> Vec<Object> {
        let half = self.block_size / 2.0;
        let mut objects = Vec::new();
        for (j, row) in self.cells.iter().enumerate() {
            for (i, &c) in row.iter().enumerate() {
                if c != WALL {
                    continue;
                }
                let center = self.cell_center(i, j);
                // north is +y
                let nw = [center.x - half, center.y + half];
                let ne = [center.x + half, center.y + half];
                let sw = [center.x - half, center.y - half];
                let se = [center.x + half, center.y - half];
                let (col, row_idx) = (i as isize, j as isize);
                let open = |ci: isize, rj: isize| !self.is_wall(ci, rj);

                let mut edges = Vec::with_capacity(4);
                // west face, seen looking east
                if open(col - 1, row_idx) {
                    edges.push(Edge::new(nw, sw, texture));
                }
                // north face, seen looking south
                if open(col, row_idx - 1) {
                    edges.push(Edge::new(ne, nw, texture));
                }
                // east face, seen looking west
                if open(col + 1, row_idx) {
                    edges.push(Edge::new(se, ne, texture));
                }
                // south face, seen looking north
                if open(col, row_idx + 1) {
                    edges.push(Edge::new(sw, se, texture));
                }
                if !edges.is_empty() {
                    objects.push(Object::new(format!("wall r{j}c{i}"), edges, scale));
                }
            }
        }
        log::debug!("maze produced {} wall objects", objects.len());
        objects
    }

    /// Whether a circle of `radius` at `(wx, wy)` stays clear of walls.
    /// Samples the centre plus eight points on the rim.
    pub fn is_free(&self, wx: f64, wy: f64, radius: f64) -> bool {
        let d = radius * std::f64::consts::FRAC_1_SQRT_2;
        let samples = [
            (wx, wy),
            (wx + radius, wy),
            (wx - radius, wy),
            (wx, wy + radius),
            (wx, wy - radius),
            (wx + d, wy + d),
            (wx - d, wy + d),
            (wx + d, wy - d),
            (wx - d, wy - d),
        ];
        samples.iter().all(|&(sx, sy)| {
            let (i, j) = self.cell_at(sx, sy);
            !self.is_wall(i, j)
        })
    }
}
