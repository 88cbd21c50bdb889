use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("tile grid has no rows")]
    Empty,
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile {ch:?} at line {line}, column {column}")]
    UnknownTile { ch: char, line: usize, column: usize },
}

/// Immutable, rectangular wall map indexed as `cells[row][col]`.
/// Column is the world x axis, row is the world y axis.
#[derive(Debug, Clone)]
pub struct TileGrid {
    cells: Vec<Tile>,
    width: usize,
    height: usize,
}

impl TileGrid {
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, GridError> {
        let width = rows.first().map(Vec::len).ok_or(GridError::Empty)?;
        if width == 0 {
            return Err(GridError::Empty);
        }

        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for (row, tiles) in rows.into_iter().enumerate() {
            if tiles.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found: tiles.len(),
                });
            }
            cells.extend(tiles);
        }

        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Parses a text map, one row per non-empty line.
    /// `1` and `#` are walls; `0`, `.` and spaces are open floor.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let row = line
                .chars()
                .enumerate()
                .map(|(column, ch)| match ch {
                    '1' | '#' => Ok(Tile::Wall),
                    '0' | '.' | ' ' => Ok(Tile::Open),
                    _ => Err(GridError::UnknownTile {
                        ch,
                        line: line_no + 1,
                        column: column + 1,
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at integer coordinates, or `None` outside the grid.
    #[inline]
    pub fn tile(&self, col: i64, row: i64) -> Option<Tile> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Tile enclosing a world-space point.
    #[inline]
    pub fn tile_at(&self, x: f32, y: f32) -> Option<Tile> {
        self.tile(x.floor() as i64, y.floor() as i64)
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::parse(DEFAULT_MAP).expect("built-in map is rectangular")
    }
}

const DEFAULT_MAP: &str = "\
11111111
10000001
10111101
10100101
10100101
10101101
10000001
11111111
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_is_bordered() {
        let grid = TileGrid::default();
        assert_eq!((grid.width(), grid.height()), (8, 8));
        for i in 0..8 {
            assert_eq!(grid.tile(i, 0), Some(Tile::Wall));
            assert_eq!(grid.tile(i, 7), Some(Tile::Wall));
            assert_eq!(grid.tile(0, i), Some(Tile::Wall));
            assert_eq!(grid.tile(7, i), Some(Tile::Wall));
        }
        assert_eq!(grid.tile(3, 3), Some(Tile::Open));
        assert_eq!(grid.tile(4, 5), Some(Tile::Wall));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = TileGrid::parse("111\n10\n111\n").unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn empty_and_unknown_input() {
        assert_eq!(TileGrid::parse("\n\n").unwrap_err(), GridError::Empty);
        assert_eq!(
            TileGrid::parse("###\n#x#\n").unwrap_err(),
            GridError::UnknownTile {
                ch: 'x',
                line: 2,
                column: 2
            }
        );
    }

    #[test]
    fn all_space_row_is_kept() {
        let grid = TileGrid::parse("###\n   \n###\n").unwrap();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.tile(1, 1), Some(Tile::Open));
        assert_eq!(grid.tile(1, 2), Some(Tile::Wall));
    }

    #[test]
    fn out_of_bounds_lookups() {
        let grid = TileGrid::parse("#.\n.#\n").unwrap();
        assert_eq!(grid.tile(-1, 0), None);
        assert_eq!(grid.tile(2, 0), None);
        assert_eq!(grid.tile(0, 2), None);
        assert_eq!(grid.tile_at(-0.5, 0.5), None);
        assert_eq!(grid.tile_at(1.9, 1.1), Some(Tile::Wall));
        assert_eq!(grid.tile_at(1.2, 0.4), Some(Tile::Open));
    }
}
