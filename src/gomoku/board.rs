//! Board state representation and basic operations

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::wins;
use crate::types::Position;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'X',
            Cell::White => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::Black),
            'O' | 'o' | '0' => Some(Cell::White),
            _ => None,
        }
    }
}

/// A player in the game
///
/// Black moves first. In the single-agent training setup the learning agent
/// plays Black and the environment's uniform-random opponent plays White.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// Complete board state: an N×N grid plus per-player stone registries.
///
/// The registries are derived data kept in lockstep with the grid so that
/// win detection can run over sparse coordinate sets without rescanning
/// all N² cells. States are immutable from the outside; [`Self::place`]
/// returns a new state and is the only way stones are added. A stone is
/// never removed within an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    size: usize,
    cells: Vec<Cell>,
    black_stones: HashSet<Position>,
    white_stones: HashSet<Position>,
}

impl BoardState {
    /// Create an empty board with the given edge length.
    pub fn new(size: usize) -> Self {
        BoardState {
            size,
            cells: vec![Cell::Empty; size * size],
            black_stones: HashSet::new(),
            white_stones: HashSet::new(),
        }
    }

    /// Parse a board from one string per row.
    ///
    /// The board is square: every row must contain exactly `rows.len()`
    /// cells. Accepts the characters produced by [`Cell::to_char`] plus the
    /// usual lowercase/space variants.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidBoardLength`] on a ragged row and
    /// [`crate::Error::InvalidCellCharacter`] on an unknown character.
    pub fn from_rows(rows: &[&str]) -> Result<Self, crate::Error> {
        let size = rows.len();
        let mut board = BoardState::new(size);

        for (row_idx, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != size {
                return Err(crate::Error::InvalidBoardLength {
                    expected: size,
                    got: chars.len(),
                    context: (*row).to_string(),
                });
            }
            for (col_idx, &c) in chars.iter().enumerate() {
                let cell = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                    character: c,
                    column: col_idx,
                    context: (*row).to_string(),
                })?;
                if cell != Cell::Empty {
                    let pos = Position::new(row_idx, col_idx);
                    board.set_cell(pos, cell);
                }
            }
        }

        Ok(board)
    }

    /// Board edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    /// Whether the coordinate lies on this board.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Cell value at a coordinate, or `None` when off the board.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    fn set_cell(&mut self, pos: Position, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
        match cell {
            Cell::Black => {
                self.black_stones.insert(pos);
            }
            Cell::White => {
                self.white_stones.insert(pos);
            }
            Cell::Empty => {}
        }
    }

    /// Place a stone for `player`, returning the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPosition`] for coordinates off the
    /// board and [`crate::Error::InvalidMove`] for occupied cells. Neither
    /// occurs for actions drawn from [`Self::legal_moves`].
    #[must_use = "place returns the new board state"]
    pub fn place(&self, pos: Position, player: Player) -> Result<Self, crate::Error> {
        if !self.contains(pos) {
            return Err(crate::Error::InvalidPosition {
                position: pos,
                size: self.size,
            });
        }
        if self.cells[self.index(pos)] != Cell::Empty {
            return Err(crate::Error::InvalidMove { position: pos });
        }

        let mut next = self.clone();
        next.set_cell(pos, player.to_cell());
        Ok(next)
    }

    /// The stone registry for one player.
    pub fn stones(&self, player: Player) -> &HashSet<Position> {
        match player {
            Player::Black => &self.black_stones,
            Player::White => &self.white_stones,
        }
    }

    /// Number of stones one player has on the board.
    pub fn stone_count(&self, player: Player) -> usize {
        self.stones(player).len()
    }

    /// All empty cells in row-major order.
    ///
    /// This is the canonical action enumeration order; greedy tie-breaking
    /// and opponent-reply sampling both index into it.
    pub fn legal_moves(&self) -> Vec<Position> {
        let mut moves = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let pos = Position::new(row, col);
                if self.cells[self.index(pos)] == Cell::Empty {
                    moves.push(pos);
                }
            }
        }
        moves
    }

    /// The side whose turn it is: the player with strictly fewer stones,
    /// Black when the counts are equal.
    pub fn player_to_move(&self) -> Player {
        if self.black_stones.len() > self.white_stones.len() {
            Player::White
        } else {
            Player::Black
        }
    }

    /// Whether `player` has five in a row.
    pub fn has_five(&self, player: Player) -> bool {
        wins::has_five(self.stones(player))
    }

    /// The winning player, if any.
    pub fn winner(&self) -> Option<Player> {
        if self.has_five(Player::Black) {
            Some(Player::Black)
        } else if self.has_five(Player::White) {
            Some(Player::White)
        } else {
            None
        }
    }

    /// Whether every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.black_stones.len() + self.white_stones.len() == self.cell_count()
    }

    /// Row-major text encoding, one character per cell.
    pub fn encode(&self) -> String {
        self.cells.iter().map(|cell| cell.to_char()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = BoardState::new(8);
        assert_eq!(board.size(), 8);
        assert_eq!(board.legal_moves().len(), 64);
        assert_eq!(board.stone_count(Player::Black), 0);
        assert_eq!(board.stone_count(Player::White), 0);
        assert!(board.winner().is_none());
        assert!(!board.is_full());
    }

    #[test]
    fn test_place_records_stone_in_grid_and_registry() {
        let board = BoardState::new(8);
        let pos = Position::new(3, 4);
        let next = board.place(pos, Player::Black).unwrap();

        assert_eq!(next.cell(pos), Some(Cell::Black));
        assert!(next.stones(Player::Black).contains(&pos));
        assert!(!next.stones(Player::White).contains(&pos));
        // The original state is untouched.
        assert_eq!(board.cell(pos), Some(Cell::Empty));
    }

    #[test]
    fn test_place_on_occupied_cell_fails() {
        let board = BoardState::new(8);
        let pos = Position::new(2, 2);
        let next = board.place(pos, Player::Black).unwrap();

        let err = next.place(pos, Player::White).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::InvalidMove { position } if position == pos
        ));
        assert_eq!(err.to_string(), "invalid move: position C3 is already occupied");
    }

    #[test]
    fn test_place_outside_board_fails() {
        let board = BoardState::new(8);
        let err = board.place(Position::new(8, 0), Player::Black).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidPosition { size: 8, .. }));
    }

    #[test]
    fn test_legal_moves_and_occupied_cells_partition_the_board() {
        let mut board = BoardState::new(6);
        for &(row, col, player) in &[
            (0, 0, Player::Black),
            (2, 3, Player::White),
            (5, 5, Player::Black),
        ] {
            board = board.place(Position::new(row, col), player).unwrap();
        }

        let legal: HashSet<Position> = board.legal_moves().into_iter().collect();
        let occupied: HashSet<Position> = board
            .stones(Player::Black)
            .union(board.stones(Player::White))
            .copied()
            .collect();

        assert!(legal.is_disjoint(&occupied));
        assert_eq!(legal.len() + occupied.len(), board.cell_count());
    }

    #[test]
    fn test_legal_moves_are_row_major() {
        let board = BoardState::new(3)
            .place(Position::new(0, 0), Player::Black)
            .unwrap();
        let moves = board.legal_moves();
        assert_eq!(moves[0], Position::new(0, 1));
        assert_eq!(moves[1], Position::new(0, 2));
        assert_eq!(moves[2], Position::new(1, 0));
        assert_eq!(moves.len(), 8);
    }

    #[test]
    fn test_player_to_move_follows_stone_counts() {
        let board = BoardState::new(5);
        assert_eq!(board.player_to_move(), Player::Black);

        let board = board.place(Position::new(0, 0), Player::Black).unwrap();
        assert_eq!(board.player_to_move(), Player::White);

        let board = board.place(Position::new(1, 1), Player::White).unwrap();
        assert_eq!(board.player_to_move(), Player::Black);
    }

    #[test]
    fn test_winner_from_rows() {
        let board = BoardState::from_rows(&[
            "XXXXX...",
            "OOOO....",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
        ])
        .unwrap();
        assert_eq!(board.winner(), Some(Player::Black));
        assert!(board.has_five(Player::Black));
        assert!(!board.has_five(Player::White));
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let err = BoardState::from_rows(&["X..", ".."]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::InvalidBoardLength {
                expected: 2,
                got: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_from_rows_rejects_unknown_characters() {
        let err = BoardState::from_rows(&["X?", ".."]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::InvalidCellCharacter {
                character: '?',
                column: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_encode_round_trips_through_from_rows() {
        let rows = ["X.O", ".X.", "O.X"];
        let board = BoardState::from_rows(&rows).unwrap();
        assert_eq!(board.encode(), "X.O.X.O.X");
        assert_eq!(board.stone_count(Player::Black), 3);
        assert_eq!(board.stone_count(Player::White), 2);
    }

    #[test]
    fn test_is_full() {
        let board = BoardState::from_rows(&["XO", "OX"]).unwrap();
        assert!(board.is_full());
        assert!(board.legal_moves().is_empty());
    }
}
