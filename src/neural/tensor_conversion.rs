use crate::game::game_board::{GameBoard, ENCODING_PLANES};
use crate::game::state::{COLS, ROWS};
use tch::Tensor;

/// Encodes one board as a `[1, 2, 6, 7]` float tensor.
///
/// Channel 0 holds the pieces of the player to move, channel 1 the opponent's;
/// row 0 is the top of the grid.
pub fn board_to_tensor(board: &GameBoard) -> Tensor {
    Tensor::from_slice(&board.encode_planes()).view([
        1,
        ENCODING_PLANES as i64,
        ROWS as i64,
        COLS as i64,
    ])
}

/// Stacks several boards into a `[N, 2, 6, 7]` batch.
pub fn boards_to_tensor(boards: &[GameBoard]) -> Tensor {
    let features: Vec<f32> = boards.iter().flat_map(|b| b.encode_planes()).collect();
    Tensor::from_slice(&features).view([
        boards.len() as i64,
        ENCODING_PLANES as i64,
        ROWS as i64,
        COLS as i64,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_tensor_shape_and_planes() {
        let mut board = GameBoard::new();
        board.make_move(0).unwrap();
        board.make_move(6).unwrap();

        let tensor = board_to_tensor(&board);
        assert_eq!(tensor.size(), vec![1, 2, 6, 7]);
        // Player1 to move: its piece in plane 0, Player2's in plane 1
        assert_eq!(tensor.double_value(&[0, 0, 5, 0]), 1.0);
        assert_eq!(tensor.double_value(&[0, 1, 5, 6]), 1.0);
        assert_eq!(tensor.double_value(&[0, 1, 5, 0]), 0.0);
        assert_eq!(tensor.sum(tch::Kind::Float).double_value(&[]), 2.0);
    }

    #[test]
    fn test_batch_tensor_shape() {
        let boards = vec![GameBoard::new(), GameBoard::new(), GameBoard::new()];
        let tensor = boards_to_tensor(&boards);
        assert_eq!(tensor.size(), vec![3, 2, 6, 7]);
    }
}
