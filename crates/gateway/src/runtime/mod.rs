pub mod stream;
pub mod turn;

pub use stream::{relay_frames, RelayFrame};
pub use turn::{prepare_turn, PreparedTurn, TurnInput};
