mod turn;

pub use turn::{History, Role, Turn};
