mod leaderboard;
mod view;

pub use leaderboard::*;
pub use view::*;
