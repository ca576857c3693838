// Draft editing layer: bounded undo/redo history and the live/history sync
// session, plus the HTTP surface over both.

pub mod handlers;
pub mod history;
pub mod session;
