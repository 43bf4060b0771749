//! Ratatui front-end: one screen with the player form on top, the roster
//! table below and a status footer.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
