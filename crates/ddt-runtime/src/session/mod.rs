//! # Session Shell
//!
//! Line-oriented front end over the Record Ledger.
//!
//! - `command` - input grammar
//! - `state` - explicit application state (account, snapshot, search, banner)
//! - `controller` - executes commands against the container

pub mod command;
pub mod controller;
pub mod state;

pub use command::{parse, Command, CommandError, HELP_TEXT};
pub use controller::SessionController;
pub use state::{Banner, BannerKind, SessionState};
