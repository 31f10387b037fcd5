//! Best-effort alert side channel (audible tone + desktop notification).

pub mod announcer;

pub use announcer::{
    Announcer, CommandExecutor, DesktopAnnouncer, MockAnnouncer, NullAnnouncer,
    SystemCommandExecutor,
};
