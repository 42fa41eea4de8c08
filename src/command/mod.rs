//! Command matching and the activation funnel.
//!
//! - [`index`]: keyword → node mapping derived from the registry
//! - [`dispatch`]: the single "activate node" entry point
//! - [`mode`]: NAVIGATE/SEARCH interpretation of submitted text

pub mod dispatch;
pub mod index;
pub mod mode;

pub use dispatch::{BodyCommands, CommandDispatch, Navigator, PendingNavigation};
pub use index::{resolve_transcript_or_text, CommandIndex};
pub use mode::{
    interpret, resolve_navigation_query, InputMode, SearchTemplate, Submission, RESET_COMMAND,
};
