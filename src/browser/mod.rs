//! Headless browser support for the page render checker
//!
//! Wraps chromiumoxide with a scoped session, an accessible-role locator,
//! and bounded polling.

mod error;
mod locator;
mod session;
mod wait;

pub use error::{BrowserError, BrowserResult};
pub use locator::RoleLocator;
pub use session::BrowserSession;
pub use wait::WaitConfig;
