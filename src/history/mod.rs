mod memory;
mod state;
mod traits;

pub use memory::{MemoryHistory, MemorySessionStore};
pub use state::HistoryState;
pub use traits::{BrowserLocation, HistoryProvider, SessionStore};
