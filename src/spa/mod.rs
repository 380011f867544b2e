mod core;
mod dispatch;
mod mutex;
mod sequence;

#[cfg(test)]
mod tests;

pub use core::Spa;
pub(crate) use core::PendingNavigation;
pub use dispatch::{NavigationDispatcher, NavigationHandle};
pub use mutex::{NavigationGuard, NavigationMutex};
