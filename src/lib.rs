pub mod config;
pub mod error;
pub mod event;
pub mod history;
pub mod location;
pub mod logging;
pub mod page;
pub mod spa;

#[cfg(test)]
mod testing;
