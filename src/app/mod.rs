//! Application core: pure domain logic, zero I/O.
//!
//! Bus event and input vocabulary, the port traits the hardware layer
//! implements, the handler context, and the [`service::AppService`]
//! composition root.  Nothing here touches a peripheral directly, so the
//! whole core is testable with mock adapters.

pub mod commands;
pub mod context;
pub mod events;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
