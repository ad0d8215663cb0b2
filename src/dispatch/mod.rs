//! Broadcast fan-out
//!
//! ```text
//!   broadcast(msg)
//!        │
//!        ▼
//!   registry.list() ──► [A, B, C]   (snapshot, lock released)
//!        │
//!        ├── send A ──► Delivered         delivered += 1
//!        ├── send B ──► Revoked           registry.remove(B), note
//!        └── send C ──► Other / timeout   note, C stays registered
//!        │
//!        ▼
//!   DeliveryReport { delivered, notes, attempts }
//! ```

pub mod config;
pub mod dispatcher;
pub mod outcome;
pub mod report;

pub use config::DispatchConfig;
pub use dispatcher::BroadcastDispatcher;
pub use outcome::{DeliveryOutcome, DeliveryState};
pub use report::{Attempt, DeliveryNote, DeliveryReport};
