//! Background Tasks Module
//!
//! Contains the background tasks the cache spawns while serving requests.
//!
//! # Tasks
//! - Entry expiry: one cancellable removal per cached entry, fired at its TTL

mod expiry;

pub(crate) use expiry::schedule_removal;
