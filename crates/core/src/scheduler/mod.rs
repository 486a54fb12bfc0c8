//! Background job scheduling.
//!
//! Owns the only background execution context in the system: one
//! periodic sweep task plus transient on-demand search tasks, all
//! tracked in a join-able set so `stop` can wait for every in-flight
//! task to finish.

mod runner;

pub use runner::JobScheduler;
