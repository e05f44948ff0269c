//! # prefetch-lookup
//!
//! A memory-latency-hiding lookup engine: a chained hash table plus four
//! interleaved lookup executors that hide DRAM latency behind software
//! prefetch.
//!
//! - **Scalar** — the textbook probe-and-compare loop; the correctness
//!   oracle the other three are checked against.
//! - **GP** (Group Prefetch) — prefetches a whole group of requests'
//!   first cache line, then walks the group lockstep.
//! - **AMAC** (Asynchronous Memory Access Chaining) — an explicit
//!   two-stage state machine over a fixed-size ring of in-flight
//!   requests: admit a request, prefetch, suspend it in the ring, and
//!   resume whichever request's prefetch has had time to land.
//! - **CORO** — functionally equivalent to AMAC (stable Rust has no
//!   native stackless-coroutine language feature), expressed as a
//!   resumable state machine rather than an explicit loop body.
//!
//! [`table::Table`] is the hash table; [`table::Executor`] selects which
//! of the four walks a given lookup vector runs through. [`driver::run`]
//! wires the table, [`workload`] generators, and [`profiler::Profiler`]
//! together into the benchmark CLI ([`config::Cli`]).

pub mod config;
pub mod driver;
pub mod error;
pub mod prefetch;
pub mod profiler;
pub mod results;
pub mod ring;
pub mod table;
pub mod workload;

pub use error::EngineError;
pub use table::{Entry, Executor, Table};
