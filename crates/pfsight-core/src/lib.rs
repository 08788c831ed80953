//! Throughput pipeline between `pfsight-api` and the dashboard.
//!
//! - **[`CounterSampler`]** — per-session state machine that validates
//!   interface byte counters, keeps the single previous sample, and feeds
//!   the rate calculator.
//!
//! - **[`rate`]** — turns two consecutive [`CounterSample`]s into a
//!   [`RateSample`] in KB/s, clamping counter resets to zero.
//!
//! - **[`ThroughputWindow`]** — bounded FIFO of recent rate samples that
//!   the chart reads as an immutable snapshot.
//!
//! - **[`PollSession`]** — tokio task driving the sampler on a fixed
//!   interval with an in-flight guard, publishing [`ThroughputSnapshot`]s
//!   through a `watch` channel.

pub mod error;
pub mod rate;
pub mod sampler;
pub mod session;
pub mod window;

pub use error::SampleError;
pub use rate::{CounterSample, RateSample};
pub use sampler::{CounterSampler, SamplerState, TickOutcome};
pub use session::{PollSession, SessionConfig, ThroughputSnapshot};
pub use window::ThroughputWindow;
