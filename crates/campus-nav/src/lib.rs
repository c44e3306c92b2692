//! Deterministic campus route engine.
//!
//! Maps free-text location descriptions onto a small fixed set of campus
//! buildings and synthesizes human-readable walking directions between them.
//! Everything in this crate is pure and synchronous; it makes no network
//! calls and holds no state, so it can be invoked concurrently and tested
//! with plain input/output assertions.

pub mod resolver;
pub mod route;
pub mod steps;

pub use resolver::{is_recognized, resolve, Building, LocationDescriptor};
pub use route::{estimate, plan, NavigationRoute};
pub use steps::{synthesize, NavigationStep};
