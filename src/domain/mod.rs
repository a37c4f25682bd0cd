//! Domain logic module containing the pure analysis passes.
//!
//! Each pass is a function of its inputs only: the graph builder turns a
//! manifest set into a [`graph::DependencyGraph`], and the cycle detector and
//! isolation checker read that graph without mutating it.

pub mod cycle;
pub mod graph;
pub mod isolation;

pub use cycle::{find_cycle, Cycle};
pub use graph::DependencyGraph;
pub use isolation::{check_isolation, IsolationViolation, ModuleClassifier, ModuleGroup};
