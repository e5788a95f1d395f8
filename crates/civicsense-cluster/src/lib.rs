//! Report clustering engine: groups near-duplicate civic reports and routes
//! each group to a department.
//!
//! Every function here is pure and synchronous. Callers hand in a snapshot of
//! open reports and receive freshly built clusters; nothing is cached between
//! calls.

pub mod builder;
pub mod department;
pub mod geo;
pub mod placeholder;
pub mod priority;
pub mod similarity;
pub mod types;

pub use builder::ClusterBuilder;
pub use department::{recommend, DepartmentKeywords};
pub use geo::distance_meters;
pub use placeholder::or_placeholder;
pub use priority::{score, PriorityKeywords, PriorityTier, RankedReport};
pub use similarity::{similarity, tokenize};
pub use types::*;
