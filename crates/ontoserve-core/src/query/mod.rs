//! Query and response shaping.
//!
//! Every hierarchy request flows through the same stages:
//!
//! 1. [`ContextResolver`] - ontology/submission reference to a loaded submission
//! 2. [`NodeLocator`] - raw class id to a node of that submission
//! 3. [`HierarchyNavigator`] - structural relations and closures
//! 4. [`paginate`] - windowing with `next` probing
//! 5. [`AttributePrefetcher`] - one batched attribute fetch for the response

mod context;
pub mod hierarchy;
mod locator;
mod pagination;
mod prefetch;

pub use context::{ContextResolver, ResolvedContext};
pub use hierarchy::{DescendantWalk, HierarchyNavigator};
pub use locator::NodeLocator;
pub use pagination::{paginate, Page, PageRequest, PageSource, VecSource};
pub use prefetch::AttributePrefetcher;
