// Resume document model and its copy-on-write mutation API.

pub mod model;
pub mod mutation;

pub use model::{Document, Element, NestedList, SectionName};
pub use mutation::{Mutated, Mutation, NoopReason, Outcome};
