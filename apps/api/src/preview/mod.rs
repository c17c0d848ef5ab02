// Preview projection: Document snapshot -> render tree -> mounted surface.

pub mod project;
pub mod summary;
pub mod surface;
pub mod text;
pub mod tree;

pub use project::project;
pub use surface::mount;
pub use tree::{ChromeKind, Node, NodeKind, RenderTree, Style};
