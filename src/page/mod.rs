mod directory;
mod registry;
mod traits;

pub use directory::{Directory, DirectoryContent, NoContent};
pub use registry::PageFactory;
pub use traits::{
    DirectoryPage, NavContext, NodeHost, Page, PageDirection, PageRef, RenderNode,
};
