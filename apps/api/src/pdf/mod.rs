// PDF export: the renderer seam, the response cache, and the public
// download endpoint that ties them together.

pub mod cache;
pub mod handlers;
pub mod renderer;

pub use renderer::{LopdfRenderer, PdfRenderer};
