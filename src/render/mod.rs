//! Rendering: front matter, prose fragments, JSON and final MDX assembly.

mod frontmatter;
mod json;
mod mdx;
mod options;
mod prose;

pub use frontmatter::build_front_matter;
pub use json::{to_json, JsonFormat};
pub use mdx::{assemble, to_mdx};
pub use options::RenderOptions;
pub use prose::{escape_markdown, render_all, render_block, render_summary};
