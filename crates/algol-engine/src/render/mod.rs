//! GPU rendering helpers.
//!
//! The studio renders in two steps: a compute pass writes a storage texture,
//! then a fullscreen pass composites it onto the surface. This module holds the
//! reusable parts of that:
//! - [`ShaderTemplate`]: shader text with `%%TOKEN%%` placeholders
//! - [`StorageTarget`]: the storage texture, recreated on resize
//! - [`BlitRenderer`]: fullscreen textured quad
//!
//! Each renderer owns its GPU resources and builds them lazily on first use.

mod blit;
mod ctx;
mod quad;
mod shader;
mod target;

pub use blit::BlitRenderer;
pub use ctx::{RenderCtx, RenderTarget};
pub use shader::{unresolved_tokens, ShaderError, ShaderTemplate};
pub use target::StorageTarget;
