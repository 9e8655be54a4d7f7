pub mod common;
pub mod draft;
pub mod image;
pub mod studio;
pub mod text;

pub use common::*;
pub use draft::*;
pub use image::*;
pub use studio::{AuditAlert, ThumbnailAudit, VisualHook};
pub use text::*;
