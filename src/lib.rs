//! Backend for a viral thumbnail studio: prompt enhancement, a multi-provider
//! image fallback chain, title ideas and a portable compositing layer.

pub mod compose;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;

pub use compose::{render, Composition, DisplayList, Surface, TextLayer};
pub use config::{Config, GeminiConfig, PollinationsConfig, SupabaseConfig};
pub use context::{AppContext, ConfigurationState, Session};
pub use display::{DisplayEffect, DisplayState, ImageDisplay};
pub use error::{Result, ThumbError};
pub use models::{
    AspectRatio, Dimensions, DraftProject, GenerationRequest, GenerationResult, ImageReference,
    ThumbnailAudit, TitlesRequest, VisualHook,
};
pub use pipeline::{
    ImageEdit, ProviderChain, PromptEnhancer, StudioTools, ThumbnailService, Tier, TitleGenerator,
    STATIC_FALLBACK_URL,
};
pub use providers::{ImageProvider, ProviderInfo, TextProvider};
