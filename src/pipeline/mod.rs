pub mod chain;
pub mod enhancer;
pub mod studio;
pub mod thumbnail;
pub mod titles;

pub use chain::{first_success, ChainOutcome, FirstSuccess, ProviderChain, Tier, STATIC_FALLBACK_URL};
pub use enhancer::PromptEnhancer;
pub use studio::{ImageEdit, StudioTools};
pub use thumbnail::ThumbnailService;
pub use titles::{parse_titles, TitleGenerator};
