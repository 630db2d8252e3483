pub mod asset_repository;
pub mod batching;
pub mod fs_asset_repository;
pub mod news_source;
pub mod openai_synthesis_repository;
pub mod polly_synthesis_repository;
pub mod synthesis_repository;

pub use asset_repository::{AssetError, AssetRepository};
pub use fs_asset_repository::FsAssetRepository;
pub use news_source::{HttpNewsSource, NewsSourceClient};
pub use openai_synthesis_repository::OpenAiSynthesisRepository;
pub use polly_synthesis_repository::PollySynthesisRepository;
pub use synthesis_repository::{SynthesisError, SynthesisRepository};
