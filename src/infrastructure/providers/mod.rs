//! Provider adapters

mod builtin;
mod google;
mod openai;

use std::sync::Arc;

pub use builtin::BuiltinAdapter;
pub use google::GoogleAdapter;
pub use openai::OpenAiAdapter;

use crate::application::ports::ProviderAdapter;
use crate::domain::config::AppConfig;

/// Build every implemented adapter from the application config.
/// Vendors without an entry here resolve to "not implemented".
pub fn build_adapters(config: &AppConfig) -> Vec<Arc<dyn ProviderAdapter>> {
    let builtin: Arc<dyn ProviderAdapter> = Arc::new(BuiltinAdapter::new(
        config.builtin_endpoint().map(str::to_string),
    ));
    let google: Arc<dyn ProviderAdapter> = Arc::new(GoogleAdapter::with_endpoint(
        config.google_base_url_or_default(),
        config.google_model_or_default(),
    ));
    let openai: Arc<dyn ProviderAdapter> = Arc::new(OpenAiAdapter::with_endpoint(
        config.openai_base_url_or_default(),
        config.openai_model_or_default(),
    ));
    vec![builtin, google, openai]
}
