use std::sync::Arc;

use crate::config::Config;
use crate::notion::NotionClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notion: NotionClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let notion =
            NotionClient::new(&config.notion_token).with_base_url(&config.notion_base_url);
        Self {
            config: Arc::new(config),
            notion,
        }
    }
}
