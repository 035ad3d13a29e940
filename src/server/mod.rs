pub mod api;
pub mod stream;

use crate::cli::Args;
use crate::llm::chat::ReplyProvider;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    addr: String,
    provider: Arc<dyn ReplyProvider>,
    args: Args,
}

impl Server {
    pub fn new(addr: String, provider: Arc<dyn ReplyProvider>, args: Args) -> Self {
        Self { addr, provider, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::serve(&self.addr, self.provider.clone(), self.args.clone()).await
    }
}
