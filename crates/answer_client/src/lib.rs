//! HTTP clients for the CundiBot API: the answering endpoint used by chat
//! sessions and the key-protected admin endpoints.

pub mod api;
pub mod error;
pub mod utils;

pub use api::admin_client::AdminClient;
pub use api::chat_client::HttpAnswerClient;
pub use chat_core::Config;
pub use error::AdminError;
