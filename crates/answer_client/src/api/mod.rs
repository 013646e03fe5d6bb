pub mod admin_client;
pub mod chat_client;
