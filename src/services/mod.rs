pub mod chat_view;
pub mod inference;
pub mod proxy_client;
