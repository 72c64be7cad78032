pub mod handlers;
pub mod header;
pub mod notification;
pub mod results;
pub mod settings;
pub mod upload_section;
pub mod utils;
