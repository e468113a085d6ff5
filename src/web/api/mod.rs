pub mod server;
pub mod upload_controller;
