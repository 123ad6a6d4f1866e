pub mod backend;
pub mod config;
pub mod console_input;
pub mod dispatcher;
pub mod half_time;
pub mod poller;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod view;
