pub mod body_decoder;
pub mod cli;
pub mod config;
pub mod errors;
pub mod execute;
pub mod http_request_executor;
pub mod multipart;
pub mod raw_request_parser;
pub mod request_builder;
pub mod request_config;
pub mod substitution;
