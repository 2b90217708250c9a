//! s3-notify: relocates newly created S3 objects and reports them to chat.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod pipeline;
pub mod storage;
