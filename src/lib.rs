//! Diary: a small self-hosted blog that keeps every revision of every post.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
