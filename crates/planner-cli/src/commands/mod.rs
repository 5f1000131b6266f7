pub mod appearance;
pub mod assignment;
pub mod auth;
pub mod common;
pub mod config;
pub mod course;
pub mod exam;
pub mod focus;
pub mod habit;
pub mod media;
pub mod note;
pub mod serve;
pub mod sync;
pub mod task;
pub mod view;
