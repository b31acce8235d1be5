pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;
pub mod views;

pub use controllers::{ChatApp, GlobalChatApp};
