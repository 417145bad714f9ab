//! Core library: quiz questions, capture flow, quiz game and accounts.

pub mod account;
pub mod capture;
pub mod config;
pub mod context;
pub mod game;
pub mod models;
pub mod questions;
