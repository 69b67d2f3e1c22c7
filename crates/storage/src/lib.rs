#![warn(clippy::pedantic)]

pub mod association;
pub mod catalog;
pub mod client;
pub mod remote;
#[cfg(target_arch = "wasm32")]
pub mod rest;
pub mod rows;

#[cfg(test)]
mod tests;
