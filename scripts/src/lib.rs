//! Scripts for deploying and maintaining the community token contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod secrets;
#[allow(clippy::missing_docs_in_private_items)]
mod solidity;
pub mod types;
pub mod utils;
