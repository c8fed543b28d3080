//! Scripts for deploying, registering & verifying the RealEstateToken smart contract.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
mod commands;
pub mod config;
pub mod constants;
pub mod contracts;
pub mod deploy;
pub mod devnet;
pub mod errors;
pub mod registry;
mod solidity;
pub mod units;
pub mod utils;
pub mod verify;
