//! Contract deployment
//!
//! Submitting the creation transaction and waiting for inclusion. This module
//! never consults the deployments registry: deciding whether a deployment is
//! needed at all is the caller's job, and recording the resulting address
//! happens only after the transaction is confirmed.

use std::sync::Arc;

use ethers::{abi::Token, contract::ContractFactory, providers::Middleware, types::Address};
use tracing::info;

use crate::{contracts::ContractArtifact, errors::ScriptError, units::format_eth};

/// Deploy the artifact with the given (pre-checked) constructor tokens,
/// waiting for the requested number of confirmations before returning the
/// deployed address.
pub async fn deploy_contract<M: Middleware + 'static>(
    client: Arc<M>,
    artifact: &ContractArtifact,
    constructor_tokens: Vec<Token>,
    confirmations: usize,
) -> Result<Address, ScriptError> {
    if let Some(sender) = client.default_sender() {
        if let Ok(balance) = client.get_balance(sender, None /* block */).await {
            info!("deployer {:#x} balance: {} ETH", sender, format_eth(balance));
        }
    }

    let factory = ContractFactory::new(
        artifact.abi.clone(),
        artifact.bytecode.clone(),
        client.clone(),
    );

    let contract = factory
        .deploy_tokens(constructor_tokens)
        .map_err(|e| ScriptError::Deployment(e.to_string()))?
        .confirmations(confirmations)
        .send()
        .await
        .map_err(|e| ScriptError::Deployment(e.to_string()))?;

    let address = contract.address();
    info!("deployed {} at {:#x}", artifact.contract_name, address);

    Ok(address)
}
