//! Utilities for the deploy scripts

use std::{str::FromStr, sync::Arc};

use ethers::{
    abi::Address,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
};

use crate::{config::NetworkProfile, errors::ScriptError};

/// The RPC client type used throughout the scripts: an HTTP provider with the
/// deployer's signing identity attached
pub type RpcClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Set up the RPC client for the given network profile
pub async fn setup_client(profile: &NetworkProfile) -> Result<Arc<RpcClient>, ScriptError> {
    let provider = Provider::<Http>::try_from(profile.rpc_url.as_str())
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let wallet = LocalWallet::from_str(profile.priv_key.trim_start_matches("0x"))
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64();
    check_chain_id(chain_id, profile)?;

    Ok(Arc::new(SignerMiddleware::new(
        provider,
        wallet.with_chain_id(profile.chain_id),
    )))
}

/// Refuse an RPC endpoint whose reported chain id does not match the
/// profile's; signing against the wrong chain must fail loudly, not proceed
/// with the remote's value
fn check_chain_id(reported: u64, profile: &NetworkProfile) -> Result<(), ScriptError> {
    if reported == profile.chain_id {
        Ok(())
    } else {
        Err(ScriptError::Configuration(format!(
            "network {} reports chain id {}, profile expects {}",
            profile.network, reported, profile.chain_id
        )))
    }
}

/// Parse a hex address given on the command line, tolerating a missing `0x` prefix
pub fn parse_address(address: &str) -> Result<Address, ScriptError> {
    Address::from_str(address.trim_start_matches("0x")).map_err(|e| {
        ScriptError::ArgumentMismatch(format!("invalid address `{}`: {}", address, e))
    })
}

/// Parse a `Name=0xaddress` linked-library argument
pub fn parse_library(library: &str) -> Result<(String, Address), ScriptError> {
    let (name, address) = library.split_once('=').ok_or_else(|| {
        ScriptError::ArgumentMismatch(format!(
            "expected `Name=0xaddress`, got `{}`",
            library
        ))
    })?;
    Ok((name.to_string(), parse_address(address)?))
}

#[cfg(test)]
mod tests {
    use super::{check_chain_id, parse_address, parse_library};
    use crate::{
        config::{Network, NetworkProfile},
        errors::ScriptError,
    };

    #[test]
    fn addresses_parse_with_and_without_prefix() {
        let with = parse_address("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
        let without = parse_address("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        assert!(matches!(
            parse_address("0xzz"),
            Err(ScriptError::ArgumentMismatch(_))
        ));
    }

    #[test]
    fn libraries_parse_as_name_address_pairs() {
        let (name, _) =
            parse_library("PriceLib=0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
        assert_eq!(name, "PriceLib");
        assert!(parse_library("PriceLib").is_err());
    }

    #[test]
    fn chain_id_mismatch_is_a_configuration_error() {
        let profile =
            NetworkProfile::from_vars(Network::Localhost, "0xabc".to_string(), |_| None).unwrap();
        assert!(check_chain_id(31337, &profile).is_ok());
        assert!(matches!(
            check_chain_id(1, &profile),
            Err(ScriptError::Configuration(_))
        ));
    }
}
