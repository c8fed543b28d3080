//! Development-only chain controls
//!
//! Thin wrappers over the devnet's `evm_mine` / `evm_increaseTime` RPC
//! methods. Both refuse to run against anything other than the local devnet;
//! a real network cannot honor them and must never be asked to.

use ethers::providers::Middleware;
use tracing::info;

use crate::{config::NetworkProfile, errors::ScriptError, utils::RpcClient};

/// Mine the given number of blocks on the local devnet
pub async fn advance_blocks(
    client: &RpcClient,
    profile: &NetworkProfile,
    blocks: u64,
) -> Result<(), ScriptError> {
    ensure_devnet(profile)?;

    for _ in 0..blocks {
        client
            .inner()
            .request::<_, serde_json::Value>("evm_mine", ())
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    }

    info!("mined {} block(s)", blocks);
    Ok(())
}

/// Advance the local devnet's simulated clock by the given number of seconds
pub async fn advance_time(
    client: &RpcClient,
    profile: &NetworkProfile,
    seconds: u64,
) -> Result<(), ScriptError> {
    ensure_devnet(profile)?;

    client
        .inner()
        .request::<_, serde_json::Value>("evm_increaseTime", [seconds])
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    info!("advanced devnet clock by {} second(s)", seconds);
    Ok(())
}

/// Refuse unless the profile targets the local devnet
fn ensure_devnet(profile: &NetworkProfile) -> Result<(), ScriptError> {
    if profile.is_devnet() {
        Ok(())
    } else {
        Err(ScriptError::DevnetRestricted(format!(
            "{} is not a local devnet",
            profile.network
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::ensure_devnet;
    use crate::{
        config::{Network, NetworkProfile},
        errors::ScriptError,
    };

    #[test]
    fn real_networks_are_refused() {
        let profile = NetworkProfile::from_vars(Network::BaseSepolia, "0xabc".to_string(), |k| {
            (k == "BASE_SEPOLIA_RPC").then(|| "https://sepolia.base.org".to_string())
        })
        .unwrap();
        assert!(matches!(
            ensure_devnet(&profile),
            Err(ScriptError::DevnetRestricted(_))
        ));
    }

    #[test]
    fn the_local_devnet_is_allowed() {
        let profile =
            NetworkProfile::from_vars(Network::Localhost, "0xabc".to_string(), |_| None).unwrap();
        assert!(ensure_devnet(&profile).is_ok());
    }
}
