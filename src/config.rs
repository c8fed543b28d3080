//! Network profile definitions for the deploy scripts
//!
//! A profile is assembled once at startup from the process environment and
//! passed by reference into every component; nothing below `main` reads
//! ambient process state directly.

use std::{
    env,
    fmt::{self, Display},
    path::{Path, PathBuf},
};

use clap::ValueEnum;

use crate::{
    constants::{
        BASESCAN_API_KEY_ENV_VAR, BASESCAN_API_URL, BASE_SEPOLIA_CHAIN_ID,
        BASE_SEPOLIA_RPC_ENV_VAR, DEFAULT_LOCALHOST_RPC_URL, DEPLOYMENTS_FILE_SUFFIX,
        ETHERSCAN_API_KEY_ENV_VAR, ETHERSCAN_API_URL, LOCALHOST_CHAIN_ID,
        LOCALHOST_RPC_ENV_VAR, MAINNET_CHAIN_ID, TENDERLY_ACCESS_KEY_ENV_VAR,
        TENDERLY_API_BASE_URL, TENDERLY_MAINNET_URL_ENV_VAR, TENDERLY_PROJECT_ENV_VAR,
        TENDERLY_USERNAME_ENV_VAR,
    },
    errors::ScriptError,
};

/// The networks the scripts can target
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    /// A local Hardhat/Anvil devnet
    Localhost,
    /// The Base Sepolia testnet
    BaseSepolia,
    /// A Tenderly fork of Ethereum mainnet
    Tenderly,
}

impl Network {
    /// The name of the per-network deployments file, e.g.
    /// `basesepolia_deployments.json`
    pub fn deployments_file_name(&self) -> String {
        let prefix = match self {
            Network::Localhost => "localhost",
            Network::BaseSepolia => "basesepolia",
            Network::Tenderly => "tenderly",
        };
        format!("{}{}", prefix, DEPLOYMENTS_FILE_SUFFIX)
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Localhost => write!(f, "localhost"),
            Network::BaseSepolia => write!(f, "base-sepolia"),
            Network::Tenderly => write!(f, "tenderly"),
        }
    }
}

/// Configuration of an explorer-style (Etherscan-compatible) verification backend
#[derive(Clone, Debug)]
pub struct ExplorerConfig {
    /// Stable backend identifier, recorded in the deployments file
    pub id: &'static str,
    /// The verification API URL
    pub api_url: String,
    /// The API key authorizing verification submissions
    pub api_key: String,
}

/// Configuration of the dashboard-style (Tenderly) verification backend
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    /// Stable backend identifier, recorded in the deployments file
    pub id: &'static str,
    /// The dashboard's contract verification endpoint
    pub api_url: String,
    /// The access key authorizing verification submissions
    pub access_key: String,
}

/// An immutable description of the target network, constructed once at startup
#[derive(Clone, Debug)]
pub struct NetworkProfile {
    /// The target network
    pub network: Network,
    /// The network's RPC endpoint
    pub rpc_url: String,
    /// The network's chain ID
    pub chain_id: u64,
    /// The deployer's private key
    pub priv_key: String,
    /// The explorer verification backend, if one is configured for this network
    pub explorer: Option<ExplorerConfig>,
    /// The dashboard verification backend, if one is configured for this network
    pub dashboard: Option<DashboardConfig>,
}

impl NetworkProfile {
    /// Assemble the profile for the given network from the process environment
    pub fn from_env(network: Network, priv_key: String) -> Result<Self, ScriptError> {
        Self::from_vars(network, priv_key, |var| env::var(var).ok())
    }

    /// Assemble the profile from an arbitrary variable lookup
    pub fn from_vars(
        network: Network,
        priv_key: String,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ScriptError> {
        if priv_key.trim().is_empty() {
            return Err(ScriptError::Configuration(format!(
                "no private key given, set {}",
                crate::constants::PRIVATE_KEY_ENV_VAR
            )));
        }

        let (rpc_url, chain_id) = match network {
            Network::Localhost => (
                lookup(LOCALHOST_RPC_ENV_VAR)
                    .unwrap_or_else(|| DEFAULT_LOCALHOST_RPC_URL.to_string()),
                LOCALHOST_CHAIN_ID,
            ),
            Network::BaseSepolia => (
                lookup(BASE_SEPOLIA_RPC_ENV_VAR).ok_or_else(|| {
                    ScriptError::Configuration(format!("{} is not set", BASE_SEPOLIA_RPC_ENV_VAR))
                })?,
                BASE_SEPOLIA_CHAIN_ID,
            ),
            Network::Tenderly => (
                lookup(TENDERLY_MAINNET_URL_ENV_VAR).ok_or_else(|| {
                    ScriptError::Configuration(format!(
                        "{} is not set",
                        TENDERLY_MAINNET_URL_ENV_VAR
                    ))
                })?,
                MAINNET_CHAIN_ID,
            ),
        };

        let explorer = match network {
            Network::Localhost => None,
            Network::BaseSepolia => lookup(BASESCAN_API_KEY_ENV_VAR).map(|api_key| {
                ExplorerConfig {
                    id: "basescan",
                    api_url: BASESCAN_API_URL.to_string(),
                    api_key,
                }
            }),
            Network::Tenderly => lookup(ETHERSCAN_API_KEY_ENV_VAR).map(|api_key| {
                ExplorerConfig {
                    id: "etherscan",
                    api_url: ETHERSCAN_API_URL.to_string(),
                    api_key,
                }
            }),
        };

        // The dashboard backend needs the access key, account & project; it is
        // only registered when all three are present
        let dashboard = if network == Network::Localhost {
            None
        } else {
            match (
                lookup(TENDERLY_ACCESS_KEY_ENV_VAR),
                lookup(TENDERLY_USERNAME_ENV_VAR),
                lookup(TENDERLY_PROJECT_ENV_VAR),
            ) {
                (Some(access_key), Some(username), Some(project)) => Some(DashboardConfig {
                    id: "tenderly",
                    api_url: format!(
                        "{}/account/{}/project/{}/contracts/verify",
                        TENDERLY_API_BASE_URL, username, project
                    ),
                    access_key,
                }),
                _ => None,
            }
        };

        Ok(NetworkProfile {
            network,
            rpc_url,
            chain_id,
            priv_key,
            explorer,
            dashboard,
        })
    }

    /// Whether this profile targets a throwaway local devnet
    pub fn is_devnet(&self) -> bool {
        matches!(self.network, Network::Localhost)
    }

    /// The path of this network's deployments file under the given directory
    pub fn deployments_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.network.deployments_file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::{Network, NetworkProfile};
    use crate::errors::ScriptError;

    /// A lookup over a fixed set of variables
    fn fixed<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn missing_rpc_url_is_a_configuration_error() {
        let res = NetworkProfile::from_vars(Network::BaseSepolia, "0xabc".to_string(), fixed(&[]));
        assert!(matches!(res, Err(ScriptError::Configuration(_))));
    }

    #[test]
    fn missing_priv_key_is_a_configuration_error() {
        let res = NetworkProfile::from_vars(
            Network::Localhost,
            String::new(),
            fixed(&[("LOCALHOST_RPC", "http://localhost:8545")]),
        );
        assert!(matches!(res, Err(ScriptError::Configuration(_))));
    }

    #[test]
    fn localhost_defaults_and_registers_no_backends() {
        let profile =
            NetworkProfile::from_vars(Network::Localhost, "0xabc".to_string(), fixed(&[]))
                .unwrap();
        assert!(profile.is_devnet());
        assert_eq!(profile.chain_id, 31337);
        assert!(profile.explorer.is_none());
        assert!(profile.dashboard.is_none());
    }

    #[test]
    fn base_sepolia_profile_registers_configured_backends() {
        let vars = [
            ("BASE_SEPOLIA_RPC", "https://sepolia.base.org"),
            ("BASESCAN_API_KEY", "key"),
            ("TENDERLY_ACCESS_KEY", "key"),
            ("TENDERLY_USERNAME", "operator"),
            ("TENDERLY_PROJECT", "project"),
        ];
        let profile =
            NetworkProfile::from_vars(Network::BaseSepolia, "0xabc".to_string(), fixed(&vars))
                .unwrap();
        assert!(!profile.is_devnet());
        assert_eq!(profile.chain_id, 84532);
        assert_eq!(profile.explorer.as_ref().unwrap().id, "basescan");
        let dashboard = profile.dashboard.unwrap();
        assert_eq!(dashboard.id, "tenderly");
        assert!(dashboard.api_url.contains("operator"));
        assert!(dashboard.api_url.contains("project"));
    }

    #[test]
    fn deployments_file_is_scoped_per_network() {
        assert_eq!(
            Network::BaseSepolia.deployments_file_name(),
            "basesepolia_deployments.json"
        );
        assert_ne!(
            Network::Localhost.deployments_file_name(),
            Network::Tenderly.deployments_file_name()
        );
    }
}
