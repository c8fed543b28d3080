//! Constants used in the deploy scripts

/// The name of the environment variable holding the deployer's private key
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// The name of the environment variable holding the local devnet RPC URL
pub const LOCALHOST_RPC_ENV_VAR: &str = "LOCALHOST_RPC";

/// The name of the environment variable holding the Base Sepolia RPC URL
pub const BASE_SEPOLIA_RPC_ENV_VAR: &str = "BASE_SEPOLIA_RPC";

/// The name of the environment variable holding the Tenderly mainnet fork RPC URL
pub const TENDERLY_MAINNET_URL_ENV_VAR: &str = "TENDERLY_MAINNET_URL";

/// The name of the environment variable holding the Basescan API key
pub const BASESCAN_API_KEY_ENV_VAR: &str = "BASESCAN_API_KEY";

/// The name of the environment variable holding the Etherscan API key
pub const ETHERSCAN_API_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";

/// The name of the environment variable holding the Tenderly access key
pub const TENDERLY_ACCESS_KEY_ENV_VAR: &str = "TENDERLY_ACCESS_KEY";

/// The name of the environment variable holding the Tenderly account name
pub const TENDERLY_USERNAME_ENV_VAR: &str = "TENDERLY_USERNAME";

/// The name of the environment variable holding the Tenderly project slug
pub const TENDERLY_PROJECT_ENV_VAR: &str = "TENDERLY_PROJECT";

/// The RPC URL assumed for the local devnet when none is configured
pub const DEFAULT_LOCALHOST_RPC_URL: &str = "http://localhost:8545";

/// The chain ID of the local devnet
pub const LOCALHOST_CHAIN_ID: u64 = 31337;

/// The chain ID of the Base Sepolia testnet
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;

/// The chain ID of Ethereum mainnet, used by the Tenderly fork
pub const MAINNET_CHAIN_ID: u64 = 1;

/// The Basescan (Base Sepolia) verification API URL
pub const BASESCAN_API_URL: &str = "https://api-sepolia.basescan.org/api";

/// The Etherscan verification API URL
pub const ETHERSCAN_API_URL: &str = "https://api.etherscan.io/api";

/// The base URL of the Tenderly dashboard API
pub const TENDERLY_API_BASE_URL: &str = "https://api.tenderly.co/api/v1";

/// The suffix of the per-network deployments file
pub const DEPLOYMENTS_FILE_SUFFIX: &str = "_deployments.json";

/// The number of confirmations to wait for the contract deployment
/// transaction before recording & verifying the deployed address
pub const NUM_DEPLOY_CONFIRMATIONS: usize = 1;

/// The solc version the RealEstateToken artifact was compiled with,
/// submitted alongside the source during verification
pub const SOLC_VERSION: &str = "v0.8.22+commit.4fc1097e";

/// Whether the solc optimizer was enabled for the artifact
pub const OPTIMIZER_ENABLED: bool = true;

/// The number of optimizer runs the artifact was compiled with
pub const OPTIMIZER_RUNS: u32 = 10;

/// The substring, matched case-insensitively, that marks a verification
/// backend rejection as "this address is already verified"
pub const ALREADY_VERIFIED_SIGNAL: &str = "already verified";
