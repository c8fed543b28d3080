//! Source verification against explorer & dashboard backends
//!
//! Verification never blocks a deployment that has already succeeded: every
//! backend failure is captured in the returned [`VerificationOutcome`] rather
//! than propagated as an error, and each backend is attempted independently
//! of the others. There is no retry machinery here; a failed submission is
//! re-attempted by the operator re-running the `verify` command once the
//! explorer's indexer has caught up.

use std::collections::BTreeMap;

use ethers::abi::{encode, Address, Token};
use serde::Deserialize;
use tracing::info;

use crate::{
    config::{DashboardConfig, ExplorerConfig, NetworkProfile},
    constants::{ALREADY_VERIFIED_SIGNAL, OPTIMIZER_ENABLED, OPTIMIZER_RUNS, SOLC_VERSION},
    contracts::ContractArtifact,
};

/// The result of one verification attempt against one backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The backend accepted the submission
    Verified,
    /// The backend reported the address as already verified; a successful
    /// terminal state, not an error
    AlreadyVerified,
    /// The backend rejected the submission for any other reason
    Failed(String),
}

impl VerificationOutcome {
    /// Whether this outcome is a terminal success
    pub fn is_success(&self) -> bool {
        !matches!(self, VerificationOutcome::Failed(_))
    }
}

/// Everything a backend needs to verify one deployed contract
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    /// The contract's name
    pub contract_name: String,
    /// The deployed address
    pub address: Address,
    /// The contract's full source text
    pub source: String,
    /// ABI-encoded constructor arguments, hex without `0x`, if any
    pub constructor_args: Option<String>,
    /// Linked library addresses by library name
    pub libraries: BTreeMap<String, Address>,
}

impl VerificationRequest {
    /// Build a request for the given artifact & deployed address
    pub fn new(
        artifact: &ContractArtifact,
        address: Address,
        constructor_tokens: &[Token],
        source: String,
        libraries: BTreeMap<String, Address>,
    ) -> Self {
        let constructor_args =
            (!constructor_tokens.is_empty()).then(|| hex::encode(encode(constructor_tokens)));

        Self {
            contract_name: artifact.contract_name.clone(),
            address,
            source,
            constructor_args,
            libraries,
        }
    }
}

/// A verification backend registered for the target network
#[derive(Clone, Debug)]
pub enum VerificationBackend {
    /// An Etherscan-compatible explorer API
    Explorer(ExplorerConfig),
    /// A Tenderly-style dashboard API
    Dashboard(DashboardConfig),
}

impl VerificationBackend {
    /// The backends configured for the given profile
    pub fn for_profile(profile: &NetworkProfile) -> Vec<Self> {
        let mut backends = Vec::new();
        if let Some(explorer) = &profile.explorer {
            backends.push(VerificationBackend::Explorer(explorer.clone()));
        }
        if let Some(dashboard) = &profile.dashboard {
            backends.push(VerificationBackend::Dashboard(dashboard.clone()));
        }
        backends
    }

    /// The backend's stable identifier, recorded in the deployments file
    pub fn id(&self) -> &'static str {
        match self {
            VerificationBackend::Explorer(config) => config.id,
            VerificationBackend::Dashboard(config) => config.id,
        }
    }

    /// Submit the contract source to this backend
    pub async fn submit(&self, request: &VerificationRequest) -> VerificationOutcome {
        info!(
            "submitting {} at {:#x} to {} for verification",
            request.contract_name, request.address, self.id()
        );
        match self {
            VerificationBackend::Explorer(config) => submit_explorer(config, request).await,
            VerificationBackend::Dashboard(config) => submit_dashboard(config, request).await,
        }
    }
}

/// The response envelope of an Etherscan-style verification API
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    /// `"1"` on acceptance, `"0"` on rejection
    status: String,
    /// `"OK"` / `"NOTOK"`
    message: String,
    /// The submission GUID on acceptance, the failure reason otherwise
    result: String,
}

/// Submit a verification request to an Etherscan-compatible explorer
async fn submit_explorer(
    config: &ExplorerConfig,
    request: &VerificationRequest,
) -> VerificationOutcome {
    let mut form: Vec<(String, String)> = vec![
        ("apikey".to_string(), config.api_key.clone()),
        ("module".to_string(), "contract".to_string()),
        ("action".to_string(), "verifysourcecode".to_string()),
        (
            "contractaddress".to_string(),
            format!("{:#x}", request.address),
        ),
        ("sourceCode".to_string(), request.source.clone()),
        ("codeformat".to_string(), "solidity-single-file".to_string()),
        ("contractname".to_string(), request.contract_name.clone()),
        ("compilerversion".to_string(), SOLC_VERSION.to_string()),
        (
            "optimizationUsed".to_string(),
            if OPTIMIZER_ENABLED { "1" } else { "0" }.to_string(),
        ),
        ("runs".to_string(), OPTIMIZER_RUNS.to_string()),
    ];
    if let Some(args) = &request.constructor_args {
        // The API's own (misspelled) field name
        form.push(("constructorArguements".to_string(), args.clone()));
    }
    for (i, (name, address)) in request.libraries.iter().enumerate() {
        form.push((format!("libraryname{}", i + 1), name.clone()));
        form.push((format!("libraryaddress{}", i + 1), format!("{:#x}", address)));
    }

    let response = reqwest::Client::new()
        .post(&config.api_url)
        .form(&form)
        .send()
        .await;
    let response = match response {
        Ok(response) => response,
        Err(e) => return VerificationOutcome::Failed(e.to_string()),
    };
    if !response.status().is_success() {
        return VerificationOutcome::Failed(format!(
            "explorer API returned {}",
            response.status()
        ));
    }

    let parsed: ExplorerResponse = match response.json().await {
        Ok(parsed) => parsed,
        Err(e) => return VerificationOutcome::Failed(e.to_string()),
    };

    // The explorer answers NOTOK both for genuine rejections and for
    // addresses it has already verified; the result string tells them apart
    if parsed.status == "1" {
        VerificationOutcome::Verified
    } else {
        classify_failure(format!("{}: {}", parsed.message, parsed.result))
    }
}

/// Submit a verification request to a Tenderly-style dashboard API
async fn submit_dashboard(
    config: &DashboardConfig,
    request: &VerificationRequest,
) -> VerificationOutcome {
    let libraries: BTreeMap<&String, String> = request
        .libraries
        .iter()
        .map(|(name, address)| (name, format!("{:#x}", address)))
        .collect();
    let body = serde_json::json!({
        "contractName": request.contract_name,
        "address": format!("{:#x}", request.address),
        "libraries": libraries,
    });

    let response = reqwest::Client::new()
        .post(&config.api_url)
        .header("X-Access-Key", config.access_key.as_str())
        .json(&body)
        .send()
        .await;
    let response = match response {
        Ok(response) => response,
        Err(e) => return VerificationOutcome::Failed(e.to_string()),
    };

    if response.status().is_success() {
        return VerificationOutcome::Verified;
    }

    // The dashboard only reports failures as free text
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    classify_failure(format!("{}: {}", status, text))
}

/// Map a backend failure message to an outcome, treating the "already
/// verified" signal as terminal success
fn classify_failure(message: String) -> VerificationOutcome {
    if is_already_verified(&message) {
        VerificationOutcome::AlreadyVerified
    } else {
        VerificationOutcome::Failed(message)
    }
}

/// Case-insensitive check for the "already verified" signal in a backend's
/// failure message
fn is_already_verified(message: &str) -> bool {
    message.to_lowercase().contains(ALREADY_VERIFIED_SIGNAL)
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, str::FromStr};

    use ethers::abi::{Address, Token};

    use super::{
        classify_failure, is_already_verified, VerificationBackend, VerificationOutcome,
        VerificationRequest,
    };
    use crate::{
        config::{Network, NetworkProfile},
        contracts::ContractArtifact,
    };

    /// A minimal artifact for request-building tests
    fn artifact() -> ContractArtifact {
        serde_json::from_str(
            r#"{
                "contractName": "RealEstateToken",
                "sourceName": "src/RealEstateToken.sol",
                "abi": [],
                "bytecode": "0x00"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn already_verified_matches_case_insensitively() {
        assert!(is_already_verified("Error: already verified"));
        assert!(is_already_verified("Contract source code already verified"));
        assert!(is_already_verified("ALREADY VERIFIED"));
        assert!(is_already_verified("Smart-contract Already Verified."));
        assert!(!is_already_verified("verification pending"));
        assert!(!is_already_verified("invalid API key"));
    }

    #[test]
    fn already_verified_is_success_not_failure() {
        let outcome = classify_failure("Error: already verified".to_string());
        assert_eq!(outcome, VerificationOutcome::AlreadyVerified);
        assert!(outcome.is_success());
    }

    #[test]
    fn other_failures_keep_their_cause() {
        let outcome = classify_failure("Unable to locate ContractCode".to_string());
        assert_eq!(
            outcome,
            VerificationOutcome::Failed("Unable to locate ContractCode".to_string())
        );
        assert!(!outcome.is_success());
    }

    #[test]
    fn constructor_args_are_hex_encoded_without_prefix() {
        let owner = Address::from_str("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
        let request = VerificationRequest::new(
            &artifact(),
            owner,
            &[Token::Address(owner)],
            String::new(),
            BTreeMap::new(),
        );
        let args = request.constructor_args.unwrap();
        assert!(!args.starts_with("0x"));
        assert!(args.ends_with("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"));
    }

    #[test]
    fn no_constructor_args_means_no_payload() {
        let address = Address::zero();
        let request =
            VerificationRequest::new(&artifact(), address, &[], String::new(), BTreeMap::new());
        assert!(request.constructor_args.is_none());
    }

    #[test]
    fn backends_follow_the_profile() {
        let vars = [
            ("BASE_SEPOLIA_RPC", "https://sepolia.base.org"),
            ("BASESCAN_API_KEY", "key"),
        ];
        let profile = NetworkProfile::from_vars(Network::BaseSepolia, "0xabc".to_string(), |k| {
            vars.iter().find(|(n, _)| *n == k).map(|(_, v)| v.to_string())
        })
        .unwrap();

        let backends = VerificationBackend::for_profile(&profile);
        assert_eq!(backends.len(), 1);
        assert_eq!(backends[0].id(), "basescan");
    }
}
