//! Implementations of the deploy script commands
//!
//! The `deploy` command is the orchestration core: select network → load
//! registry → deploy or reuse → persist → verify or skip → post actions.
//! Registry and deployment errors abort the run; verification failures are
//! logged and the run continues. The RPC client is only constructed once the
//! registry and arguments have been validated, so a run that fails validation
//! never touches the network.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use ethers::{
    abi::{Address, Token},
    providers::Middleware,
    types::U256,
};
use tracing::{info, warn};

use crate::{
    cli::{AddMinterArgs, DeployArgs, MintArgs, VerifyArgs},
    config::NetworkProfile,
    contracts::ContractArtifact,
    deploy::deploy_contract,
    errors::ScriptError,
    registry::DeploymentRegistry,
    solidity::RealEstateTokenContract,
    utils::{parse_address, parse_library, setup_client, RpcClient},
    verify::{VerificationBackend, VerificationOutcome, VerificationRequest},
};

/// Deploy the contract (unless the registry already holds an address for it),
/// then verify it and run the requested post actions
pub async fn deploy_and_verify(
    args: DeployArgs,
    profile: &NetworkProfile,
    deployments_dir: &Path,
) -> Result<(), ScriptError> {
    let mut registry = DeploymentRegistry::load(&profile.deployments_path(deployments_dir))?;
    let artifact = ContractArtifact::from_file(&args.artifact)?;
    let name = args
        .contract
        .clone()
        .unwrap_or_else(|| artifact.contract_name.clone());

    // Pre-flight: constructor arguments are checked before any network call
    let tokens = artifact.constructor_tokens(&args.args)?;
    let libraries = parse_libraries(&args.libraries)?;

    let client = setup_client(profile).await?;

    let existing = registry.get(&name);
    let address = if should_deploy(existing, args.force) {
        deploy_and_record(
            client.clone(),
            &artifact,
            tokens.clone(),
            args.confirmations,
            &mut registry,
            &name,
        )
        .await?
    } else {
        // `existing` is Some here by `should_deploy`
        let address = existing.unwrap();
        info!(
            "{} already deployed at {:#x} on {}, skipping deployment",
            name, address, profile.network
        );
        address
    };

    if args.no_verify {
        info!("verification disabled for this run");
    } else {
        verify_against_backends(
            &mut registry,
            profile,
            &artifact,
            &name,
            address,
            &tokens,
            args.source.as_deref(),
            libraries,
        )
        .await?;
    }

    if let Some(minter) = &args.minter {
        grant_minter(client, address, parse_address(minter)?).await?;
    }

    Ok(())
}

/// Re-submit source verification for a deployment already in the registry
pub async fn verify_deployment(
    args: VerifyArgs,
    profile: &NetworkProfile,
    deployments_dir: &Path,
) -> Result<(), ScriptError> {
    let mut registry = DeploymentRegistry::load(&profile.deployments_path(deployments_dir))?;
    let artifact = ContractArtifact::from_file(&args.artifact)?;
    let name = args
        .contract
        .clone()
        .unwrap_or_else(|| artifact.contract_name.clone());

    let tokens = artifact.constructor_tokens(&args.args)?;
    let libraries = parse_libraries(&args.libraries)?;
    let address = resolve_address(&registry, &name, profile)?;

    verify_against_backends(
        &mut registry,
        profile,
        &artifact,
        &name,
        address,
        &tokens,
        args.source.as_deref(),
        libraries,
    )
    .await
}

/// Grant the minter role on the registered RealEstateToken deployment
pub async fn add_minter(
    args: AddMinterArgs,
    profile: &NetworkProfile,
    deployments_dir: &Path,
) -> Result<(), ScriptError> {
    let registry = DeploymentRegistry::load(&profile.deployments_path(deployments_dir))?;
    let address = resolve_address(&registry, &args.contract, profile)?;
    let minter = parse_address(&args.minter)?;

    let client = setup_client(profile).await?;
    grant_minter(client, address, minter).await
}

/// Mint an initial token record against the registered deployment
pub async fn mint(
    args: MintArgs,
    profile: &NetworkProfile,
    deployments_dir: &Path,
) -> Result<(), ScriptError> {
    let registry = DeploymentRegistry::load(&profile.deployments_path(deployments_dir))?;
    let address = resolve_address(&registry, &args.contract, profile)?;

    let to = parse_address(&args.to)?;
    let token_id = U256::from_dec_str(&args.token_id)
        .map_err(|e| ScriptError::ArgumentMismatch(format!("token id: {}", e)))?;
    let amount = U256::from_dec_str(&args.amount)
        .map_err(|e| ScriptError::ArgumentMismatch(format!("amount: {}", e)))?;

    let client = setup_client(profile).await?;
    let token = RealEstateTokenContract::new(address, client);
    token
        .mint(to, token_id, amount, args.token_uri.clone(), [0u8; 32])
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    info!(
        "minted token {} (amount {}) to {:#x} on {:#x}",
        args.token_id, args.amount, to, address
    );
    Ok(())
}

/// Whether a deployment should be performed given the registry's view
fn should_deploy(existing: Option<Address>, force: bool) -> bool {
    force || existing.is_none()
}

/// Deploy the artifact and record the confirmed address in the registry.
///
/// The registry is only written once the creation transaction has confirmed;
/// a failed deployment leaves both the in-memory registry and the deployments
/// file untouched.
async fn deploy_and_record<M: Middleware + 'static>(
    client: Arc<M>,
    artifact: &ContractArtifact,
    tokens: Vec<Token>,
    confirmations: usize,
    registry: &mut DeploymentRegistry,
    name: &str,
) -> Result<Address, ScriptError> {
    let address = deploy_contract(client, artifact, tokens, confirmations).await?;
    registry.set(name, address);
    registry.persist()?;
    Ok(address)
}

/// Submit the deployment to every configured backend that has not yet
/// accepted it, recording successes in the registry.
///
/// Backend failures are logged, never returned: a verification failure must
/// not abort a run whose deployment already succeeded.
#[allow(clippy::too_many_arguments)]
async fn verify_against_backends(
    registry: &mut DeploymentRegistry,
    profile: &NetworkProfile,
    artifact: &ContractArtifact,
    name: &str,
    address: Address,
    constructor_tokens: &[Token],
    source_override: Option<&Path>,
    libraries: BTreeMap<String, Address>,
) -> Result<(), ScriptError> {
    let backends = VerificationBackend::for_profile(profile);
    if backends.is_empty() {
        info!("no verification backends configured for {}", profile.network);
        return Ok(());
    }

    let pending: Vec<_> = backends
        .into_iter()
        .filter(|backend| !registry.is_verified(name, backend.id()))
        .collect();
    if pending.is_empty() {
        info!("every configured backend has already verified {}", name);
        return Ok(());
    }

    let source_path = source_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&artifact.source_name));
    let source = match fs::read_to_string(&source_path) {
        Ok(source) => source,
        Err(e) => {
            warn!(
                "cannot read contract source {}: {}; skipping verification",
                source_path.display(),
                e
            );
            return Ok(());
        }
    };

    let request = VerificationRequest::new(
        artifact,
        address,
        constructor_tokens,
        source,
        libraries,
    );

    let mut newly_verified = false;
    for backend in pending {
        let outcome = backend.submit(&request).await;
        match &outcome {
            VerificationOutcome::Verified => {
                info!("{} accepted {} at {:#x}", backend.id(), name, address);
            }
            VerificationOutcome::AlreadyVerified => {
                info!("{} at {:#x} already verified on {}", name, address, backend.id());
            }
            VerificationOutcome::Failed(cause) => {
                warn!(
                    "verification of {} at {:#x} on {} failed: {}",
                    name,
                    address,
                    backend.id(),
                    cause
                );
            }
        }
        if outcome.is_success() {
            registry.record_verified(name, backend.id());
            newly_verified = true;
        }
    }

    if newly_verified {
        registry.persist()?;
    }
    Ok(())
}

/// Call `addMinter` on the deployed RealEstateToken
async fn grant_minter(
    client: Arc<RpcClient>,
    token_address: Address,
    minter: Address,
) -> Result<(), ScriptError> {
    let token = RealEstateTokenContract::new(token_address, client);
    token
        .add_minter(minter)
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    info!("granted minter role to {:#x} on {:#x}", minter, token_address);
    Ok(())
}

/// Look up the recorded address for a logical name, failing if none exists
fn resolve_address(
    registry: &DeploymentRegistry,
    name: &str,
    profile: &NetworkProfile,
) -> Result<Address, ScriptError> {
    registry.get(name).ok_or_else(|| {
        ScriptError::Configuration(format!(
            "no recorded deployment of `{}` on {}",
            name, profile.network
        ))
    })
}

/// Parse the repeated `Name=0xaddress` library arguments
fn parse_libraries(raw: &[String]) -> Result<BTreeMap<String, Address>, ScriptError> {
    raw.iter().map(|library| parse_library(library)).collect()
}
