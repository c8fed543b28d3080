//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// A required network profile value (RPC URL, signing key, ...) is missing or invalid
    Configuration(String),
    /// The persisted deployments file exists but is not well-formed
    RegistryCorrupt(String),
    /// Error writing the deployments file back to disk
    RegistryWrite(String),
    /// Error parsing a compiled contract artifact
    ArtifactParsing(String),
    /// Constructor arguments do not match the artifact's constructor signature
    ArgumentMismatch(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error deploying a contract
    Deployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// Error converting an amount between units
    Conversion(String),
    /// A devnet-only helper was invoked against a real network
    DevnetRestricted(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "configuration error: {}", s),
            ScriptError::RegistryCorrupt(s) => write!(f, "deployments file is corrupt: {}", s),
            ScriptError::RegistryWrite(s) => write!(f, "error writing deployments file: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ArgumentMismatch(s) => write!(f, "constructor argument mismatch: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::Deployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::Conversion(s) => write!(f, "error converting amount: {}", s),
            ScriptError::DevnetRestricted(s) => {
                write!(f, "refusing devnet-only operation: {}", s)
            }
        }
    }
}

impl Error for ScriptError {}
