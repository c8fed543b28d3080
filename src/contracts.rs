//! Compiled contract artifact handling
//!
//! Artifacts are the Hardhat-style JSON files produced by the contract build:
//! ABI, creation bytecode and source/contract names. The scripts consume them
//! pre-compiled; compiler invocation is out of scope.

use std::{fs, path::Path};

use ethers::{
    abi::{
        token::{LenientTokenizer, Tokenizer},
        Abi, Token,
    },
    types::Bytes,
};
use serde::Deserialize;

use crate::errors::ScriptError;

/// A compiled contract artifact
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The contract's name, e.g. `RealEstateToken`
    pub contract_name: String,
    /// The path of the contract's source file, e.g. `src/RealEstateToken.sol`
    pub source_name: String,
    /// The contract's ABI
    pub abi: Abi,
    /// The contract's creation bytecode
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Parse an artifact from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))
    }

    /// Check the given raw argument strings against the artifact's constructor
    /// signature and tokenize them.
    ///
    /// Any arity or type mismatch fails here, before a creation transaction
    /// is ever submitted.
    pub fn constructor_tokens(&self, raw_args: &[String]) -> Result<Vec<Token>, ScriptError> {
        let inputs = self
            .abi
            .constructor
            .as_ref()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or(&[]);

        if inputs.len() != raw_args.len() {
            return Err(ScriptError::ArgumentMismatch(format!(
                "`{}` constructor takes {} argument(s), {} given",
                self.contract_name,
                inputs.len(),
                raw_args.len()
            )));
        }

        inputs
            .iter()
            .zip(raw_args)
            .map(|(param, raw)| {
                LenientTokenizer::tokenize(&param.kind, raw).map_err(|e| {
                    ScriptError::ArgumentMismatch(format!(
                        "argument `{}` ({}): {}",
                        param.name, param.kind, e
                    ))
                })
            })
            .collect()
    }
}
