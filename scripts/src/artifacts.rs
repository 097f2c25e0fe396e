//! Loading of compiled contract artifacts

use std::{fs, path::Path};

use ethers::{abi::Abi, types::Bytes};
use serde::Deserialize;

use crate::errors::ScriptError;

/// The parts of a compiled contract artifact needed to deploy it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The contract's name, when recorded in the artifact
    #[serde(default)]
    pub contract_name: Option<String>,
    /// The contract's ABI
    pub abi: Abi,
    /// The contract's creation bytecode
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Parse an artifact from its JSON representation
    pub fn from_json(contents: &str) -> Result<Self, ScriptError> {
        let artifact: Self = serde_json::from_str(contents)
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        // Interfaces and abstract contracts compile to empty bytecode
        if artifact.bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "artifact for `{}` has no creation bytecode",
                artifact.contract_name.as_deref().unwrap_or("<unnamed>")
            )));
        }

        Ok(artifact)
    }

    /// Read and parse the artifact at `path`
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Whether the ABI declares a constructor taking arguments
    pub fn constructor_takes_args(&self) -> bool {
        self.abi
            .constructor()
            .is_some_and(|constructor| !constructor.inputs.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const FACTORY_ARTIFACT: &str = r#"{
        "_format": "hh-sol-artifact-1",
        "contractName": "CommunityFactory",
        "sourceName": "contracts/CommunityFactory.sol",
        "abi": [
            {
                "inputs": [],
                "stateMutability": "nonpayable",
                "type": "constructor"
            },
            {
                "inputs": [
                    {"internalType": "string", "name": "_name", "type": "string"},
                    {"internalType": "string", "name": "_symbol", "type": "string"},
                    {"internalType": "uint256", "name": "_price", "type": "uint256"},
                    {"internalType": "address", "name": "_comWallet", "type": "address"},
                    {"internalType": "string", "name": "_creatorId", "type": "string"}
                ],
                "name": "createCommunityWithToken",
                "outputs": [],
                "stateMutability": "nonpayable",
                "type": "function"
            }
        ],
        "bytecode": "0x6080604052348015600f57600080fd5b50",
        "deployedBytecode": "0x6080604052",
        "linkReferences": {},
        "deployedLinkReferences": {}
    }"#;

    #[test]
    fn test_parse_hardhat_artifact() {
        let artifact = ContractArtifact::from_json(FACTORY_ARTIFACT).unwrap();

        assert_eq!(artifact.contract_name.as_deref(), Some("CommunityFactory"));
        assert!(artifact.abi.function("createCommunityWithToken").is_ok());
        assert_eq!(artifact.bytecode.len(), 17);
        assert!(!artifact.constructor_takes_args());
    }

    #[test]
    fn test_empty_bytecode_rejected() {
        let err = ContractArtifact::from_json(
            r#"{"contractName": "ICommunity", "abi": [], "bytecode": "0x"}"#,
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Artifact);
        assert!(err.to_string().contains("ICommunity"));
    }

    #[test]
    fn test_missing_file() {
        let err = ContractArtifact::load(Path::new("does/not/exist.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Artifact);
    }
}
