//! The network and build configuration consumed by the scripts.
//!
//! The configuration is a TOML document. Network accounts and API keys are
//! referenced by secret name and resolved through a [`SecretSource`] only when
//! a network is selected, so the same file can be used with fake keys in tests.

use std::{collections::BTreeMap, fs, path::Path, path::PathBuf, str::FromStr, time::Duration};

use ethers::signers::LocalWallet;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_ARTIFACTS_PATH, DEFAULT_CACHE_PATH, DEFAULT_CONFIG, DEFAULT_NETWORK,
        DEFAULT_OPTIMIZER_RUNS, DEFAULT_SOLC_VERSION, DEFAULT_SOURCES_PATH, DEFAULT_TESTS_PATH,
    },
    errors::ScriptError,
    secrets::{interpolate, SecretSource},
};

/// The top-level configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// The network used when none is selected on the command line
    #[serde(default = "default_network")]
    pub default_network: String,
    /// Compiler profiles, in order of preference
    #[serde(default = "default_compilers")]
    pub compilers: Vec<CompilerProfile>,
    /// Filesystem layout of the contracts project
    #[serde(default)]
    pub paths: ProjectPaths,
    /// The supported networks, by name
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkDescriptor>,
    /// Block explorer verification settings
    #[serde(default)]
    pub etherscan: Option<EtherscanConfig>,
    /// Contract size reporting toggles
    #[serde(default)]
    pub contract_sizer: ContractSizerConfig,
    /// Gas cost reporting settings
    #[serde(default)]
    pub gas_reporter: GasReporterConfig,
}

/// A Solidity compiler profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerProfile {
    /// The compiler version, e.g. `0.8.2`
    pub version: String,
    /// Optimizer settings
    #[serde(default)]
    pub optimizer: OptimizerSettings,
}

/// Solidity optimizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    /// Whether the optimizer is enabled
    pub enabled: bool,
    /// The number of optimizer runs
    pub runs: u32,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

/// Paths of the contracts project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPaths {
    /// Contract sources
    pub sources: PathBuf,
    /// Contract tests
    pub tests: PathBuf,
    /// Compiler cache
    pub cache: PathBuf,
    /// Compiled artifacts
    pub artifacts: PathBuf,
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self {
            sources: PathBuf::from(DEFAULT_SOURCES_PATH),
            tests: PathBuf::from(DEFAULT_TESTS_PATH),
            cache: PathBuf::from(DEFAULT_CACHE_PATH),
            artifacts: PathBuf::from(DEFAULT_ARTIFACTS_PATH),
        }
    }
}

/// Connection and key settings for a single network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkDescriptor {
    /// The RPC URL, possibly containing `${SECRET}` placeholders
    #[serde(default)]
    pub url: String,
    /// The expected chain ID, checked against the RPC when present
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// Names of the secrets holding the private keys of the network's signers
    #[serde(default)]
    pub accounts: Vec<String>,
    /// Gas limit applied to every transaction
    #[serde(default)]
    pub gas: Option<u64>,
    /// RPC request timeout in milliseconds
    #[serde(default)]
    pub timeout: Option<u64>,
    /// Whether the node only accepts legacy (pre-London) transactions
    #[serde(default)]
    pub legacy: bool,
}

/// Block explorer verification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtherscanConfig {
    /// The explorer API URL
    pub url: String,
    /// Name of the secret holding the explorer API key
    pub api_key: String,
}

/// Contract size reporting toggles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractSizerConfig {
    /// Sort contracts alphabetically in the report
    pub alpha_sort: bool,
    /// Report on every compilation
    pub run_on_compile: bool,
    /// Print full paths in the report
    pub disambiguate_paths: bool,
}

/// Gas cost reporting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasReporterConfig {
    /// Fiat currency for cost estimates
    pub currency: String,
}

impl Default for GasReporterConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
        }
    }
}

/// The default for `default_network`
fn default_network() -> String {
    DEFAULT_NETWORK.to_string()
}

/// The default compiler list
fn default_compilers() -> Vec<CompilerProfile> {
    vec![CompilerProfile {
        version: DEFAULT_SOLC_VERSION.to_string(),
        optimizer: OptimizerSettings::default(),
    }]
}

impl FromStr for HarnessConfig {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s).map_err(|e| ScriptError::ConfigParsing(e.to_string()))
    }
}

impl HarnessConfig {
    /// The configuration compiled into the binary
    pub fn builtin() -> Result<Self, ScriptError> {
        DEFAULT_CONFIG.parse()
    }

    /// Load the configuration from `path`, falling back to the built-in one
    pub fn load(path: Option<&Path>) -> Result<Self, ScriptError> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?;
                contents.parse()
            }
            None => Self::builtin(),
        }
    }

    /// The name of the network to use, preferring the explicitly selected one
    pub fn network_name<'a>(&'a self, selected: Option<&'a str>) -> &'a str {
        selected.unwrap_or(&self.default_network)
    }

    /// Resolve the named network against the given secrets, enforcing that it
    /// has a usable RPC URL and at least one signing key
    pub fn resolve_network(
        &self,
        name: &str,
        secrets: &impl SecretSource,
    ) -> Result<ResolvedNetwork, ScriptError> {
        let descriptor = self.networks.get(name).ok_or_else(|| {
            ScriptError::NetworkUnusable(format!("network `{}` is not configured", name))
        })?;

        descriptor.resolve(name, secrets)
    }

    /// The path of the compiled artifact for the given contract, following the
    /// `<artifacts>/contracts/<Name>.sol/<Name>.json` layout
    pub fn artifact_path(&self, contract_name: &str) -> PathBuf {
        self.paths
            .artifacts
            .join("contracts")
            .join(format!("{contract_name}.sol"))
            .join(format!("{contract_name}.json"))
    }
}

impl NetworkDescriptor {
    /// Resolve the descriptor's URL placeholders and account keys
    pub fn resolve(
        &self,
        name: &str,
        secrets: &impl SecretSource,
    ) -> Result<ResolvedNetwork, ScriptError> {
        let url = interpolate(self.url.trim(), secrets).map_err(|missing| {
            ScriptError::NetworkUnusable(format!(
                "network `{}` URL references unset secrets: {}",
                name,
                missing.join(", ")
            ))
        })?;

        if url.is_empty() {
            return Err(ScriptError::NetworkUnusable(format!(
                "network `{}` has no RPC URL",
                name
            )));
        }
        reqwest::Url::parse(&url).map_err(|e| {
            ScriptError::NetworkUnusable(format!("network `{}` has an invalid RPC URL: {}", name, e))
        })?;

        let mut signers = Vec::with_capacity(self.accounts.len());
        for account in &self.accounts {
            // Unset keys are skipped, only an empty set of signers is fatal
            let Some(key) = secrets.secret(account) else {
                continue;
            };
            let wallet = LocalWallet::from_str(key.trim())
                .map_err(|e| ScriptError::InvalidKey(format!("`{}`: {}", account, e)))?;
            signers.push(wallet);
        }

        if signers.is_empty() {
            return Err(ScriptError::NetworkUnusable(format!(
                "network `{}` has no signing key set (expected one of: {})",
                name,
                self.accounts.join(", ")
            )));
        }

        Ok(ResolvedNetwork {
            name: name.to_string(),
            url,
            chain_id: self.chain_id,
            signers,
            gas: self.gas,
            timeout: self.timeout.map(Duration::from_millis),
            legacy: self.legacy,
        })
    }
}

/// A network whose URL and keys have been resolved and checked
#[derive(Debug, Clone)]
pub struct ResolvedNetwork {
    /// The network's name in the configuration
    pub name: String,
    /// The RPC URL with all placeholders substituted
    pub url: String,
    /// The expected chain ID, if configured
    pub chain_id: Option<u64>,
    /// The network's signers, in configuration order
    pub signers: Vec<LocalWallet>,
    /// Gas limit applied to every transaction
    pub gas: Option<u64>,
    /// RPC request timeout
    pub timeout: Option<Duration>,
    /// Whether transactions are sent in the legacy format
    pub legacy: bool,
}

impl ResolvedNetwork {
    /// The signer at the given index
    pub fn signer(&self, index: usize) -> Result<LocalWallet, ScriptError> {
        self.signers.get(index).cloned().ok_or_else(|| {
            ScriptError::NetworkUnusable(format!(
                "network `{}` has {} signer(s), no account at index {}",
                self.name,
                self.signers.len(),
                index
            ))
        })
    }
}
