//! Definitions of errors that can occur during the execution of the community scripts

use std::{
    any::Any,
    error::Error,
    fmt::{self, Display, Formatter},
};

use ethers::{
    contract::ContractError,
    middleware::signer::SignerMiddlewareError,
    providers::{Http, Middleware, MiddlewareError, Provider, ProviderError, RpcError},
    signers::LocalWallet,
};

/// The middleware error raised by the signing client
type SignerClientError = SignerMiddlewareError<Provider<Http>, LocalWallet>;

/// Coarse classification of a [`ScriptError`], printed alongside the error
/// so that the operator knows where to look first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An operator-supplied argument was malformed or missing
    Validation,
    /// The configuration file or the selected network is unusable
    Configuration,
    /// The RPC endpoint could not be reached or returned garbage
    Network,
    /// A key was invalid, or the node rejected the signer's transaction
    Authorization,
    /// The contract reverted the call
    Revert,
    /// A compiled contract artifact could not be loaded
    Artifact,
    /// A local file could not be read or written
    Io,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Authorization => write!(f, "authorization"),
            ErrorKind::Revert => write!(f, "contract revert"),
            ErrorKind::Artifact => write!(f, "artifact"),
            ErrorKind::Io => write!(f, "io"),
        }
    }
}

/// Errors that can occur during the execution of the community scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading or parsing the configuration file
    ConfigParsing(String),
    /// The selected network does not satisfy the configured network invariant
    NetworkUnusable(String),
    /// The chain ID reported by the RPC differs from the configured one
    ChainIdMismatch {
        /// The chain ID declared in the configuration
        expected: u64,
        /// The chain ID reported by the RPC endpoint
        actual: u64,
    },
    /// An address argument was empty, malformed, or the zero address
    InvalidAddress {
        /// The name of the argument holding the address
        field: String,
        /// The offending value
        value: String,
    },
    /// An amount argument could not be parsed
    InvalidAmount(String),
    /// A required argument was not supplied and could not be inferred
    MissingArgument(String),
    /// A private key could not be parsed
    InvalidKey(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// The node rejected a request or transaction
    Rejected(String),
    /// The contract reverted
    ContractRevert(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// A transaction was dropped from the mempool before confirmation
    TransactionDropped,
    /// Error parsing a compiled contract artifact
    ArtifactParsing(String),
    /// Error reading a file
    ReadFile(String),
    /// Error writing a file
    WriteFile(String),
}

impl ScriptError {
    /// The coarse kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::InvalidAddress { .. }
            | ScriptError::InvalidAmount(_)
            | ScriptError::MissingArgument(_) => ErrorKind::Validation,
            ScriptError::ConfigParsing(_)
            | ScriptError::NetworkUnusable(_)
            | ScriptError::ChainIdMismatch { .. } => ErrorKind::Configuration,
            ScriptError::ClientInitialization(_)
            | ScriptError::ContractDeployment(_)
            | ScriptError::ContractInteraction(_)
            | ScriptError::TransactionDropped => ErrorKind::Network,
            ScriptError::InvalidKey(_) | ScriptError::Rejected(_) => ErrorKind::Authorization,
            ScriptError::ContractRevert(_) => ErrorKind::Revert,
            ScriptError::ArtifactParsing(_) => ErrorKind::Artifact,
            ScriptError::ReadFile(_) | ScriptError::WriteFile(_) => ErrorKind::Io,
        }
    }

    /// Classify an error returned by a contract call or deployment
    pub fn from_contract_error<M: Middleware + 'static>(err: ContractError<M>) -> Self {
        if err.is_revert() {
            return ScriptError::ContractRevert(err.to_string());
        }

        match &err {
            ContractError::MiddlewareError { e } => {
                if is_signer_failure(e) || e.is_error_response() {
                    ScriptError::Rejected(err.to_string())
                } else {
                    ScriptError::ContractInteraction(err.to_string())
                }
            }
            ContractError::ProviderError { e } => Self::from_provider_error(e),
            _ => ScriptError::ContractInteraction(err.to_string()),
        }
    }

    /// Classify an error returned by the provider outside of a contract call
    pub fn from_provider_error(err: &ProviderError) -> Self {
        if RpcError::as_error_response(err).is_some() {
            ScriptError::Rejected(err.to_string())
        } else {
            ScriptError::ContractInteraction(err.to_string())
        }
    }
}

/// Whether a middleware error was raised by the local signer rather than the
/// node or the transport
fn is_signer_failure(err: &dyn Any) -> bool {
    matches!(
        err.downcast_ref::<SignerClientError>(),
        Some(
            SignerMiddlewareError::SignerError(_)
                | SignerMiddlewareError::WrongSigner
                | SignerMiddlewareError::DifferentChainID
        )
    )
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ConfigParsing(s) => write!(f, "error parsing configuration: {}", s),
            ScriptError::NetworkUnusable(s) => write!(f, "network unusable: {}", s),
            ScriptError::ChainIdMismatch { expected, actual } => write!(
                f,
                "chain ID mismatch: configured {}, RPC reports {}",
                expected, actual
            ),
            ScriptError::InvalidAddress { field, value } => {
                write!(f, "invalid address for `{}`: {:?}", field, value)
            }
            ScriptError::InvalidAmount(s) => write!(f, "invalid amount: {}", s),
            ScriptError::MissingArgument(s) => write!(f, "missing argument: {}", s),
            ScriptError::InvalidKey(s) => write!(f, "invalid private key: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::Rejected(s) => write!(f, "request rejected by node: {}", s),
            ScriptError::ContractRevert(s) => write!(f, "contract reverted: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::TransactionDropped => {
                write!(f, "transaction dropped before confirmation")
            }
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
        }
    }
}

impl Error for ScriptError {}
