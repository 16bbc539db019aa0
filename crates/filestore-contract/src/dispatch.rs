//! By-name transaction routing.
//!
//! A peer invokes chaincode with a function name and a list of string
//! arguments. [`Transaction::parse`] turns that pair into a typed call and
//! [`FileStoreContract::invoke`] runs it, returning the response payload the
//! peer hands back to the client.

use filestore_types::FileMetadata;
use tracing::debug;

use crate::context::TransactionContext;
use crate::contract::FileStoreContract;
use crate::error::{ContractError, ContractResult};

/// Function names exported to the host, in registration order.
pub const FUNCTIONS: &[&str] = &[
    "StoreFile",
    "GetFile",
    "GetAllFiles",
    "UpdateFile",
    "DeleteFile",
    "FileExists",
];

/// A parsed contract invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transaction {
    StoreFile(FileMetadata),
    GetFile(String),
    GetAllFiles,
    UpdateFile(FileMetadata),
    DeleteFile(String),
    FileExists(String),
}

impl Transaction {
    /// Parse a function name and its string arguments.
    ///
    /// `ReadFile` is accepted as an alias of `GetFile`.
    pub fn parse<S: AsRef<str>>(function: &str, args: &[S]) -> ContractResult<Self> {
        match function {
            "StoreFile" => Ok(Self::StoreFile(record_arg("StoreFile", args)?)),
            "GetFile" | "ReadFile" => Ok(Self::GetFile(id_arg("GetFile", args)?)),
            "GetAllFiles" => {
                expect_arity("GetAllFiles", args, 0)?;
                Ok(Self::GetAllFiles)
            }
            "UpdateFile" => Ok(Self::UpdateFile(record_arg("UpdateFile", args)?)),
            "DeleteFile" => Ok(Self::DeleteFile(id_arg("DeleteFile", args)?)),
            "FileExists" => Ok(Self::FileExists(id_arg("FileExists", args)?)),
            other => Err(ContractError::UnknownFunction(other.to_string())),
        }
    }

    /// Canonical exported name of this transaction.
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::StoreFile(_) => "StoreFile",
            Self::GetFile(_) => "GetFile",
            Self::GetAllFiles => "GetAllFiles",
            Self::UpdateFile(_) => "UpdateFile",
            Self::DeleteFile(_) => "DeleteFile",
            Self::FileExists(_) => "FileExists",
        }
    }

    /// Whether the transaction writes world state and must be submitted
    /// for ordering, as opposed to evaluated against a single peer.
    pub fn is_submit(&self) -> bool {
        matches!(
            self,
            Self::StoreFile(_) | Self::UpdateFile(_) | Self::DeleteFile(_)
        )
    }
}

impl FileStoreContract {
    /// Run a parsed transaction and encode its response payload.
    ///
    /// Writes return an empty payload, `GetFile` the record JSON,
    /// `GetAllFiles` a JSON array and `FileExists` a JSON boolean.
    pub fn execute(&self, ctx: &TransactionContext<'_>, tx: Transaction) -> ContractResult<Vec<u8>> {
        debug!(tx_id = ctx.tx_id(), function = tx.function_name(), "executing transaction");
        match tx {
            Transaction::StoreFile(metadata) => {
                self.store_file(ctx, &metadata)?;
                Ok(Vec::new())
            }
            Transaction::GetFile(id) => {
                let metadata = self.get_file(ctx, &id)?;
                Ok(metadata.to_json()?)
            }
            Transaction::GetAllFiles => {
                let files = self.get_all_files(ctx)?;
                encode(&files)
            }
            Transaction::UpdateFile(metadata) => {
                self.update_file(ctx, &metadata)?;
                Ok(Vec::new())
            }
            Transaction::DeleteFile(id) => {
                self.delete_file(ctx, &id)?;
                Ok(Vec::new())
            }
            Transaction::FileExists(id) => encode(&self.file_exists(ctx, &id)?),
        }
    }

    /// Parse and run a by-name invocation.
    pub fn invoke<S: AsRef<str>>(
        &self,
        ctx: &TransactionContext<'_>,
        function: &str,
        args: &[S],
    ) -> ContractResult<Vec<u8>> {
        let tx = Transaction::parse(function, args)?;
        self.execute(ctx, tx)
    }
}

fn encode<T: serde::Serialize + ?Sized>(value: &T) -> ContractResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ContractError::Serialization(e.to_string()))
}

fn expect_arity<S: AsRef<str>>(
    function: &'static str,
    args: &[S],
    expected: usize,
) -> ContractResult<()> {
    if args.len() != expected {
        return Err(ContractError::InvalidArguments {
            function,
            reason: format!("expected {expected} argument(s), got {}", args.len()),
        });
    }
    Ok(())
}

fn id_arg<S: AsRef<str>>(function: &'static str, args: &[S]) -> ContractResult<String> {
    expect_arity(function, args, 1)?;
    Ok(args[0].as_ref().to_string())
}

fn record_arg<S: AsRef<str>>(function: &'static str, args: &[S]) -> ContractResult<FileMetadata> {
    expect_arity(function, args, 1)?;
    serde_json::from_str(args[0].as_ref()).map_err(|e| ContractError::InvalidArguments {
        function,
        reason: format!("record is not valid file metadata JSON: {e}"),
    })
}
