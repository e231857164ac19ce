use crate::domain::request::OperationRequest;
use crate::error::{Result, WalletError};
use serde::Deserialize;
use std::io::Read;

/// One entry of a CLI batch: the caller's verified account id plus the
/// operation payload, flattened so the on-disk shape matches the inbound
/// request shape with `account` alongside.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OperationEnvelope {
    pub account: String,
    #[serde(flatten)]
    pub request: OperationRequest,
}

/// Reads operation envelopes from a JSON-lines source.
///
/// Wraps `serde_json`'s streaming deserializer and yields one
/// `Result<OperationEnvelope>` per value, so large batches are processed
/// without loading the whole file.
pub struct RequestReader<R: Read> {
    source: R,
}

impl<R: Read> RequestReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn operations(self) -> impl Iterator<Item = Result<OperationEnvelope>> {
        serde_json::Deserializer::from_reader(self.source)
            .into_iter::<OperationEnvelope>()
            .map(|result| result.map_err(WalletError::from))
    }
}
