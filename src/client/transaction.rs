use crate::params::Params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone, Copy)]
pub(crate) struct RequestTransaction {
    #[serde(rename = "ClientID")]
    pub(crate) client_id: u32,
    #[serde(rename = "ClientTransactionID")]
    pub(crate) client_transaction_id: u32,
}

impl RequestTransaction {
    pub(crate) fn new(client_id: u32) -> Self {
        Self {
            client_id,
            client_transaction_id: auto_increment!().get(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestWithTransaction<'params> {
    #[serde(flatten)]
    pub(crate) params: &'params Params,
    #[serde(flatten)]
    pub(crate) transaction: RequestTransaction,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub(crate) struct ResponseTransaction {
    #[serde(rename = "ClientTransactionID", default)]
    pub(crate) client_transaction_id: Option<u32>,
    #[serde(rename = "ServerTransactionID", default)]
    pub(crate) server_transaction_id: Option<u32>,
}

#[derive(Debug)]
pub(crate) struct ResponseWithTransaction<T> {
    pub(crate) transaction: ResponseTransaction,
    pub(crate) response: T,
}
