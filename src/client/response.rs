use super::transaction::{ResponseTransaction, ResponseWithTransaction};
use crate::response::ValueResponse;
use crate::{ASCOMError, ASCOMErrorCode, Error, Result};
use mime::Mime;
use serde::de::DeserializeOwned;
use std::any::{TypeId, type_name};

/// Decode an Alpaca JSON response body.
///
/// Remote errors take precedence over value decoding: a response carrying a
/// non-zero `ErrorNumber` is a [`Error::Remote`] no matter what `Value` holds.
pub(crate) fn parse<T: 'static + DeserializeOwned>(
    mime_type: &Mime,
    bytes: &[u8],
) -> Result<ResponseWithTransaction<T>> {
    if mime_type.essence_str() != mime::APPLICATION_JSON.as_ref() {
        return Err(Error::Protocol(format!(
            "Expected JSON response, got {mime_type}"
        )));
    }
    match mime_type.get_param(mime::CHARSET) {
        Some(mime::UTF_8) | None => {}
        Some(charset) => {
            return Err(Error::Protocol(format!("Unsupported charset {charset}")));
        }
    }

    let transaction = serde_json::from_slice::<ResponseTransaction>(bytes)
        .map_err(|err| Error::Protocol(format!("Malformed response: {err}")))?;

    let ascom_error = serde_json::from_slice::<ASCOMError>(bytes)
        .map_err(|err| Error::Protocol(format!("Malformed error fields: {err}")))?;
    if ascom_error.code != ASCOMErrorCode::OK {
        return Err(Error::Remote(ascom_error));
    }

    let response = if TypeId::of::<T>() == TypeId::of::<()>() {
        // serde expects `null` for the unit type, but any body is acceptable here.
        serde_json::from_slice::<T>(b"null")
    } else {
        serde_json::from_slice::<ValueResponse<T>>(bytes).map(ValueResponse::into)
    }
    .map_err(|err| {
        Error::Protocol(format!(
            "Couldn't decode value as {}: {err}",
            type_name::<T>()
        ))
    })?;

    Ok(ResponseWithTransaction {
        transaction,
        response,
    })
}
