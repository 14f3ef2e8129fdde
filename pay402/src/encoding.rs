//! Transport envelope codec for the `X-PAYMENT` header.
//!
//! The header value is the base64 encoding of the UTF-8 JSON
//! serialization of a [`PaymentPayload`]. Decoding recovers a
//! structurally equal payload; JSON key order is not significant because
//! no signature covers the serialized envelope bytes (the EVM signature
//! covers the typed-data hash, the SVM signature covers the transaction
//! bytes).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;
use std::fmt::Display;

use crate::error::PaymentError;
use crate::proto::PaymentPayload;

/// A wrapper for base64-encoded byte data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Bytes(pub Vec<u8>);

impl Base64Bytes {
    /// Decodes the base64 string bytes to raw binary data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        b64.decode(&self.0)
    }

    /// Encodes raw binary data into base64 string bytes.
    pub fn encode<T: AsRef<[u8]>>(input: T) -> Self {
        let encoded = b64.encode(input.as_ref());
        Self(encoded.into_bytes())
    }
}

impl AsRef<[u8]> for Base64Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Base64Bytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Encodes a payment payload into an `X-PAYMENT` header value.
///
/// # Errors
///
/// Returns [`PaymentError::Codec`] if the payload cannot be serialized
/// to JSON.
pub fn encode_payment_header(payload: &PaymentPayload) -> Result<String, PaymentError> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| PaymentError::codec(format!("serialize payload: {e}")))?;
    Ok(Base64Bytes::encode(&json).to_string())
}

/// Decodes an `X-PAYMENT` header value back into a payment payload.
///
/// # Errors
///
/// Returns [`PaymentError::Codec`] if the value is not valid base64 or
/// the decoded bytes are not JSON matching the payload schema. A codec
/// failure usually means a corrupted or truncated header; it is not
/// retryable.
pub fn decode_payment_header(header: &str) -> Result<PaymentPayload, PaymentError> {
    let bytes = Base64Bytes(header.as_bytes().to_vec())
        .decode()
        .map_err(|e| PaymentError::codec(format!("invalid base64: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| PaymentError::codec(format!("invalid payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{
        ExactEvmAuthorization, ExactEvmPayload, ExactPayload, ExactScheme, ExactSvmPayload,
        TokenAmount, V1,
    };
    use crate::timestamp::UnixTimestamp;
    use alloy_primitives::{B256, Bytes, address};

    fn evm_payload() -> PaymentPayload {
        PaymentPayload {
            x402_version: V1,
            scheme: ExactScheme,
            network: "polygon".to_owned(),
            payload: ExactPayload::Evm(ExactEvmPayload {
                signature: Bytes::from(vec![0xab; 65]),
                authorization: ExactEvmAuthorization {
                    from: address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
                    to: address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"),
                    value: TokenAmount::from(250_000u64),
                    valid_after: UnixTimestamp::ZERO,
                    valid_before: UnixTimestamp::from_secs(1_700_003_600),
                    nonce: B256::from([42u8; 32]),
                },
            }),
        }
    }

    fn svm_payload() -> PaymentPayload {
        PaymentPayload {
            x402_version: V1,
            scheme: ExactScheme,
            network: "solana-devnet".to_owned(),
            payload: ExactPayload::Svm(ExactSvmPayload {
                transaction: Base64Bytes::encode(b"signed-transaction-bytes").to_string(),
            }),
        }
    }

    #[test]
    fn evm_round_trip() {
        let payload = evm_payload();
        let header = encode_payment_header(&payload).unwrap();
        let decoded = decode_payment_header(&header).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn svm_round_trip() {
        let payload = svm_payload();
        let header = encode_payment_header(&payload).unwrap();
        let decoded = decode_payment_header(&header).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = decode_payment_header("not base64 at all!!!").unwrap_err();
        assert_eq!(err.kind(), "codec");
    }

    #[test]
    fn rejects_truncated_header() {
        let header = encode_payment_header(&evm_payload()).unwrap();
        let truncated = &header[..header.len() / 2];
        let err = decode_payment_header(truncated).unwrap_err();
        assert_eq!(err.kind(), "codec");
    }

    #[test]
    fn rejects_wrong_schema() {
        let header = Base64Bytes::encode(br#"{"hello":"world"}"#).to_string();
        let err = decode_payment_header(&header).unwrap_err();
        assert_eq!(err.kind(), "codec");
    }

    #[test]
    fn rejects_wrong_version() {
        let header = Base64Bytes::encode(
            br#"{"x402Version":2,"scheme":"exact","network":"base","payload":{"transaction":"AQ=="}}"#,
        )
        .to_string();
        let err = decode_payment_header(&header).unwrap_err();
        assert_eq!(err.kind(), "codec");
    }
}
