//! Wire format: `base64url(header) "." base64url(claims) "." base64url(signature)`,
//! unpadded. Purely structural; nothing here decides whether a token is
//! trustworthy.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as B64_URL, Engine};

use crate::domain::{Claims, Header, TokenError};

pub const SEGMENT_DELIMITER: char = '.';

/// A token split into its parts. `signing_input` borrows the header and
/// payload segments exactly as received, which is what the signature covers.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken<'a> {
    pub header: Header,
    pub claims: Claims,
    pub signing_input: &'a str,
    pub signature: Vec<u8>,
}

/// Serializes header and claims into the unsigned `header.payload` form.
pub fn encode(header: &Header, claims: &Claims) -> Result<String, TokenError> {
    let header_json = serde_json::to_vec(header).map_err(|_| TokenError::MalformedToken)?;
    let claims_json = serde_json::to_vec(claims).map_err(|_| TokenError::MalformedToken)?;
    Ok(format!(
        "{}{}{}",
        B64_URL.encode(header_json),
        SEGMENT_DELIMITER,
        B64_URL.encode(claims_json)
    ))
}

/// Appends the signature segment to an unsigned token.
pub fn attach_signature(signing_input: &str, signature: &[u8]) -> String {
    format!(
        "{}{}{}",
        signing_input,
        SEGMENT_DELIMITER,
        B64_URL.encode(signature)
    )
}

pub fn decode(token: &str) -> Result<DecodedToken<'_>, TokenError> {
    let (signing_input, signature_segment) = token
        .rsplit_once(SEGMENT_DELIMITER)
        .ok_or(TokenError::MalformedToken)?;
    let (header_segment, payload_segment) = signing_input
        .split_once(SEGMENT_DELIMITER)
        .ok_or(TokenError::MalformedToken)?;
    if payload_segment.contains(SEGMENT_DELIMITER) {
        return Err(TokenError::MalformedToken);
    }

    let header_bytes = decode_segment(header_segment)?;
    let payload_bytes = decode_segment(payload_segment)?;
    let signature = decode_segment(signature_segment)?;

    let header: Header =
        serde_json::from_slice(&header_bytes).map_err(|_| TokenError::MalformedToken)?;
    // Claims are transparent over a JSON object, so arrays and scalars are
    // rejected here.
    let claims: Claims =
        serde_json::from_slice(&payload_bytes).map_err(|_| TokenError::MalformedToken)?;

    Ok(DecodedToken {
        header,
        claims,
        signing_input,
        signature,
    })
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    if segment.is_empty() {
        return Err(TokenError::MalformedToken);
    }
    B64_URL
        .decode(segment)
        .map_err(|_| TokenError::MalformedToken)
}
