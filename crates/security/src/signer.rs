//! SAuthc1 request signing
//!
//! Every outbound request carries an `Authorization` header binding it to the
//! API key, the current timestamp and a single-use nonce. The server rebuilds
//! the same canonical request and compares signatures, so no handshake or
//! session is needed.

use crate::encoding::{canonicalize_query_string, canonicalize_resource_path};
use crate::request::Request;
use hmac::{Hmac, Mac};
use idstore_core::{
    ApiKey, Clock, Error, NonceGenerator, Result, SystemClock, UuidNonceGenerator,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::trace;

type HmacSha256 = Hmac<Sha256>;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const HOST_HEADER: &str = "Host";
pub const STORMPATH_DATE_HEADER: &str = "X-Stormpath-Date";

const ID_TERMINATOR: &str = "sauthc1_request";
const ALGORITHM: &str = "HMAC-SHA-256";
const AUTHENTICATION_SCHEME: &str = "SAuthc1";

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";

/// Signs requests with the SAuthc1 scheme.
///
/// The signer holds no per-request state; the clock and nonce source are
/// injectable so signatures can be reproduced exactly in tests.
#[derive(Debug, Clone)]
pub struct Sauthc1Signer {
    clock: Arc<dyn Clock>,
    nonces: Arc<dyn NonceGenerator>,
}

impl Default for Sauthc1Signer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidNonceGenerator))
    }
}

impl Sauthc1Signer {
    pub fn new(clock: Arc<dyn Clock>, nonces: Arc<dyn NonceGenerator>) -> Self {
        Self { clock, nonces }
    }

    /// Attach `Host`, `X-Stormpath-Date` and `Authorization` headers to
    /// `request`. Any previous authentication headers are replaced.
    pub fn sign(&self, request: &mut Request, api_key: &ApiKey) -> Result<()> {
        request.headers.remove(AUTHORIZATION_HEADER);
        request.headers.remove(STORMPATH_DATE_HEADER);

        let now = self.clock.now();
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let date_stamp = now.format(DATE_FORMAT).to_string();
        let nonce = self.nonces.next_nonce();

        let host = request.host_header()?;
        request.headers.insert(HOST_HEADER, host);
        request.headers.insert(STORMPATH_DATE_HEADER, timestamp.as_str());

        let (canonical_headers, signed_headers) = canonicalize_headers(request);
        let canonical_request = [
            request.method.as_str().to_string(),
            canonicalize_resource_path(request.url().path()),
            canonicalize_query_string(&request.query),
            canonical_headers,
            signed_headers.clone(),
            hex::encode(Sha256::digest(request.payload())),
        ]
        .join("\n");

        let id = format!("{}/{date_stamp}/{nonce}/{ID_TERMINATOR}", api_key.id());
        let string_to_sign = [
            ALGORITHM.to_string(),
            timestamp,
            id.clone(),
            hex::encode(Sha256::digest(canonical_request.as_bytes())),
        ]
        .join("\n");

        let secret = format!("{AUTHENTICATION_SCHEME}{}", api_key.secret());
        let k_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes())?;
        let k_nonce = hmac_sha256(&k_date, nonce.as_bytes())?;
        let k_signing = hmac_sha256(&k_nonce, ID_TERMINATOR.as_bytes())?;
        let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes())?);

        trace!(
            method = %request.method,
            url = %request.url(),
            signed_headers = %signed_headers,
            "signed request"
        );

        request.headers.insert(
            AUTHORIZATION_HEADER,
            format!(
                "{AUTHENTICATION_SCHEME} sauthc1Id={id}, sauthc1SignedHeaders={signed_headers}, sauthc1Signature={signature}"
            ),
        );

        Ok(())
    }
}

/// Canonical header block and the matching signed-headers list
fn canonicalize_headers(request: &Request) -> (String, String) {
    let mut headers: Vec<(String, &str)> = request
        .headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    let canonical = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect::<String>();
    let signed = headers
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");

    (canonical, signed)
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| Error::validation(format!("invalid signing key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use chrono::{TimeZone, Utc};
    use idstore_core::testing::{FixedNonceGenerator, ManualClock};
    use proptest::prelude::*;

    const NONCE: &str = "a43a9d25-ab06-421e-8605-33fd1e760825";

    fn fixed_signer() -> Sauthc1Signer {
        Sauthc1Signer::new(
            Arc::new(ManualClock::new(
                Utc.with_ymd_and_hms(2013, 7, 1, 0, 0, 0).unwrap(),
            )),
            Arc::new(FixedNonceGenerator(NONCE.to_string())),
        )
    }

    fn api_key() -> ApiKey {
        ApiKey::new("MyId", "Shush!").unwrap()
    }

    #[test]
    fn test_known_signature() {
        let mut request = Request::new(HttpMethod::Get, "https://api.stormpath.com/v1/").unwrap();
        fixed_signer().sign(&mut request, &api_key()).unwrap();

        assert_eq!(request.headers.get("Host"), Some("api.stormpath.com"));
        assert_eq!(
            request.headers.get("X-Stormpath-Date"),
            Some("20130701T000000Z")
        );
        assert_eq!(
            request.headers.get("Authorization"),
            Some(
                "SAuthc1 sauthc1Id=MyId/20130701/a43a9d25-ab06-421e-8605-33fd1e760825/sauthc1_request, \
                 sauthc1SignedHeaders=host;x-stormpath-date, \
                 sauthc1Signature=990a95aabbcbeb53e48fb721f73b75bd3ae025a2e86ad359d08558e1bbb9411c"
            )
        );
    }

    #[test]
    fn test_resigning_is_idempotent() {
        let signer = fixed_signer();
        let mut request = Request::new(HttpMethod::Get, "https://api.stormpath.com/v1/").unwrap();

        signer.sign(&mut request, &api_key()).unwrap();
        let first = request.headers.get("Authorization").map(str::to_string);
        signer.sign(&mut request, &api_key()).unwrap();

        assert_eq!(request.headers.get("Authorization").map(str::to_string), first);
        assert_eq!(request.headers.len(), 3);
    }

    #[test]
    fn test_body_and_query_change_signature() {
        let signer = fixed_signer();
        let sign = |request: Request| {
            let mut request = request;
            signer.sign(&mut request, &api_key()).unwrap();
            request.headers.get("Authorization").map(str::to_string)
        };

        let href = "https://api.stormpath.com/v1/accounts/1";
        let plain = sign(Request::new(HttpMethod::Post, href).unwrap());
        let with_body = sign(Request::new(HttpMethod::Post, href).unwrap().with_body(b"{}".to_vec()));
        let with_query = sign(
            Request::new(HttpMethod::Post, href)
                .unwrap()
                .with_query([("expand", "groups")]),
        );

        assert_ne!(plain, with_body);
        assert_ne!(plain, with_query);
    }

    #[test]
    fn test_non_default_port_in_host() {
        let mut request = Request::new(HttpMethod::Get, "http://localhost:8080/v1/tenants/current").unwrap();
        fixed_signer().sign(&mut request, &api_key()).unwrap();
        assert_eq!(request.headers.get("Host"), Some("localhost:8080"));
    }

    #[test]
    fn test_fresh_nonce_per_call() {
        let signer = Sauthc1Signer::new(
            Arc::new(ManualClock::new(Utc::now())),
            Arc::new(UuidNonceGenerator),
        );
        let mut first = Request::new(HttpMethod::Get, "https://api.stormpath.com/v1/").unwrap();
        let mut second = first.clone();

        signer.sign(&mut first, &api_key()).unwrap();
        signer.sign(&mut second, &api_key()).unwrap();

        assert_ne!(
            first.headers.get("Authorization"),
            second.headers.get("Authorization")
        );
    }

    proptest! {
        #[test]
        fn prop_header_order_does_not_change_signature(
            headers in proptest::collection::btree_map("[a-z][a-z0-9-]{0,10}", "[ -~]{0,20}", 0..6)
        ) {
            let href = "https://api.stormpath.com/v1/applications";
            let mut forward = Request::new(HttpMethod::Get, href).unwrap();
            let mut backward = Request::new(HttpMethod::Get, href).unwrap();

            for (name, value) in headers.iter() {
                forward.headers.insert(format!("X-{name}"), value.as_str());
            }
            for (name, value) in headers.iter().rev() {
                backward.headers.insert(format!("x-{}", name.to_uppercase()), value.as_str());
            }

            let signer = fixed_signer();
            signer.sign(&mut forward, &api_key()).unwrap();
            signer.sign(&mut backward, &api_key()).unwrap();

            prop_assert_eq!(
                forward.headers.get("Authorization"),
                backward.headers.get("Authorization")
            );
        }
    }
}
