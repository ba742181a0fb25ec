use std::collections::HashMap;

use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::DecodingKey;
use serde::Deserialize;

use super::error::PublicKeysError;

/// Body of the pool's `jwks.json` document.
#[derive(Debug, Deserialize)]
pub struct KeyResponse {
    pub(crate) keys: Vec<JsonWebKey>,
}

/// One published key.
#[derive(Clone, Debug, Deserialize)]
pub struct JsonWebKey {
    #[serde(default)]
    pub(crate) alg: String,
    #[serde(default)]
    pub(crate) e: String,
    #[serde(default)]
    pub(crate) kid: String,
    #[serde(default)]
    pub(crate) kty: String,
    #[serde(default)]
    pub(crate) n: String,
    #[serde(default, rename = "use")]
    pub(crate) key_use: String,
}

impl JsonWebKey {
    /// Key id the token header refers to.
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Algorithm the key is published for.
    pub fn alg(&self) -> &str {
        &self.alg
    }

    /// Key type, `RSA` for Cognito pools.
    pub fn kty(&self) -> &str {
        &self.kty
    }

    /// Intended use, `sig` for Cognito pools.
    pub fn key_use(&self) -> &str {
        &self.key_use
    }
}

/// Keys of a single fetch, indexed by `kid`.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: HashMap<String, JsonWebKey>,
}

impl KeySet {
    /// Looks up the key published under `kid`.
    pub fn get(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.get(kid)
    }

    /// Number of distinct key ids.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the document published no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<JsonWebKey> for KeySet {
    // Later entries replace earlier ones with the same kid. Keys without a
    // kid can never be selected by a token and are left out.
    fn from_iter<I: IntoIterator<Item = JsonWebKey>>(iter: I) -> Self {
        KeySet {
            keys: iter
                .into_iter()
                .filter(|key| !key.kid.is_empty())
                .map(|key| (key.kid.clone(), key))
                .collect(),
        }
    }
}

impl From<KeyResponse> for KeySet {
    fn from(response: KeyResponse) -> Self {
        response.keys.into_iter().collect()
    }
}

/// RSA public key rebuilt from a [`JsonWebKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    modulus: Vec<u8>,
    exponent: u32,
}

impl RsaPublicKey {
    /// Decodes `n` and `e`.
    ///
    /// The exponent is left-padded to four bytes and read as a big-endian
    /// `u32`; the modulus is kept as an unsigned big-endian integer.
    pub fn from_jwk(jwk: &JsonWebKey) -> Result<RsaPublicKey, PublicKeysError> {
        let invalid = |component| PublicKeysError::InvalidKeyMaterial {
            kid: jwk.kid.clone(),
            component,
        };

        let exponent = BASE64_URL_SAFE_NO_PAD
            .decode(&jwk.e)
            .ok()
            .and_then(|bytes| decode_exponent(&bytes))
            .ok_or_else(|| invalid("exponent"))?;

        let mut modulus = BASE64_URL_SAFE_NO_PAD
            .decode(&jwk.n)
            .map_err(|_| invalid("modulus"))?;
        let leading_zeros = modulus.iter().take_while(|b| **b == 0).count();
        modulus.drain(..leading_zeros);
        if modulus.is_empty() {
            return Err(invalid("modulus"));
        }

        Ok(RsaPublicKey { modulus, exponent })
    }

    /// Public exponent.
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// Modulus as big-endian bytes without leading zeros.
    pub fn modulus(&self) -> &[u8] {
        &self.modulus
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        let exponent = self.exponent.to_be_bytes();
        let first = exponent.iter().position(|b| *b != 0).unwrap_or(exponent.len() - 1);
        DecodingKey::from_rsa_raw_components(&self.modulus, &exponent[first..])
    }
}

/// Reads up to four big-endian bytes as a non-zero `u32`.
fn decode_exponent(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 4 {
        return None;
    }
    let mut padded = [0u8; 4];
    padded[4 - bytes.len()..].copy_from_slice(bytes);
    Some(u32::from_be_bytes(padded)).filter(|e| *e != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jwk(kid: &str, n: &str, e: &str) -> JsonWebKey {
        JsonWebKey {
            alg: "RS256".into(),
            e: e.into(),
            kid: kid.into(),
            kty: "RSA".into(),
            n: n.into(),
            key_use: "sig".into(),
        }
    }

    #[test]
    fn exponent_padding_matches_four_byte_encoding() {
        // 65537 as 01 00 01 and as 00 01 00 01
        let short = RsaPublicKey::from_jwk(&jwk("a", "AQID", "AQAB")).unwrap();
        let long = RsaPublicKey::from_jwk(&jwk("a", "AQID", "AAEAAQ")).unwrap();

        assert_eq!(short.exponent(), 65537);
        assert_eq!(long.exponent(), 65537);
        assert_eq!(short, long);
    }

    #[test]
    fn single_byte_exponent() {
        let key = RsaPublicKey::from_jwk(&jwk("a", "AQID", "Aw")).unwrap();
        assert_eq!(key.exponent(), 3);
    }

    #[test]
    fn modulus_keeps_big_endian_bytes() {
        // 00 01 02 03 with the sign byte stripped
        let key = RsaPublicKey::from_jwk(&jwk("a", "AAECAw", "AQAB")).unwrap();
        assert_eq!(key.modulus(), &[1, 2, 3]);
    }

    #[test]
    fn rejects_oversized_or_zero_exponent() {
        let too_long = RsaPublicKey::from_jwk(&jwk("a", "AQID", "AQEBAQE"));
        assert!(matches!(
            too_long,
            Err(PublicKeysError::InvalidKeyMaterial { component: "exponent", .. })
        ));

        let zero = RsaPublicKey::from_jwk(&jwk("a", "AQID", "AA"));
        assert!(zero.is_err());
    }

    #[test]
    fn rejects_undecodable_modulus() {
        let result = RsaPublicKey::from_jwk(&jwk("a", "not base64!", "AQAB"));
        assert!(matches!(
            result,
            Err(PublicKeysError::InvalidKeyMaterial { component: "modulus", .. })
        ));
    }

    #[test]
    fn duplicate_kids_keep_last_entry() {
        let response: KeyResponse = serde_json::from_value(json!({
            "keys": [
                { "alg": "RS256", "e": "AQAB", "kid": "dup", "kty": "RSA", "n": "first", "use": "sig" },
                { "alg": "RS256", "e": "AQAB", "kid": "other", "kty": "RSA", "n": "other", "use": "sig" },
                { "alg": "RS256", "e": "AQAB", "kid": "dup", "kty": "RSA", "n": "second", "use": "sig" }
            ]
        }))
        .unwrap();

        let keys = KeySet::from(response);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.get("dup").unwrap().n, "second");
        assert_eq!(keys.get("other").unwrap().key_use(), "sig");
    }

    #[test]
    fn key_without_kid_does_not_hide_the_others() {
        let response: KeyResponse = serde_json::from_value(json!({
            "keys": [
                { "kty": "EC", "crv": "P-256", "x": "a", "y": "b" },
                { "alg": "RS256", "e": "AQAB", "kid": "k", "kty": "RSA", "n": "AQID", "use": "sig" }
            ]
        }))
        .unwrap();

        let keys = KeySet::from(response);
        assert_eq!(keys.len(), 1);
        assert!(keys.get("").is_none());

        let key = keys.get("k").unwrap();
        assert_eq!(key.kty(), "RSA");
        assert_eq!(RsaPublicKey::from_jwk(key).unwrap().exponent(), 65537);
    }

    #[test]
    fn empty_document_yields_empty_set() {
        let response: KeyResponse = serde_json::from_value(json!({ "keys": [] })).unwrap();
        let keys = KeySet::from(response);

        assert!(keys.is_empty());
        assert!(keys.get("k").is_none());
    }
}
