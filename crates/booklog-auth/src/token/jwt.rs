//! JWT token generation and validation.
//!
//! Access and refresh tokens are both JWTs signed with the same key. They are
//! told apart by the `token_use` claim, so a refresh token can never be
//! presented where an access token is expected and vice versa.
//!
//! ## Supported Algorithms
//!
//! - **RS256**: RSA with SHA-256
//! - **RS384**: RSA with SHA-384
//! - **ES384**: ECDSA with P-384 curve
//!
//! ## Example
//!
//! ```ignore
//! use booklog_auth::token::jwt::{JwtService, SigningAlgorithm, SigningKeyPair, TokenClaims, TokenUse};
//!
//! let key_pair = SigningKeyPair::generate_rsa(SigningAlgorithm::RS256)?;
//! let jwt_service = JwtService::new(key_pair, "https://booklog.example.com");
//!
//! let claims = TokenClaims::new(jwt_service.issuer(), "42", TokenUse::Access, 1800);
//! let token = jwt_service.encode(&claims)?;
//! let token_data = jwt_service.decode::<TokenClaims>(&token)?;
//! ```

use std::fmt;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use p384::SecretKey as EcSecretKey;
use p384::ecdsa::SigningKey as EcSigningKey;
use p384::pkcs8::{DecodePrivateKey as EcDecodePrivateKey, EncodePrivateKey as EcEncodePrivateKey};
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    Encode(String),

    /// The token is not a well-formed JWT for our algorithm.
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    /// Issuer or another registered claim did not validate.
    #[error("Invalid claims: {0}")]
    Claims(String),

    /// A key could not be generated, parsed or used.
    #[error("Key error: {0}")]
    Key(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => Self::Claims(err.to_string()),
            ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidEcdsaKey | ErrorKind::InvalidKeyFormat => {
                Self::Key(err.to_string())
            }
            _ => Self::Malformed(err.to_string()),
        }
    }
}

fn key_err(err: impl fmt::Display) -> JwtError {
    JwtError::Key(err.to_string())
}

// ============================================================================
// Signing Algorithm
// ============================================================================

/// Supported signing algorithms for JWT tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    /// RSA with SHA-256.
    RS256,
    /// RSA with SHA-384.
    RS384,
    /// ECDSA with P-384 curve.
    ES384,
}

impl SigningAlgorithm {
    /// Converts to the `jsonwebtoken` Algorithm type.
    #[must_use]
    pub fn to_jwt_algorithm(self) -> Algorithm {
        match self {
            Self::RS256 => Algorithm::RS256,
            Self::RS384 => Algorithm::RS384,
            Self::ES384 => Algorithm::ES384,
        }
    }

    /// Returns the algorithm name as used in JWT headers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::ES384 => "ES384",
        }
    }

    /// Returns `true` if this is an RSA-based algorithm.
    #[must_use]
    pub fn is_rsa(&self) -> bool {
        matches!(self, Self::RS256 | Self::RS384)
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RS256" => Ok(Self::RS256),
            "RS384" => Ok(Self::RS384),
            "ES384" => Ok(Self::ES384),
            other => Err(JwtError::Key(format!(
                "Unsupported signing algorithm: {}",
                other
            ))),
        }
    }
}

// ============================================================================
// Token Claims
// ============================================================================

/// What a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    /// Authenticates API calls.
    Access,
    /// Exchanged for a new token pair.
    Refresh,
}

impl TokenUse {
    /// Returns the claim value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Issuer (server URL).
    pub iss: String,

    /// Subject (owner key, i.e. the member id).
    pub sub: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// JWT ID. Makes every issued token unique.
    pub jti: String,

    /// Access or refresh.
    pub token_use: TokenUse,
}

impl TokenClaims {
    /// Creates claims issued now that expire after `lifetime_seconds`.
    #[must_use]
    pub fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        token_use: TokenUse,
        lifetime_seconds: i64,
    ) -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self {
            iss: issuer.into(),
            sub: subject.into(),
            exp: now.saturating_add(lifetime_seconds),
            iat: now,
            jti: uuid::Uuid::new_v4().to_string(),
            token_use,
        }
    }
}

// ============================================================================
// Signing Key Pair
// ============================================================================

/// A signing key pair for JWT operations.
pub struct SigningKeyPair {
    /// Key ID.
    pub kid: String,

    /// Signing algorithm.
    pub algorithm: SigningAlgorithm,

    /// Encoding key (private key) for signing.
    encoding_key: EncodingKey,

    /// Decoding key (public key) for verification.
    decoding_key: DecodingKey,
}

impl SigningKeyPair {
    /// Generates a key pair for any supported algorithm under a random kid.
    ///
    /// # Errors
    /// Returns an error if key generation fails.
    pub fn generate(algorithm: SigningAlgorithm) -> Result<Self, JwtError> {
        if algorithm.is_rsa() {
            Self::generate_rsa(algorithm)
        } else {
            Self::generate_ec()
        }
    }

    /// Generates a new 2048-bit RSA key pair.
    ///
    /// # Errors
    /// Returns an error if key generation fails or algorithm is not RSA-based.
    pub fn generate_rsa(algorithm: SigningAlgorithm) -> Result<Self, JwtError> {
        if !algorithm.is_rsa() {
            return Err(JwtError::Key(format!("{} is not RSA-based", algorithm)));
        }

        let private_key = RsaPrivateKey::new(&mut OsRng, 2048).map_err(key_err)?;
        let private_pem = rsa::pkcs8::EncodePrivateKey::to_pkcs8_pem(&private_key, LineEnding::LF)
            .map_err(key_err)?;
        let public_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(key_err)?;

        let keys = rsa_keys(private_pem.as_bytes(), public_pem.as_bytes())?;
        Ok(Self::assemble(uuid::Uuid::new_v4().to_string(), algorithm, keys))
    }

    /// Generates a new EC key pair on the P-384 curve.
    ///
    /// # Errors
    /// Returns an error if key generation fails.
    pub fn generate_ec() -> Result<Self, JwtError> {
        let secret_key = EcSecretKey::random(&mut OsRng);
        let private_pem = secret_key.to_pkcs8_pem(LineEnding::LF).map_err(key_err)?;

        let keys = ec_keys(&secret_key, private_pem.as_bytes())?;
        Ok(Self::assemble(
            uuid::Uuid::new_v4().to_string(),
            SigningAlgorithm::ES384,
            keys,
        ))
    }

    /// Loads a key pair from PEM strings.
    ///
    /// RSA keys need both PEMs. For ES384 the public key is derived from the
    /// PKCS#8 private key and `public_pem` is ignored.
    ///
    /// # Errors
    /// Returns an error if the PEM data is invalid.
    pub fn from_pem(
        kid: impl Into<String>,
        algorithm: SigningAlgorithm,
        private_pem: &str,
        public_pem: &str,
    ) -> Result<Self, JwtError> {
        let keys = if algorithm.is_rsa() {
            rsa_keys(private_pem.as_bytes(), public_pem.as_bytes())?
        } else {
            let secret_key = EcSecretKey::from_pkcs8_pem(private_pem).map_err(key_err)?;
            ec_keys(&secret_key, private_pem.as_bytes())?
        };
        Ok(Self::assemble(kid.into(), algorithm, keys))
    }

    fn assemble(
        kid: String,
        algorithm: SigningAlgorithm,
        (encoding_key, decoding_key): (EncodingKey, DecodingKey),
    ) -> Self {
        Self {
            kid,
            algorithm,
            encoding_key,
            decoding_key,
        }
    }
}

fn rsa_keys(private_pem: &[u8], public_pem: &[u8]) -> Result<(EncodingKey, DecodingKey), JwtError> {
    let encoding_key = EncodingKey::from_rsa_pem(private_pem).map_err(key_err)?;
    let decoding_key = DecodingKey::from_rsa_pem(public_pem).map_err(key_err)?;
    Ok((encoding_key, decoding_key))
}

/// Builds the jsonwebtoken keys for a P-384 secret key.
fn ec_keys(
    secret_key: &EcSecretKey,
    private_pem: &[u8],
) -> Result<(EncodingKey, DecodingKey), JwtError> {
    let point = EcSigningKey::from(secret_key)
        .verifying_key()
        .to_encoded_point(false);
    let (Some(x), Some(y)) = (point.x(), point.y()) else {
        return Err(JwtError::Key("P-384 public key has no affine coordinates".into()));
    };

    let encoding_key = EncodingKey::from_ec_pem(private_pem).map_err(key_err)?;

    // jsonwebtoken has no EC public key export, build from the coordinates
    let decoding_key = DecodingKey::from_ec_components(
        &URL_SAFE_NO_PAD.encode(x.as_slice()),
        &URL_SAFE_NO_PAD.encode(y.as_slice()),
    )
    .map_err(key_err)?;

    Ok((encoding_key, decoding_key))
}

// ============================================================================
// JWT Service
// ============================================================================

/// Service for encoding and decoding JWT tokens.
///
/// This service is thread-safe (`Send + Sync`) and can be shared across
/// async tasks.
pub struct JwtService {
    signing_key: SigningKeyPair,
    issuer: String,
}

impl JwtService {
    /// Creates a new JWT service.
    #[must_use]
    pub fn new(signing_key: SigningKeyPair, issuer: impl Into<String>) -> Self {
        Self {
            signing_key,
            issuer: issuer.into(),
        }
    }

    /// Encodes claims into a JWT string.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let mut header = Header::new(self.signing_key.algorithm.to_jwt_algorithm());
        header.kid = Some(self.signing_key.kid.clone());

        encode(&header, claims, &self.signing_key.encoding_key)
            .map_err(|e| JwtError::Encode(e.to_string()))
    }

    /// Decodes and validates a JWT string.
    ///
    /// # Errors
    /// Returns an error if decoding or validation fails.
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<TokenData<T>, JwtError> {
        decode(token, &self.signing_key.decoding_key, &self.validation(true))
            .map_err(JwtError::from)
    }

    /// Decodes a JWT without validating expiration.
    ///
    /// The signature and issuer are still validated.
    ///
    /// # Errors
    /// Returns an error if decoding fails.
    pub fn decode_allow_expired<T: DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<TokenData<T>, JwtError> {
        decode(token, &self.signing_key.decoding_key, &self.validation(false))
            .map_err(JwtError::from)
    }

    fn validation(&self, validate_exp: bool) -> Validation {
        let mut validation = Validation::new(self.signing_key.algorithm.to_jwt_algorithm());
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = validate_exp;
        // Tokens are only checked by the service that signed them
        validation.leeway = 0;
        validation.validate_aud = false;
        validation
    }

    /// Returns the current signing key ID.
    #[must_use]
    pub fn current_kid(&self) -> &str {
        &self.signing_key.kid
    }

    /// Returns the issuer URL.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

// ============================================================================
// Tests
// ============================================================================
