use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Memory cost in KiB (19 MiB).
const ARGON2_MEMORY_KIB: u32 = 19 * 1024;
/// Number of passes over memory.
const ARGON2_ITERATIONS: u32 = 2;
/// Degree of parallelism.
const ARGON2_LANES: u32 = 1;
/// Salt length in bytes before base64 encoding.
const SALT_LEN: usize = 16;

/// Well-formed digest with the same cost as real ones; no password matches it.
/// Verified against when no stored digest exists so that both paths cost one
/// Argon2 run.
pub const DUMMY_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$bJgcNTSMuWwwF6byIyVrVA$R08Xeb1JOuPjHHDsbhWrddyZraGn/1m67XUzdgtnC98";

/// Errors raised while producing a password digest.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("failed to gather entropy for salt: {0}")]
    SaltGeneration(String),

    #[error("invalid hashing parameters: {0}")]
    Parameters(String),

    #[error("hash computation failed: {0}")]
    Computation(String),
}

/// Argon2id password hasher with fixed cost parameters.
///
/// Digests are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so the
/// salt and cost factors travel with the hash and verification needs nothing else.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a hasher using the built-in Argon2id cost parameters.
    pub fn new() -> Result<Self, HashError> {
        let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_LANES, None)
            .map_err(|e| HashError::Parameters(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes a password with a freshly generated salt.
    ///
    /// Password policy is the caller's concern; an empty password still yields a
    /// valid digest.
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| HashError::SaltGeneration(e.to_string()))?;

        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| HashError::SaltGeneration(e.to_string()))?;

        let digest = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashError::Computation(e.to_string()))?;

        Ok(digest.to_string())
    }

    /// Checks a password against a stored digest.
    ///
    /// A wrong password and an unparsable digest both return `false`; callers
    /// cannot tell the two apart.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "stored password digest could not be parsed");
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Like [`verify`](Self::verify), but a missing digest still pays for a
    /// full verification against [`DUMMY_DIGEST`] before returning `false`.
    pub fn verify_stored(&self, password: &str, digest: Option<&str>) -> bool {
        match digest {
            Some(digest) => self.verify(password, digest),
            None => {
                let _ = self.verify(password, DUMMY_DIGEST);
                false
            }
        }
    }
}
