use argon2::Argon2;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::password_hash::SaltString;

fn salt() -> SaltString {
    use rand::Rng;
    let ref mut bytes = [0u8; 16];
    rand::rng().fill(bytes);
    SaltString::encode_b64(bytes).expect("salt")
}

pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt())
        .map(|h| h.to_string())
}

pub fn verify(password: &str, hashword: &str) -> bool {
    PasswordHash::new(hashword)
        .ok()
        .as_ref()
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), hash)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let hashword = hash("correct horse battery").unwrap();
        assert!(verify("correct horse battery", &hashword));
    }

    #[test]
    fn rejects_wrong_password() {
        let hashword = hash("correct horse battery").unwrap();
        assert!(!verify("incorrect horse battery", &hashword));
    }

    #[test]
    fn rejects_garbage_hashword() {
        assert!(!verify("anything", "not a phc string"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash("same input").unwrap();
        let b = hash("same input").unwrap();
        assert_ne!(a, b);
    }
}
