use crate::{abstract_trait::HashingTrait, errors::ServiceError};
use async_trait::async_trait;
use bcrypt::{hash, verify};

#[derive(Clone)]
pub struct Hashing {
    cost: u32,
}

impl Hashing {
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl HashingTrait for Hashing {
    async fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let hashed = hash(password, self.cost).map_err(ServiceError::Bcrypt)?;
        Ok(hashed)
    }

    async fn compare_password(
        &self,
        hashed_password: &str,
        password: &str,
    ) -> Result<(), ServiceError> {
        verify(password, hashed_password)
            .map_err(ServiceError::Bcrypt)
            .and_then(|is_valid| {
                if is_valid {
                    Ok(())
                } else {
                    Err(ServiceError::InvalidCredentials)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_and_verifies_password() {
        let hashing = Hashing::with_cost(4);
        let hashed = hashing.hash_password("secret123").await.unwrap();

        assert_ne!(hashed, "secret123");
        assert!(hashing.compare_password(&hashed, "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn rejects_wrong_password() {
        let hashing = Hashing::with_cost(4);
        let hashed = hashing.hash_password("secret123").await.unwrap();

        let result = hashing.compare_password(&hashed, "nope").await;
        assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn malformed_hash_is_a_bcrypt_error() {
        let hashing = Hashing::with_cost(4);

        let result = hashing.compare_password("not-a-hash", "secret123").await;
        assert!(matches!(result, Err(ServiceError::Bcrypt(_))));
    }
}
