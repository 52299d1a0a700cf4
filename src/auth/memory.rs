use super::*;
use crate::core::ID;
use crate::core::Unique;
use crate::pg::PgErr;
use tokio::sync::Mutex;

/// In-memory `CredentialStore` for exercising the rotation protocol
/// without a live database. `consume` holds one lock acquisition across
/// its check and removal, matching the atomicity of the single-statement
/// conditional DELETE it stands in for.
#[derive(Default)]
pub struct Memory {
    accounts: Mutex<Vec<(Account, String)>>,
    tokens: Mutex<Vec<Session>>,
}

impl Memory {
    pub async fn seed(&self, account: Account, hashword: String) {
        self.accounts.lock().await.push((account, hashword));
    }
    pub async fn live_tokens(&self) -> usize {
        self.tokens.lock().await.len()
    }
}

impl CredentialStore for Memory {
    async fn taken(&self, email: &str) -> Result<bool, PgErr> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .any(|(account, _)| account.email() == email))
    }

    async fn create(&self, new: &Account, hashword: &str) -> Result<(), PgErr> {
        self.accounts
            .lock()
            .await
            .push((new.clone(), hashword.to_string()));
        Ok(())
    }

    async fn lookup(&self, email: &str) -> Result<Option<(Account, String)>, PgErr> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|(account, _)| account.email() == email)
            .cloned())
    }

    async fn fetch(&self, user: ID<Account>) -> Result<Option<Account>, PgErr> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|(account, _)| account.id() == user)
            .map(|(account, _)| account.clone()))
    }

    async fn update(
        &self,
        user: ID<Account>,
        username: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<Option<Account>, PgErr> {
        let mut accounts = self.accounts.lock().await;
        match accounts.iter_mut().find(|(account, _)| account.id() == user) {
            Some((account, _)) => {
                let old = account.clone();
                *account = Account::new(
                    old.id(),
                    username.unwrap_or(old.username()).to_string(),
                    old.email().to_string(),
                    avatar.unwrap_or(old.avatar()).to_string(),
                );
                Ok(Some(old))
            }
            None => Ok(None),
        }
    }

    async fn grant(&self, session: &Session) -> Result<(), PgErr> {
        self.tokens.lock().await.push(session.clone());
        Ok(())
    }

    async fn consume(&self, session: &Session) -> Result<bool, PgErr> {
        let mut tokens = self.tokens.lock().await;
        match tokens.iter().position(|tracked| tracked == session) {
            Some(found) => {
                tokens.remove(found);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all(&self, user: ID<Account>) -> Result<u64, PgErr> {
        let mut tokens = self.tokens.lock().await;
        let before = tokens.len();
        tokens.retain(|tracked| tracked.user() != user);
        Ok((before - tokens.len()) as u64)
    }
}
