use super::ApiError;
use super::Credentials;
use super::Gateway;
use super::Login;
use super::Vault;
use crate::core::Generation;
use crate::core::RENEWAL_PERIOD;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One client-held session plus its background renewal.
///
/// The slot is generation-tagged: every adoption or eviction bumps the
/// generation, and a rotation outcome lands only if the slot has not
/// moved since the request left, so a logout during a slow rotation
/// stays a logout. Vault writes happen under the slot lock; network
/// calls never do. The renewal task is owned and dies with the manager.
pub struct SessionManager {
    inner: Arc<Inner>,
    renewal: tokio::task::JoinHandle<()>,
}

struct Inner {
    gateway: Box<dyn Gateway>,
    vault: Vault,
    slot: Mutex<Slot>,
}

#[derive(Default)]
struct Slot {
    generation: Generation,
    credentials: Option<Credentials>,
    remember: bool,
}

impl SessionManager {
    pub fn new(gateway: Box<dyn Gateway>, vault: Vault) -> Self {
        let inner = Arc::new(Inner {
            gateway,
            vault,
            slot: Mutex::default(),
        });
        let ticker = Arc::clone(&inner);
        let renewal = tokio::spawn(async move {
            // first renewal one full period after startup; freshness at
            // startup is resume's job
            let start = tokio::time::Instant::now() + RENEWAL_PERIOD;
            let mut clock = tokio::time::interval_at(start, RENEWAL_PERIOD);
            loop {
                clock.tick().await;
                ticker.renew().await;
            }
        });
        Self { inner, renewal }
    }

    /// Attempt exactly one resume from remembered credentials.
    pub async fn resume(&self) -> bool {
        self.inner.resume().await
    }

    /// Sign in, unless a session is already live. `remember` persists
    /// the credentials across restarts.
    pub async fn login(&self, login: &Login, remember: bool) -> Result<Credentials, ApiError> {
        self.inner.login(login, remember).await
    }

    /// Rotate now rather than at the next scheduled tick.
    pub async fn renew(&self) {
        self.inner.renew().await
    }

    /// Clear the session locally, then tell the server best-effort.
    pub async fn logout(&self) {
        self.inner.logout().await
    }

    pub async fn credentials(&self) -> Option<Credentials> {
        self.inner.slot.lock().await.credentials.clone()
    }

    pub async fn access(&self) -> Option<String> {
        self.inner
            .slot
            .lock()
            .await
            .credentials
            .as_ref()
            .map(|c| c.access.clone())
    }

    pub async fn live(&self) -> bool {
        self.inner.slot.lock().await.credentials.is_some()
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.renewal.abort();
    }
}

impl Inner {
    async fn resume(&self) -> bool {
        let Some(remembered) = self.vault.load() else {
            return false;
        };
        let generation = {
            let mut slot = self.slot.lock().await;
            if slot.credentials.is_some() {
                return true;
            }
            slot.remember = true;
            slot.generation
        };
        match self.gateway.rotate(&remembered.refresh).await {
            Ok(fresh) => self.adopt(generation, fresh).await,
            Err(e) if e.denial() => {
                log::info!("remembered session refused: {}", e);
                self.evict(generation).await;
                false
            }
            Err(e) => {
                log::warn!("resume postponed: {}", e);
                false
            }
        }
    }

    async fn login(&self, login: &Login, remember: bool) -> Result<Credentials, ApiError> {
        {
            let slot = self.slot.lock().await;
            if let Some(live) = &slot.credentials {
                return Ok(live.clone());
            }
        }
        let fresh = self.gateway.login(login).await?;
        let mut slot = self.slot.lock().await;
        slot.credentials = Some(fresh.clone());
        slot.generation += 1;
        slot.remember = remember;
        match remember {
            true => self.vault.save(&fresh),
            false => self.vault.clear(),
        }
        Ok(fresh)
    }

    async fn renew(&self) {
        let pending = {
            let slot = self.slot.lock().await;
            slot.credentials
                .as_ref()
                .map(|c| (c.refresh.clone(), slot.generation))
        };
        let Some((refresh, generation)) = pending else {
            return;
        };
        match self.gateway.rotate(&refresh).await {
            Ok(fresh) => {
                self.adopt(generation, fresh).await;
            }
            Err(e) if e.denial() => {
                log::info!("session refused at renewal: {}", e);
                self.evict(generation).await;
            }
            Err(e) => log::warn!("renewal postponed: {}", e),
        }
    }

    async fn logout(&self) {
        let taken = {
            let mut slot = self.slot.lock().await;
            slot.generation += 1;
            slot.remember = false;
            self.vault.clear();
            slot.credentials.take()
        };
        if let Some(credentials) = taken {
            if let Err(e) = self.gateway.logout(&credentials.refresh).await {
                log::warn!("server logout failed, local session already cleared: {}", e);
            }
        }
    }

    /// Apply a rotation outcome unless the slot moved since the request.
    async fn adopt(&self, generation: Generation, fresh: Credentials) -> bool {
        let mut slot = self.slot.lock().await;
        match slot.generation == generation {
            true => {
                slot.credentials = Some(fresh.clone());
                slot.generation += 1;
                if slot.remember {
                    self.vault.save(&fresh);
                }
                true
            }
            false => {
                log::debug!("discarding superseded rotation");
                false
            }
        }
    }

    async fn evict(&self, generation: Generation) {
        let mut slot = self.slot.lock().await;
        if slot.generation == generation {
            slot.credentials = None;
            slot.generation += 1;
            self.vault.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as SyncMutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    fn credentials(tag: &str) -> Credentials {
        Credentials {
            user: uuid::Uuid::now_v7(),
            access: format!("access-{}", tag),
            refresh: format!("refresh-{}", tag),
        }
    }

    fn email() -> Login {
        Login::Email {
            email: String::from("resident@example.com"),
            password: String::from("hunter2"),
        }
    }

    #[derive(Default)]
    struct Scripted {
        on_login: SyncMutex<Vec<Result<Credentials, ApiError>>>,
        on_rotate: SyncMutex<Vec<Result<Credentials, ApiError>>>,
        logins: AtomicUsize,
        rotations: AtomicUsize,
        logouts: AtomicUsize,
        logout_fails: bool,
    }

    impl Scripted {
        fn will_login(self, outcome: Result<Credentials, ApiError>) -> Self {
            self.on_login.lock().unwrap().push(outcome);
            self
        }
        fn will_rotate(self, outcome: Result<Credentials, ApiError>) -> Self {
            self.on_rotate.lock().unwrap().push(outcome);
            self
        }
    }

    #[async_trait::async_trait]
    impl Gateway for Arc<Scripted> {
        async fn login(&self, _: &Login) -> Result<Credentials, ApiError> {
            self.logins.fetch_add(1, Ordering::SeqCst);
            self.on_login.lock().unwrap().remove(0)
        }
        async fn rotate(&self, _: &str) -> Result<Credentials, ApiError> {
            self.rotations.fetch_add(1, Ordering::SeqCst);
            self.on_rotate.lock().unwrap().remove(0)
        }
        async fn logout(&self, _: &str) -> Result<(), ApiError> {
            self.logouts.fetch_add(1, Ordering::SeqCst);
            match self.logout_fails {
                true => Err(ApiError::Transport(String::from("wire cut"))),
                false => Ok(()),
            }
        }
    }

    fn vault_at(dir: &tempfile::TempDir) -> Vault {
        Vault::at(dir.path().join("credentials.json"))
    }

    #[tokio::test]
    async fn login_adopts_and_remembers() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = credentials("first");
        let gateway = Arc::new(Scripted::default().will_login(Ok(fresh.clone())));
        let manager = SessionManager::new(Box::new(gateway.clone()), vault_at(&dir));
        let adopted = manager.login(&email(), true).await.unwrap();
        assert_eq!(adopted, fresh);
        assert_eq!(manager.credentials().await, Some(fresh.clone()));
        assert_eq!(vault_at(&dir).load(), Some(fresh));
    }

    #[tokio::test]
    async fn second_login_reuses_the_live_session() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = credentials("only");
        let gateway = Arc::new(Scripted::default().will_login(Ok(fresh.clone())));
        let manager = SessionManager::new(Box::new(gateway.clone()), vault_at(&dir));
        let first = manager.login(&email(), false).await.unwrap();
        let second = manager.login(&email(), false).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(gateway.logins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn forgettable_login_skips_the_vault() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(Scripted::default().will_login(Ok(credentials("ephemeral"))));
        let manager = SessionManager::new(Box::new(gateway.clone()), vault_at(&dir));
        manager.login(&email(), false).await.unwrap();
        assert!(manager.live().await);
        assert_eq!(vault_at(&dir).load(), None);
    }

    #[tokio::test]
    async fn resume_rotates_remembered_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let old = credentials("remembered");
        let fresh = credentials("fresh");
        vault_at(&dir).save(&old);
        let gateway = Arc::new(Scripted::default().will_rotate(Ok(fresh.clone())));
        let manager = SessionManager::new(Box::new(gateway.clone()), vault_at(&dir));
        assert!(manager.resume().await);
        assert_eq!(manager.credentials().await, Some(fresh.clone()));
        assert_eq!(vault_at(&dir).load(), Some(fresh));
        assert_eq!(gateway.rotations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resume_with_empty_vault_stays_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(Scripted::default());
        let manager = SessionManager::new(Box::new(gateway.clone()), vault_at(&dir));
        assert!(!manager.resume().await);
        assert_eq!(gateway.rotations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refused_resume_clears_the_vault() {
        let dir = tempfile::tempdir().unwrap();
        vault_at(&dir).save(&credentials("stale"));
        let denied = Err(ApiError::Denied(reqwest::StatusCode::FORBIDDEN));
        let gateway = Arc::new(Scripted::default().will_rotate(denied));
        let manager = SessionManager::new(Box::new(gateway.clone()), vault_at(&dir));
        assert!(!manager.resume().await);
        assert_eq!(manager.credentials().await, None);
        assert_eq!(vault_at(&dir).load(), None);
        assert_eq!(gateway.rotations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unreachable_server_postpones_resume() {
        let dir = tempfile::tempdir().unwrap();
        let old = credentials("kept");
        vault_at(&dir).save(&old);
        let lost = Err(ApiError::Transport(String::from("no route")));
        let gateway = Arc::new(Scripted::default().will_rotate(lost));
        let manager = SessionManager::new(Box::new(gateway.clone()), vault_at(&dir));
        assert!(!manager.resume().await);
        assert_eq!(manager.credentials().await, None);
        assert_eq!(vault_at(&dir).load(), Some(old));
    }

    #[tokio::test]
    async fn renewal_rotates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let second = credentials("second");
        let gateway = Arc::new(
            Scripted::default()
                .will_login(Ok(credentials("first")))
                .will_rotate(Ok(second.clone())),
        );
        let manager = SessionManager::new(Box::new(gateway.clone()), vault_at(&dir));
        manager.login(&email(), true).await.unwrap();
        manager.renew().await;
        assert_eq!(manager.credentials().await, Some(second.clone()));
        assert_eq!(vault_at(&dir).load(), Some(second));
    }

    #[tokio::test]
    async fn renewal_outage_keeps_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let first = credentials("first");
        let gateway = Arc::new(
            Scripted::default()
                .will_login(Ok(first.clone()))
                .will_rotate(Err(ApiError::Transport(String::from("timeout")))),
        );
        let manager = SessionManager::new(Box::new(gateway.clone()), vault_at(&dir));
        manager.login(&email(), true).await.unwrap();
        manager.renew().await;
        assert_eq!(manager.credentials().await, Some(first.clone()));
        assert_eq!(vault_at(&dir).load(), Some(first));
    }

    #[tokio::test]
    async fn renewal_denial_evicts_everything() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(
            Scripted::default()
                .will_login(Ok(credentials("doomed")))
                .will_rotate(Err(ApiError::Denied(reqwest::StatusCode::FORBIDDEN))),
        );
        let manager = SessionManager::new(Box::new(gateway.clone()), vault_at(&dir));
        manager.login(&email(), true).await.unwrap();
        manager.renew().await;
        assert_eq!(manager.credentials().await, None);
        assert_eq!(vault_at(&dir).load(), None);
    }

    #[tokio::test]
    async fn logout_clears_locally_despite_dead_server() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(Scripted {
            logout_fails: true,
            ..Scripted::default()
        });
        gateway
            .on_login
            .lock()
            .unwrap()
            .push(Ok(credentials("short")));
        let manager = SessionManager::new(Box::new(gateway.clone()), vault_at(&dir));
        manager.login(&email(), true).await.unwrap();
        manager.logout().await;
        assert_eq!(manager.credentials().await, None);
        assert_eq!(vault_at(&dir).load(), None);
        assert_eq!(gateway.logouts.load(Ordering::SeqCst), 1);
    }

    struct Held {
        fresh: Credentials,
        entered: tokio::sync::Notify,
        release: tokio::sync::Notify,
        logouts: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Gateway for Arc<Held> {
        async fn login(&self, _: &Login) -> Result<Credentials, ApiError> {
            Ok(credentials("seed"))
        }
        async fn rotate(&self, _: &str) -> Result<Credentials, ApiError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(self.fresh.clone())
        }
        async fn logout(&self, _: &str) -> Result<(), ApiError> {
            self.logouts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn logout_beats_an_inflight_renewal() {
        let dir = tempfile::tempdir().unwrap();
        let held = Arc::new(Held {
            fresh: credentials("late"),
            entered: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
            logouts: AtomicUsize::default(),
        });
        let manager = Arc::new(SessionManager::new(
            Box::new(held.clone()),
            vault_at(&dir),
        ));
        manager.login(&email(), true).await.unwrap();
        let renewing = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.renew().await })
        };
        held.entered.notified().await;
        manager.logout().await;
        held.release.notify_one();
        renewing.await.unwrap();
        assert_eq!(manager.credentials().await, None);
        assert_eq!(vault_at(&dir).load(), None);
        assert_eq!(held.logouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drop_stops_the_renewal_task() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(Scripted::default());
        let manager = SessionManager::new(Box::new(gateway), vault_at(&dir));
        let weak = Arc::downgrade(&manager.inner);
        drop(manager);
        for _ in 0..64 {
            tokio::task::yield_now().await;
            if weak.strong_count() == 0 {
                break;
            }
        }
        assert_eq!(weak.strong_count(), 0);
    }
}
