use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use hue::bridge::BridgeClient;
use hue::error::HueError;
use skill_api::host::Host;

use crate::credentials::CredentialStore;
use crate::error::{SkillError, SkillResult};
use crate::talk::Talk;
use crate::tasks::TaskManager;

/// Prompts to press the link button before giving up
pub const MAX_PAIRING_ATTEMPTS: usize = 3;

pub const PAIRING_RETRY_DELAY: Duration = Duration::from_secs(20);

/// Delay before announcing the outcome of a background registration
pub const ANNOUNCE_DELAY: Duration = Duration::from_secs(3);

pub const PAIRING_TASK: &str = "hue-register";

const OFFLINE_NO_ADDRESS: &str =
    "Bridge IP not set and stay completely offline set, cannot auto discover Philips Hue bridge";

/// Drives the link button handshake that authorizes the skill on the bridge.
pub struct PairingController<B: ?Sized, H: ?Sized> {
    skill: String,
    bridge: Arc<Mutex<B>>,
    host: Arc<H>,
    store: CredentialStore,
    tasks: TaskManager,
    attempts: Arc<AtomicUsize>,
    offline: bool,
}

impl<B: ?Sized, H: ?Sized> Clone for PairingController<B, H> {
    fn clone(&self) -> Self {
        Self {
            skill: self.skill.clone(),
            bridge: self.bridge.clone(),
            host: self.host.clone(),
            store: self.store.clone(),
            tasks: self.tasks.clone(),
            attempts: self.attempts.clone(),
            offline: self.offline,
        }
    }
}

impl<B, H> PairingController<B, H>
where
    B: BridgeClient + ?Sized + 'static,
    H: Host + ?Sized + 'static,
{
    pub fn new(
        skill: impl Into<String>,
        bridge: Arc<Mutex<B>>,
        host: Arc<H>,
        store: CredentialStore,
        tasks: TaskManager,
        offline: bool,
    ) -> Self {
        Self {
            skill: skill.into(),
            bridge,
            host,
            store,
            tasks,
            attempts: Arc::new(AtomicUsize::new(0)),
            offline,
        }
    }

    /// Button prompts given in the current registration episode
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn failed(&self, reason: impl Into<String>) -> SkillError {
        SkillError::startup_failed(&self.skill, reason)
    }

    /// Save the bridge credentials. The skill keeps running without them.
    async fn persist(&self) {
        let credentials = self.bridge.lock().await.credentials();
        if let Err(err) = self.store.save(&credentials) {
            log::warn!("[{}] Could not save bridge credentials: {err}", self.skill);
        }
    }

    /// Connect to the bridge on skill start.
    ///
    /// An unauthorized username triggers one registration attempt. If the
    /// link button has not been pressed, the start is delayed, and
    /// [`Self::start_background`] should take over.
    pub async fn connect(&self) -> SkillResult<()> {
        let res = self.bridge.lock().await.connect(!self.offline).await;

        match res {
            Ok(true) => {
                log::info!("[{}] Connected to Philips Hue bridge", self.skill);
                self.persist().await;
                Ok(())
            }
            Ok(false) => {
                log::warn!("[{}] No Philips Hue bridge found", self.skill);
                Ok(())
            }
            Err(HueError::UnauthorizedUser) => self.register_once().await,
            Err(HueError::NoBridgeAddress) => Err(self.failed(OFFLINE_NO_ADDRESS)),
            Err(err) => Err(self.failed(format!("Error connecting to bridge: {err}"))),
        }
    }

    async fn register_once(&self) -> SkillResult<()> {
        log::info!("[{}] Not authorized on bridge, registering", self.skill);

        let res = self.bridge.lock().await.register().await;
        match res {
            Ok(username) => {
                log::info!("[{}] Registered on bridge as {username}", self.skill);
                self.persist().await;
                Ok(())
            }
            Err(HueError::LinkButtonNotPressed) => {
                log::warn!("[{}] Bridge link button not pressed", self.skill);
                Err(SkillError::StartDelayed {
                    skill: self.skill.clone(),
                })
            }
            Err(err) => Err(self.failed(format!("Error connecting to bridge: {err}"))),
        }
    }

    fn announce_later(&self, talk: Talk) {
        let host = self.host.clone();
        self.tasks.do_later(ANNOUNCE_DELAY, async move {
            host.say(talk.render()).await;
        });
    }

    /// Register on the bridge, prompting the user to press the link button
    /// between attempts.
    pub async fn register_loop(&self) -> SkillResult<()> {
        loop {
            let res = self.bridge.lock().await.register().await;

            match res {
                Ok(username) => {
                    log::info!("[{}] Registered on bridge as {username}", self.skill);
                    self.attempts.store(0, Ordering::SeqCst);
                    self.persist().await;
                    self.announce_later(Talk::PressBridgeButtonConfirmation);
                    return Ok(());
                }
                Err(HueError::LinkButtonNotPressed) if self.attempts() < MAX_PAIRING_ATTEMPTS => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    log::info!(
                        "[{}] Waiting for bridge link button ({attempt}/{MAX_PAIRING_ATTEMPTS})",
                        self.skill
                    );
                    self.host.say(Talk::PressBridgeButton.render()).await;
                    tokio::time::sleep(PAIRING_RETRY_DELAY).await;
                }
                Err(HueError::LinkButtonNotPressed) => {
                    self.announce_later(Talk::PressBridgeButtonTimeout);
                    return Err(self.failed("Bridge link button was not pressed in time"));
                }
                Err(err) => return Err(self.failed(err.to_string())),
            }
        }
    }

    /// Run [`Self::register_loop`] as a background task, unless one is
    /// already running. Failures are reported to the host.
    pub async fn start_background(&self) -> bool {
        let this = self.clone();
        self.tasks
            .spawn_named(PAIRING_TASK, async move {
                if let Err(err) = this.register_loop().await {
                    log::error!("[{}] Bridge registration failed: {err}", this.skill);
                    let reason = match &err {
                        SkillError::StartupFailed { reason, .. } => reason.clone(),
                        err => err.to_string(),
                    };
                    this.host.report_failure(&this.skill, &reason).await;
                }
            })
            .await
    }

    pub async fn is_running(&self) -> bool {
        self.tasks.is_alive(PAIRING_TASK).await
    }

    /// Wait for a background registration to finish
    pub async fn wait(&self) -> SkillResult<()> {
        self.tasks.join(PAIRING_TASK).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use camino::Utf8Path;
    use tokio::sync::Mutex;

    use hue::bridge::BridgeClient;
    use hue::legacy_api::ApiBridgeState;
    use hue::sim::SimBridge;
    use skill_api::recording::{RecordingHost, Reply};

    use crate::credentials::CredentialStore;
    use crate::error::SkillError;
    use crate::pairing::{MAX_PAIRING_ATTEMPTS, PairingController};
    use crate::talk::Talk;
    use crate::tasks::TaskManager;

    type Controller = PairingController<SimBridge, RecordingHost>;

    fn controller(bridge: SimBridge, store: CredentialStore, offline: bool) -> Controller {
        PairingController::new(
            "hue",
            Arc::new(Mutex::new(bridge)),
            Arc::new(RecordingHost::new()),
            store,
            TaskManager::new(),
            offline,
        )
    }

    fn said(replies: &[Reply], talk: &Talk) -> usize {
        replies
            .iter()
            .filter(|reply| matches!(reply, Reply::Say(text) if talk.matches(text)))
            .count()
    }

    #[tokio::test]
    async fn offline_without_address_fails_permanently() {
        let ctl = controller(
            SimBridge::new(ApiBridgeState::default()),
            CredentialStore::new(None),
            true,
        );

        let err = ctl.connect().await.unwrap_err();
        assert!(!err.is_retryable());
        assert!(matches!(
            err,
            SkillError::StartupFailed { reason, .. } if reason.starts_with("Bridge IP not set")
        ));
    }

    #[tokio::test]
    async fn unauthorized_without_button_is_delayed() {
        let bridge = SimBridge::new(ApiBridgeState::default()).with_discovery("10.0.0.2");
        let ctl = controller(bridge, CredentialStore::new(None), false);

        let err = ctl.connect().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(ctl.bridge.lock().await.registrations(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_with_button_registers() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("creds.yaml");

        let mut bridge = SimBridge::new(ApiBridgeState::default()).with_discovery("10.0.0.2");
        bridge.press_link_button(Duration::from_secs(30));
        let ctl = controller(bridge, CredentialStore::new(Some(path.clone())), false);

        ctl.connect().await.unwrap();

        let stored = CredentialStore::new(Some(path)).load();
        assert_eq!(stored.address.as_deref(), Some("10.0.0.2"));
        assert_eq!(stored, ctl.bridge.lock().await.credentials());
    }

    #[tokio::test]
    async fn registration_fault_is_fatal() {
        let bridge = SimBridge::new(ApiBridgeState::default())
            .with_discovery("10.0.0.2")
            .with_registration_fault("bridge on fire");
        let ctl = controller(bridge, CredentialStore::new(None), false);

        let err = ctl.connect().await.unwrap_err();
        assert!(!err.is_retryable());

        let err = ctl.register_loop().await.unwrap_err();
        assert!(matches!(
            err,
            SkillError::StartupFailed { reason, .. } if reason.contains("bridge on fire")
        ));
        assert_eq!(ctl.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn pairing_times_out() {
        let ctl = controller(
            SimBridge::new(ApiBridgeState::default()),
            CredentialStore::new(None),
            false,
        );

        assert!(ctl.start_background().await);
        assert!(!ctl.start_background().await);
        ctl.wait().await.unwrap();

        assert_eq!(ctl.attempts(), MAX_PAIRING_ATTEMPTS);
        assert_eq!(
            ctl.bridge.lock().await.registrations(),
            MAX_PAIRING_ATTEMPTS + 1
        );

        tokio::time::sleep(Duration::from_secs(5)).await;
        let replies = ctl.host.replies().await;
        assert_eq!(said(&replies, &Talk::PressBridgeButton), MAX_PAIRING_ATTEMPTS);
        assert_eq!(said(&replies, &Talk::PressBridgeButtonTimeout), 1);
        assert!(
            replies
                .iter()
                .any(|reply| matches!(reply, Reply::Failure { skill, .. } if skill == "hue"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pairing_succeeds_on_second_attempt() {
        let ctl = controller(
            SimBridge::new(ApiBridgeState::default()),
            CredentialStore::new(None),
            false,
        );

        assert!(ctl.start_background().await);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ctl.attempts(), 1);

        ctl.bridge
            .lock()
            .await
            .press_link_button(Duration::from_secs(30));
        ctl.wait().await.unwrap();

        assert_eq!(ctl.attempts(), 0);
        assert_eq!(ctl.bridge.lock().await.registrations(), 2);
        assert!(ctl.bridge.lock().await.credentials().username.is_some());

        tokio::time::sleep(Duration::from_secs(5)).await;
        let replies = ctl.host.replies().await;
        assert_eq!(said(&replies, &Talk::PressBridgeButton), 1);
        assert_eq!(said(&replies, &Talk::PressBridgeButtonConfirmation), 1);
        assert_eq!(replies.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unwritable_credentials_do_not_fail_pairing() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path())
            .unwrap()
            .join("missing")
            .join("creds.yaml");

        let mut bridge = SimBridge::new(ApiBridgeState::default()).with_discovery("10.0.0.2");
        bridge.press_link_button(Duration::from_secs(30));
        let ctl = controller(bridge, CredentialStore::new(Some(path.clone())), false);

        ctl.connect().await.unwrap();
        ctl.connect().await.unwrap();

        assert!(ctl.start_background().await);
        ctl.wait().await.unwrap();
        assert!(ctl.bridge.lock().await.credentials().username.is_some());
        assert!(!path.exists());

        tokio::time::sleep(Duration::from_secs(5)).await;
        let replies = ctl.host.replies().await;
        assert_eq!(said(&replies, &Talk::PressBridgeButtonConfirmation), 1);
        assert!(!replies.iter().any(|reply| matches!(reply, Reply::Failure { .. })));
    }
}
