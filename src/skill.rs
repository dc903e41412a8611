use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use hue::bridge::{BridgeClient, Credentials, GroupRef};
use skill_api::dialog::DialogSession;
use skill_api::host::Host;

use crate::config::AppConfig;
use crate::credentials::CredentialStore;
use crate::daytime::{Clock, SystemClock};
use crate::error::SkillResult;
use crate::handlers::{self, Flow, IntentContext};
use crate::intent::{DialogState, Intent, PendingQuestion};
use crate::lights::{self, SceneOutcome};
use crate::pairing::PairingController;
use crate::schedule;
use crate::tasks::TaskManager;

pub const SKILL_NAME: &str = "PhilipsHue";

/// What became of an intent handed to [`HueSkill::dispatch`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    /// The skill asked a question, the next turn of the session answers it
    Asked(DialogState),
    /// Not accepted in the current dialog state
    Ignored,
}

/// Voice control for Philips Hue lights.
pub struct HueSkill<B, H: ?Sized> {
    config: AppConfig,
    host: Arc<H>,
    bridge: Arc<Mutex<B>>,
    pairing: PairingController<B, H>,
    tasks: TaskManager,
    clock: Arc<dyn Clock>,
    delayed: bool,
    pending: HashMap<String, PendingQuestion>,
}

impl<B, H> HueSkill<B, H>
where
    B: BridgeClient + 'static,
    H: Host + ?Sized + 'static,
{
    /// Set up the skill around `bridge`. Stored credentials are handed to the
    /// bridge, a configured bridge address takes precedence over the stored
    /// one.
    pub fn new(config: AppConfig, mut bridge: B, host: Arc<H>) -> Self {
        let store = CredentialStore::new(config.hue.credentials_file.clone());
        let stored = store.load();
        let current = bridge.credentials();

        bridge.set_credentials(Credentials {
            address: config
                .hue
                .bridge_ip
                .clone()
                .or(stored.address)
                .or(current.address),
            username: stored.username.or(current.username),
        });

        let bridge = Arc::new(Mutex::new(bridge));
        let tasks = TaskManager::new();
        let pairing = PairingController::new(
            SKILL_NAME,
            bridge.clone(),
            host.clone(),
            store,
            tasks.clone(),
            config.assistant.stay_completely_offline,
        );

        Self {
            config,
            host,
            bridge,
            pairing,
            tasks,
            clock: Arc::new(SystemClock),
            delayed: false,
            pending: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Whether the start was delayed to wait for bridge authorization
    #[must_use]
    pub const fn delayed(&self) -> bool {
        self.delayed
    }

    #[must_use]
    pub fn bridge(&self) -> Arc<Mutex<B>> {
        self.bridge.clone()
    }

    #[must_use]
    pub fn pairing_attempts(&self) -> usize {
        self.pairing.attempts()
    }

    /// Wait for the background bridge registration, if any
    pub async fn wait_for_pairing(&self) -> SkillResult<()> {
        self.pairing.wait().await
    }

    /// Start the skill.
    ///
    /// The first start connects to the bridge, and fails with
    /// [`crate::error::SkillError::StartDelayed`] if the link button has to be
    /// pressed first. When the host retries, registration continues in the
    /// background.
    pub async fn on_start(&mut self) -> SkillResult<()> {
        if self.delayed {
            if !self.pairing.is_running().await {
                self.pairing.start_background().await;
            }
            return Ok(());
        }

        match self.pairing.connect().await {
            Err(err) if err.is_retryable() => {
                self.delayed = true;
                Err(err)
            }
            res => res,
        }
    }

    pub async fn on_booted(&self) -> SkillResult<()> {
        if !self.delayed {
            self.on_full_hour().await?;
        }
        Ok(())
    }

    pub async fn on_full_hour(&self) -> SkillResult<usize> {
        let phase = self.clock.day_phase();
        let mut bridge = self.bridge.lock().await;
        schedule::full_hour(
            &mut *bridge,
            phase,
            self.config.hue.match_light_with_daytime,
        )
        .await
    }

    pub async fn on_sleep(&self) -> SkillResult<()> {
        schedule::sleep(&mut *self.bridge.lock().await).await
    }

    pub async fn shutdown(&self) {
        self.tasks.shutdown().await;
    }

    /// Handle intent `intent` for `session`.
    ///
    /// If the skill asked a question in this session, only the intent that
    /// answers it is accepted, and the asking handler resumes with the slots
    /// of both turns. Questions left unanswered for
    /// [`crate::intent::QUESTION_TIMEOUT`] are dropped.
    pub async fn dispatch(
        &mut self,
        intent: &str,
        mut session: DialogSession,
    ) -> SkillResult<Dispatch> {
        let intent: Intent = intent.parse()?;

        self.pending.retain(|session_id, pending| {
            if pending.expired() {
                log::debug!("[{SKILL_NAME}] Dropping unanswered question in session {session_id}");
            }
            !pending.expired()
        });

        let handler = match self.pending.remove(&session.session_id) {
            Some(pending) if pending.accepts(intent) => {
                session.merge_previous(&pending.previous);
                pending.state.resumes()
            }
            Some(pending) => {
                log::info!(
                    "[{SKILL_NAME}] Ignoring {intent}, expected {}",
                    pending.state.answered_by()
                );
                return Ok(Dispatch::Ignored);
            }
            None if intent.is_protected() => {
                log::info!("[{SKILL_NAME}] Ignoring {intent} outside of a dialog");
                return Ok(Dispatch::Ignored);
            }
            None => intent,
        };

        log::debug!("[{SKILL_NAME}] Handling {handler} for session {}", session.session_id);

        match self.run_intent(handler, &session).await? {
            Flow::Done => Ok(Dispatch::Handled),
            Flow::Asked(state) => {
                self.pending.insert(
                    session.session_id.clone(),
                    PendingQuestion::new(state, session),
                );
                Ok(Dispatch::Asked(state))
            }
        }
    }

    async fn run_intent(&self, intent: Intent, session: &DialogSession) -> SkillResult<Flow> {
        let mut bridge = self.bridge.lock().await;
        let mut ctx = IntentContext {
            bridge: &mut *bridge,
            host: &*self.host,
            device_name: &self.config.assistant.device_name,
            phase: self.clock.day_phase(),
        };

        match intent {
            Intent::PowerOnLights => handlers::power_on(&mut ctx, session).await,
            Intent::PowerOffLights => handlers::power_off(&mut ctx, session).await,
            Intent::SetLightsScene => handlers::set_scene(&mut ctx, session).await,
            Intent::ManageLights => handlers::manage(&mut ctx, session).await,
            Intent::DimLights => handlers::dim(&mut ctx, session).await,
            Intent::AnswerPercent | Intent::UserRandomAnswer => Ok(Flow::Done),
        }
    }

    /// Recall `scene` on `group`, or on all lights. Unknown groups and scenes
    /// are logged, not reported.
    pub async fn run_scene(&self, scene: &str, group: Option<&str>) -> SkillResult<()> {
        let target = group.map_or(GroupRef::All, GroupRef::name);
        let mut bridge = self.bridge.lock().await;

        let Some(group) = lights::find_group(&*bridge, &target).await? else {
            log::warn!("Requested group \"{target}\" does not exist on the Philips Hue bridge");
            return Ok(());
        };

        match lights::apply_scene(&mut *bridge, group.id, scene)
            .await?
            .strict()?
        {
            SceneOutcome::Applied => {}
            _ => log::warn!(
                "Requested scene {scene:?} for group \"{}\" does not exist on the Philips Hue bridge",
                group.name
            ),
        }

        Ok(())
    }

    /// Switch off `group`, or all lights
    pub async fn lights_off(&self, group: Option<&str>) -> SkillResult<()> {
        let target = group.map_or(GroupRef::All, GroupRef::name);
        let mut bridge = self.bridge.lock().await;

        match lights::find_group(&*bridge, &target).await? {
            Some(group) => Ok(bridge.set_on(group.id, false).await?),
            None => {
                log::warn!("Requested group \"{target}\" does not exist on the Philips Hue bridge");
                Ok(())
            }
        }
    }
}
