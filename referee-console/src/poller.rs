//! Periodic backend queries. Each poller forwards what it fetched to the
//! session loop, which is the only place that renders.

use crate::{
    backend::{Backend, BackendError},
    render::VisionUpdate,
    scheduler::ScheduledTask,
    session::SessionEvent,
};
use log::{debug, warn};
use rsk_common::{constants::Constants, vision::VisionState};
use serde_derive::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc::{Sender, error::TrySendError};

/// Which feed the field view is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisionSource {
    /// `get_state`, covering the whole carpet
    #[default]
    State,
    /// The camera feed's detection, covering the playing field
    Video,
}

impl VisionSource {
    /// Area shown on the canvas, in meters
    pub fn world_size(self, constants: &Constants) -> [f64; 2] {
        match self {
            Self::State => constants.carpet_size(),
            Self::Video => constants.field_size,
        }
    }

    async fn fetch<B: Backend>(self, backend: &B) -> Result<VisionState, BackendError> {
        match self {
            Self::State => backend.get_state().await,
            Self::Video => Ok(backend.get_video().await?.detection),
        }
    }
}

fn forward(events: &Sender<SessionEvent>, event: SessionEvent) {
    match events.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            warn!("Session is lagging behind, dropping {}", event.kind())
        }
        Err(TrySendError::Closed(_)) => debug!("Session is gone, dropping snapshot"),
    }
}

pub struct Poller<B> {
    backend: Arc<B>,
    events: Sender<SessionEvent>,
    game_state: ScheduledTask,
    vision: ScheduledTask,
}

impl<B: Backend> Poller<B> {
    pub fn new(backend: Arc<B>, events: Sender<SessionEvent>) -> Self {
        Self {
            backend,
            events,
            game_state: ScheduledTask::new("game state poll"),
            vision: ScheduledTask::new("vision poll"),
        }
    }

    pub fn start_game_state(&mut self, period: Duration) {
        let backend = self.backend.clone();
        let events = self.events.clone();
        self.game_state.start(period, move || {
            let backend = backend.clone();
            let events = events.clone();
            async move {
                match backend.get_game_state().await {
                    Ok(state) => forward(&events, SessionEvent::GameState(state)),
                    Err(e) => debug!("Game state poll failed: {e}"),
                }
            }
        });
    }

    /// Starts polling the field view, or restarts it with a new period
    pub fn start_vision(&mut self, source: VisionSource, period: Duration) {
        let backend = self.backend.clone();
        let events = self.events.clone();
        self.vision.start(period, move || {
            let backend = backend.clone();
            let events = events.clone();
            async move {
                let vision = match source.fetch(backend.as_ref()).await {
                    Ok(vision) => vision,
                    Err(e) => {
                        debug!("Vision poll failed: {e}");
                        return;
                    }
                };
                let placement = match backend.get_wait_ball_position().await {
                    Ok(placement) => placement,
                    Err(e) => {
                        debug!("Ball placement poll failed: {e}");
                        None
                    }
                };
                forward(
                    &events,
                    SessionEvent::Vision(VisionUpdate { vision, placement }),
                );
            }
        });
    }

    pub fn stop_vision(&mut self) {
        self.vision.stop();
    }

    pub fn vision_period(&self) -> Option<Duration> {
        self.vision.period()
    }

    pub fn stop(&mut self) {
        self.game_state.stop();
        self.vision.stop();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use rsk_common::game_snapshot::GameState;
    use std::sync::atomic::Ordering;
    use tokio::{sync::mpsc, time::sleep};

    #[tokio::test(start_paused = true)]
    async fn test_game_state_polling() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_game_state(GameState {
            timer: 42.0,
            ..Default::default()
        });
        let (tx, mut rx) = mpsc::channel(16);
        let mut poller = Poller::new(backend.clone(), tx);
        poller.start_game_state(Duration::from_millis(200));

        sleep(Duration::from_millis(700)).await;
        assert_eq!(backend.game_state_requests.load(Ordering::SeqCst), 4);
        for _ in 0..4 {
            match rx.try_recv() {
                Ok(SessionEvent::GameState(state)) => assert_eq!(state.timer, 42.0),
                other => panic!("Unexpected {other:?}"),
            }
        }

        poller.stop();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(backend.game_state_requests.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_skipped() {
        let backend = Arc::new(FakeBackend::default());
        backend.offline.store(true, Ordering::SeqCst);
        let (tx, mut rx) = mpsc::channel(16);
        let mut poller = Poller::new(backend.clone(), tx);
        poller.start_game_state(Duration::from_millis(200));
        poller.start_vision(VisionSource::State, Duration::from_millis(100));

        sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());

        backend.offline.store(false, Ordering::SeqCst);
        sleep(Duration::from_millis(250)).await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_channel_drops() {
        let backend = Arc::new(FakeBackend::default());
        let (tx, mut rx) = mpsc::channel(2);
        let mut poller = Poller::new(backend.clone(), tx);
        poller.start_game_state(Duration::from_millis(200));

        sleep(Duration::from_millis(900)).await;
        assert_eq!(backend.game_state_requests.load(Ordering::SeqCst), 5);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_vision_sources() {
        let backend = Arc::new(FakeBackend::simulated());
        backend.set_vision(VisionState {
            ball: Some([0.1, 0.2]),
            ..Default::default()
        });
        *backend.placement.lock().unwrap() = Some([0.3, 0.0]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut poller = Poller::new(backend.clone(), tx);

        for source in [VisionSource::State, VisionSource::Video] {
            poller.start_vision(source, Duration::from_millis(50));
            assert_eq!(poller.vision_period(), Some(Duration::from_millis(50)));
            sleep(Duration::from_millis(10)).await;
            match rx.try_recv() {
                Ok(SessionEvent::Vision(update)) => {
                    assert_eq!(update.vision.ball, Some([0.1, 0.2]));
                    assert_eq!(update.placement, Some([0.3, 0.0]));
                }
                other => panic!("Unexpected {other:?}"),
            }
            poller.stop_vision();
            assert_eq!(poller.vision_period(), None);
        }

        let constants = Constants::default();
        assert_eq!(
            VisionSource::State.world_size(&constants),
            constants.carpet_size()
        );
        assert_eq!(
            VisionSource::Video.world_size(&constants),
            constants.field_size
        );
    }
}
