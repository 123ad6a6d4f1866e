use super::{Backend, BackendCall, BackendError};
use rsk_common::{
    constants::Constants,
    game_snapshot::GameState,
    geometry::FieldPoint,
    vision::{VideoFrame, VisionState},
};
use std::{
    future::{Future, ready},
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

/// In-memory backend that serves canned snapshots and records every command
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    pub constants: Constants,
    pub simulated: bool,
    pub game_state: Mutex<GameState>,
    pub vision: Mutex<VisionState>,
    pub placement: Mutex<Option<FieldPoint>>,
    pub offline: AtomicBool,
    pub game_state_requests: AtomicUsize,
    pub vision_requests: AtomicUsize,
    pub calls: Mutex<Vec<BackendCall>>,
}

impl FakeBackend {
    pub fn simulated() -> Self {
        Self {
            simulated: true,
            ..Default::default()
        }
    }

    pub fn set_game_state(&self, state: GameState) {
        *self.game_state.lock().unwrap() = state;
    }

    pub fn set_vision(&self, vision: VisionState) {
        *self.vision.lock().unwrap() = vision;
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    fn serve<T>(&self, value: impl FnOnce() -> T) -> Result<T, BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(BackendError::Unreachable)
        } else {
            Ok(value())
        }
    }
}

impl Backend for FakeBackend {
    fn constants(&self) -> impl Future<Output = Result<Constants, BackendError>> + Send {
        ready(self.serve(|| self.constants.clone()))
    }

    fn get_game_state(&self) -> impl Future<Output = Result<GameState, BackendError>> + Send {
        self.game_state_requests.fetch_add(1, Ordering::SeqCst);
        ready(self.serve(|| self.game_state.lock().unwrap().clone()))
    }

    fn get_state(&self) -> impl Future<Output = Result<VisionState, BackendError>> + Send {
        self.vision_requests.fetch_add(1, Ordering::SeqCst);
        ready(self.serve(|| self.vision.lock().unwrap().clone()))
    }

    fn get_video(&self) -> impl Future<Output = Result<VideoFrame, BackendError>> + Send {
        self.vision_requests.fetch_add(1, Ordering::SeqCst);
        ready(self.serve(|| VideoFrame {
            running: true,
            fps: None,
            detection: self.vision.lock().unwrap().clone(),
        }))
    }

    fn get_wait_ball_position(
        &self,
    ) -> impl Future<Output = Result<Option<FieldPoint>, BackendError>> + Send {
        ready(self.serve(|| *self.placement.lock().unwrap()))
    }

    fn is_simulated(&self) -> impl Future<Output = Result<bool, BackendError>> + Send {
        ready(self.serve(|| self.simulated))
    }

    fn call(&self, call: BackendCall) -> impl Future<Output = Result<(), BackendError>> + Send {
        ready(self.serve(|| self.calls.lock().unwrap().push(call)))
    }
}
