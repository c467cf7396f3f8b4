//! Animation Loop
//!
//! Frame-driven scheduling. The host hands out frame requests and later
//! delivers them back; the loop runs exactly one tick per delivered request
//! and asks for the next one only after the tick completes. Stopping cancels
//! the single pending request and drops the scene.

use crate::scene::AquariumScene;
use crate::surface::DrawSurface;

/// Handle for one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Host side of the scheduling contract (a display-refresh callback, a game
/// engine update, or a plain loop).
pub trait FrameHost {
    /// Schedules a frame and returns its handle.
    fn request_frame(&mut self) -> FrameRequest;
    /// Cancels a previously scheduled frame. Unknown handles are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Owns the running scene and at most one pending frame request.
pub struct AnimationLoop {
    scene: Option<AquariumScene>,
    pending: Option<FrameRequest>,
}

impl AnimationLoop {
    pub fn new(scene: AquariumScene) -> Self {
        Self {
            scene: Some(scene),
            pending: None,
        }
    }

    /// Requests the first frame. Does nothing after `stop` or while a frame
    /// is already pending.
    pub fn start<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if self.scene.is_some() && self.pending.is_none() {
            self.pending = Some(host.request_frame());
            tracing::info!("Animation loop started");
        }
    }

    /// Runs one tick for a delivered frame and schedules the next one.
    /// Returns `false` for a request that is not the pending one (stale or
    /// cancelled), which is ignored.
    pub fn on_frame<H, S>(&mut self, host: &mut H, request: FrameRequest, surface: &mut S) -> bool
    where
        H: FrameHost + ?Sized,
        S: DrawSurface + ?Sized,
    {
        if self.pending != Some(request) {
            return false;
        }
        self.pending = None;
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        scene.render_frame(surface);
        self.pending = Some(host.request_frame());
        true
    }

    /// Cancels the pending frame and tears the scene down. Safe to call any
    /// number of times.
    pub fn stop<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(request) = self.pending.take() {
            host.cancel_frame(request);
        }
        if let Some(scene) = self.scene.take() {
            tracing::info!("Animation loop stopped after {} ticks", scene.tick());
        }
    }

    pub fn is_running(&self) -> bool {
        self.scene.is_some()
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn scene(&self) -> Option<&AquariumScene> {
        self.scene.as_ref()
    }
}

/// A host that queues requests until they are pulled with
/// [`ManualHost::next_request`]. Used by the headless runner and tests.
#[derive(Debug, Default)]
pub struct ManualHost {
    next_id: u64,
    queue: Vec<FrameRequest>,
    cancelled: Vec<FrameRequest>,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the oldest queued request.
    pub fn next_request(&mut self) -> Option<FrameRequest> {
        if self.queue.is_empty() {
            None
        } else {
            Some(self.queue.remove(0))
        }
    }

    pub fn queued(&self) -> &[FrameRequest] {
        &self.queue
    }

    pub fn cancelled(&self) -> &[FrameRequest] {
        &self.cancelled
    }

    /// Delivers up to `frames` queued requests to `animation`. Returns the
    /// number of ticks that ran.
    pub fn run<S: DrawSurface + ?Sized>(
        &mut self,
        animation: &mut AnimationLoop,
        surface: &mut S,
        frames: u64,
    ) -> u64 {
        let mut ran = 0;
        for _ in 0..frames {
            let Some(request) = self.next_request() else {
                break;
            };
            if animation.on_frame(self, request, surface) {
                ran += 1;
            }
        }
        ran
    }
}

impl FrameHost for ManualHost {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.queue.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if let Some(pos) = self.queue.iter().position(|r| *r == request) {
            self.queue.remove(pos);
            self.cancelled.push(request);
        }
    }
}
