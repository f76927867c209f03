//! Keyframe tracks and the animator state machine.

use std::fmt;

use crate::{
    animation::{
        accessor::{Accessor, AnimRoot},
        ease::Ease,
        value::AnimValue,
    },
    scene::node::Node,
};

/// Handle returned by [`crate::AnimatorBuilder::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimatorId(pub(crate) u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    Idle,
    Running,
    Done,
    Stopped,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Milliseconds from the animator start.
    pub time: f64,
    pub value: AnimValue,
}

/// Keyframes of one leaf property, sorted by strictly increasing time.
#[derive(Clone, Debug)]
pub struct Track {
    pub(crate) accessor: Accessor,
    pub(crate) key: String,
    pub(crate) keyframes: Vec<Keyframe>,
}

impl Track {
    pub(crate) fn new(accessor: Accessor, key: &str) -> Self {
        Self {
            accessor,
            key: key.to_owned(),
            keyframes: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Insert a keyframe, replacing one at the same time.
    pub(crate) fn insert(&mut self, time: f64, value: AnimValue) {
        match self
            .keyframes
            .binary_search_by(|k| k.time.total_cmp(&time))
        {
            Ok(i) => self.keyframes[i].value = value,
            Err(i) => self.keyframes.insert(i, Keyframe { time, value }),
        }
    }

    /// Two or more keyframes with at least one change.
    pub fn needs_animation(&self) -> bool {
        self.keyframes.len() >= 2
            && self
                .keyframes
                .windows(2)
                .any(|w| w[0].value.differs(&w[1].value))
    }

    pub fn duration(&self) -> f64 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    pub fn last_value(&self) -> Option<&AnimValue> {
        self.keyframes.last().map(|k| &k.value)
    }

    /// Value at `time` ms; clamps outside the keyframe range.
    pub fn sample(&self, time: f64) -> Option<AnimValue> {
        let first = self.keyframes.first()?;
        if time <= first.time {
            return Some(first.value.clone());
        }
        let i = self.keyframes.partition_point(|k| k.time <= time);
        if i >= self.keyframes.len() {
            return self.last_value().cloned();
        }
        let a = &self.keyframes[i - 1];
        let b = &self.keyframes[i];
        let span = b.time - a.time;
        let t = if span > 0.0 { (time - a.time) / span } else { 1.0 };
        Some(a.value.interpolate(&b.value, t))
    }

    /// Like [`Track::sample`], but times outside the keyframe range extend the boundary segment.
    ///
    /// Overshooting easings (back, elastic) map past the ends; the weight then leaves `[0, 1]`.
    pub fn sample_extended(&self, time: f64) -> Option<AnimValue> {
        let n = self.keyframes.len();
        if n < 2 {
            return self.keyframes.first().map(|k| k.value.clone());
        }
        let (a, b) = if time < self.keyframes[0].time {
            (&self.keyframes[0], &self.keyframes[1])
        } else if time > self.keyframes[n - 1].time {
            (&self.keyframes[n - 2], &self.keyframes[n - 1])
        } else {
            return self.sample(time);
        };
        let span = b.time - a.time;
        let t = if span > 0.0 { (time - a.time) / span } else { 1.0 };
        Some(a.value.interpolate(&b.value, t))
    }
}

pub(crate) type DuringFn = Box<dyn FnMut(f64)>;
pub(crate) type DoneFn = Box<dyn FnOnce()>;

/// Animates a set of tracks on one node.
///
/// Driven by [`crate::Scene::tick`]; the clock starts at the first tick after `start`.
pub struct Animator {
    pub(crate) id: AnimatorId,
    pub(crate) root: AnimRoot,
    pub(crate) tracks: Vec<Track>,
    pub(crate) looped: bool,
    pub(crate) delay: f64,
    pub(crate) easing: Ease,
    pub(crate) state: AnimatorState,
    pub(crate) start_time: Option<f64>,
    pub(crate) during: Vec<DuringFn>,
    pub(crate) done: Vec<DoneFn>,
    pub(crate) aborted: Vec<DoneFn>,
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("tracks", &self.tracks.len())
            .field("state", &self.state)
            .field("looped", &self.looped)
            .finish_non_exhaustive()
    }
}

impl Animator {
    pub(crate) fn new(id: AnimatorId, root: AnimRoot, looped: bool) -> Self {
        Self {
            id,
            root,
            tracks: Vec::new(),
            looped,
            delay: 0.0,
            easing: Ease::Linear,
            state: AnimatorState::Idle,
            start_time: None,
            during: Vec::new(),
            done: Vec::new(),
            aborted: Vec::new(),
        }
    }

    pub fn id(&self) -> AnimatorId {
        self.id
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn root(&self) -> AnimRoot {
        self.root
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Longest track, in ms.
    pub fn max_time(&self) -> f64 {
        self.tracks.iter().map(Track::duration).fold(0.0, f64::max)
    }

    pub(crate) fn track_mut(&mut self, accessor: Accessor, key: &str) -> (&mut Track, bool) {
        match self.tracks.iter().position(|t| t.accessor == accessor) {
            Some(i) => (&mut self.tracks[i], false),
            None => {
                self.tracks.push(Track::new(accessor, key));
                let last = self.tracks.len() - 1;
                (&mut self.tracks[last], true)
            }
        }
    }

    pub(crate) fn needs_animation(&self) -> bool {
        self.max_time() > 0.0 && self.tracks.iter().any(Track::needs_animation)
    }

    /// Write every track's value at `time` ms.
    fn apply_at(&self, node: &mut Node, time: f64) {
        for track in &self.tracks {
            if let Some(v) = track.sample_extended(time) {
                track.accessor.set(node, &v);
            }
        }
    }

    /// Snap every track to its final keyframe.
    pub(crate) fn apply_final(&self, node: &mut Node) {
        for track in &self.tracks {
            if let Some(v) = track.last_value() {
                track.accessor.set(node, v);
            }
        }
    }

    /// Advance to absolute time `now` ms and write values into `node`.
    ///
    /// Returns the state after the step; `Done` means the caller should fire
    /// [`Animator::take_done`] and drop the animator.
    pub(crate) fn step(&mut self, now: f64, node: &mut Node) -> AnimatorState {
        if self.state != AnimatorState::Running {
            return self.state;
        }
        let start = *self.start_time.get_or_insert(now + self.delay);
        let life = self.max_time();
        if now < start {
            return self.state;
        }

        let mut percent = if life > 0.0 { (now - start) / life } else { 1.0 };
        if percent >= 1.0 {
            if self.looped && life > 0.0 {
                let cycles = percent.floor();
                self.start_time = Some(start + cycles * life);
                percent -= cycles;
            } else {
                percent = 1.0;
            }
        }

        let eased = self.easing.apply(percent);
        self.apply_at(node, eased * life);
        for cb in &mut self.during {
            cb(eased);
        }

        if percent >= 1.0 && !self.looped {
            self.state = AnimatorState::Done;
        }
        self.state
    }

    /// Stop without firing done callbacks; aborted callbacks are returned for the caller.
    pub(crate) fn stop(&mut self, node: &mut Node, forward_to_last: bool) -> Vec<DoneFn> {
        if forward_to_last {
            self.apply_final(node);
        }
        self.state = AnimatorState::Stopped;
        self.done.clear();
        std::mem::take(&mut self.aborted)
    }

    pub(crate) fn take_done(&mut self) -> Vec<DoneFn> {
        self.aborted.clear();
        std::mem::take(&mut self.done)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animator.rs"]
mod tests;
