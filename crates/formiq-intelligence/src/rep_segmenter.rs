// ABOUTME: Motion state machine grouping a time-ordered frame stream into repetitions
// ABOUTME: Tracks one joint signal through top/descending/bottom/ascending phases with debouncing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Rep Segmenter
//!
//! The segmenter follows the exercise's tracking signal (the mean vertical
//! position of its tracking joints) and measures *depth*: displacement from
//! the top position in the exercise's descent direction.
//!
//! ```text
//! AtTop --(depth >= start, moving)--> Descending --(depth >= min, slowed)--> AtBottom
//!   ^                                                                         |
//!   +------------(depth <= tolerance, rep emitted)---- Ascending <--(rising)--+
//! ```
//!
//! Every transition except the return to the top must hold for
//! `debounce_frames` consecutive frames. A descent that returns to the top
//! before reaching `min_displacement` is discarded as a partial movement.
//!
//! Tracking is lost when the tracking joints stay below the confidence
//! threshold for more than `max_low_confidence_frames` frames; the cycle in
//! progress is discarded and segmentation restarts from the next confident
//! frame. Frames whose timestamp does not increase are dropped, and a gap
//! larger than `max_frame_gap_ms` discards the cycle in progress.

use crate::config::SegmentationConfig;
use crate::rubric::{ExerciseProfile, MotionProfile};
use formiq_core::errors::AnalysisError;
use formiq_core::models::{ExerciseId, Frame, Repetition};
use std::collections::VecDeque;
use std::mem;
use tracing::{debug, info, warn};

/// Phase of the current motion cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    /// Resting at (or returning to) the top position
    AtTop,
    /// Moving away from the top
    Descending,
    /// Turning around at the deepest point
    AtBottom,
    /// Returning towards the top
    Ascending,
}

/// Output of the segmenter for one input frame or the end of the stream
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentEvent {
    /// A completed (or near-complete trailing) repetition
    Repetition(Repetition),
    /// Tracking joints stayed below the confidence threshold for too long
    TrackingLost {
        /// Tracking joints, comma separated
        joint: String,
        /// Consecutive low-confidence frames
        frames: usize,
        /// Timestamp of the frame that lost tracking
        at_ms: u64,
    },
    /// A confident frame arrived after tracking was lost
    TrackingRecovered {
        /// Timestamp of the recovering frame
        at_ms: u64,
    },
    /// Consecutive frames were further apart than the tolerance
    FrameGap {
        /// Timestamp of the frame after the gap
        at_ms: u64,
        /// Gap length in milliseconds
        gap_ms: u64,
    },
    /// A frame was dropped (non-increasing timestamp)
    FrameRejected {
        /// Timestamp of the dropped frame
        at_ms: u64,
        /// Why the frame was dropped
        reason: String,
    },
    /// A detected cycle violated repetition invariants; its index is skipped
    RepetitionRejected {
        /// Index the repetition would have carried
        rep_index: u32,
        /// Why it was rejected
        error: AnalysisError,
    },
}

impl SegmentEvent {
    /// The recoverable error this event reports, if any
    #[must_use]
    pub fn diagnostic(&self) -> Option<AnalysisError> {
        match self {
            Self::Repetition(_) | Self::TrackingRecovered { .. } => None,
            Self::TrackingLost {
                joint,
                frames,
                at_ms,
            } => Some(AnalysisError::TrackingLost {
                joint: joint.clone(),
                frames: *frames,
                at_ms: *at_ms,
            }),
            Self::FrameGap { at_ms, gap_ms } => Some(AnalysisError::InvalidFrame {
                at_ms: *at_ms,
                reason: format!("{gap_ms}ms gap since previous frame, cycle in progress discarded"),
            }),
            Self::FrameRejected { at_ms, reason } => Some(AnalysisError::InvalidFrame {
                at_ms: *at_ms,
                reason: reason.clone(),
            }),
            Self::RepetitionRejected { error, .. } => Some(error.clone()),
        }
    }
}

/// Streaming repetition detector for one exercise
#[derive(Debug, Clone)]
pub struct RepSegmenter {
    exercise: ExerciseId,
    motion: MotionProfile,
    config: SegmentationConfig,
    phase: MotionPhase,
    locked_sign: Option<f64>,
    top: Option<f64>,
    last_sample: Option<(u64, f64)>,
    peak_depth: f64,
    debounce: usize,
    buffer: Vec<Frame>,
    low_confidence_run: usize,
    tracking_lost: bool,
    last_timestamp: Option<u64>,
    next_index: u32,
}

impl RepSegmenter {
    /// Create a segmenter following `motion`; repetitions are tagged with `exercise`
    #[must_use]
    pub fn new(exercise: ExerciseId, motion: MotionProfile, config: SegmentationConfig) -> Self {
        Self {
            exercise,
            motion,
            config,
            phase: MotionPhase::AtTop,
            locked_sign: None,
            top: None,
            last_sample: None,
            peak_depth: 0.0,
            debounce: 0,
            buffer: Vec::new(),
            low_confidence_run: 0,
            tracking_lost: false,
            last_timestamp: None,
            next_index: 1,
        }
    }

    /// Create a segmenter for a catalog profile
    #[must_use]
    pub fn for_profile(profile: &ExerciseProfile, config: SegmentationConfig) -> Self {
        Self::new(profile.id.clone(), profile.motion.clone(), config)
    }

    /// Current motion phase
    #[must_use]
    pub const fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Number of repetition indices assigned so far, rejected ones included
    #[must_use]
    pub const fn repetitions_emitted(&self) -> u32 {
        self.next_index - 1
    }

    /// Whether tracking is currently lost
    #[must_use]
    pub const fn is_tracking_lost(&self) -> bool {
        self.tracking_lost
    }

    /// Feed the next frame
    pub fn push(&mut self, frame: Frame) -> Vec<SegmentEvent> {
        let mut events = Vec::new();
        let at_ms = frame.timestamp_ms;

        if let Some(last) = self.last_timestamp {
            if at_ms <= last {
                warn!(exercise = %self.exercise, at_ms, last_ms = last, "Dropping out-of-order frame");
                events.push(SegmentEvent::FrameRejected {
                    at_ms,
                    reason: format!("timestamp {at_ms}ms does not follow {last}ms"),
                });
                return events;
            }
            let gap_ms = at_ms - last;
            if gap_ms > self.config.max_frame_gap_ms {
                warn!(exercise = %self.exercise, at_ms, gap_ms, "Frame gap exceeds tolerance");
                events.push(SegmentEvent::FrameGap { at_ms, gap_ms });
                self.restart_cycle();
            }
        }
        self.last_timestamp = Some(at_ms);

        match self
            .motion
            .tracking_signal(&frame, self.config.min_tracking_confidence)
        {
            Some(signal) => {
                self.low_confidence_run = 0;
                if self.tracking_lost {
                    self.tracking_lost = false;
                    info!(exercise = %self.exercise, at_ms, "Tracking recovered");
                    events.push(SegmentEvent::TrackingRecovered { at_ms });
                }
                self.advance(frame, signal, &mut events);
            }
            None => self.on_low_confidence(frame, &mut events),
        }

        events
    }

    /// Signal the end of the stream
    ///
    /// A trailing cycle that reached the bottom and covered at least
    /// `near_complete_ratio` of the way back is emitted flagged incomplete;
    /// any other partial cycle is discarded. The segmenter is then ready for
    /// a new stream, keeping its repetition numbering.
    pub fn finish(&mut self) -> Vec<SegmentEvent> {
        let mut events = Vec::new();
        let thresholds = self.motion.thresholds;

        if !self.tracking_lost
            && self.phase != MotionPhase::AtTop
            && self.peak_depth >= thresholds.min_displacement
        {
            let current = self.last_sample.map_or(self.peak_depth, |(_, depth)| depth);
            let returned = (self.peak_depth - current) / self.peak_depth;
            if returned >= self.config.near_complete_ratio {
                let frames = mem::take(&mut self.buffer);
                self.emit(frames, true, &mut events);
            } else {
                debug!(
                    exercise = %self.exercise,
                    returned,
                    "Trailing partial repetition discarded"
                );
            }
        }

        self.restart_cycle();
        self.low_confidence_run = 0;
        self.tracking_lost = false;
        self.last_timestamp = None;
        events
    }

    /// Forget all state, including repetition numbering
    pub fn reset(&mut self) {
        *self = Self::new(
            self.exercise.clone(),
            self.motion.clone(),
            self.config.clone(),
        );
    }

    /// Lazily segment a frame iterator, finishing when it is exhausted
    pub fn segment<I>(self, frames: I) -> Segments<I::IntoIter>
    where
        I: IntoIterator<Item = Frame>,
    {
        Segments {
            segmenter: self,
            frames: frames.into_iter(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn on_low_confidence(&mut self, frame: Frame, events: &mut Vec<SegmentEvent>) {
        self.low_confidence_run += 1;
        if self.tracking_lost {
            return;
        }

        if self.low_confidence_run > self.config.max_low_confidence_frames {
            self.tracking_lost = true;
            let joint = self
                .motion
                .tracking_joints
                .iter()
                .map(|joint| joint.name())
                .collect::<Vec<_>>()
                .join(",");
            warn!(
                exercise = %self.exercise,
                joint = %joint,
                frames = self.low_confidence_run,
                at_ms = frame.timestamp_ms,
                phase = ?self.phase,
                "Tracking lost, discarding cycle in progress"
            );
            events.push(SegmentEvent::TrackingLost {
                joint,
                frames: self.low_confidence_run,
                at_ms: frame.timestamp_ms,
            });
            self.restart_cycle();
        } else if !self.buffer.is_empty() {
            self.buffer.push(frame);
        }
    }

    fn advance(&mut self, frame: Frame, signal: f64, events: &mut Vec<SegmentEvent>) {
        let at_ms = frame.timestamp_ms;
        let Some(top) = self.top else {
            self.rebase(frame, signal);
            return;
        };

        let depth = self.depth(signal, top);
        let velocity = self.last_sample.map_or(0.0, |(last_ms, last_depth)| {
            let seconds = at_ms.saturating_sub(last_ms) as f64 / 1000.0;
            if seconds > 0.0 {
                (depth - last_depth) / seconds
            } else {
                0.0
            }
        });
        self.last_sample = Some((at_ms, depth));

        match self.phase {
            MotionPhase::AtTop => self.at_top(frame, signal, top, depth, velocity),
            MotionPhase::Descending => self.descending(frame, depth, velocity),
            MotionPhase::AtBottom => self.at_bottom(frame, depth, velocity, events),
            MotionPhase::Ascending => self.ascending(frame, depth, events),
        }
    }

    fn at_top(&mut self, frame: Frame, signal: f64, top: f64, depth: f64, velocity: f64) {
        let thresholds = self.motion.thresholds;

        let settled =
            depth < thresholds.start_displacement && velocity.abs() < thresholds.min_velocity;
        if depth <= 0.0 || settled {
            self.rebase(frame, signal);
            return;
        }
        if depth <= thresholds.top_tolerance {
            self.buffer = vec![frame];
            self.debounce = 0;
            return;
        }

        self.buffer.push(frame);
        if depth >= thresholds.start_displacement && velocity >= thresholds.min_velocity {
            self.debounce += 1;
        } else {
            self.debounce = 0;
        }

        if self.debounce >= thresholds.debounce_frames {
            if self.locked_sign.is_none() && self.motion.direction.sign().is_none() {
                let sign = if signal >= top { 1.0 } else { -1.0 };
                debug!(exercise = %self.exercise, sign, "Descent direction locked");
                self.locked_sign = Some(sign);
            }
            self.enter(MotionPhase::Descending);
            self.peak_depth = depth;
        }
    }

    fn descending(&mut self, frame: Frame, depth: f64, velocity: f64) {
        let thresholds = self.motion.thresholds;

        if depth <= thresholds.top_tolerance {
            debug!(
                exercise = %self.exercise,
                peak = self.peak_depth,
                "Partial movement returned to top, discarded"
            );
            self.buffer = vec![frame];
            self.enter(MotionPhase::AtTop);
            self.peak_depth = 0.0;
            return;
        }

        self.buffer.push(frame);
        self.peak_depth = self.peak_depth.max(depth);
        if self.peak_depth >= thresholds.min_displacement && velocity <= thresholds.min_velocity {
            self.debounce += 1;
        } else {
            self.debounce = 0;
        }
        if self.debounce >= thresholds.debounce_frames {
            self.enter(MotionPhase::AtBottom);
        }
    }

    fn at_bottom(
        &mut self,
        frame: Frame,
        depth: f64,
        velocity: f64,
        events: &mut Vec<SegmentEvent>,
    ) {
        let thresholds = self.motion.thresholds;

        if depth <= thresholds.top_tolerance {
            self.complete(frame, events);
            return;
        }

        self.buffer.push(frame);
        self.peak_depth = self.peak_depth.max(depth);
        if velocity <= -thresholds.min_velocity {
            self.debounce += 1;
        } else {
            self.debounce = 0;
        }
        if self.debounce >= thresholds.debounce_frames {
            self.enter(MotionPhase::Ascending);
        }
    }

    fn ascending(&mut self, frame: Frame, depth: f64, events: &mut Vec<SegmentEvent>) {
        if depth <= self.motion.thresholds.top_tolerance {
            self.complete(frame, events);
        } else {
            self.buffer.push(frame);
            self.peak_depth = self.peak_depth.max(depth);
        }
    }

    fn complete(&mut self, frame: Frame, events: &mut Vec<SegmentEvent>) {
        self.buffer.push(frame.clone());
        let frames = mem::replace(&mut self.buffer, vec![frame]);
        self.emit(frames, false, events);
        self.enter(MotionPhase::AtTop);
        self.peak_depth = 0.0;
    }

    fn emit(&mut self, frames: Vec<Frame>, incomplete: bool, events: &mut Vec<SegmentEvent>) {
        match Repetition::new(
            self.next_index,
            self.exercise.clone(),
            frames,
            self.peak_depth,
            incomplete,
            self.config.max_frame_gap_ms,
        ) {
            Ok(repetition) => {
                let repetition = repetition
                    .with_descent_sign(self.locked_sign.or_else(|| self.motion.direction.sign()));
                info!(
                    exercise = %self.exercise,
                    rep.index = repetition.index(),
                    rep.start_ms = repetition.start_ms(),
                    rep.end_ms = repetition.end_ms(),
                    rep.incomplete = incomplete,
                    "Repetition detected"
                );
                self.next_index += 1;
                events.push(SegmentEvent::Repetition(repetition));
            }
            Err(error) => {
                warn!(
                    exercise = %self.exercise,
                    rep.index = self.next_index,
                    error = %error,
                    "Repetition rejected"
                );
                events.push(SegmentEvent::RepetitionRejected {
                    rep_index: self.next_index,
                    error,
                });
                self.next_index += 1;
            }
        }
    }

    fn enter(&mut self, phase: MotionPhase) {
        debug!(exercise = %self.exercise, from = ?self.phase, to = ?phase, "Phase transition");
        self.phase = phase;
        self.debounce = 0;
    }

    fn rebase(&mut self, frame: Frame, signal: f64) {
        self.top = Some(signal);
        self.last_sample = Some((frame.timestamp_ms, 0.0));
        self.buffer = vec![frame];
        self.debounce = 0;
    }

    fn depth(&self, signal: f64, top: f64) -> f64 {
        let offset = signal - top;
        self.locked_sign
            .or_else(|| self.motion.direction.sign())
            .map_or_else(|| offset.abs(), |sign| sign * offset)
    }

    fn restart_cycle(&mut self) {
        self.phase = MotionPhase::AtTop;
        self.top = None;
        self.last_sample = None;
        self.peak_depth = 0.0;
        self.debounce = 0;
        self.buffer.clear();
    }
}

/// Iterator adapter produced by [`RepSegmenter::segment`]
#[derive(Debug)]
pub struct Segments<I> {
    segmenter: RepSegmenter,
    frames: I,
    pending: VecDeque<SegmentEvent>,
    finished: bool,
}

impl<I> Segments<I> {
    /// Only the repetitions, dropping diagnostics
    pub fn repetitions(self) -> impl Iterator<Item = Repetition>
    where
        I: Iterator<Item = Frame>,
    {
        self.filter_map(|event| match event {
            SegmentEvent::Repetition(repetition) => Some(repetition),
            _ => None,
        })
    }
}

impl<I> Iterator for Segments<I>
where
    I: Iterator<Item = Frame>,
{
    type Item = SegmentEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.finished {
                return None;
            }
            match self.frames.next() {
                Some(frame) => self.pending.extend(self.segmenter.push(frame)),
                None => {
                    self.finished = true;
                    self.pending.extend(self.segmenter.finish());
                }
            }
        }
    }
}
