use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteError {
    #[error("animation '{name}' is not registered on this sprite")]
    UnknownAnimation { name: String },
    #[error("animation '{name}' has no frames")]
    EmptyAnimation { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEvent {
    /// A non-looping animation reached its last frame. Emitted once per run.
    Completed { animation: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<usize>,
    frame_duration_ticks: u32,
    looping: bool,
    damage_frames: BTreeSet<usize>,
}

impl Animation {
    pub fn looping(frames: impl Into<Vec<usize>>, frame_duration_ticks: u32) -> Self {
        Self::build(frames.into(), frame_duration_ticks, true)
    }

    pub fn once(frames: impl Into<Vec<usize>>, frame_duration_ticks: u32) -> Self {
        Self::build(frames.into(), frame_duration_ticks, false)
    }

    fn build(frames: Vec<usize>, frame_duration_ticks: u32, looping: bool) -> Self {
        Self {
            frames,
            frame_duration_ticks: frame_duration_ticks.max(1),
            looping,
            damage_frames: BTreeSet::new(),
        }
    }

    /// Marks frame cursor positions (indices into the frame sequence) as
    /// damage-dealing.
    pub fn with_damage_frames(mut self, cursors: impl IntoIterator<Item = usize>) -> Self {
        self.damage_frames = cursors.into_iter().collect();
        self
    }

    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    pub fn frame_duration_ticks(&self) -> u32 {
        self.frame_duration_ticks
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_damage_frame(&self, cursor: usize) -> bool {
        self.damage_frames.contains(&cursor)
    }
}

/// Named-animation playback state machine. Transitions only happen through
/// [`AnimatedSprite::play`] and [`AnimatedSprite::restart`].
#[derive(Debug, Clone, Default)]
pub struct AnimatedSprite {
    animations: HashMap<String, Animation>,
    current: Option<String>,
    frame_cursor: usize,
    ticks_in_frame: u32,
    completed: bool,
}

impl AnimatedSprite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, animation: Animation) -> Result<(), SpriteError> {
        let name = name.into();
        if animation.frames.is_empty() {
            return Err(SpriteError::EmptyAnimation { name });
        }
        self.animations.insert(name, animation);
        Ok(())
    }

    pub fn with_animation(
        mut self,
        name: impl Into<String>,
        animation: Animation,
    ) -> Result<Self, SpriteError> {
        self.add(name, animation)?;
        Ok(self)
    }

    /// Switches to `name`, resetting playback. Replaying the current animation
    /// is a no-op, even if it already completed; use [`Self::restart`] to
    /// force a fresh run.
    pub fn play(&mut self, name: &str) -> Result<(), SpriteError> {
        if self.current.as_deref() == Some(name) {
            return Ok(());
        }
        self.restart(name)
    }

    pub fn restart(&mut self, name: &str) -> Result<(), SpriteError> {
        if !self.animations.contains_key(name) {
            return Err(SpriteError::UnknownAnimation {
                name: name.to_string(),
            });
        }
        self.current = Some(name.to_string());
        self.frame_cursor = 0;
        self.ticks_in_frame = 0;
        self.completed = false;
        Ok(())
    }

    pub fn tick(&mut self) -> Option<AnimationEvent> {
        if self.completed {
            return None;
        }
        let name = self.current.as_deref()?;
        let animation = self.animations.get(name)?;

        self.ticks_in_frame += 1;
        if self.ticks_in_frame < animation.frame_duration_ticks {
            return None;
        }
        self.ticks_in_frame = 0;
        self.frame_cursor += 1;
        if self.frame_cursor < animation.frames.len() {
            return None;
        }

        if animation.looping {
            self.frame_cursor = 0;
            None
        } else {
            self.frame_cursor = animation.frames.len() - 1;
            self.completed = true;
            Some(AnimationEvent::Completed {
                animation: name.to_string(),
            })
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.current.as_deref() == Some(name)
    }

    pub fn frame_cursor(&self) -> usize {
        self.frame_cursor
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Sheet frame index currently shown.
    pub fn frame_id(&self) -> Option<usize> {
        self.current_animation()
            .and_then(|animation| animation.frames.get(self.frame_cursor).copied())
    }

    pub fn in_damage_frame(&self) -> bool {
        self.current_animation()
            .is_some_and(|animation| animation.is_damage_frame(self.frame_cursor))
    }

    fn current_animation(&self) -> Option<&Animation> {
        self.current
            .as_deref()
            .and_then(|name| self.animations.get(name))
    }
}
