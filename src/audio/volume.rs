/// Step applied by `raiseVolume`/`lowerVolume` when the caller omits one.
pub const DEFAULT_VOLUME_STEP: f32 = 0.15;

pub const MIN_VOLUME: f32 = 0.0;
pub const MAX_VOLUME: f32 = 1.0;

/// Volume after raising `current` by `step`, saturating at full scale.
pub fn raised(current: f32, step: f32) -> f32 {
    if MAX_VOLUME - current < step {
        MAX_VOLUME
    } else {
        current + step
    }
}

/// Volume after lowering `current` by `step`, saturating at silence.
pub fn lowered(current: f32, step: f32) -> f32 {
    if current < step {
        MIN_VOLUME
    } else {
        current - step
    }
}

pub fn is_valid_volume(volume: f32) -> bool {
    (MIN_VOLUME..=MAX_VOLUME).contains(&volume)
}

/// A step must move the level (> 0) and cannot exceed the whole range.
pub fn is_valid_step(step: f32) -> bool {
    step > 0.0 && step <= MAX_VOLUME
}
