use serde::{Deserialize, Serialize};

/// Gameplay moments that may have a sound attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEvent {
    Flip,
    Match,
    Win,
}

impl SoundEvent {
    pub const ALL: [SoundEvent; 3] = [Self::Flip, Self::Match, Self::Win];

    /// File name the sound is looked up by in an asset directory.
    pub const fn file_name(self) -> &'static str {
        use SoundEvent::*;
        match self {
            Flip => "flip.wav",
            Match => "match.wav",
            Win => "win.wav",
        }
    }
}

/// Fire-and-forget playback. Implementations swallow their own failures; a missing sound is not
/// an error.
pub trait SoundSink {
    fn play(&mut self, event: SoundEvent);
}

/// Plays nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, event: SoundEvent) {
        log::trace!("silent sound: {:?}", event);
    }
}
