//! Playback state for the background-music toggle.
//!
//! The host decides asynchronously whether a play request is honoured (autoplay
//! policy) and may fail to load the track at all. This machine turns those
//! outcomes into the state shown on the toggle and into the next command to
//! issue, without ever treating a refusal as an error.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing requested yet.
    Idle,
    /// A play request is in flight.
    Starting,
    Playing,
    Paused,
    /// The host refused to start playback; a user toggle may retry.
    Blocked,
    /// The track failed to load; the control stays muted for good.
    Unavailable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Nothing,
}

#[derive(Clone, Debug)]
pub struct Playback {
    state: PlaybackState,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the toggle should render as "sound on".
    pub fn is_audible(&self) -> bool {
        matches!(self.state, PlaybackState::Playing | PlaybackState::Starting)
    }

    /// Automatic start when the reveal page opens.
    pub fn request_start(&mut self) -> PlayerCommand {
        match self.state {
            PlaybackState::Idle | PlaybackState::Paused | PlaybackState::Blocked => {
                self.state = PlaybackState::Starting;
                PlayerCommand::Play
            }
            _ => PlayerCommand::Nothing,
        }
    }

    /// User click on the toggle.
    pub fn toggle(&mut self) -> PlayerCommand {
        match self.state {
            PlaybackState::Playing | PlaybackState::Starting => {
                self.state = PlaybackState::Paused;
                PlayerCommand::Pause
            }
            PlaybackState::Idle | PlaybackState::Paused | PlaybackState::Blocked => {
                self.state = PlaybackState::Starting;
                PlayerCommand::Play
            }
            PlaybackState::Unavailable => PlayerCommand::Nothing,
        }
    }

    pub fn play_resolved(&mut self) {
        // A pause issued while the request was in flight wins.
        if self.state == PlaybackState::Starting {
            self.state = PlaybackState::Playing;
        }
    }

    pub fn play_rejected(&mut self) {
        if self.state == PlaybackState::Starting {
            self.state = PlaybackState::Blocked;
        }
    }

    pub fn load_failed(&mut self) {
        self.state = PlaybackState::Unavailable;
    }
}
