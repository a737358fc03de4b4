/// Background-music playlist.  Playback itself belongs to whatever audio
/// backend the front end has; this only tracks which track comes next.

pub const TRACKS: [&str; 3] = ["Your Idol.mp3", "Soda Pop.mp3", "Golden.mp3"];

#[derive(Clone, Debug, PartialEq)]
pub struct Playlist {
    tracks: Vec<&'static str>,
    current: usize,
}

impl Default for Playlist {
    fn default() -> Self {
        Playlist::new(TRACKS.to_vec())
    }
}

impl Playlist {
    pub fn new(tracks: Vec<&'static str>) -> Self {
        Playlist { tracks, current: 0 }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_track(&self) -> Option<&'static str> {
        self.tracks.get(self.current).copied()
    }

    /// Track title without its file extension, for display.
    pub fn current_title(&self) -> Option<&'static str> {
        self.current_track()
            .map(|t| t.rsplit_once('.').map_or(t, |(stem, _)| stem))
    }

    /// The current track finished naturally: move on, wrapping to the start.
    /// Returns the track to play next.
    pub fn on_track_ended(&mut self) -> Option<&'static str> {
        if self.tracks.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.tracks.len();
        log::debug!("playlist advanced to track {}", self.current);
        self.current_track()
    }
}
