use anyhow::Result;
use tracing::debug;

/// The single audio resource a soundtrack round holds at a time.
///
/// Rounds always unload the previous clip before loading the next one,
/// and unload on drop.
pub trait PreviewPlayer: Send {
    /// Loads and starts playing a clip, looping.
    fn load(&mut self, url: &str) -> Result<()>;

    fn unload(&mut self);

    fn set_paused(&mut self, paused: bool);

    fn is_loaded(&self) -> bool;

    fn is_playing(&self) -> bool;
}

/// Player for front-ends that cannot decode audio: it only keeps the
/// current preview URL so it can be shown as a link.
#[derive(Default)]
pub struct LinkPreviewPlayer {
    current: Option<String>,
    paused: bool,
}

impl LinkPreviewPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl PreviewPlayer for LinkPreviewPlayer {
    fn load(&mut self, url: &str) -> Result<()> {
        debug!("[player] Loading {}", url);
        self.current = Some(url.to_string());
        self.paused = false;
        Ok(())
    }

    fn unload(&mut self) {
        if let Some(url) = self.current.take() {
            debug!("[player] Unloaded {}", url);
        }
        self.paused = false;
    }

    fn set_paused(&mut self, paused: bool) {
        if self.current.is_some() {
            self.paused = paused;
        }
    }

    fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    fn is_playing(&self) -> bool {
        self.current.is_some() && !self.paused
    }
}
