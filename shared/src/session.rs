use crate::error::UserInputError;
use crate::mode::InputMode;
use crate::request::{DetectionParams, MediaPayload};

/// Per-page state: current mode, the file picked for it and the sidebar
/// parameters. The in-flight flag lives with the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    mode: InputMode,
    selected: Option<MediaPayload>,
    /// Ticket of the pick whose bytes are still being read.
    reading: Option<u64>,
    last_ticket: u64,
    pub params: DetectionParams,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn selected(&self) -> Option<&MediaPayload> {
        self.selected.as_ref()
    }

    /// Changes mode and drops the current selection. Returns false if the
    /// mode did not change.
    pub fn switch_mode(&mut self, mode: InputMode) -> bool {
        if self.mode == mode {
            return false;
        }
        log::debug!("input mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.clear_selection();
        true
    }

    /// Checks a candidate file before anything is read or previewed.
    pub fn check_file(&self, mime: &str) -> Result<(), UserInputError> {
        if !self.mode.accepts_files() {
            return Err(UserInputError::FileNotAllowed(self.mode));
        }
        if !self.mode.accepts_mime(mime) {
            return Err(UserInputError::WrongFileType {
                mode: self.mode,
                mime: mime.to_string(),
            });
        }
        Ok(())
    }

    pub fn select(&mut self, payload: MediaPayload) -> Result<(), UserInputError> {
        self.check_file(&payload.mime_type)?;
        self.selected = Some(payload);
        Ok(())
    }

    /// Starts a new pick: drops the current selection and returns the ticket
    /// the finished read must present. Older tickets become stale.
    pub fn begin_selection(&mut self) -> u64 {
        self.selected = None;
        self.last_ticket += 1;
        self.reading = Some(self.last_ticket);
        self.last_ticket
    }

    /// Completes the read for `ticket`. Returns `Ok(false)` without touching
    /// the selection when a newer pick or a reset superseded it.
    pub fn finish_selection(
        &mut self,
        ticket: u64,
        payload: MediaPayload,
    ) -> Result<bool, UserInputError> {
        if self.reading != Some(ticket) {
            log::debug!("dropping stale read of {}", payload.file_name);
            return Ok(false);
        }
        self.reading = None;
        self.select(payload)?;
        Ok(true)
    }

    /// Gives up on a read that failed. Returns false if it was already stale.
    pub fn abandon_selection(&mut self, ticket: u64) -> bool {
        if self.reading != Some(ticket) {
            return false;
        }
        self.reading = None;
        true
    }

    pub fn is_reading(&self) -> bool {
        self.reading.is_some()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.reading = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> MediaPayload {
        MediaPayload::new(vec![0u8; 8], "video/mp4", "clip.mp4")
    }

    #[test]
    fn video_rejected_in_image_mode() {
        let mut session = SessionState::new();
        assert_eq!(
            session.select(video()),
            Err(UserInputError::WrongFileType {
                mode: InputMode::Image,
                mime: "video/mp4".into()
            })
        );
        assert!(session.selected().is_none());
    }

    #[test]
    fn switching_mode_clears_selection() {
        let mut session = SessionState::new();
        assert!(session.switch_mode(InputMode::Video));
        session.select(video()).unwrap();

        assert!(session.switch_mode(InputMode::Image));
        assert!(session.selected().is_none());
        assert!(!session.switch_mode(InputMode::Image));
    }

    #[test]
    fn late_read_does_not_replace_newer_pick() {
        let mut session = SessionState::new();
        session.switch_mode(InputMode::Video);

        let large = session.begin_selection();
        let small = session.begin_selection();
        assert!(session.is_reading());

        let small_clip = MediaPayload::new(vec![1u8; 4], "video/mp4", "small.mp4");
        assert_eq!(session.finish_selection(small, small_clip), Ok(true));
        assert!(!session.is_reading());

        let large_clip = MediaPayload::new(vec![2u8; 64], "video/mp4", "large.mp4");
        assert_eq!(session.finish_selection(large, large_clip), Ok(false));
        assert_eq!(session.selected().map(|p| p.file_name.as_str()), Some("small.mp4"));
    }

    #[test]
    fn selection_is_pending_until_read_lands() {
        let mut session = SessionState::new();
        session.switch_mode(InputMode::Video);
        session.select(video()).unwrap();

        let ticket = session.begin_selection();
        assert!(session.selected().is_none());
        assert!(session.is_reading());

        assert_eq!(session.finish_selection(ticket, video()), Ok(true));
        assert_eq!(session.selected().map(|p| p.file_name.as_str()), Some("clip.mp4"));
    }

    #[test]
    fn mode_switch_invalidates_pending_read() {
        let mut session = SessionState::new();
        session.switch_mode(InputMode::Video);
        let ticket = session.begin_selection();

        session.switch_mode(InputMode::Image);
        assert!(!session.is_reading());
        assert_eq!(session.finish_selection(ticket, video()), Ok(false));
        assert!(session.selected().is_none());
        assert!(!session.abandon_selection(ticket));
    }

    #[test]
    fn failed_read_clears_pending_state() {
        let mut session = SessionState::new();
        session.switch_mode(InputMode::Video);
        let ticket = session.begin_selection();
        assert!(session.abandon_selection(ticket));
        assert!(!session.is_reading());
    }

    #[test]
    fn webcam_mode_takes_no_files() {
        let mut session = SessionState::new();
        session.switch_mode(InputMode::Webcam);
        assert_eq!(
            session.check_file("image/png"),
            Err(UserInputError::FileNotAllowed(InputMode::Webcam))
        );
    }
}
