use std::sync::{Arc, Mutex, MutexGuard};

use leafscan::{Classifier, Prediction};

// ---------------------------------------------------------------------------
// Image source
// ---------------------------------------------------------------------------

/// Which button produced an upload. One per activity request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Camera capture (`capture="environment"` file input).
    Capture,
    /// Gallery pick (plain image file input).
    Pick,
}

impl ImageSource {
    pub fn describe(self) -> &'static str {
        match self {
            ImageSource::Capture => "camera",
            ImageSource::Pick => "gallery",
        }
    }

    /// Multipart field name the page uses for this source.
    pub fn field_name(self) -> &'static str {
        match self {
            ImageSource::Capture => "capture_file",
            ImageSource::Pick => "pick_file",
        }
    }
}

// ---------------------------------------------------------------------------
// Flash messages
// ---------------------------------------------------------------------------

/// An error shown once above the photo.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashMessage {
    pub text: String,
}

impl FlashMessage {
    pub fn error(text: impl Into<String>) -> Self {
        FlashMessage { text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Screen state
// ---------------------------------------------------------------------------

/// The image currently on screen, kept encoded so it can be served back as-is.
#[derive(Debug, Clone)]
pub struct DisplayedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub source: ImageSource,
}

/// Everything the single screen shows. Replaced wholesale per image.
#[derive(Debug, Default)]
pub struct ScreenState {
    pub image: Option<DisplayedImage>,
    pub prediction: Option<Prediction>,
    /// One-shot flash message for the next page render.
    pub flash: Option<FlashMessage>,
    /// Bumped on every new image; used to bust the browser's image cache.
    pub revision: u64,
}

impl ScreenState {
    pub fn new() -> Self {
        ScreenState::default()
    }

    /// Shows a newly classified image, replacing the previous one.
    pub fn show(&mut self, image: DisplayedImage, prediction: Prediction) {
        self.image = Some(image);
        self.prediction = Some(prediction);
        self.flash = None;
        self.revision += 1;
    }

    /// Result text under the image. Empty before the first classification.
    pub fn result_text(&self) -> String {
        self.prediction.as_ref().map(|p| p.display_text()).unwrap_or_default()
    }

    /// Takes and returns the current flash message, clearing it.
    pub fn take_flash(&mut self) -> Option<FlashMessage> {
        self.flash.take()
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The classifier is loaded once at startup and never changes, so only the
/// screen sits behind a lock.
pub struct AppState {
    pub classifier: Classifier,
    pub max_upload_bytes: usize,
    pub screen: Mutex<ScreenState>,
}

impl AppState {
    pub fn new(classifier: Classifier, max_upload_bytes: usize) -> Self {
        AppState { classifier, max_upload_bytes, screen: Mutex::new(ScreenState::new()) }
    }

    /// Locks the screen. A panicked handler cannot leave the screen half
    /// written (every update is a whole-field assignment), so poisoning is ignored.
    pub fn screen(&self) -> MutexGuard<'_, ScreenState> {
        self.screen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Shared state type passed to every handler.
pub type SharedState = Arc<AppState>;
