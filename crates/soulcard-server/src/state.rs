use std::sync::Arc;

use soulcard::{
    CompletionProvider, DailyFortuneService, DiagnosisService, FortuneCardService,
    NoteCardService, PersonalityService,
};

/// Type aliases for the services over the shared completion provider
pub type AppNoteCardService = NoteCardService<dyn CompletionProvider>;
pub type AppDiagnosisService = DiagnosisService<dyn CompletionProvider>;
pub type AppFortuneCardService = FortuneCardService<dyn CompletionProvider>;
pub type AppPersonalityService = PersonalityService<dyn CompletionProvider>;
pub type AppDailyFortuneService = DailyFortuneService<dyn CompletionProvider>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub note_card: Arc<AppNoteCardService>,
    pub diagnosis: Arc<AppDiagnosisService>,
    pub fortune_card: Arc<AppFortuneCardService>,
    pub personality: Arc<AppPersonalityService>,
    pub daily_fortune: Arc<AppDailyFortuneService>,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            note_card: Arc::new(NoteCardService::new(provider.clone())),
            diagnosis: Arc::new(DiagnosisService::new(provider.clone())),
            fortune_card: Arc::new(FortuneCardService::new(provider.clone())),
            personality: Arc::new(PersonalityService::new(provider.clone())),
            daily_fortune: Arc::new(DailyFortuneService::new(provider)),
        }
    }
}
