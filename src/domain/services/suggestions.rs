#[cfg(test)]
#[path = "suggestions_test.rs"]
mod tests;

use strum::EnumIter;

use super::PromptDeriver;
use crate::domain::models::AssessmentStep;
use crate::domain::models::Page;
use crate::domain::models::QuickSuggestion;

/// Presentation layers render at most this many suggestions.
pub const MAX_VISIBLE_SUGGESTIONS: usize = 4;

const XRAY_SUGGESTIONS: &[QuickSuggestion] = &[
    QuickSuggestion::new(
        "Explain the findings",
        "Explain the X-ray analysis findings in plain language.",
    ),
    QuickSuggestion::new(
        "How reliable is this?",
        "How reliable is AI analysis of this chest X-ray and what are its limitations?",
    ),
    QuickSuggestion::new(
        "What to look for",
        "What should I look for on a chest X-ray in a trauma patient?",
    ),
    QuickSuggestion::new("Ask about the image", ""),
];

const VITALS_SUGGESTIONS: &[QuickSuggestion] = &[
    QuickSuggestion::new(
        "Normal ranges",
        "What are the normal ranges for adult vital signs?",
    ),
    QuickSuggestion::new(
        "Interpret these vitals",
        "Interpret the current vital signs and flag anything abnormal.",
    ),
    QuickSuggestion::new(
        "Measuring without equipment",
        "How can I estimate vital signs without equipment in the field?",
    ),
];

const SYMPTOMS_SUGGESTIONS: &[QuickSuggestion] = &[
    QuickSuggestion::new(
        "Red flag symptoms",
        "Which of these symptoms are red flags that raise triage priority?",
    ),
    QuickSuggestion::new(
        "Follow-up questions",
        "What follow-up questions should I ask about these symptoms?",
    ),
    QuickSuggestion::new("Describe a symptom", ""),
];

const PATIENT_DETAIL_SUGGESTIONS: &[QuickSuggestion] = &[
    QuickSuggestion::new(
        "Summarize this patient",
        "Summarize this patient's condition and triage result.",
    ),
    QuickSuggestion::new(
        "Next steps",
        "What are the recommended next steps for this patient?",
    ),
    QuickSuggestion::new(
        "Reassessment plan",
        "How often should this patient be reassessed and what should I watch for?",
    ),
    QuickSuggestion::new("Ask about this patient", ""),
];

const QUEUE_SUGGESTIONS: &[QuickSuggestion] = &[
    QuickSuggestion::new(
        "Who goes first?",
        "How should I prioritize the patients in the queue?",
    ),
    QuickSuggestion::new(
        "Triage categories",
        "Explain the triage priority categories.",
    ),
    QuickSuggestion::new(
        "Mass casualty tips",
        "What are best practices for triage during a mass casualty incident?",
    ),
];

const HOME_SUGGESTIONS: &[QuickSuggestion] = &[
    QuickSuggestion::new(
        "How does this app work?",
        "How does this triage application work?",
    ),
    QuickSuggestion::new(
        "Start an assessment",
        "How do I start a new patient assessment?",
    ),
    QuickSuggestion::new(
        "Triage basics",
        "Explain the basics of field triage.",
    ),
];

const DEFAULT_SUGGESTIONS: &[QuickSuggestion] = &[
    QuickSuggestion::new(
        "What can you help with?",
        "What can you help me with in this application?",
    ),
    QuickSuggestion::new(
        "Triage basics",
        "Explain the basics of field triage.",
    ),
    QuickSuggestion::new("Ask a question", ""),
];

/// The fixed suggestion sets a context can resolve to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter)]
pub enum SuggestionSet {
    Xray,
    Vitals,
    Symptoms,
    PatientDetail,
    Queue,
    Home,
    Default,
}

impl SuggestionSet {
    /// First matching rule wins.
    pub fn resolve(page: Page, step: Option<AssessmentStep>, has_patient: bool) -> SuggestionSet {
        if page == Page::Assessment {
            match step {
                Some(AssessmentStep::Xray) => return SuggestionSet::Xray,
                Some(AssessmentStep::Vitals) => return SuggestionSet::Vitals,
                Some(AssessmentStep::Symptoms) => return SuggestionSet::Symptoms,
                _ => return SuggestionSet::Default,
            }
        }

        if page == Page::PatientDetail && has_patient {
            return SuggestionSet::PatientDetail;
        }
        if page == Page::Queue {
            return SuggestionSet::Queue;
        }
        if page == Page::Home {
            return SuggestionSet::Home;
        }

        return SuggestionSet::Default;
    }

    pub fn entries(&self) -> &'static [QuickSuggestion] {
        match self {
            SuggestionSet::Xray => return XRAY_SUGGESTIONS,
            SuggestionSet::Vitals => return VITALS_SUGGESTIONS,
            SuggestionSet::Symptoms => return SYMPTOMS_SUGGESTIONS,
            SuggestionSet::PatientDetail => return PATIENT_DETAIL_SUGGESTIONS,
            SuggestionSet::Queue => return QUEUE_SUGGESTIONS,
            SuggestionSet::Home => return HOME_SUGGESTIONS,
            SuggestionSet::Default => return DEFAULT_SUGGESTIONS,
        }
    }
}

impl PromptDeriver {
    pub fn quick_suggestions(
        page: Page,
        step: Option<AssessmentStep>,
        has_patient: bool,
    ) -> &'static [QuickSuggestion] {
        return SuggestionSet::resolve(page, step, has_patient).entries();
    }

    /// The slice a presentation layer should render, capped at
    /// [`MAX_VISIBLE_SUGGESTIONS`].
    pub fn visible_suggestions(suggestions: &[QuickSuggestion]) -> &[QuickSuggestion] {
        let end = suggestions.len().min(MAX_VISIBLE_SUGGESTIONS);
        return &suggestions[..end];
    }
}
