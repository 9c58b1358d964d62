use strum::IntoEnumIterator;

use super::SuggestionSet;
use super::MAX_VISIBLE_SUGGESTIONS;
use crate::domain::models::AssessmentStep;
use crate::domain::models::Page;
use crate::domain::models::QuickSuggestion;
use crate::domain::services::PromptDeriver;

#[test]
fn it_resolves_xray_regardless_of_patient() {
    for has_patient in [true, false] {
        assert_eq!(
            SuggestionSet::resolve(Page::Assessment, Some(AssessmentStep::Xray), has_patient),
            SuggestionSet::Xray
        );
    }
}

#[test]
fn it_resolves_assessment_steps() {
    assert_eq!(
        SuggestionSet::resolve(Page::Assessment, Some(AssessmentStep::Vitals), false),
        SuggestionSet::Vitals
    );
    assert_eq!(
        SuggestionSet::resolve(Page::Assessment, Some(AssessmentStep::Symptoms), true),
        SuggestionSet::Symptoms
    );
    assert_eq!(
        SuggestionSet::resolve(Page::Assessment, Some(AssessmentStep::Review), true),
        SuggestionSet::Default
    );
    assert_eq!(
        SuggestionSet::resolve(Page::Assessment, None, true),
        SuggestionSet::Default
    );
}

#[test]
fn it_resolves_patient_detail_only_with_patient() {
    assert_eq!(
        SuggestionSet::resolve(Page::PatientDetail, None, true),
        SuggestionSet::PatientDetail
    );
    assert_eq!(
        SuggestionSet::resolve(Page::PatientDetail, None, false),
        SuggestionSet::Default
    );
}

#[test]
fn it_ignores_step_outside_assessment() {
    assert_eq!(
        SuggestionSet::resolve(Page::Queue, Some(AssessmentStep::Xray), false),
        SuggestionSet::Queue
    );
    assert_eq!(
        SuggestionSet::resolve(Page::Home, Some(AssessmentStep::Vitals), true),
        SuggestionSet::Home
    );
}

#[test]
fn it_falls_back_to_default() {
    assert_eq!(
        SuggestionSet::resolve(Page::Imaging, None, true),
        SuggestionSet::Default
    );
    assert_eq!(
        SuggestionSet::resolve(Page::Settings, None, false),
        SuggestionSet::Default
    );
}

#[test]
fn it_keeps_every_set_within_bounds() {
    for set in SuggestionSet::iter() {
        let entries = set.entries();
        assert!(
            (2..=4).contains(&entries.len()),
            "{set:?} has {} entries",
            entries.len()
        );
        assert!(entries.iter().all(|e| return !e.display_text.is_empty()));
    }
}

#[test]
fn it_offers_free_form_entries() {
    let entries = PromptDeriver::quick_suggestions(Page::Assessment, Some(AssessmentStep::Xray), false);
    let last = entries.last().unwrap();

    assert!(last.is_free_form());
    assert_eq!(last.display_text, "Ask about the image");
}

#[test]
fn it_returns_the_resolved_set() {
    let entries = PromptDeriver::quick_suggestions(Page::Queue, None, false);
    assert_eq!(entries, SuggestionSet::Queue.entries());
    assert_eq!(entries[0].display_text, "Who goes first?");
}

#[test]
fn it_caps_visible_suggestions() {
    let many = [QuickSuggestion::new("a", "a"); 6];
    let visible = PromptDeriver::visible_suggestions(&many);
    assert_eq!(visible.len(), MAX_VISIBLE_SUGGESTIONS);
    assert_eq!(many.len(), 6);

    let few = SuggestionSet::Symptoms.entries();
    assert_eq!(PromptDeriver::visible_suggestions(few), few);
}
