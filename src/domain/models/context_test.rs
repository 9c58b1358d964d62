use anyhow::Result;
use test_utils::patient_fixture;

use super::AssessmentStep;
use super::ContextDescriptor;
use super::ContextUpdate;
use super::Page;
use super::PatientSnapshot;

#[test]
fn it_defaults_to_home() {
    let ctx = ContextDescriptor::default();
    assert_eq!(ctx.page, Page::Home);
    assert_eq!(ctx.step, None);
    assert!(!ctx.has_patient());
    assert_eq!(ctx.xray_image_ref, None);
}

#[test]
fn it_parses_pages_and_steps() {
    assert_eq!(Page::parse("patient-detail"), Some(Page::PatientDetail));
    assert_eq!(Page::parse("queue"), Some(Page::Queue));
    assert_eq!(Page::parse("nowhere"), None);
    assert_eq!(
        AssessmentStep::parse("imaging-decision"),
        Some(AssessmentStep::ImagingDecision)
    );
    assert_eq!(AssessmentStep::parse("xray"), Some(AssessmentStep::Xray));
    assert_eq!(AssessmentStep::parse("x-ray"), None);
}

#[test]
fn it_merges_step_without_touching_page() {
    let mut ctx = ContextDescriptor::new(Page::Assessment);
    ctx.step = Some(AssessmentStep::PatientInfo);

    ctx.merge(ContextUpdate::step(Some(AssessmentStep::Vitals)));

    assert_eq!(ctx.page, Page::Assessment);
    assert_eq!(ctx.step, Some(AssessmentStep::Vitals));
}

#[test]
fn it_merges_page_and_retains_omitted_fields() {
    let mut ctx = ContextDescriptor::new(Page::Assessment);
    ctx.step = Some(AssessmentStep::Xray);
    ctx.xray_image_ref = Some("blob:abc".to_string());

    ctx.merge(ContextUpdate::page(Page::Queue));

    assert_eq!(ctx.page, Page::Queue);
    assert_eq!(ctx.step, Some(AssessmentStep::Xray));
    assert_eq!(ctx.xray_image_ref, Some("blob:abc".to_string()));
}

#[test]
fn it_clears_fields_explicitly() {
    let mut ctx = ContextDescriptor::new(Page::Assessment);
    ctx.step = Some(AssessmentStep::Review);
    ctx.patient_snapshot = Some(PatientSnapshot::default());

    ctx.merge(ContextUpdate::step(None).with_patient(None));

    assert_eq!(ctx.step, None);
    assert!(!ctx.has_patient());
}

#[test]
fn it_ignores_step_outside_assessment() {
    let mut ctx = ContextDescriptor::new(Page::Home);
    ctx.step = Some(AssessmentStep::Vitals);
    assert_eq!(ctx.active_step(), None);

    ctx.merge(ContextUpdate::page(Page::Assessment));
    assert_eq!(ctx.active_step(), Some(AssessmentStep::Vitals));
}

#[test]
fn it_reports_empty_updates() {
    assert!(ContextUpdate::default().is_empty());
    assert!(!ContextUpdate::page(Page::Home).is_empty());
    assert!(!ContextUpdate::default().with_xray_image_ref(None).is_empty());
}

#[test]
fn it_labels_context() -> Result<()> {
    let mut ctx = ContextDescriptor::new(Page::Assessment);
    assert_eq!(ctx.label(), "Assessment");

    ctx.step = Some(AssessmentStep::Xray);
    assert_eq!(ctx.label(), "Assessment · X-Ray");

    ctx.page = Page::PatientDetail;
    assert_eq!(ctx.label(), "Patient Detail");

    ctx.patient_snapshot = Some(serde_json::from_str(patient_fixture())?);
    assert_eq!(ctx.label(), "Patient: Maria Lopez");

    ctx.page = Page::Queue;
    assert_eq!(ctx.label(), "Patient Queue");

    return Ok(());
}

#[test]
fn it_selects_only_flagged_symptoms() -> Result<()> {
    let patient: PatientSnapshot = serde_json::from_str(patient_fixture())?;
    assert_eq!(
        patient.selected_symptoms(),
        vec!["Chest pain", "Shortness of breath"]
    );

    return Ok(());
}

#[test]
fn it_deserializes_camel_case_context() -> Result<()> {
    let ctx: ContextDescriptor = serde_json::from_str(
        r#"{"page":"assessment","step":"imaging-decision","xrayImageRef":"img-1"}"#,
    )?;

    assert_eq!(ctx.page, Page::Assessment);
    assert_eq!(ctx.step, Some(AssessmentStep::ImagingDecision));
    assert_eq!(ctx.xray_image_ref, Some("img-1".to_string()));
    assert_eq!(ctx.patient_snapshot, None);

    return Ok(());
}

#[test]
fn it_falls_back_to_unknown_display_name() {
    let mut patient = PatientSnapshot::default();
    assert_eq!(patient.display_name(), "Unknown patient");

    patient.name = Some("  ".to_string());
    assert_eq!(patient.display_name(), "Unknown patient");
}
