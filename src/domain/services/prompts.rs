#[cfg(test)]
#[path = "prompts_test.rs"]
mod tests;

use crate::domain::models::AssessmentStep;
use crate::domain::models::ContextDescriptor;
use crate::domain::models::Page;
use crate::domain::models::PatientSnapshot;
use crate::domain::models::Vitals;

const BASE_INSTRUCTION: &str = "You are a clinical decision-support assistant built into a field medical triage application used by medics and first responders. Help the user assess patients, interpret findings, and prioritize care. You provide decision support only: never state a definitive diagnosis, be explicit about uncertainty, and always defer to the clinician's judgment and local protocols. If anything suggests an immediately life-threatening condition, say so first.";

const CLOSING_INSTRUCTION: &str = "Keep responses concise and practical, under 200 words unless the user explicitly asks for more detail.";

const MAX_IMAGING_IMPRESSIONS: usize = 3;

fn page_instruction(page: Page) -> &'static str {
    match page {
        Page::Home => {
            return "The user is on the home screen. Help them get oriented: explain what the app can do, how to start a new assessment, and answer general triage questions.";
        }
        Page::Assessment => {
            return "The user is performing a patient assessment. Guide them through collecting accurate information and point out findings that change triage priority.";
        }
        Page::Queue => {
            return "The user is viewing the patient queue. Help them reason about ordering patients by priority, reassessment intervals, and resource allocation.";
        }
        Page::PatientDetail => {
            return "The user is reviewing a single patient's record. Help them interpret the recorded data, identify trends or gaps, and plan next steps.";
        }
        Page::Imaging => {
            return "The user is working with medical imaging. Help them interpret AI-assisted image findings, and remind them that automated analysis must be confirmed by a qualified reader.";
        }
        Page::Settings => {
            return "The user is on the settings screen. Answer questions about configuring the application and how settings affect the assessment workflow.";
        }
    }
}

fn step_instruction(step: AssessmentStep) -> &'static str {
    match step {
        AssessmentStep::PatientInfo => {
            return "Current step: patient information. Help capture demographics and a clear chief complaint, including onset and mechanism of injury.";
        }
        AssessmentStep::Vitals => {
            return "Current step: vital signs. Help the user measure and interpret blood pressure, heart rate, oxygen saturation, temperature, and respiratory rate, and flag abnormal values.";
        }
        AssessmentStep::Symptoms => {
            return "Current step: symptoms. Help the user identify relevant symptoms, suggest follow-up questions, and highlight red-flag combinations.";
        }
        AssessmentStep::ImagingDecision => {
            return "Current step: imaging decision. Help the user decide whether imaging such as a chest X-ray is indicated given the findings so far.";
        }
        AssessmentStep::Xray => {
            return "Current step: X-ray. Help the user understand the X-ray capture and AI analysis, what the findings may indicate, and their limitations.";
        }
        AssessmentStep::Voice => {
            return "Current step: voice notes. Help the user dictate clear, structured clinical notes and extract key findings from them.";
        }
        AssessmentStep::Review => {
            return "Current step: review. Help the user check the assessment for completeness and consistency before the triage result is finalized.";
        }
    }
}

/// Only readings that are present are rendered; blood pressure needs both
/// values.
fn vitals_line(vitals: &Vitals) -> Option<String> {
    let mut readings: Vec<String> = vec![];

    if let (Some(systolic), Some(diastolic)) = (vitals.systolic, vitals.diastolic) {
        readings.push(format!("BP {systolic}/{diastolic} mmHg"));
    }
    if let Some(heart_rate) = vitals.heart_rate {
        readings.push(format!("HR {heart_rate} bpm"));
    }
    if let Some(oxygen_saturation) = vitals.oxygen_saturation {
        readings.push(format!("SpO2 {oxygen_saturation}%"));
    }
    if let Some(temperature) = vitals.temperature {
        readings.push(format!("Temp {temperature}°C"));
    }
    if let Some(respiratory_rate) = vitals.respiratory_rate {
        readings.push(format!("RR {respiratory_rate}/min"));
    }

    if readings.is_empty() {
        return None;
    }

    return Some(format!("Vitals: {}", readings.join(", ")));
}

fn or_default(value: &Option<String>, fallback: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => return text.trim().to_string(),
        _ => return fallback.to_string(),
    }
}

fn patient_block(patient: &PatientSnapshot) -> String {
    let age = patient
        .age
        .map(|e| return e.to_string())
        .unwrap_or_else(|| return "Unknown".to_string());

    let mut lines = vec![
        "Current patient:".to_string(),
        format!(
            "Name: {}, Age: {}, Gender: {}, Chief complaint: {}",
            or_default(&patient.name, "Unknown"),
            age,
            or_default(&patient.gender, "Not specified"),
            or_default(&patient.chief_complaint, "Not specified"),
        ),
    ];

    if let Some(vitals) = vitals_line(&patient.vitals) {
        lines.push(vitals);
    }

    let symptoms = patient.selected_symptoms();
    if !symptoms.is_empty() {
        lines.push(format!("Symptoms: {}", symptoms.join(", ")));
    }

    if let Some(triage) = &patient.triage {
        lines.push(format!(
            "Triage: {} (score {}/100). {}",
            triage.priority.to_uppercase(),
            triage.score,
            triage.recommendation
        ));
    }

    if let Some(imaging) = &patient.imaging {
        let impressions = imaging
            .impressions
            .iter()
            .take(MAX_IMAGING_IMPRESSIONS)
            .map(|e| return e.as_str())
            .collect::<Vec<&str>>();

        if impressions.is_empty() {
            lines.push(format!("Imaging: {} severity", imaging.severity));
        } else {
            lines.push(format!(
                "Imaging: {} severity. Impressions: {}",
                imaging.severity,
                impressions.join("; ")
            ));
        }
    }

    return lines.join("\n");
}

pub struct PromptDeriver {}

impl PromptDeriver {
    /// Builds the system prompt that accompanies the next model call. The
    /// output only depends on `context`.
    pub fn build_system_prompt(context: &ContextDescriptor) -> String {
        let mut segments: Vec<String> = vec![BASE_INSTRUCTION.to_string()];

        if let Some(patient) = &context.patient_snapshot {
            segments.push(patient_block(patient));
        }

        segments.push(page_instruction(context.page).to_string());

        if let Some(step) = context.active_step() {
            segments.push(step_instruction(step).to_string());
        }

        segments.push(CLOSING_INSTRUCTION.to_string());

        return segments.join("\n\n");
    }
}
