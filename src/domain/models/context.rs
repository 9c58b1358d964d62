#[cfg(test)]
#[path = "context_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

/// Pages of the host application the chat panel can be opened from.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumVariantNames,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    Assessment,
    Queue,
    PatientDetail,
    Imaging,
    Settings,
}

impl Page {
    pub fn parse(text: &str) -> Option<Page> {
        return Page::iter().find(|e| return e.to_string() == text);
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => return "Home",
            Page::Assessment => return "Assessment",
            Page::Queue => return "Patient Queue",
            Page::PatientDetail => return "Patient Detail",
            Page::Imaging => return "Imaging",
            Page::Settings => return "Settings",
        }
    }
}

/// Steps of the assessment wizard. Only meaningful while the page is
/// [`Page::Assessment`].
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumVariantNames,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AssessmentStep {
    PatientInfo,
    Vitals,
    Symptoms,
    ImagingDecision,
    Xray,
    Voice,
    Review,
}

impl AssessmentStep {
    pub fn parse(text: &str) -> Option<AssessmentStep> {
        return AssessmentStep::iter().find(|e| return e.to_string() == text);
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssessmentStep::PatientInfo => return "Patient Info",
            AssessmentStep::Vitals => return "Vitals",
            AssessmentStep::Symptoms => return "Symptoms",
            AssessmentStep::ImagingDecision => return "Imaging Decision",
            AssessmentStep::Xray => return "X-Ray",
            AssessmentStep::Voice => return "Voice Notes",
            AssessmentStep::Review => return "Review",
        }
    }
}

/// Readings as the host records them, decimals allowed. Temperature is in
/// degrees Celsius.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systolic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diastolic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    pub name: String,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResult {
    /// 0 to 100.
    pub score: u32,
    pub priority: String,
    pub recommendation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagingAnalysis {
    pub severity: String,
    #[serde(default)]
    pub impressions: Vec<String>,
}

/// Point-in-time summary of the patient currently on screen.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chief_complaint: Option<String>,
    #[serde(default)]
    pub vitals: Vitals,
    #[serde(default)]
    pub symptoms: Vec<Symptom>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triage: Option<TriageResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imaging: Option<ImagingAnalysis>,
}

impl PatientSnapshot {
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => return name.trim().to_string(),
            _ => return "Unknown patient".to_string(),
        }
    }

    pub fn selected_symptoms(&self) -> Vec<&str> {
        return self
            .symptoms
            .iter()
            .filter(|e| return e.selected)
            .map(|e| return e.name.as_str())
            .collect();
    }
}

/// Where the user currently is in the host application.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextDescriptor {
    pub page: Page,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<AssessmentStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_snapshot: Option<PatientSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xray_image_ref: Option<String>,
}

impl ContextDescriptor {
    pub fn new(page: Page) -> ContextDescriptor {
        return ContextDescriptor {
            page,
            ..ContextDescriptor::default()
        };
    }

    /// The assessment step, or `None` whenever the page is not the
    /// assessment page, regardless of what is stored.
    pub fn active_step(&self) -> Option<AssessmentStep> {
        if self.page != Page::Assessment {
            return None;
        }

        return self.step;
    }

    pub fn has_patient(&self) -> bool {
        return self.patient_snapshot.is_some();
    }

    /// Shallow merge. Fields left as `None` on the update keep their current
    /// value.
    pub fn merge(&mut self, update: ContextUpdate) {
        if let Some(page) = update.page {
            self.page = page;
        }
        if let Some(step) = update.step {
            self.step = step;
        }
        if let Some(patient_snapshot) = update.patient_snapshot {
            self.patient_snapshot = patient_snapshot;
        }
        if let Some(xray_image_ref) = update.xray_image_ref {
            self.xray_image_ref = xray_image_ref;
        }
    }

    /// Short text for the context badge shown next to the chat panel.
    pub fn label(&self) -> String {
        if let Some(step) = self.active_step() {
            return format!("{} · {}", self.page.label(), step.label());
        }

        if self.page == Page::PatientDetail {
            if let Some(patient) = &self.patient_snapshot {
                return format!("Patient: {}", patient.display_name());
            }
        }

        return self.page.label().to_string();
    }
}

/// A partial [`ContextDescriptor`]. The outer `Option` says whether the field
/// is being changed, the inner one (where present) allows clearing it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextUpdate {
    pub page: Option<Page>,
    pub step: Option<Option<AssessmentStep>>,
    pub patient_snapshot: Option<Option<PatientSnapshot>>,
    pub xray_image_ref: Option<Option<String>>,
}

impl ContextUpdate {
    pub fn page(page: Page) -> ContextUpdate {
        return ContextUpdate {
            page: Some(page),
            ..ContextUpdate::default()
        };
    }

    pub fn step(step: Option<AssessmentStep>) -> ContextUpdate {
        return ContextUpdate {
            step: Some(step),
            ..ContextUpdate::default()
        };
    }

    pub fn patient(patient_snapshot: Option<PatientSnapshot>) -> ContextUpdate {
        return ContextUpdate {
            patient_snapshot: Some(patient_snapshot),
            ..ContextUpdate::default()
        };
    }

    pub fn with_step(mut self, step: Option<AssessmentStep>) -> ContextUpdate {
        self.step = Some(step);
        return self;
    }

    pub fn with_patient(mut self, patient_snapshot: Option<PatientSnapshot>) -> ContextUpdate {
        self.patient_snapshot = Some(patient_snapshot);
        return self;
    }

    pub fn with_xray_image_ref(mut self, xray_image_ref: Option<String>) -> ContextUpdate {
        self.xray_image_ref = Some(xray_image_ref);
        return self;
    }

    pub fn is_empty(&self) -> bool {
        return self == &ContextUpdate::default();
    }
}
