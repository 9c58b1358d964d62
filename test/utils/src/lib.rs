/// A fully populated patient snapshot as the host application sends it.
pub fn patient_fixture() -> &'static str {
    return r#"
{
  "name": "Maria Lopez",
  "age": 54,
  "gender": "female",
  "chiefComplaint": "Chest pain radiating to left arm",
  "vitals": {
    "systolic": 150,
    "diastolic": 95,
    "heartRate": 112,
    "oxygenSaturation": 93,
    "temperature": 37.4,
    "respiratoryRate": 22
  },
  "symptoms": [
    { "name": "Chest pain", "selected": true },
    { "name": "Nausea", "selected": false },
    { "name": "Shortness of breath", "selected": true }
  ],
  "triage": {
    "score": 82,
    "priority": "critical",
    "recommendation": "Immediate evaluation for acute coronary syndrome."
  },
  "imaging": {
    "severity": "moderate",
    "impressions": [
      "Mild cardiomegaly",
      "Pulmonary vascular congestion",
      "Small left pleural effusion",
      "No pneumothorax"
    ]
  }
}
"#
    .trim();
}

/// A persisted session record in the on-disk layout.
pub fn persisted_session_fixture() -> &'static str {
    return r#"
{
  "messages": [
    {
      "id": "5b3c1f0e-8d5e-4e5b-9a43-0c6f1e6f4d11",
      "role": "user",
      "content": "What does a GCS of 13 mean?",
      "timestamp": "2024-03-09T14:30:05.250Z"
    },
    {
      "id": "9a0f4c2b-1c1d-4f0e-b7f0-2f4c7d3e8a22",
      "role": "assistant",
      "content": "A GCS of 13 indicates a mild brain injury.",
      "timestamp": "2024-03-09T14:30:09Z"
    }
  ],
  "context": {
    "page": "assessment",
    "step": "symptoms"
  }
}
"#
    .trim();
}
