//! Example: extract physical-therapy findings from clinical notes.
//!
//! Usage:
//!   cargo run --example physical_therapy
//!
//! Uses the Gemini API when GEMINI_API_KEY is set, otherwise falls back to a
//! scripted mock provider so the full pipeline runs offline.

use std::fs;

use quarry::llm::{GeminiProvider, MockProvider};
use quarry::{io, visualize, ExampleData, Extraction, PromptTemplate, Quarry, QuarryConfig};

/// Concatenated discharge summary, PT notes, and imaging report for a
/// patient recovering from hip surgery.
const INPUT_TEXT: &str = r#"<document filename="Discharge_Summary.txt">
Patient: John Doe, 78-year-old male
Admission Date: 2023-10-26
Discharge Date: 2023-10-31
Admitting Diagnosis: Fall at home, right hip pain.
Discharge Diagnosis: Right intertrochanteric femur fracture, status post Open Reduction Internal Fixation (ORIF).

History of Present Illness:
Mr. Doe is a 78 y/o male with a history of hypertension, type 2 diabetes, and osteoarthritis who presented to the emergency department after a mechanical fall at home. He tripped on a rug. Patient reported immediate, severe pain in his right hip and inability to bear weight. X-rays confirmed a comminuted intertrochanteric fracture of the right femur.

Hospital Course:
Patient was admitted to the orthopedic service. On 2023-10-27, he underwent a successful ORIF of the right hip performed by Dr. Smith. Post-operatively, his pain has been managed with a combination of oxycodone and acetaminophen. He has been working with Physical Therapy and Occupational Therapy. He is currently toe-touch weight-bearing (TTWB) on the right lower extremity. His hospital course was otherwise uncomplicated. He is now stable for discharge to a skilled nursing facility for continued rehabilitation.

Past Medical History:
1. Hypertension
2. Type 2 Diabetes Mellitus
3. Osteoarthritis
4. Hyperlipidemia

Discharge Orders:
- Precautions: Toe-touch weight-bearing on right lower extremity for 6 weeks. No hip flexion beyond 90 degrees, no adduction past midline, no internal rotation of the right hip.

Social History:
Patient is a retired carpenter. He lives with his wife in a single-story home with one step to enter. He was independent with all mobility and ADLs prior to the fall, using a single-point cane for community ambulation.
</document>

<document filename="PT_Notes_Hospital.txt">
Physical Therapy Notes - Acute Care
Patient: John Doe
Date of Initial Evaluation: 2023-10-28 (Post-op Day 1)
Subjective: Patient reports pain in R hip at 7/10. Anxious to get moving.
Objective:
- ROM: R hip flexion limited to 70 deg due to pain/precautions.
- Strength: R hip abduction 1/5, knee extension 2/5. LLE and UEs 4/5 throughout.
- Bed Mobility: Max A to roll, supine to sit.
- Transfers: Max A from bed to chair with rolling walker (RW).
- Gait: Hopped with RW for 10 feet with Max A. Poor balance.

Date of Final Note: 2023-10-31 (Discharge)
Subjective: Pain 4/10 with activity. Reports feeling stronger.
Objective:
- Bed Mobility: Mod A for supine to sit.
- Transfers: Min A for sit to stand from bed and toilet with RW.
- Gait: Ambulates 50 feet with RW and TTWB on RLE, requires Min A for sequencing and balance.
- Equipment: Rolling walker issued.
- Recommendation: Continue PT at SNF to improve strength, safety, and functional mobility to return home.
</document>

<document filename="Imaging_Report_XRAY_Hip.txt">
Facility: General Hospital
Patient: John Doe
Exam: X-RAY RIGHT HIP 2 VIEWS
Date: 2023-10-26
Clinical History: 78-year-old male, fall, right hip pain.
Findings:
There is a comminuted intertrochanteric fracture of the right femur.
Impression:
Acute comminuted intertrochanteric right femur fracture.
</document>
"#;

const PROMPT_DESCRIPTION: &str = "\
Extract physical therapy-relevant information from the clinical notes.
Identify the following classes, extracting the exact text from the document:
- patient_info: Key patient demographic and social factors.
- diagnosis: The primary reason for admission.
- surgery: The surgical procedure performed.
- medical_history: Relevant past medical conditions.
- imaging_finding: Key results from imaging reports.
- precaution: Specific movement or weight-bearing restrictions.
- functional_status: Patient's current ability with mobility tasks.
- functional_limitation: Specific impairments like weakness or limited ROM.
- equipment: Assistive devices required by the patient.
- prior_level_of_function: The patient's mobility level before the incident.";

fn task() -> PromptTemplate {
    PromptTemplate::new(PROMPT_DESCRIPTION).with_example(ExampleData::new(
        "65 y/o female s/p R TKA with precautions of WBAT and no flexion past 90 degrees. \
         Pt ambulated 50 ft with a rolling walker.",
        vec![
            Extraction::new("patient_info", "65 y/o female"),
            Extraction::new("surgery", "R TKA").with_attribute("body_part", "right knee"),
            Extraction::new("precaution", "WBAT")
                .with_attribute("body_part", "right lower extremity"),
            Extraction::new("precaution", "no flexion past 90 degrees")
                .with_attribute("body_part", "right knee"),
            Extraction::new("functional_status", "ambulated 50 ft")
                .with_attribute("assistive_device", "rolling walker"),
            Extraction::new("equipment", "rolling walker"),
        ],
    ))
}

/// Offline stand-in for the model: real snippets from INPUT_TEXT.
fn scripted_mock() -> MockProvider {
    MockProvider::with_responses(vec![MockProvider::fenced(
        r#"{"extractions": [
  {"extraction_class": "patient_info", "extraction_text": "78-year-old male"},
  {"extraction_class": "diagnosis", "extraction_text": "Right intertrochanteric femur fracture"},
  {"extraction_class": "surgery", "extraction_text": "ORIF of the right hip", "attributes": {"body_part": "right hip"}},
  {"extraction_class": "medical_history", "extraction_text": "hypertension, type 2 diabetes, and osteoarthritis"},
  {"extraction_class": "imaging_finding", "extraction_text": "comminuted intertrochanteric fracture of the right femur"},
  {"extraction_class": "precaution", "extraction_text": "Toe-touch weight-bearing on right lower extremity for 6 weeks", "attributes": {"body_part": "right lower extremity"}},
  {"extraction_class": "precaution", "extraction_text": "No hip flexion beyond 90 degrees", "attributes": {"body_part": "right hip"}},
  {"extraction_class": "functional_limitation", "extraction_text": "R hip flexion limited to 70 deg"},
  {"extraction_class": "functional_status", "extraction_text": "Ambulates 50 feet with RW", "attributes": {"assistive_device": "rolling walker"}},
  {"extraction_class": "equipment", "extraction_text": "Rolling walker issued"},
  {"extraction_class": "prior_level_of_function", "extraction_text": "independent with all mobility and ADLs prior to the fall"}
]}"#,
    )])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Running physical therapy extraction example...");

    // Whole record fits in one model call.
    let config = QuarryConfig {
        max_char_buffer: 4000,
        ..QuarryConfig::default()
    };

    let quarry = Quarry::with_config(task(), config);
    let quarry = match GeminiProvider::from_env() {
        Ok(provider) => quarry.with_provider(provider),
        Err(_) => {
            println!("GEMINI_API_KEY not set - using the scripted mock provider.");
            quarry.with_provider(scripted_mock())
        }
    };

    let result = quarry.extract(INPUT_TEXT)?;
    println!(
        "Extracted {} entities ({:.0}% aligned to the source).",
        result.extractions.len(),
        result.alignment_ratio() * 100.0
    );

    let jsonl_path = "pt_extraction.jsonl";
    println!("Saving results to {}...", jsonl_path);
    io::save_annotated_documents(jsonl_path, &[result])?;

    let html_path = "pt_visualization.html";
    println!("Generating visualization to {}...", html_path);
    let html = visualize::visualize_file(jsonl_path)?;
    fs::write(html_path, html)?;

    println!(
        "Successfully created {}. Open this file in a browser to see the interactive results.",
        html_path
    );

    Ok(())
}
