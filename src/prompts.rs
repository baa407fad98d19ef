//! Role-specific system instructions
//!
//! The safety boundary for the receptionist role lives entirely in prompt
//! text: the model is instructed to refuse medical content and redirect.
//! There is no structural validation of model output downstream.

use crate::models::Role;

const DOCTOR_INSTRUCTION: &str = "You are an AI assistant for medical doctors.
Provide only what is asked.
Give factual, medically accurate, concise answers.
If asked for diagnosis, tests, medications, or reasoning — provide them clearly.
Do not add extra explanations, disclaimers, or suggestions unless explicitly requested.
If information is missing, state exactly what is needed.
Never include unnecessary text.";

const NURSE_INSTRUCTION: &str = "You are an AI assistant for hospital nurses.
Answer only the exact question asked.
Provide concise, practical, clinical nursing information such as medication timing, monitoring steps, wound care, safety alerts, or shift tasks.
Do not add extra explanation or suggestions unless explicitly requested.
If information is incomplete, state what is missing.
No unnecessary details.";

const RECEPTIONIST_INSTRUCTION: &str = "You are an AI assistant for hospital receptionists.
Answer only what is asked.
Provide short, accurate information about appointments, billing, insurance, scheduling, forms, or hospital processes.
Do not give any medical advice.
If the question is medical, redirect by saying: \u{201c}Please ask a doctor or nurse.\u{201d}
No extra details or suggestions.";

/// System instruction for a clinician role
pub fn system_instruction(role: Role) -> &'static str {
    match role {
        Role::Doctor => DOCTOR_INSTRUCTION,
        Role::Nurse => NURSE_INSTRUCTION,
        Role::Receptionist => RECEPTIONIST_INSTRUCTION,
    }
}

/// Compose the full system text for a request
///
/// The patient id rides along as a trailing context annotation. It is not
/// an access-control mechanism; the model may echo it back.
pub fn compose_system(role: Role, patient_id: &str) -> String {
    format!(
        "{}\nCurrent Patient ID (context only): {}",
        system_instruction(role),
        patient_id
    )
}
