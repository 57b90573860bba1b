//! Built-in health-domain lexicon

use super::{DomainLexicon, WeightedPattern};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn weighted(name: &str, pattern: &str, weight: f32) -> WeightedPattern {
    WeightedPattern {
        name: name.to_string(),
        pattern: pattern.to_string(),
        weight,
    }
}

const CORE_TERMS: &[&str] = &[
    "health", "healthcare", "medical", "medicine", "medication", "medications", "drug", "drugs",
    "patient", "patients", "doctor", "doctors", "physician", "physicians", "nurse", "nurses",
    "nursing", "clinic", "clinical", "hospital", "hospitals", "hospitalization", "diagnosis",
    "diagnoses", "diagnostic", "prognosis", "symptom", "symptoms", "syndrome", "disease",
    "diseases", "disorder", "disorders", "illness", "condition", "conditions", "treatment",
    "treatments", "therapy", "therapies", "therapeutic", "cure", "remedy", "prescription",
    "prescriptions", "dose", "doses", "dosage", "pharmacy", "pharmacist", "pharmaceutical",
    "vaccine", "vaccines", "vaccination", "immunization", "epidemic", "pandemic", "outbreak",
    "epidemiology", "pathology", "pathogen", "pathogens", "physiology", "anatomy", "wellness",
    "wellbeing", "prevention", "screening", "care", "caregiver", "caregivers", "ward",
    "outpatient", "inpatient", "admission", "discharge", "referral", "specialist", "surgeon",
    "surgeons", "dentist", "dental", "psychiatrist", "psychiatric", "psychologist", "pediatric",
    "pediatrician", "geriatric", "obstetric", "midwife", "paramedic", "ambulance", "emergency",
    "triage", "icu", "mortality", "morbidity", "comorbidity", "recovery", "rehabilitation",
    "remission", "relapse", "placebo", "trial", "trials",
];

const ANATOMY_TERMS: &[&str] = &[
    "heart", "cardiac", "cardiovascular", "lung", "lungs", "pulmonary", "respiratory", "liver",
    "hepatic", "kidney", "kidneys", "renal", "brain", "cerebral", "neural", "nerve", "nerves",
    "spinal", "spine", "stomach", "gastric", "intestine", "intestinal", "bowel", "colon",
    "bladder", "pancreas", "thyroid", "adrenal", "pituitary", "skeletal", "bone", "bones",
    "joint", "joints", "muscle", "muscles", "muscular", "tendon", "ligament", "cartilage",
    "artery", "arteries", "arterial", "vein", "veins", "venous", "vascular", "capillary",
    "blood", "plasma", "platelet", "platelets", "hemoglobin", "lymph", "lymphatic", "tissue",
    "tissues", "organ", "organs", "cell", "cells", "skin", "dermal", "abdomen", "abdominal",
    "thorax", "chest", "pelvis", "pelvic", "retina", "cornea", "cochlea", "esophagus",
    "trachea", "bronchi", "bronchial", "alveoli", "uterus", "ovary", "prostate", "immune",
    "antibody", "antibodies", "hormone", "hormones", "insulin", "cortisol", "cholesterol",
    "glucose",
];

const CONDITION_TERMS: &[&str] = &[
    "acute", "chronic", "benign", "malignant", "severe", "mild", "moderate", "terminal",
    "congenital", "hereditary", "infectious", "contagious", "inflammatory", "degenerative",
    "asymptomatic", "symptomatic", "infection", "infections", "inflammation", "fever",
    "pain", "ache", "nausea", "vomiting", "diarrhea", "fatigue", "dizziness", "headache",
    "migraine", "cough", "rash", "swelling", "bleeding", "hemorrhage", "fracture", "injury",
    "injuries", "wound", "lesion", "tumor", "tumour", "cancer", "carcinoma", "lymphoma",
    "leukemia", "metastasis", "diabetes", "diabetic", "hypertension", "hypotension",
    "asthma", "pneumonia", "bronchitis", "tuberculosis", "influenza", "flu", "covid",
    "hepatitis", "cirrhosis", "arthritis", "osteoporosis", "obesity", "anemia", "stroke",
    "seizure", "epilepsy", "dementia", "alzheimer", "parkinson", "depression", "anxiety",
    "insomnia", "allergy", "allergies", "allergic", "sepsis", "arrhythmia", "angina",
    "infarction", "thrombosis", "embolism", "edema", "ulcer", "dehydration", "malnutrition",
    "virus", "viral", "bacteria", "bacterial", "fungal", "parasite", "toxicity", "overdose",
];

const TREATMENT_TERMS: &[&str] = &[
    "surgery", "surgical", "operation", "procedure", "procedures", "biopsy", "transplant",
    "transfusion", "dialysis", "chemotherapy", "radiotherapy", "radiation", "immunotherapy",
    "physiotherapy", "anesthesia", "anaesthesia", "anesthetic", "sedation", "intubation",
    "ventilation", "catheter", "stent", "bypass", "implant", "incision", "suture", "injection",
    "injections", "infusion", "intravenous", "iv", "oral", "topical", "tablet", "tablets",
    "capsule", "capsules", "pill", "pills", "ointment", "inhaler", "antibiotic", "antibiotics",
    "antiviral", "antifungal", "analgesic", "analgesics", "painkiller", "steroid", "steroids",
    "corticosteroid", "antidepressant", "antihistamine", "anticoagulant", "diuretic",
    "insulin", "chemotherapeutic", "scan", "mri", "ct", "ultrasound", "x-ray", "xray",
    "radiograph", "mammogram", "endoscopy", "colonoscopy", "ecg", "ekg", "eeg", "laboratory",
    "specimen", "assay", "monitoring", "examination", "checkup", "consultation", "counseling",
    "counselling", "rehab", "prophylaxis", "resuscitation", "cpr", "defibrillation",
];

const ENTITY_WORDS: &[&str] = &[
    "patient", "doctor", "nurse", "hospital", "clinic", "medicine", "treatment", "surgery",
    "diagnosis", "symptom", "disease", "condition", "therapy",
];

const CONTEXT_INDICATORS: &[&str] = &[
    "health", "medical", "clinical", "therapeutic", "diagnostic", "pathological",
    "physiological", "anatomical", "surgical", "pharmaceutical", "medicinal", "remedy", "cure",
    "heal",
];

const SUBJECT_NOUNS: &[&str] = &[
    "patient", "patients", "doctor", "doctors", "physician", "nurse", "treatment", "medication",
    "person", "people", "study", "studies", "research", "researchers", "therapy", "surgeon",
    "clinician", "clinicians", "child", "children", "adult", "adults",
];

const ACTION_VERBS: &[&str] = &[
    "diagnose", "treat", "prescribe", "monitor", "examine", "test", "scan", "administer",
    "operate", "vaccinate", "immunize", "admit", "discharge", "refer", "inject", "screen",
];

const INFORMATION_TERMS: &[&str] = &[
    "patient", "doctor", "treatment", "medication", "diagnosis", "symptoms", "therapy",
];

impl DomainLexicon {
    /// Built-in health lexicon
    pub fn health() -> Self {
        Self {
            name: "health".to_string(),
            core_terms: words(CORE_TERMS),
            anatomy_terms: words(ANATOMY_TERMS),
            condition_terms: words(CONDITION_TERMS),
            treatment_terms: words(TREATMENT_TERMS),
            entity_words: words(ENTITY_WORDS),
            entity_patterns: vec![
                weighted("penicillins", r"(?i)\b\w+cillin\b", 0.3),
                weighted("macrolides", r"(?i)\b\w+mycin\b", 0.3),
                weighted("ace_inhibitors", r"(?i)\b\w{3,}pril\b", 0.3),
                weighted("angiotensin_blockers", r"(?i)\b\w+sartan\b", 0.3),
                weighted("statins", r"(?i)\b\w+statin\b", 0.3),
                weighted("azoles", r"(?i)\b\w+zole\b", 0.3),
                weighted("benzodiazepines", r"(?i)\b\w{3,}(pam|lam)\b", 0.3),
                weighted("amines", r"(?i)\b\w{3,}(amine|caine|dipine|tidine)\b", 0.3),
            ],
            domain_patterns: vec![
                weighted(
                    "dosage",
                    r"(?i)\b\d+(\.\d+)?\s*(mg|mcg|ml|cc|units?|doses?|iu)\b",
                    0.2,
                ),
                weighted("blood_pressure", r"(?i)\b\d+(/\d+)?\s*mmhg\b", 0.2),
                weighted("heart_rate", r"(?i)\b\d+\s*bpm\b", 0.2),
                weighted("medical_code", r"\b(ICD|CPT|DRG)[-\s]?\w*", 0.2),
                weighted(
                    "abbreviation",
                    r"\b(BP|HR|RR|ECG|EKG|EEG|MRI|CT|ICU|ER|IV|IM|PO|PRN|BID|TID|QID|OR)\b",
                    0.2,
                ),
                weighted(
                    "frequency",
                    r"(?i)\b(\d+\s+times\s+(a\s+|per\s+)?(day|daily)|every\s+\d+\s+hours?|(twice|once|three times)\s+(a\s+)?(day|daily))\b",
                    0.2,
                ),
                weighted(
                    "care_phase",
                    r"(?i)\b(post-?operative|pre-?operative|follow-?up|discharge|admission)\b",
                    0.2,
                ),
                weighted(
                    "symptom_phrase",
                    r"(?i)\b(symptoms?\s+of|signs?\s+of|presents?\s+with|complain(s|ed)?\s+of|suffering\s+from)\b",
                    0.2,
                ),
                weighted(
                    "procedure_phrase",
                    r"(?i)\b(underwent|performed|administered|prescribed)\s+\w+",
                    0.2,
                ),
            ],
            context_indicators: words(CONTEXT_INDICATORS),
            subject_nouns: words(SUBJECT_NOUNS),
            action_verbs: words(ACTION_VERBS),
            information_terms: words(INFORMATION_TERMS),
        }
    }
}
