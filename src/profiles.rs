//! Department profiles: which grids a discharge template carries, where their
//! anchors sit and the row order of each grid's test keys.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════
// Department
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    #[default]
    Medicine,
    Surgery,
    Obstetrics,
}

impl Department {
    /// Names accepted by [`Department::from_str`], aliases included.
    pub const NAMES: &'static [&'static str] = &["medicine", "surgery", "obstetrics", "obs"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medicine => "medicine",
            Self::Surgery => "surgery",
            Self::Obstetrics => "obstetrics",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "medicine" => Some(Self::Medicine),
            "surgery" => Some(Self::Surgery),
            "obstetrics" | "obs" => Some(Self::Obstetrics),
            _ => None,
        }
    }

    pub fn all() -> &'static [Department] {
        &[Self::Medicine, Self::Surgery, Self::Obstetrics]
    }

    /// Grids present in this department's template, in fill order.
    pub fn grids(&self) -> &'static [GridSpec] {
        match self {
            Self::Medicine => &MEDICINE_GRIDS,
            Self::Surgery => &SURGERY_GRIDS,
            Self::Obstetrics => &OBSTETRICS_GRIDS,
        }
    }

    /// Placeholder text used when the note says nothing about a study.
    pub fn defaults(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Medicine => IMAGING_DEFAULTS,
            Self::Surgery | Self::Obstetrics => &[],
        }
    }

    /// Payload keys that hold grids rather than placeholder text.
    pub fn payload_keys(&self) -> Vec<&'static str> {
        self.grids().iter().map(|g| g.payload_key).collect()
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ═══════════════════════════════════════════
// Grid specs
// ═══════════════════════════════════════════

/// One anchored grid of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSpec {
    pub name: &'static str,
    /// Key of the grid's payload in the extraction response.
    pub payload_key: &'static str,
    /// Marker text in the template cell where the first date goes.
    pub anchor: &'static str,
    /// Test keys, one per row below the anchor.
    pub test_order: &'static [&'static str],
}

pub const LAB_ANCHOR: &str = "{{LAB_ANCHOR}}";
pub const CARDIAC_ANCHOR: &str = "{{CARDIAC_ANCHOR}}";
pub const CSF_ANCHOR: &str = "{{CSF_ANCHOR}}";

pub const LABS_KEY: &str = "{{labs_json}}";
pub const CARDIAC_KEY: &str = "{{cardiac_json}}";
pub const CSF_KEY: &str = "{{csf_json}}";

/// Placeholder holding the patient's name.
pub const PATIENT_NAME_KEY: &str = "{{patient_name}}";

pub const LAB_TEST_ORDER: &[&str] = &[
    "hb", "tlc", "dlc_diff", "indices", "plt", "rdw", "b_total", "b_direct", "sgpt", "sgot", "alp",
    "ggt", "protein", "albumin", "globulin", "urea", "cr", "na", "k", "cl", "ca", "uric_acid",
    "pt_inr", "aptt", "procal", "crph",
];

pub const CARDIAC_TEST_ORDER: &[&str] = &[
    "hstropi", "cpkmb", "cpknac", "esr", "crp", "ldh", "il6", "cortisol", "procal", "bnp",
];

pub const CSF_TEST_ORDER: &[&str] = &[
    "tlc", "dlc", "glucose", "protein", "ada", "cbnaat", "gram", "culture", "koh", "india",
];

pub const SURGERY_TEST_ORDER: &[&str] = &[
    "hb", "tlc", "plt", "tb_db", "sgot_sgpt", "alp_ggt", "protein", "albumin", "viral_1", "urea",
    "cr", "na_k", "pt_inr", "viral_2", "hba1c", "thyroid",
];

pub const OBSTETRICS_TEST_ORDER: &[&str] = &[
    "hb", "tlc", "plt", "pt_inr", "bil_total_direct", "sgpt_sgot_alp", "hiv_hbsag_rpr_hcv",
    "urea_creat", "na_k_cl_ca", "fbs_ppbs", "tsh", "t3_t4", "urine_pus_epi_rbc", "urine_cs",
];

const CARDIAC_GRID: GridSpec = GridSpec {
    name: "cardiac",
    payload_key: CARDIAC_KEY,
    anchor: CARDIAC_ANCHOR,
    test_order: CARDIAC_TEST_ORDER,
};

const CSF_GRID: GridSpec = GridSpec {
    name: "csf",
    payload_key: CSF_KEY,
    anchor: CSF_ANCHOR,
    test_order: CSF_TEST_ORDER,
};

static MEDICINE_GRIDS: [GridSpec; 3] = [
    GridSpec {
        name: "labs",
        payload_key: LABS_KEY,
        anchor: LAB_ANCHOR,
        test_order: LAB_TEST_ORDER,
    },
    CARDIAC_GRID,
    CSF_GRID,
];

static SURGERY_GRIDS: [GridSpec; 3] = [
    GridSpec {
        name: "labs",
        payload_key: LABS_KEY,
        anchor: LAB_ANCHOR,
        test_order: SURGERY_TEST_ORDER,
    },
    CARDIAC_GRID,
    CSF_GRID,
];

static OBSTETRICS_GRIDS: [GridSpec; 1] = [GridSpec {
    name: "labs",
    payload_key: LABS_KEY,
    anchor: LAB_ANCHOR,
    test_order: OBSTETRICS_TEST_ORDER,
}];

// ═══════════════════════════════════════════
// Imaging defaults (medicine)
// ═══════════════════════════════════════════

const IMAGING_DEFAULTS: &[(&str, &str)] = &[
    ("{{date_ncct}}", ""),
    (
        "{{ncct_findings}}",
        "Parenchyma: Both cerebral hemispheres show normal attenuation values. Grey-white matter differentiation is well preserved. No focal or diffuse areas of altered density are seen.\n\
         Ventricular System: The supratentorial and infratentorial ventricular systems are normal in size, shape, and position. There is no midline shift or mass effect.\n\
         Deep Structures: The basal ganglia, thalami, and internal capsule appear normal bilaterally.\n\
         Posterior Fossa: The cerebellum and brainstem appear normal.\n\
         Bone & Sinuses: The bony calvarium is intact. Visualised paranasal sinuses and mastoid air cells are clear and aerated.",
    ),
    (
        "{{ncct_imp}}",
        "Normal NCCT Brain study. No significant intracranial abnormality detected.",
    ),
    ("{{date_mri}}", ""),
    (
        "{{mri_findings}}",
        "Signal Intensity: Normal signal intensity is noted in the brain parenchyma on all sequences. No areas of restricted diffusion or abnormal susceptibility blooming are seen.\n\
         Contrast Enhancement: Post-contrast administration, there is no evidence of abnormal parenchymal enhancement, ring-enhancing lesions, or leptomeningeal enhancement.\n\
         Ventricles: The ventricular system is normal in caliber. No periventricular ooze or ependymal enhancement is noted.\n\
         Sella/Pituitary: The pituitary gland and sella turcica appear normal.\n\
         Vessels: Major intracranial flow voids are preserved.\n\
         Extracranial: Visualised orbits, sinuses, and calvarium are unremarkable.",
    ),
    (
        "{{mri_imp}}",
        "Normal Contrast-Enhanced MRI Brain. No evidence of meningitis, granuloma, or acute infarct.",
    ),
    ("{{date_bronch}}", ""),
    (
        "{{bronch_findings}}",
        "Upper Airway: Upper respiratory tract anatomy is normal.\n\
         Vocal Cords: Normal appearance; bilateral cords are equal and mobile. No palsy or growth seen.\n\
         Trachea: Normal caliber and mucosa. No secretions or narrowing.\n\
         Carina: Main carina is sharp, central, and normal.\n\
         Right Bronchial Tree: All segmental bronchi visualized. Mucosa is normal. No secretions, nodularity, or endobronchial mass lesions noted.\n\
         Left Bronchial Tree: All segmental bronchi visualized. Mucosa is normal. No secretions, nodularity, or endobronchial mass lesions noted.",
    ),
    ("{{bronch_imp}}", "Normal Bronchoscopy study."),
    ("{{date_doppler}}", ""),
    (
        "{{doppler_findings}}",
        "Vessel Architecture: The bilateral Common Femoral Vein (CFV), Superficial Femoral Vein (SFV), and Popliteal Veins are well visualized with normal caliber.\n\
         Compressibility: Complete compressibility is seen in all visualized venous segments (indicating patency).\n\
         Flow Dynamics: Color Doppler demonstrates normal spontaneous phasic flow with respiration. Good flow augmentation is seen on distal compression.\n\
         Lumen: No evidence of echogenic thrombus or filling defects within the lumen.\n\
         Soft Tissue: Visualised subcutaneous planes appear normal with no edema.",
    ),
    (
        "{{doppler_imp}}",
        "No sonographic evidence of Deep Vein Thrombosis (DVT) in the bilateral lower limbs.",
    ),
    ("{{date_cect}}", ""),
    (
        "{{thorax_findings}}",
        "Lungs: Lung parenchyma is clear bilaterally. No nodules, consolidation, cavitation, or tree-in-bud opacities seen.\n\
         Pleura: No evidence of pleural effusion or pneumothorax.\n\
         Mediastinum: Central trachea. No significant mediastinal or hilar lymphadenopathy.\n\
         Cardiovascular: Heart size is within normal limits. Major thoracic vessels are normal.",
    ),
    (
        "{{abdomen_findings}}",
        "Liver: Normal size (approx. 12-14 cm), shape, and homogeneous attenuation. No focal lesions. No intrahepatic biliary radical dilatation.\n\
         Gall Bladder: Normal distension and wall thickness. No radio-opaque calculi. CBD is normal.\n\
         Pancreas & Spleen: Normal size and texture. No focal lesions, calcifications, or ductal dilatation.\n\
         Kidneys: Bilateral kidneys are normal in size and position. Corticomedullary differentiation is preserved. No hydronephrosis or calculi.\n\
         Bowel: Visualized bowel loops show normal wall thickness. No signs of obstruction or mass lesions.\n\
         Lymph Nodes: No significant retroperitoneal or mesenteric lymphadenopathy.\n\
         Peritoneum: No free fluid (ascites) seen in the abdomen or pelvis.",
    ),
    (
        "{{cect_imp}}",
        "Normal CECT Thorax and Abdomen study. No evidence of infective etiology or malignancy.",
    ),
];

// ═══════════════════════════════════════════
// Output naming
// ═══════════════════════════════════════════

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\\/*?:"<>|]"#).expect("valid filename pattern")
});

/// Title of the filled document: `Discharge Summary - {patient} ({tag})`.
pub fn summary_file_name(patient_name: &str, tag: &str) -> String {
    let patient = UNSAFE_FILENAME_CHARS.replace_all(patient_name.trim(), "");
    let patient = if patient.trim().is_empty() {
        "Unknown"
    } else {
        patient.trim()
    };
    format!("Discharge Summary - {patient} ({tag})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::normalize_key;
    use std::collections::HashSet;

    #[test]
    fn department_round_trips_through_str() {
        for dept in Department::all() {
            assert_eq!(Department::from_str(dept.as_str()), Some(*dept));
        }
        assert_eq!(Department::from_str("OBS"), Some(Department::Obstetrics));
        assert_eq!(Department::from_str("radiology"), None);
    }

    #[test]
    fn every_accepted_name_parses() {
        for name in Department::NAMES {
            assert!(Department::from_str(name).is_some(), "{name}");
        }
        for dept in Department::all() {
            assert!(Department::NAMES.contains(&dept.as_str()));
        }
        assert!(Department::NAMES.contains(&"obs"));
    }

    #[test]
    fn medicine_and_surgery_share_anchors_but_not_lab_rows() {
        let medicine = Department::Medicine.grids();
        let surgery = Department::Surgery.grids();
        assert_eq!(medicine.len(), 3);
        assert_eq!(surgery.len(), 3);
        assert_eq!(medicine[0].anchor, surgery[0].anchor);
        assert_ne!(medicine[0].test_order, surgery[0].test_order);
        assert_eq!(surgery[1], CARDIAC_GRID);
    }

    #[test]
    fn obstetrics_has_only_the_lab_grid() {
        let grids = Department::Obstetrics.grids();
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].test_order, OBSTETRICS_TEST_ORDER);
        assert_eq!(Department::Obstetrics.payload_keys(), vec![LABS_KEY]);
    }

    #[test]
    fn test_orders_have_distinct_normalized_keys() {
        for dept in Department::all() {
            for grid in dept.grids() {
                let keys = grid.test_order.iter().map(|k| normalize_key(k));
                let keys: HashSet<String> = keys.collect();
                assert_eq!(keys.len(), grid.test_order.len(), "{dept} {}", grid.name);
            }
        }
    }

    #[test]
    fn only_medicine_carries_imaging_defaults() {
        let defaults = Department::Medicine.defaults();
        assert_eq!(defaults.len(), 16);
        let bronch = defaults.iter().find(|(k, _)| *k == "{{bronch_imp}}");
        assert_eq!(bronch.unwrap().1, "Normal Bronchoscopy study.");
        let mut dates = defaults.iter().filter(|(k, _)| k.starts_with("{{date_"));
        assert!(dates.all(|(_, v)| v.is_empty()));
        assert!(Department::Surgery.defaults().is_empty());
    }

    #[test]
    fn multi_line_defaults_keep_line_starts_clean() {
        let (_, findings) = Department::Medicine
            .defaults()
            .iter()
            .find(|(k, _)| *k == "{{ncct_findings}}")
            .unwrap();
        assert!(findings.lines().all(|line| !line.starts_with(' ')));
        assert_eq!(findings.lines().count(), 5);
    }

    #[test]
    fn file_name_strips_unsafe_characters() {
        assert_eq!(
            summary_file_name("Ram/Kumar: \"A\"?", "Pro"),
            "Discharge Summary - RamKumar A (Pro)"
        );
        assert_eq!(
            summary_file_name("  ", "Flash"),
            "Discharge Summary - Unknown (Flash)"
        );
    }
}
