//! Static CSV corpora used across harnesses.

pub const HEADER: &str = "ICD11_Title,ICD11_Code,Ayurveda_NAMC_CODE,Siddha_NAMC_CODE,Unani_NUMC_CODE";

/// A small dataset covering every missing-code shape: `nan`, empty, and
/// fully coded rows.
pub const CSV_SMALL: &str = "\
ICD11_Title,ICD11_Code,Ayurveda_NAMC_CODE,Siddha_NAMC_CODE,Unani_NUMC_CODE
Diabetes mellitus,5A10,AY-221,nan,
Type 2 diabetes mellitus,5A11,AY-222,SD-14,U-31
Essential hypertension,BA00,nan,SD-40,U-12
Fever of unknown origin,MG26,AY-001,SD-002,UN-003
Migraine,8A80,AY-310,,nan
\"Asthma, allergic\",CA23.0,AY-120,SD-77,U-09
";

/// Headers in a different order, plus an extra column the matcher ignores.
pub const CSV_REORDERED: &str = "\
Unani_NUMC_CODE,ICD11_Title,Notes,ICD11_Code,Siddha_NAMC_CODE,Ayurveda_NAMC_CODE
U-31,Type 2 diabetes mellitus,chronic,5A11,SD-14,AY-222
";

/// `n` rows whose titles all contain "diabetic", for result-cap tests.
pub fn csv_many_diabetic(n: usize) -> String {
    let mut csv = format!("{HEADER}\n");
    for i in 0..n {
        csv.push_str(&format!("Diabetic complication {i},5A{i:02},AY-{i},nan,\n"));
    }
    csv
}

/// Titles of [`CSV_SMALL`] in dataset order.
pub const SMALL_TITLES: &[&str] = &[
    "Diabetes mellitus",
    "Type 2 diabetes mellitus",
    "Essential hypertension",
    "Fever of unknown origin",
    "Migraine",
    "Asthma, allergic",
];
