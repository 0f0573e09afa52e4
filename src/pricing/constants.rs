/// Grams of product the per-100g protein basis refers to.
pub const PROTEIN_BASIS_GRAMS: f64 = 100.0;

/// Total protein per package below which a warning is attached.
pub const LOW_PROTEIN_THRESHOLD_GRAMS: f64 = 1.0;

/// Comparison targets offered by the UI, in grams of protein.
pub const TARGET_GRAM_OPTIONS: [f64; 2] = [25.0, 30.0];

/// Message attached to items whose whole package holds under a gram of protein.
pub const LOW_PROTEIN_MESSAGE: &str = "Very low protein content detected. Please check your inputs.";

/// The other standard target: 25 becomes 30 and anything else becomes 25.
pub fn toggle_target(current: f64) -> f64 {
    if current == TARGET_GRAM_OPTIONS[0] {
        TARGET_GRAM_OPTIONS[1]
    } else {
        TARGET_GRAM_OPTIONS[0]
    }
}
