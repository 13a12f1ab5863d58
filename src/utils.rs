use crate::models::OneRMFormula;

/// Estimated one-rep max. A single rep is its own max under every formula.
pub fn calculate_1rm(weight: f64, reps: u32, formula: OneRMFormula) -> f64 {
    if reps == 1 {
        return weight;
    }
    let r = reps as f64;
    match formula {
        OneRMFormula::Epley => weight * (1.0 + r / 30.0),
        OneRMFormula::Brzycki => weight / (1.0278 - 0.0278 * r),
        OneRMFormula::Lombardi => weight * r.powf(0.10),
        OneRMFormula::OConner => weight * (1.0 + 0.025 * r),
    }
}

/// Rounds to one decimal place, the precision charts show.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `80` for whole numbers, `82.5` otherwise.
pub fn format_weight(value: f64) -> String {
    let rounded = round1(value);
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}
