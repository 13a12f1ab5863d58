use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::DecodedSet;

// `01:01 x PC`
static TIME_SET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{2}:\d{2})\s*x\s*(\S.*)$").unwrap());

// `12 repeticiones x 45 kg`, `1 repetición x 100 kg`, `8 reps x 60 kg`
static REP_SET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d+)\s*(?:repeticiones|repetici[oó]n|reps\.?|rep\.?)\s*x\s*(\S.*)$")
        .unwrap()
});

/// Decodes the text of one set line, with the `"<N>: "` prefix already removed.
///
/// The time notation is tried before the repetition notation. The load after `x` is
/// kept as free text (`45 kg`, `10-12 kg`, `PC`). Anything else comes back as
/// [`DecodedSet::Unparsed`] holding the input unchanged.
pub fn decode(set_text: &str) -> DecodedSet {
    if let Some(caps) = TIME_SET.captures(set_text) {
        return DecodedSet::TimeBased {
            duration: caps[1].to_string(),
            weight_text: caps[2].trim().to_string(),
        };
    }

    if let Some(caps) = REP_SET.captures(set_text) {
        // An absurd digit run overflows u32; treat it like any other odd line.
        if let Ok(reps) = caps[1].parse::<u32>() {
            return DecodedSet::RepBased {
                reps,
                weight_text: caps[2].trim().to_string(),
            };
        }
    }

    DecodedSet::Unparsed {
        raw: set_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rep(reps: u32, w: &str) -> DecodedSet {
        DecodedSet::RepBased {
            reps,
            weight_text: w.to_string(),
        }
    }

    #[test]
    fn repetition_notation() {
        assert_eq!(decode("12 repeticiones x 45 kg"), rep(12, "45 kg"));
        assert_eq!(decode("1 repetición x 100 kg"), rep(1, "100 kg"));
        assert_eq!(decode("10 repeticion x PC"), rep(10, "PC"));
        assert_eq!(decode("8 reps x 60 kg"), rep(8, "60 kg"));
    }

    #[test]
    fn weight_text_is_trimmed_but_otherwise_untouched() {
        assert_eq!(decode("12 repeticiones x    45 kg   "), rep(12, "45 kg"));
        assert_eq!(decode("12 repeticiones x 10-12 kg"), rep(12, "10-12 kg"));
        assert_eq!(decode("15 repeticiones x peso corporal"), rep(15, "peso corporal"));
    }

    #[test]
    fn time_notation() {
        assert_eq!(
            decode("01:01 x PC"),
            DecodedSet::TimeBased {
                duration: "01:01".to_string(),
                weight_text: "PC".to_string(),
            }
        );
        assert_eq!(
            decode("00:45 x 20 kg"),
            DecodedSet::TimeBased {
                duration: "00:45".to_string(),
                weight_text: "20 kg".to_string(),
            }
        );
    }

    #[test]
    fn anything_else_is_kept_raw() {
        for text in [
            "calentamiento",
            "12 repeticiones",
            "12 repeticiones x ",
            "1:01 x PC",
            "",
            "x 45 kg",
            "99999999999 repeticiones x 10 kg",
        ] {
            assert_eq!(
                decode(text),
                DecodedSet::Unparsed {
                    raw: text.to_string()
                },
                "input: {text:?}"
            );
        }
    }
}
