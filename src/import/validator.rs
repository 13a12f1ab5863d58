const SESSION_MARKERS: [&str; 2] = ["mi entrenamiento", "duración"];
const SET_MARKERS: [&str; 2] = ["repeticiones", "x "];

/// Cheap check that `text` resembles an exported session.
///
/// True when the lower-cased text carries a title or duration marker and a
/// repetition unit or a bare `"x "`. A heuristic gate in front of the parser;
/// it does not promise the parse will find anything.
pub fn looks_like_valid_session(text: &str) -> bool {
    let lower = text.to_lowercase();
    SESSION_MARKERS.iter().any(|m| lower.contains(m)) && SET_MARKERS.iter().any(|m| lower.contains(m))
}
