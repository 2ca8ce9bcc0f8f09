//! Closed vocabulary of vibe tags.
//!
//! The classification prompt embeds this list verbatim and
//! `VibeMatchResult::vibes[].name` only ever carries entries from it, so the
//! list is data with a version, not configuration. Bump the version whenever
//! an entry is added, removed or renamed.

pub const VIBE_VOCABULARY_VERSION: u32 = 1;

#[rustfmt::skip]
pub const VIBE_VOCABULARY: &[&str] = &[
    "energetic", "calm", "melancholic", "upbeat", "dreamy", "intense", "romantic", "mysterious",
    "joyful", "nostalgic", "powerful", "gentle", "dark", "bright", "ethereal", "groovy",
    "chill", "aggressive", "soothing", "euphoric", "ambient", "dramatic", "playful", "epic",
    "funky", "moody", "triumphant", "haunting", "sensual", "rebellious", "peaceful",
    "cinematic", "bluesy", "jazzy", "electronic", "acoustic", "orchestral", "minimalist",
    "maximalist", "experimental", "retro", "futuristic", "organic", "synthetic", "rhythmic",
    "melodic", "harmonic", "dissonant", "uplifting", "depressing", "hopeful", "anxious",
    "confident", "vulnerable", "angry", "loving", "spiritual", "secular", "meditative",
    "chaotic", "structured", "flowing", "staccato", "legato", "major", "minor", "chromatic",
    "pentatonic", "modal", "atonal", "tonal", "polytonal", "fast", "slow", "moderate",
    "accelerating", "decelerating", "rubato", "steady", "syncopated", "loud", "soft", "dynamic",
    "static", "crescendo", "diminuendo", "forte", "piano", "warm", "cold", "raw", "polished",
    "lo-fi", "hi-fi", "vintage", "danceable", "contemplative", "hypnotic", "catchy", "complex",
    "simple", "layered", "sparse", "vocal-heavy", "instrumental", "a cappella", "symphonic",
    "chamber", "solo", "ensemble", "choir", "traditional", "modern", "fusion", "crossover",
    "genre-bending", "pure", "hybrid", "eclectic", "repetitive", "varied", "progressive",
    "regressive", "circular", "linear", "cyclical", "evolving", "tribal", "urban", "rural",
    "cosmic", "earthly", "celestial", "infernal", "neutral", "masculine", "feminine",
    "androgynous", "youthful", "mature", "timeless", "dated", "contemporary", "commercial",
    "underground", "mainstream", "niche", "accessible", "challenging", "familiar", "novel",
    "emotional", "intellectual", "physical", "mental", "visceral", "cerebral", "primal",
    "sociable", "solitary", "communal", "individual", "collective", "personal", "universal",
    "specific", "celebratory", "mourning", "reflective", "reactive", "proactive", "passive",
    "active", "interactive", "narrative", "abstract", "literal", "metaphorical", "symbolic",
    "direct", "indirect", "implicit", "improvised", "composed", "arranged", "produced",
    "refined", "rough", "smooth", "textured", "clean", "distorted", "mixed", "blended",
    "separated", "unified", "mechanical", "natural", "artificial", "analog", "digital",
    "authentic", "imitative", "original", "derivative", "innovative", "conventional",
    "unconventional", "revolutionary",
];

/// Canonical vocabulary entry for `name`, matched case-insensitively.
pub fn canonical_vibe(name: &str) -> Option<&'static str> {
    let needle = name.trim();
    VIBE_VOCABULARY
        .iter()
        .copied()
        .find(|entry| entry.eq_ignore_ascii_case(needle))
}

pub fn vocabulary_prompt_list() -> String {
    VIBE_VOCABULARY.join(", ")
}
