//! Headline sentiment scorers.
//!
//! [`keyword_score`] is the fallback heuristic for regional (Spanish-language)
//! coverage: substring hits against two fixed keyword lists. [`lexicon_score`]
//! backs the `lexicon` scoring backend of the primary pipeline.

/// Negative keywords, weight −2 each.
pub(crate) const NEGATIVE_KEYWORDS: &[&str] = &[
    "denuncia",
    "demanda",
    "fraude",
    "bancarrota",
    "insolvencia",
    "hackeo",
    "ataque",
    "brecha",
    "cae",
    "baja",
    "recorte",
    "sanción",
    "multa",
    "accidente",
    "explosión",
    "derrame",
    "despidos",
    "downgrade",
    "investigación",
];

/// Positive keywords, weight +1 each.
pub(crate) const POSITIVE_KEYWORDS: &[&str] = &[
    "sube",
    "alza",
    "récord",
    "record",
    "mejora",
    "aumenta",
    "aprobación",
    "adquisición",
    "fusión",
    "upgrade",
];

const NEGATIVE_WEIGHT: i32 = -2;
const POSITIVE_WEIGHT: i32 = 1;
const KEYWORD_SCALE: f64 = 5.0;

/// Score a headline by keyword membership.
///
/// Each negative keyword contained in the lower-cased headline counts −2, each
/// positive one +1; the sum is divided by 5 and clamped to `[-1.0, 1.0]`.
/// Returns `0.0` for empty text or when nothing matches.
#[must_use]
pub fn keyword_score(headline: &str) -> f64 {
    let lowered = headline.to_lowercase();
    let negatives = NEGATIVE_KEYWORDS
        .iter()
        .filter(|w| lowered.contains(*w))
        .count();
    let positives = POSITIVE_KEYWORDS
        .iter()
        .filter(|w| lowered.contains(*w))
        .count();
    let raw = NEGATIVE_WEIGHT * i32::try_from(negatives).unwrap_or(i32::MAX / 2)
        + POSITIVE_WEIGHT * i32::try_from(positives).unwrap_or(i32::MAX / 2);
    (f64::from(raw) / KEYWORD_SCALE).clamp(-1.0, 1.0)
}

/// Finance word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("beat", 0.4),
    ("beats", 0.4),
    ("surge", 0.5),
    ("surges", 0.5),
    ("soar", 0.5),
    ("soars", 0.5),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("gain", 0.3),
    ("gains", 0.3),
    ("growth", 0.3),
    ("record", 0.4),
    ("profit", 0.3),
    ("upgrade", 0.5),
    ("upgraded", 0.5),
    ("outperform", 0.4),
    ("strong", 0.3),
    ("bullish", 0.5),
    ("raises", 0.3),
    ("approval", 0.4),
    ("approved", 0.4),
    ("dividend", 0.2),
    ("buyback", 0.3),
    // Negative signals
    ("miss", -0.4),
    ("misses", -0.4),
    ("plunge", -0.6),
    ("plunges", -0.6),
    ("slump", -0.5),
    ("drop", -0.3),
    ("drops", -0.3),
    ("fall", -0.3),
    ("falls", -0.3),
    ("loss", -0.4),
    ("losses", -0.4),
    ("downgrade", -0.5),
    ("downgraded", -0.5),
    ("lawsuit", -0.5),
    ("probe", -0.4),
    ("investigation", -0.4),
    ("fraud", -0.7),
    ("bankruptcy", -0.8),
    ("layoffs", -0.4),
    ("recall", -0.5),
    ("bearish", -0.5),
    ("weak", -0.3),
    ("warning", -0.4),
    ("cuts", -0.3),
];

/// Score a text string using the finance lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps
/// the result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f64 {
    lexicon_match(text).unwrap_or(0.0)
}

/// Like [`lexicon_score`], but `None` when no lexicon word occurs in `text`.
#[must_use]
pub fn lexicon_match(text: &str) -> Option<f64> {
    let mut score = 0.0_f64;
    let mut hits = 0_usize;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if let Some(&(_, weight)) = LEXICON.iter().find(|(lex_word, _)| *lex_word == w) {
            score += weight;
            hits += 1;
        }
    }
    (hits > 0).then(|| score.clamp(-1.0, 1.0))
}
