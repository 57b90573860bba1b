//! Built-in, domain-independent pattern sources
//!
//! Noise patterns are matched against the trimmed sentence and are anchored
//! to the whole line unless they describe a marker that can appear anywhere
//! (copyright, ISBN).

pub(super) const NOISE_STRUCTURAL: &[(&str, &str)] = &[
    ("pure_number", r"^\d+$"),
    ("roman_numeral", r"(?i)^[ivxlcdm]+\.?$"),
    ("page_header", r"(?i)^page\s+\d+(\s+of\s+\d+)?\s*$"),
    (
        "chapter_header",
        r"(?i)^chapter\s+(\d+|[ivxlcdm]+)\s*[:.]?(\s+[^.!?]{0,60})?$",
    ),
    ("section_header", r"(?i)^section\s+\d+(\.\d+)*\s*[:.]?\s*$"),
    ("section_number", r"^\d+(\.\d+)+\.?\s*$"),
    (
        "numbered_heading",
        r"^\d+(\.\d+)+\s+[A-Za-z][A-Za-z0-9 ,&/()\-]{0,60}$",
    ),
    (
        "toc_marker",
        r"(?i)^(table of contents|contents|list of (figures|tables|abbreviations)|foreword|preface|appendix( [a-z0-9]+)?|bibliography|references|index|acknowledg(e)?ments|glossary)\s*(:.*|\d*)$",
    ),
    ("toc_entry", r"[.·]{3,}\s*\d+\s*$"),
    ("separator_line", r"^[.\-_=*~#•·\s]{3,}$"),
    ("caps_heading", r"^[A-Z][A-Z0-9 :&,/()\-]{2,79}$"),
    ("decorated_banner", r"^[#@*=~+]{2,}.*[#@*=~+]{2,}$"),
    ("copyright", r"(?i)(^©|^\(c\)\s*\d{4}|^copyright\b|all rights reserved\.?$)"),
    ("isbn", r"(?i)\bisbn(-1[03])?:?\s*[\dx\- ]{10,}"),
    ("url_line", r"(?i)^\S*(https?://|www\.)\S*$"),
    ("table_border", r"^[+|][\-=+|:\s]{2,}$"),
    ("caption", r"(?i)^(figure|fig\.|table|chart)\s+\d+(\.\d+)*\s*[:.]"),
];

pub(super) const NOISE_FORMATTING: &[(&str, &str)] = &[
    ("bullet_glyph", r"^[•◦▪▫■□●○◆◇►▶➢➤→⇒✓✔✗✘☐☑☒\-*+\s]+$"),
    ("list_marker", r"(?i)^[•\-*]?\s*(\d{1,3}|[a-z]|[ivxlcdm]{1,5})[.)]$"),
    ("parenthesized_marker", r"(?i)^\((\d{1,3}|[a-z]|[ivxlcdm]{1,5})\)$"),
];

pub(super) const HEADER_FOOTER_KEYWORDS: &str =
    r"(?i)\b(page|chapter|copyright|confidential|draft)\b|\b(date|author):";

pub(super) const DATE_PATTERNS: &[&str] = &[
    r"\b\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}\b",
    r"\b\d{4}-\d{2}-\d{2}\b",
    concat!(
        r"(?i)\b(jan(uary)?|feb(ruary)?|mar(ch)?|apr(il)?|may|june?|july?|aug(ust)?|sep(t(ember)?)?|oct(ober)?|nov(ember)?|dec(ember)?)",
        r"\.?\s+\d{1,2}(st|nd|rd|th)?,?\s+\d{4}\b"
    ),
    concat!(
        r"(?i)\b\d{1,2}(st|nd|rd|th)?\s+",
        r"(jan(uary)?|feb(ruary)?|mar(ch)?|apr(il)?|may|june?|july?|aug(ust)?|sep(t(ember)?)?|oct(ober)?|nov(ember)?|dec(ember)?)",
        r",?\s+\d{4}\b"
    ),
];

pub(super) const PRONOUNS: &[&str] = &["i", "you", "he", "she", "it", "we", "they"];

pub(super) const DETERMINER_PHRASE: &str =
    r"(?i)\b(the|a|an|this|that|these|those|my|your|his|her|their|our|its)\s+\w+";

pub(super) const BEING_VERBS: &[&str] = &["is", "are", "was", "were", "am", "be", "being", "been"];

pub(super) const AUXILIARY_VERBS: &[&str] = &[
    "have", "has", "had", "will", "would", "can", "could", "should", "may", "might", "must",
    "shall", "do", "does", "did",
];

/// General action verbs; the registry appends regular inflections
pub(super) const COMMON_VERBS: &[&str] = &[
    "take", "took", "taken", "give", "gave", "given", "perform", "conduct", "analyze", "show",
    "shown", "showed", "improve", "reduce", "cause", "require", "include", "occur", "develop",
    "present", "help", "prevent", "increase", "decrease", "need", "receive", "contain", "affect",
    "become", "became", "remain", "appear", "seem", "lead", "led", "make", "made", "use",
    "provide", "suggest", "indicate", "report", "find", "found", "result", "lower", "raise",
    "protect", "support", "keep", "kept", "get", "got", "go", "went", "gone", "come", "came",
    "feel", "felt", "see", "saw", "seen", "know", "knew", "known", "experience", "suffer",
    "recover", "undergo", "underwent", "begin", "began", "start", "stop", "continue", "follow",
    "apply", "avoid", "limit", "consider", "recommend", "advise", "measure", "check", "work",
    "call", "ask", "tell", "told", "say", "said",
];

pub(super) const REGULAR_PAST_TENSE: &str = r"(?i)\b[a-z]{3,}ed\b";

pub(super) const OBJECT: &[(&str, &str)] = &[
    ("article_phrase", r"(?i)\b(the|a|an)\s+\w+(\s+\w+)?\s*[.!?]*$"),
    ("verb_complement", r"(?i)\w+(s|ed|ing)\s+\w+"),
];

pub(super) const ACTIONABLE: &[(&str, &str)] = &[
    (
        "instructions",
        r"(?i)\b(take|administer|apply|follow|continue|stop|start|begin)\b",
    ),
    (
        "recommendations",
        r"(?i)\b(should|recommend\w*|suggest\w*|advise\w*|propose\w*)\b",
    ),
    (
        "procedures",
        r"(?i)\b(procedure|process|method|technique|protocol|guideline)s?\b",
    ),
    (
        "measurements",
        r"(?i)\b\d+(\.\d+)?\s*(mg|ml|cc|units?|times|hours?|days?|weeks?)\b",
    ),
];

/// Per-category weight of the actionability score
pub(super) const ACTIONABLE_WEIGHT: f32 = 0.2;

pub(super) const ILLOGICAL_ORDER: &[(&str, &str)] = &[
    ("determiner_before_copula", r"(?i)\b(the|a|an)\s+(is|are|was|were)\b"),
    ("trailing_conjunction", r"(?i)\b(and|or|but)\s*[.!?]+$"),
    ("leading_conjunction", r"(?i)^(and|or|but)\b"),
];

pub(super) const OBVIOUS_ERRORS: &[(&str, &str)] = &[
    ("repeated_punctuation", r"\.{2,}|\?{2,}|!{2,}"),
    ("double_space", r"\S\s{2,}\S"),
    ("caps_run", r"[A-Z]{3,}"),
];

pub(super) const FACTUAL: &[&str] = &[
    r"\d+",
    r"(?i)\b(is|are|was|were)\s+\w+",
    r"(?i)\b(has|have|had)\s+\w+",
];

pub(super) const PROCEDURAL_TERMS: &[&str] = &[
    "procedure", "process", "method", "technique", "approach", "protocol",
];

pub(super) const INSTRUCTIONAL_TERMS: &[&str] = &[
    "should", "must", "need to", "required", "recommended", "advised",
];

pub(super) const CONJUNCTIONS: &[&str] = &["and", "or", "but"];
