use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    // Archaic "'tis"/"'twas", then word runs joined by internal apostrophes, hyphens or
    // periods; any other non-space character stands alone.
    static ref WORD: Regex = Regex::new(r"(?u)'t(?:is|was)\b|\w+(?:['\-.]\w+)*|\S").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "i","me","my","myself","we","our","ours","ourselves",
            "you","you're","you've","you'll","you'd","your","yours","yourself","yourselves",
            "he","him","his","himself","she","she's","her","hers","herself",
            "it","it's","its","itself","they","them","their","theirs","themselves",
            "what","which","who","whom","this","that","that'll","these","those",
            "am","is","are","was","were","be","been","being","have","has","had","having","do","does","did","doing",
            "a","an","the","and","but","if","or","because","as","until","while",
            "of","at","by","for","with","about","against","between","into","through","during","before","after",
            "above","below","to","from","up","down","in","out","on","off","over","under",
            "again","further","then","once","here","there","when","where","why","how",
            "all","any","both","each","few","more","most","other","some","such",
            "no","nor","not","only","own","same","so","than","too","very",
            "s","t","can","will","just","don","don't","should","should've","now",
            "d","ll","m","o","re","ve","y","ain","aren","aren't","couldn","couldn't",
            "didn","didn't","doesn","doesn't","hadn","hadn't","hasn","hasn't","haven","haven't",
            "isn","isn't","ma","mightn","mightn't","mustn","mustn't","needn","needn't",
            "shan","shan't","shouldn","shouldn't","wasn","wasn't","weren","weren't",
            "won","won't","wouldn","wouldn't"
        ];
        words.iter().copied().collect()
    };
}

/// Clitics split off the end of a word, kept with their apostrophe ("rome's" -> "rome", "'s").
const CLITICS: &[&str] = &["s", "m", "d", "ll", "re", "ve"];

/// Fused forms split at a fixed byte offset ("cannot" -> "can", "not").
const FUSED: &[(&str, usize)] = &[
    ("cannot", 3),
    ("d'ye", 1),
    ("gimme", 3),
    ("gonna", 3),
    ("gotta", 3),
    ("lemme", 3),
    ("more'n", 4),
    ("wanna", 3),
    ("'tis", 2),
    ("'twas", 2),
];

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// True for tokens that are exactly one ASCII punctuation character.
pub fn is_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_punctuation())
}

/// Split a lower-cased text into word-level tokens.
///
/// Negations and clitics become their own tokens the way treebank-style tokenizers
/// emit them: "don't" -> "do", "n't", "it's" -> "it", "'s" and "cannot" -> "can", "not".
/// Punctuation marks are kept as separate single-character tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for mat in WORD.find_iter(text) {
        let word = mat.as_str();
        if let Some(&(_, split)) = FUSED.iter().find(|(fused, _)| *fused == word) {
            tokens.push(&word[..split]);
            tokens.push(&word[split..]);
            continue;
        }
        if word.len() > 3 && word.ends_with("n't") {
            let split = word.len() - 3;
            tokens.push(&word[..split]);
            tokens.push(&word[split..]);
            continue;
        }
        match word.rfind('\'') {
            Some(idx) if idx > 0 && CLITICS.contains(&&word[idx + 1..]) => {
                tokens.push(&word[..idx]);
                tokens.push(&word[idx..]);
            }
            _ => tokens.push(word),
        }
    }
    tokens
}

/// Lower-case, tokenize, then drop punctuation and English stopwords.
///
/// Token order is preserved and duplicates are kept. An empty result is a valid
/// outcome for text made only of stopwords and punctuation.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    tokenize(&lowered)
        .into_iter()
        .filter(|token| !is_punctuation(token) && !is_stopword(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_contractions() {
        assert_eq!(tokenize("don't"), vec!["do", "n't"]);
        assert_eq!(tokenize("rome's fall"), vec!["rome", "'s", "fall"]);
        assert_eq!(tokenize("o'clock"), vec!["o'clock"]);
    }

    #[test]
    fn splits_fused_forms() {
        assert_eq!(tokenize("cannot"), vec!["can", "not"]);
        assert_eq!(tokenize("gonna wanna gotta"), vec!["gon", "na", "wan", "na", "got", "ta"]);
        assert_eq!(tokenize("'tis so, 'twas"), vec!["'t", "is", "so", ",", "'t", "was"]);
        assert_eq!(tokenize("d'ye"), vec!["d", "'ye"]);
    }

    #[test]
    fn underscores_stay_inside_words() {
        assert_eq!(tokenize("snake_case naming"), vec!["snake_case", "naming"]);
    }

    #[test]
    fn keeps_hyphenated_words_whole() {
        assert_eq!(tokenize("widely-used, 27 bc."), vec!["widely-used", ",", "27", "bc", "."]);
    }

    #[test]
    fn punctuation_is_single_ascii_char() {
        assert!(is_punctuation(","));
        assert!(!is_punctuation("..."));
        assert!(!is_punctuation("—"));
        assert!(!is_punctuation("a"));
    }
}
