use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;

lazy_static! {
    // Words of two or more word characters; single letters never become terms.
    static ref RE: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","across","after","afterwards","again","against","all","almost","alone","along","already","also","although","always","am","among","amongst","amoungst","amount","an","and","another","any","anyhow","anyone","anything","anyway","anywhere","are","around","as","at",
            "back","be","became","because","become","becomes","becoming","been","before","beforehand","behind","being","below","beside","besides","between","beyond","bill","both","bottom","but","by",
            "call","can","cannot","cant","co","con","could","couldnt","cry",
            "de","describe","detail","do","done","down","due","during",
            "each","eg","eight","either","eleven","else","elsewhere","empty","enough","etc","even","ever","every","everyone","everything","everywhere","except",
            "few","fifteen","fifty","fill","find","fire","first","five","for","former","formerly","forty","found","four","from","front","full","further",
            "get","give","go",
            "had","has","hasnt","have","he","hence","her","here","hereafter","hereby","herein","hereupon","hers","herself","him","himself","his","how","however","hundred",
            "i","ie","if","in","inc","indeed","interest","into","is","it","its","itself",
            "keep","last","latter","latterly","least","less","ltd",
            "made","many","may","me","meanwhile","might","mill","mine","more","moreover","most","mostly","move","much","must","my","myself",
            "name","namely","neither","never","nevertheless","next","nine","no","nobody","none","noone","nor","not","nothing","now","nowhere",
            "of","off","often","on","once","one","only","onto","or","other","others","otherwise","our","ours","ourselves","out","over","own",
            "part","per","perhaps","please","put","rather","re",
            "same","see","seem","seemed","seeming","seems","serious","several","she","should","show","side","since","sincere","six","sixty","so","some","somehow","someone","something","sometime","sometimes","somewhere","still","such","system",
            "take","ten","than","that","the","their","them","themselves","then","thence","there","thereafter","thereby","therefore","therein","thereupon","these","they","thick","thin","third","this","those","though","three","through","throughout","thru","thus","to","together","too","top","toward","towards","twelve","twenty","two",
            "un","under","until","up","upon","us",
            "very","via",
            "was","we","well","were","what","whatever","when","whence","whenever","where","whereafter","whereas","whereby","wherein","whereupon","wherever","whether","which","while","whither","who","whoever","whole","whom","whose","why","will","with","within","without","would",
            "yet","you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// How raw text is turned into index terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Smallest n-gram emitted, in words.
    pub min_ngram: usize,
    /// Largest n-gram emitted, in words.
    pub max_ngram: usize,
    /// Reduce words to their English stem before n-gram assembly.
    pub stem: bool,
    /// Apply NFKC compatibility folding (e.g. `ﬁ` to `fi`, `²` to `2`) before lowercasing.
    pub nfkc: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { min_ngram: 1, max_ngram: 2, stem: false, nfkc: false }
    }
}

/// Tokenize text into (word, position) using lowercase and stopword removal, plus NFKC
/// folding and stemming when the config asks for them.
/// Positions count every word matched, including dropped stopwords.
pub fn tokenize(text: &str, config: &AnalyzerConfig) -> Vec<(String, usize)> {
    let normalized = if config.nfkc {
        text.nfkc().collect::<String>().to_lowercase()
    } else {
        text.to_lowercase()
    };
    let mut tokens = Vec::new();
    for (pos, mat) in RE.find_iter(&normalized).enumerate() {
        let token = mat.as_str();
        if is_stopword(token) { continue; }
        let word = if config.stem { STEMMER.stem(token).to_string() } else { token.to_string() };
        tokens.push((word, pos));
    }
    tokens
}

/// Produce the index terms for `text`: every n-gram between `min_ngram` and `max_ngram`
/// words long, built over the stopword-filtered word sequence. Shorter n-grams come first.
pub fn analyze(text: &str, config: &AnalyzerConfig) -> Vec<String> {
    let words: Vec<String> = tokenize(text, config).into_iter().map(|(w, _)| w).collect();
    let min_n = config.min_ngram.max(1);
    let max_n = config.max_ngram.max(min_n);

    let mut terms = Vec::new();
    for n in min_n..=max_n {
        if n > words.len() { break; }
        if n == 1 {
            terms.extend(words.iter().cloned());
            continue;
        }
        for window in words.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}
