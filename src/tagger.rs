//! Entity taggers: text → labelled place-name spans.
//!
//! The tagger is an external NLP collaborator. [`HttpTagger`] talks to a
//! GiNZA/spaCy style service; [`LexiconTagger`] is an offline stand-in built
//! on prefecture and major city names plus municipality suffixes.

use crate::location::resolver::{is_ambiguous_name, AMBIGUOUS_NAMES, CITY_SUFFIXES, TOWN_SUFFIXES};
use crate::location::TaggedSpan;
use std::time::Duration;

pub trait EntityTagger: Send + Sync {
    /// Tag `text`. A tagger that cannot answer returns no spans.
    fn tag(&self, text: &str) -> Vec<TaggedSpan>;
}

#[derive(Debug, thiserror::Error)]
pub enum TaggerError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid tagger response: {0}")]
    InvalidResponse(String),
}

// ─── HTTP tagger ────────────────────────────────────────────────

/// Client for an NER service that accepts `{"text": ...}` and answers with
/// `[{"text": ..., "label": ...}, ...]`.
pub struct HttpTagger {
    agent: ureq::Agent,
    url: String,
}

impl HttpTagger {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            url: url.into(),
        }
    }

    pub fn try_tag(&self, text: &str) -> Result<Vec<TaggedSpan>, TaggerError> {
        let response = self
            .agent
            .post(&self.url)
            .send_json(serde_json::json!({ "text": text }))
            .map_err(|e| TaggerError::Network(e.to_string()))?;

        let body = response
            .into_string()
            .map_err(|e| TaggerError::InvalidResponse(e.to_string()))?;
        parse_entities(&body)
    }
}

impl EntityTagger for HttpTagger {
    fn tag(&self, text: &str) -> Vec<TaggedSpan> {
        match self.try_tag(text) {
            Ok(spans) => spans,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "tagger unavailable, treating text as untagged");
                Vec::new()
            }
        }
    }
}

pub fn parse_entities(body: &str) -> Result<Vec<TaggedSpan>, TaggerError> {
    serde_json::from_str(body).map_err(|e| TaggerError::InvalidResponse(e.to_string()))
}

// ─── Lexicon tagger ─────────────────────────────────────────────

const PREFECTURES: &[&str] = &[
    "北海道", "青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県",
    "茨城県", "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県",
    "新潟県", "富山県", "石川県", "福井県", "山梨県", "長野県", "岐阜県",
    "静岡県", "愛知県", "三重県", "滋賀県", "京都府", "大阪府", "兵庫県",
    "奈良県", "和歌山県", "鳥取県", "島根県", "岡山県", "広島県", "山口県",
    "徳島県", "香川県", "愛媛県", "高知県", "福岡県", "佐賀県", "長崎県",
    "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
];

const DESIGNATED_CITIES: &[&str] = &[
    "札幌市", "仙台市", "さいたま市", "千葉市", "横浜市", "川崎市", "相模原市",
    "新潟市", "静岡市", "浜松市", "名古屋市", "京都市", "大阪市", "堺市",
    "神戸市", "岡山市", "広島市", "北九州市", "福岡市", "熊本市",
];

/// Dictionary tagger over prefecture names, designated cities and the
/// ambiguous bare prefecture names. Emits `GPE` spans in text order,
/// preferring the longest entry at each position.
///
/// A bare ambiguous name glued to further kanji (長崎市, 宮崎駿) is not
/// reported as such. Kanji runs not covered by the dictionary are reported
/// up to their first 市/区/町/村 when at least two characters precede it,
/// so 旭川市 or 渋谷区 reach the resolver as municipalities.
pub struct LexiconTagger {
    entries: Vec<&'static str>,
}

impl LexiconTagger {
    pub fn new() -> Self {
        let mut entries: Vec<&'static str> = PREFECTURES
            .iter()
            .chain(DESIGNATED_CITIES)
            .chain(AMBIGUOUS_NAMES)
            .copied()
            .collect();
        // Longest first so "長崎県" beats "長崎" at the same position.
        entries.sort_by_key(|e| std::cmp::Reverse(e.chars().count()));
        Self { entries }
    }

    fn dictionary_match(&self, rest: &str) -> Option<&'static str> {
        let name = *self.entries.iter().find(|e| rest.starts_with(**e))?;
        let glued = rest[name.len()..].chars().next().is_some_and(is_kanji);
        if glued && is_ambiguous_name(name) {
            return None;
        }
        Some(name)
    }
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::new()
    }
}

fn is_kanji(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '々' | 'ヶ' | 'ケ')
}

/// Byte length of a municipality name at the start of `rest`, if any.
fn municipality_len(rest: &str) -> Option<usize> {
    rest.char_indices()
        .take_while(|(_, c)| is_kanji(*c))
        .enumerate()
        .find(|(n, (_, c))| *n >= 2 && (CITY_SUFFIXES.contains(c) || TOWN_SUFFIXES.contains(c)))
        .map(|(_, (idx, c))| idx + c.len_utf8())
}

impl EntityTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Vec<TaggedSpan> {
        let mut spans = Vec::new();
        let mut i = 0;
        while i < text.len() {
            let rest = &text[i..];
            if let Some(name) = self.dictionary_match(rest) {
                spans.push(TaggedSpan::new(name, "GPE"));
                i += name.len();
            } else if let Some(len) = municipality_len(rest) {
                spans.push(TaggedSpan::new(&rest[..len], "GPE"));
                i += len;
            } else {
                i += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationResolver;

    fn texts(spans: &[TaggedSpan]) -> Vec<&str> {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_lexicon_finds_prefecture_and_city() {
        let spans = LexiconTagger::new().tag("北海道札幌市で雪まつり");
        assert_eq!(texts(&spans), vec!["北海道", "札幌市"]);
        assert!(spans.iter().all(|s| s.label == "GPE"));
    }

    #[test]
    fn test_lexicon_longest_match() {
        let spans = LexiconTagger::new().tag("広島県と広島市、そして広島");
        assert_eq!(texts(&spans), vec!["広島県", "広島市", "広島"]);
    }

    #[test]
    fn test_lexicon_no_overlap_inside_tokyo() {
        // "京都" inside "東京都" must not be reported separately.
        let spans = LexiconTagger::new().tag("東京都で会見");
        assert_eq!(texts(&spans), vec!["東京都"]);
    }

    #[test]
    fn test_lexicon_suffixed_ambiguous_name_is_a_city() {
        let spans = LexiconTagger::new().tag("長崎市で式典");
        assert_eq!(texts(&spans), vec!["長崎市"]);

        let places = LocationResolver::new().resolve(&spans);
        assert_eq!(places.city.as_deref(), Some("長崎市"));
        assert!(places.prefecture.is_none());
    }

    #[test]
    fn test_lexicon_skips_name_inside_personal_name() {
        assert!(LexiconTagger::new().tag("宮崎駿監督の新作").is_empty());
    }

    #[test]
    fn test_lexicon_bare_ambiguous_name_before_kana() {
        let spans = LexiconTagger::new().tag("熊本で地震");
        assert_eq!(texts(&spans), vec!["熊本"]);
        let places = LocationResolver::new().resolve(&spans);
        assert_eq!(places.prefecture.as_deref(), Some("熊本県"));
    }

    #[test]
    fn test_lexicon_municipality_outside_dictionary() {
        let spans = LexiconTagger::new().tag("北海道旭川市で");
        assert_eq!(texts(&spans), vec!["北海道", "旭川市"]);

        let spans = LexiconTagger::new().tag("東京都渋谷区の交差点");
        assert_eq!(texts(&spans), vec!["東京都", "渋谷区"]);
        let places = LocationResolver::new().resolve(&spans);
        assert_eq!(places.prefecture.as_deref(), Some("東京都"));
        assert_eq!(places.city.as_deref(), Some("渋谷区"));
    }

    #[test]
    fn test_lexicon_municipality_cut_at_first_suffix() {
        assert_eq!(texts(&LexiconTagger::new().tag("旭川市長が会見")), vec!["旭川市"]);
        assert_eq!(texts(&LexiconTagger::new().tag("神奈川県茅ヶ崎市")), vec!["神奈川県", "茅ヶ崎市"]);
        assert_eq!(texts(&LexiconTagger::new().tag("長野県軽井沢町")), vec!["長野県", "軽井沢町"]);
    }

    #[test]
    fn test_lexicon_short_suffix_words_ignored() {
        assert!(LexiconTagger::new().tag("都市部の地区で").is_empty());
    }

    #[test]
    fn test_lexicon_empty_text() {
        assert!(LexiconTagger::new().tag("").is_empty());
        assert!(LexiconTagger::new().tag("首相が会見").is_empty());
    }

    #[test]
    fn test_lexicon_has_all_prefectures() {
        assert_eq!(PREFECTURES.len(), 47);
    }

    #[test]
    fn test_parse_entities() {
        let body = r#"[{"text":"札幌市","label":"City"},{"text":"岸田","label":"Person"}]"#;
        let spans = parse_entities(body).unwrap();
        assert_eq!(spans, vec![TaggedSpan::new("札幌市", "City"), TaggedSpan::new("岸田", "Person")]);
    }

    #[test]
    fn test_parse_entities_invalid() {
        assert!(matches!(parse_entities("{}"), Err(TaggerError::InvalidResponse(_))));
    }

    #[test]
    fn test_http_tagger_unreachable_yields_nothing() {
        let tagger = HttpTagger::new("http://127.0.0.1:9/ents", Duration::from_millis(200));
        assert!(tagger.tag("札幌市で雪まつり").is_empty());
    }
}
