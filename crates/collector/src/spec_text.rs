//! Loose classifier for embedded Vega specs.
//!
//! Specs are HJSON-like text (unquoted keys, missing commas, comments), so
//! nothing here parses them. Comments are blanked first; classification is
//! then the `$schema` value plus a `type: map` key directly inside
//! `config.<host>`, located by brace depth.

use crate::config::DEFAULT_MAP_CONFIG_KEY;
use crate::error::{CollectorError, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static SCHEMA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:"\$schema"|'\$schema'|\$schema)\s*:\s*(?:"([^"]*)"|'([^']*)'|([^\s,"'{}\[\]]+))"#,
    )
    .expect("schema pattern is valid")
});

static CONFIG_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["']?\bconfig["']?\s*:\s*\{"#).expect("config pattern is valid")
});

static MAP_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["']?\btype["']?\s*:\s*["']?map\b"#).expect("map type pattern is valid")
});

static DEFAULT_HOST_KEY: Lazy<Regex> = Lazy::new(|| {
    build_host_key(&[DEFAULT_MAP_CONFIG_KEY.to_string()]).expect("default host key is valid")
});

/// Grammar a spec declares through its `$schema` URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VegaLibrary {
    Vega,
    VegaLite,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecKind {
    pub library: Option<VegaLibrary>,
    pub uses_map: bool,
}

/// Compiled host config keys (`config.<host>.type == map`).
#[derive(Debug, Clone)]
pub struct SpecMarkers {
    host_key: Regex,
}

impl SpecMarkers {
    pub fn new(map_config_keys: &[String]) -> Result<Self> {
        Ok(Self {
            host_key: build_host_key(map_config_keys)?,
        })
    }

    pub fn uses_map(&self, spec: &str) -> bool {
        self.uses_map_live(&strip_comments(spec))
    }

    pub fn classify(&self, spec: &str) -> SpecKind {
        classify(spec, self)
    }

    /// `text` must already be free of comments.
    fn uses_map_live(&self, text: &str) -> bool {
        CONFIG_KEY_RE
            .find_iter(text)
            .filter(|m| key_depth(text, m).is_some_and(|depth| depth <= 1))
            .any(|config| {
                let config_body = block_body(text, config.end() - 1);
                self.host_key
                    .find_iter(config_body)
                    .filter(|m| key_depth(config_body, m) == Some(0))
                    .any(|host| {
                        let host_body = block_body(config_body, host.end() - 1);
                        MAP_TYPE_RE
                            .find_iter(host_body)
                            .any(|m| key_depth(host_body, &m) == Some(0))
                    })
            })
    }
}

impl Default for SpecMarkers {
    fn default() -> Self {
        Self {
            host_key: DEFAULT_HOST_KEY.clone(),
        }
    }
}

/// Blank out `//`, `#` and `/* */` comments that sit outside quoted strings.
///
/// A bare (quoteless) value is copied up to the next whitespace or `,}]`, so
/// `$schema: https://vega.github.io/...` keeps its `//`.
pub fn strip_comments(spec: &str) -> String {
    let mut out = String::with_capacity(spec.len());
    let mut chars = spec.chars().peekable();
    let mut after_colon = false;

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                out.push(c);
                let mut escaped = false;
                for inner in chars.by_ref() {
                    out.push(inner);
                    if escaped {
                        escaped = false;
                    } else if inner == '\\' {
                        escaped = true;
                    } else if inner == c {
                        break;
                    }
                }
                after_colon = false;
            }
            '#' => skip_line(&mut chars),
            '/' if chars.peek() == Some(&'/') => skip_line(&mut chars),
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
                out.push(' ');
            }
            ':' => {
                out.push(c);
                after_colon = true;
            }
            c if c.is_whitespace() => out.push(c),
            c if after_colon && !matches!(c, '{' | '[' | ',' | '}' | ']') => {
                out.push(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || matches!(next, ',' | '}' | ']') {
                        break;
                    }
                    out.push(next);
                    chars.next();
                }
                after_colon = false;
            }
            c => {
                out.push(c);
                after_colon = false;
            }
        }
    }
    out
}

fn skip_line(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while let Some(&next) = chars.peek() {
        if next == '\n' {
            break;
        }
        chars.next();
    }
}

/// Brace depth at byte offset `pos`, or `None` when `pos` is inside a quoted
/// string.
fn depth_at(text: &str, pos: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in text[..pos].chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    quote.is_none().then_some(depth)
}

/// Depth of a `key: value` match, measured at its colon so that a match
/// opening on a string's quote is still seen as inside that string.
fn key_depth(text: &str, m: &regex::Match<'_>) -> Option<usize> {
    let colon = m.as_str().find(':')?;
    depth_at(text, m.start() + colon)
}

/// Text between the `{` at `open` and its matching `}`; runs to the end when
/// the block is unterminated.
fn block_body(text: &str, open: usize) -> &str {
    let start = open + 1;
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (offset, c) in text[start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return &text[start..start + offset];
                }
            }
            _ => {}
        }
    }
    &text[start..]
}

/// Value of the first live `$schema` key in the spec text.
pub fn schema_uri(spec: &str) -> Option<String> {
    schema_uri_live(&strip_comments(spec))
}

fn schema_uri_live(text: &str) -> Option<String> {
    SCHEMA_RE
        .captures_iter(text)
        .filter(|captures| {
            captures
                .get(0)
                .is_some_and(|m| key_depth(text, &m).is_some())
        })
        .find_map(|captures| (1..=3).find_map(|group| captures.get(group)))
        .map(|m| m.as_str().to_string())
}

pub fn classify(spec: &str, markers: &SpecMarkers) -> SpecKind {
    let text = strip_comments(spec);
    let library = schema_uri_live(&text).and_then(|uri| {
        if uri.contains("vega-lite") {
            Some(VegaLibrary::VegaLite)
        } else if uri.contains("vega") {
            Some(VegaLibrary::Vega)
        } else {
            None
        }
    });

    SpecKind {
        library,
        uses_map: markers.uses_map_live(&text),
    }
}

fn build_host_key(keys: &[String]) -> Result<Regex> {
    let mut alternatives = Vec::with_capacity(keys.len());
    for key in keys {
        let key = key.trim();
        if key.is_empty() {
            return Err(CollectorError::InvalidMarker {
                key: key.to_string(),
                reason: "empty key".to_string(),
            });
        }
        let boundary = if key.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
            r"\b"
        } else {
            ""
        };
        alternatives.push(format!("{boundary}{}", regex::escape(key)));
    }
    if alternatives.is_empty() {
        return Err(CollectorError::InvalidMarker {
            key: String::new(),
            reason: "no map config keys configured".to_string(),
        });
    }

    let pattern = [
        r#"["']?(?:"#,
        &alternatives.join("|"),
        r#")["']?\s*:\s*\{"#,
    ]
    .concat();

    RegexBuilder::new(&pattern)
        .build()
        .map_err(|err| CollectorError::InvalidMarker {
            key: keys.join(","),
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(spec: &str) -> SpecKind {
        classify(spec, &SpecMarkers::default())
    }

    #[test]
    fn vega_lite_schema_is_lite() {
        let spec = r#"{"$schema": "https://vega.github.io/schema/vega-lite/v4.json" }"#;
        assert_eq!(kind(spec).library, Some(VegaLibrary::VegaLite));
        assert!(!kind(spec).uses_map);
    }

    #[test]
    fn vega_schema_is_vega() {
        let spec = r#"{"$schema": "https://vega.github.io/schema/vega/v5.json" }"#;
        assert_eq!(kind(spec).library, Some(VegaLibrary::Vega));
    }

    #[test]
    fn map_block_without_comma_is_detected() {
        let spec = "{\"$schema\": \"https://vega.github.io/schema/vega/v3.json\" \n \"config\": { \"kibana\" : { \"type\": \"map\" }} }";
        let kind = kind(spec);
        assert_eq!(kind.library, Some(VegaLibrary::Vega));
        assert!(kind.uses_map);
    }

    #[test]
    fn hjson_style_spec_is_classified() {
        let spec = r#"{
          // tooltip-heavy map
          $schema: https://vega.github.io/schema/vega-lite/v4.json
          config: {
            kibana: { type: map, latitude: 25 }
          }
        }"#;
        assert_eq!(
            schema_uri(spec).as_deref(),
            Some("https://vega.github.io/schema/vega-lite/v4.json")
        );
        let kind = kind(spec);
        assert_eq!(kind.library, Some(VegaLibrary::VegaLite));
        assert!(kind.uses_map);
    }

    #[test]
    fn missing_schema_has_no_library() {
        let kind = kind(r#"{ "data": { "values": [] } }"#);
        assert_eq!(kind, SpecKind::default());
    }

    #[test]
    fn unrelated_schema_has_no_library() {
        let spec = r#"{"$schema": "https://json-schema.org/draft/2020-12/schema"}"#;
        assert_eq!(kind(spec).library, None);
    }

    #[test]
    fn non_map_kibana_config_is_not_map() {
        let spec = r#"{"$schema": "https://vega.github.io/schema/vega/v5.json", "config": {"kibana": {"hideWarnings": true, "type": "mapbox_tiles"}}}"#;
        assert!(!kind(spec).uses_map);
    }

    #[test]
    fn map_type_outside_host_block_is_not_map() {
        let spec = r#"{"$schema": "https://vega.github.io/schema/vega/v5.json", "marks": [{"type": "map"}]}"#;
        assert!(!kind(spec).uses_map);
    }

    #[test]
    fn nested_objects_before_type_do_not_hide_the_map() {
        let spec = r#"{"config": {"kibana": {"controls": {"zoom": true}, "type": "map"}}}"#;
        assert!(kind(spec).uses_map);

        let spec = r#"{"config": {"axis": {"grid": false}, "kibana": {"type": "map"}}}"#;
        assert!(kind(spec).uses_map);
    }

    #[test]
    fn type_inside_a_nested_host_object_is_not_map() {
        let spec = r#"{"config": {"kibana": {"layer": {"type": "map"}, "type": "vega"}}}"#;
        assert!(!kind(spec).uses_map);
    }

    #[test]
    fn host_block_outside_config_is_not_map() {
        let spec = r#"{"$schema": "https://vega.github.io/schema/vega/v5.json", "kibana": {"type": "map"}}"#;
        assert!(!kind(spec).uses_map);

        let spec = r#"{"data": {"config": {"kibana": {"type": "map"}}}}"#;
        assert!(!kind(spec).uses_map);
    }

    #[test]
    fn quoted_text_is_not_a_map_block() {
        let spec = r#"{"description": "config: { kibana: { type: map } }"}"#;
        assert!(!kind(spec).uses_map);
    }

    #[test]
    fn commented_schema_is_ignored() {
        let spec = "{ // $schema: https://vega.github.io/schema/vega/v5.json\n \"$schema\": \"https://vega.github.io/schema/vega-lite/v5.json\" }";
        assert_eq!(kind(spec).library, Some(VegaLibrary::VegaLite));

        let spec = "{ /* \"$schema\": \"https://vega.github.io/schema/vega-lite/v5.json\" */ $schema: https://vega.github.io/schema/vega/v5.json }";
        assert_eq!(kind(spec).library, Some(VegaLibrary::Vega));

        let spec = "{\n  # $schema: https://vega.github.io/schema/vega-lite/v5.json\n}";
        assert_eq!(kind(spec).library, None);
    }

    #[test]
    fn commented_map_block_is_ignored() {
        let spec = "{\n  // config: { kibana: { type: map } }\n  $schema: https://vega.github.io/schema/vega/v5.json\n}";
        let kind = kind(spec);
        assert_eq!(kind.library, Some(VegaLibrary::Vega));
        assert!(!kind.uses_map);

        let spec = r#"{"config": {"kibana": {/* type: map */ "type": "vega"}}}"#;
        assert!(!self::kind(spec).uses_map);
    }

    #[test]
    fn comment_markers_inside_strings_survive() {
        let stripped = strip_comments(r#"{"url": "https://x.test/#a", "b": 1 // gone"#);
        assert!(stripped.contains("https://x.test/#a"));
        assert!(!stripped.contains("gone"));
    }

    #[test]
    fn custom_host_keys_are_honoured() {
        let markers = SpecMarkers::new(&["opensearchDashboards".to_string()]).unwrap();
        let spec = r#"{"config": {"opensearchDashboards": {"type": "map"}}}"#;
        assert!(markers.uses_map(spec));
        assert!(!markers.uses_map(r#"{"config": {"kibana": {"type": "map"}}}"#));
    }

    #[test]
    fn empty_host_key_is_rejected() {
        let err = SpecMarkers::new(&["  ".to_string()]).unwrap_err();
        assert!(matches!(err, CollectorError::InvalidMarker { .. }));
        assert!(SpecMarkers::new(&[]).is_err());
    }

    #[test]
    fn classification_is_deterministic() {
        for (uri, expected) in [
            ("https://vega.github.io/schema/vega/v5.json", Some(VegaLibrary::Vega)),
            ("https://vega.github.io/schema/vega-lite/v5.json", Some(VegaLibrary::VegaLite)),
            ("https://example.com/other.json", None),
        ] {
            let spec = format!(r#"{{"$schema": "{uri}"}}"#);
            assert_eq!(kind(&spec).library, expected);
            assert_eq!(kind(&spec), kind(&spec));
        }
    }
}
