//! Parser for the compact layer string that encodes one or more shapes.
//!
//! Layers are separated by `!`; inside a layer, tokens are separated by `~`
//! (runs of `~` count as one). Each token starts with a short key followed by
//! its value:
//!
//! | key        | value                                   |
//! |------------|-----------------------------------------|
//! | `p0`..`p9` | shape parameter slots                   |
//! | `lp`, `fp` | line and fill opacity in percent        |
//! | `lw`       | line width                              |
//! | `as`       | animation length in seconds             |
//! | `lc`, `fc` | line and fill color (`RRGGBB`)          |
//! | `q0`..`q2` | HTML-escaped caption lines              |
//!
//! Malformed numbers leave the default in place. The first layer is always
//! returned; later layers only when they carry at least one known key.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anim::RenderOptions;
use crate::geom::ShapeParameters;

/// Seed the key length is derived from.
pub const DEFAULT_SEED: &str = "inkei.net";

const FALLBACK_KEY_LENGTH: usize = 2;
const NUMBER_PATTERN: &str = r"^[+-]?\d+(?:\.\d+)?$";
const ENTITY_PATTERN: &str = r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);";

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("layer {index} does not exist ({count} layers)")]
    LayerOutOfRange { index: usize, count: usize },
}

/// One decoded layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub params: ShapeParameters,
    pub line_opacity: f64,
    pub fill_opacity: f64,
    pub line_width: f64,
    pub anim_seconds: f64,
    pub line_color: String,
    pub fill_color: String,
    pub labels: [String; 3],
}

impl Default for LayerSpec {
    fn default() -> Self {
        Self {
            params: ShapeParameters::default(),
            line_opacity: 100.0,
            fill_opacity: 20.0,
            line_width: 2.0,
            anim_seconds: 8.0,
            line_color: "FFFFFF".to_owned(),
            fill_color: "FFFFFF".to_owned(),
            labels: ["-".to_owned(), "-".to_owned(), "-".to_owned()],
        }
    }
}

impl LayerSpec {
    /// `base` with this layer's line style and timing applied.
    #[must_use]
    pub fn render_options(&self, base: RenderOptions) -> RenderOptions {
        RenderOptions {
            line_color: self.line_color.clone(),
            line_opacity: self.line_opacity,
            line_width: self.line_width,
            ..base
        }
        .with_duration(self.anim_seconds)
    }
}

/// Length of the key prefix for `seed`: a checksum over its last nine
/// characters, with 2 as the fallback.
#[must_use]
pub fn key_length(seed: &str) -> usize {
    let chars: Vec<char> = seed.chars().collect();
    let tail = &chars[chars.len().saturating_sub(9)..];
    let w = tail.iter().fold(-20_i64, |acc, c| acc + i64::from(u32::from(*c)));
    let length = w.rem_euclid(60) + w.rem_euclid(76) - 84;
    usize::try_from(length)
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(FALLBACK_KEY_LENGTH)
}

/// Parse with the default seed.
pub fn parse_layers(input: &str) -> ParseResult<Vec<LayerSpec>> {
    parse_layers_with_seed(input, DEFAULT_SEED)
}

pub fn parse_layers_with_seed(input: &str, seed: &str) -> ParseResult<Vec<LayerSpec>> {
    let parser = LayerParser::new(key_length(seed))?;
    let mut layers = Vec::new();
    for (index, raw) in input.split('!').enumerate() {
        let (layer, recognised) = parser.parse_layer(raw);
        if index == 0 || recognised {
            layers.push(layer);
        } else {
            log::debug!("dropping layer {index}: no known keys");
        }
    }
    log::debug!("parsed {} layer(s)", layers.len());
    Ok(layers)
}

/// Layer `index` of `input`.
pub fn select_layer(input: &str, index: usize) -> ParseResult<LayerSpec> {
    let mut layers = parse_layers(input)?;
    let count = layers.len();
    if index >= count {
        return Err(ParseError::LayerOutOfRange { index, count });
    }
    Ok(layers.swap_remove(index))
}

/// Replace HTML character references (`&amp;`, `&#39;`, `&#x27;`, ...).
/// Unknown names are left as written.
pub fn decode_html_entities(text: &str) -> ParseResult<String> {
    let entity = Regex::new(ENTITY_PATTERN)?;
    Ok(decode_with(&entity, text))
}

fn decode_with(entity: &Regex, text: &str) -> String {
    entity
        .replace_all(text, |caps: &Captures<'_>| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };
            decoded.map_or_else(|| caps[0].to_owned(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "deg" => '°',
        "phi" => 'φ',
        _ => return None,
    })
}

struct LayerParser {
    key_length: usize,
    number: Regex,
    separators: Regex,
    entity: Regex,
}

impl LayerParser {
    fn new(key_length: usize) -> ParseResult<Self> {
        Ok(Self {
            key_length,
            number: Regex::new(NUMBER_PATTERN)?,
            separators: Regex::new("~+")?,
            entity: Regex::new(ENTITY_PATTERN)?,
        })
    }

    fn number(&self, value: &str, current: f64) -> f64 {
        let value = value.trim();
        if !self.number.is_match(value) {
            if !value.is_empty() {
                log::debug!("ignoring malformed number {value:?}");
            }
            return current;
        }
        value.parse().unwrap_or(current)
    }

    fn color(value: &str, current: &str) -> String {
        let value = value.trim();
        let value = value.strip_prefix('#').unwrap_or(value);
        if value.is_empty() {
            current.to_owned()
        } else {
            value.to_owned()
        }
    }

    fn parse_layer(&self, raw: &str) -> (LayerSpec, bool) {
        let mut layer = LayerSpec::default();
        let mut slots = layer.params.to_slots();
        let mut recognised = false;

        let collapsed = self.separators.replace_all(raw, "~");
        for token in collapsed.split('~').filter(|t| !t.is_empty()) {
            let split = token
                .char_indices()
                .nth(self.key_length)
                .map_or(token.len(), |(i, _)| i);
            let (key, value) = token.split_at(split);

            let known = match key {
                "lp" => {
                    layer.line_opacity = self.number(value, layer.line_opacity);
                    true
                }
                "fp" => {
                    layer.fill_opacity = self.number(value, layer.fill_opacity);
                    true
                }
                "lw" => {
                    layer.line_width = self.number(value, layer.line_width);
                    true
                }
                "as" => {
                    layer.anim_seconds = self.number(value, layer.anim_seconds);
                    true
                }
                "lc" => {
                    layer.line_color = Self::color(value, &layer.line_color);
                    layer.fill_color.clone_from(&layer.line_color);
                    true
                }
                "fc" => {
                    layer.fill_color = Self::color(value, &layer.fill_color);
                    true
                }
                _ => {
                    if let Some(slot) = slot_index(key, 'p', 10) {
                        slots[slot] = self.number(value, slots[slot]);
                        true
                    } else if let Some(line) = slot_index(key, 'q', 3) {
                        layer.labels[line] = decode_with(&self.entity, value);
                        true
                    } else {
                        false
                    }
                }
            };
            recognised |= known;
        }

        layer.params = ShapeParameters::from_slots(slots);
        (layer, recognised)
    }
}

/// `p7` → `Some(7)` for prefix `p` and `count > 7`.
fn slot_index(key: &str, prefix: char, count: usize) -> Option<usize> {
    let mut chars = key.chars();
    if chars.next()? != prefix {
        return None;
    }
    let digit = chars.next()?.to_digit(10)? as usize;
    (chars.next().is_none() && digit < count).then_some(digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "~p0220~p1143~p216~p36~p41~p5119~p675~lcFF3737~q0THE GLITTER APACHE REVOLVER~q1A&#39;s Penis~q2Ability : 30%";

    #[test]
    fn test_key_length_from_default_seed() {
        assert_eq!(key_length(DEFAULT_SEED), 2);
        assert_eq!(key_length("a"), FALLBACK_KEY_LENGTH);
        assert_eq!(key_length(""), 12);
    }

    #[test]
    fn test_parse_sample_layer() {
        let layers = parse_layers(SAMPLE).unwrap();
        assert_eq!(layers.len(), 1);
        let layer = &layers[0];
        let p = layer.params;
        assert_eq!(
            (p.length, p.girth, p.curve, p.base_angle, p.glans_angle),
            (220.0, 143.0, 16.0, 6.0, 1.0)
        );
        assert_eq!((p.shaft_expansion, p.glans_expansion), (119.0, 75.0));
        assert_eq!(layer.line_color, "FF3737");
        assert_eq!(layer.fill_color, "FF3737");
        assert_eq!(layer.labels[0], "THE GLITTER APACHE REVOLVER");
        assert_eq!(layer.labels[1], "A's Penis");
        assert_eq!(layer.labels[2], "Ability : 30%");
        assert_eq!(layer.anim_seconds, 8.0);
    }

    #[test]
    fn test_empty_input_keeps_default_first_layer() {
        let layers = parse_layers("").unwrap();
        assert_eq!(layers, vec![LayerSpec::default()]);
    }

    #[test]
    fn test_later_layers_need_a_known_key() {
        let layers = parse_layers("~p0150!~zz1!~lw3~~~p1120").unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].params.length, 150.0);
        assert_eq!(layers[1].line_width, 3.0);
        assert_eq!(layers[1].params.girth, 120.0);
    }

    #[test]
    fn test_malformed_numbers_keep_defaults() {
        let layers = parse_layers("~p0abc~p11e3~p2-12.5~p3+7~lp.5").unwrap();
        let layer = &layers[0];
        assert_eq!(layer.params.length, 140.0);
        assert_eq!(layer.params.girth, 140.0);
        assert_eq!(layer.params.curve, -12.5);
        assert_eq!(layer.params.base_angle, 7.0);
        assert_eq!(layer.line_opacity, 100.0);
    }

    #[test]
    fn test_color_tokens_strip_hash_and_keep_default_when_empty() {
        let layer = &parse_layers("~lc#FA8072~fc").unwrap()[0];
        assert_eq!(layer.line_color, "FA8072");
        assert_eq!(layer.fill_color, "FA8072");
    }

    #[test]
    fn test_render_options_follow_layer() {
        let layer = &parse_layers("~lcFF8888~lp50~lw4~as4").unwrap()[0];
        let options = layer.render_options(RenderOptions::default());
        assert_eq!(options.line_color, "FF8888");
        assert_eq!(options.line_opacity, 50.0);
        assert_eq!(options.line_width, 4.0);
        assert_eq!(options.frames_per_phase, 25);
    }

    #[test]
    fn test_select_layer_out_of_range() {
        let err = select_layer("~p0150", 3).unwrap_err();
        assert!(matches!(err, ParseError::LayerOutOfRange { index: 3, count: 1 }));
    }

    #[test]
    fn test_decode_html_entities() {
        assert_eq!(decode_html_entities("A&amp;B &lt;3&gt;").unwrap(), "A&B <3>");
        assert_eq!(decode_html_entities("&#x41;&#66;").unwrap(), "AB");
        assert_eq!(decode_html_entities("&bogus; &#xZZ;").unwrap(), "&bogus; &#xZZ;");
    }
}
