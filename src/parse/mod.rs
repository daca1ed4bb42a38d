//! Text formats that carry shape parameters.

pub mod layer_csv;

pub use layer_csv::{
    DEFAULT_SEED, LayerSpec, ParseError, ParseResult, decode_html_entities, key_length,
    parse_layers, parse_layers_with_seed, select_layer,
};
