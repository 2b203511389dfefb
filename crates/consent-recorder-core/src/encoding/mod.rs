mod encoder;
mod format;

pub use {
    encoder::{Encoder, EncoderBackend, EncoderError, EncoderEvent, EncoderSink},
    format::{EncodingFormat, FormatParseError, default_format_preferences, negotiate_format},
};
