mod core;


pub use self::core::{
    ALPHABET, DecodeOptions, InvalidSymbols, OverflowPolicy, decode, decode_with,
    decoded_len_max, encode, encoded_len,
};
