mod core;


pub use self::core::{ESCAPE_LEN, decode, decoded_len_max, encode, encoded_len, is_unreserved};
