mod core;


pub use self::core::{ENTITY_LEN, encode, encoded_len, entity};
