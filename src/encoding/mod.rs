pub mod params;

pub use params::{collect_params, encode, encode_params, encode_with_prefix, EncodedParam};
