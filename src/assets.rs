//! Image assets: decoding/encoding helpers and the cached intro background pool.

pub mod backgrounds;
pub mod decode;
