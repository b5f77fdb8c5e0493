//! LZ-string-style dictionary compression, the wire codec for the
//! challenge script and the beacon payload (spec.md §6).

pub mod lz;
