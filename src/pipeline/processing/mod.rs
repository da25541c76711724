// Per-record processing stages: text normalization, classification,
// confidence gating. All pure relative to a fixed lexicon snapshot.

pub mod classify;
pub mod normalize;
pub mod quality_gate;
