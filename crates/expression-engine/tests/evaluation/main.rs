//! Evaluation tests against record-shaped and map-shaped arguments

mod records;
