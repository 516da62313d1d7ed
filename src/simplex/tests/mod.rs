//! Property-based tests for the simplex components

mod prop_projection;
