

// Priority 3 — randomised properties
mod tests_properties;
