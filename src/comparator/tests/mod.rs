mod tests_separator;

// Priority 2 — multi-version layout
mod tests_multi_version;
