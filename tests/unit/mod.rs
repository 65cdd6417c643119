// Unit tests against the public library API, one file per area
mod entry_rules;
mod scheduling;
mod streaks;
