//! Test constants shared across end-to-end tests

pub const TEST_API_KEY: &str = "test-api-key";

pub const TEST_EMAIL: &str = "player@example.com";
pub const TEST_PASS: &str = "p4ssw0rd";
pub const TEST_NAME: &str = "Baahubali Fan";

pub const OTHER_EMAIL: &str = "rival@example.com";
pub const OTHER_PASS: &str = "rival-pass";

/// Titles served on every fake catalog page, in page order.
pub const TAMIL_TITLES: [&str; 6] = ["Leo", "Jailer", "Vikram", "Master", "Kaithi", "Asuran"];

/// Fixed seed so session randomness is reproducible.
pub const TEST_SEED: u64 = 42;
