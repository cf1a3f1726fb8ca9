//! Configuration access port trait.

/// Numeric run settings looked up by INI section and key.
pub trait ConfigPort {
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
}
