//! Core logic for daily note maintenance: todo migration and weekly archiving.

pub mod archive;
pub mod config;
pub mod insert;
pub mod migrate;
pub mod note;
pub mod screenshot;
pub mod todo;
pub mod week;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}


#[cfg(test)]
mod tests {
    use super::version;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
