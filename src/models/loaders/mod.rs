pub mod toml_loader;

pub use toml_loader::{load_author_form, parse_author_form, AuthorForm};
