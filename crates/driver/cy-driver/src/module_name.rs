//! Module names derived from source file names

use crate::error::{DriverError, Result};
use std::path::Path;

/// Source files must end in `.cyr`
pub fn check_input_extension(path: &Path) -> Result<()> {
    match path.extension() {
        Some(ext) if ext == "cyr" => Ok(()),
        _ => Err(DriverError::InputExtension {
            path: path.to_path_buf(),
        }),
    }
}

/// The module name of `path` is its file stem
pub fn module_name_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DriverError::MissingModuleName {
            path: path.to_path_buf(),
        })
}

/// Accepts ASCII alphanumerics, `_` and `::` separators
///
/// A lone `:` is rejected, as is an empty name.
pub fn validate_module_name(module: &str, file: &Path) -> Result<()> {
    let invalid = || DriverError::InvalidModuleName {
        module: module.to_string(),
        file: file.to_path_buf(),
    };

    if module.is_empty() {
        return Err(invalid());
    }
    let charset_ok = module
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':');
    let separators_ok = module.split("::").all(|segment| !segment.contains(':'));
    if charset_ok && separators_ok {
        Ok(())
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_valid_module_names() {
        for name in ["main", "my_module", "std::io", "v2", "a::b::c"] {
            assert!(validate_module_name(name, Path::new("x.cyr")).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_invalid_module_names() {
        for name in ["my-module", "a:b", "a:::b", "caf\u{e9}", "with space", ""] {
            assert!(validate_module_name(name, Path::new("x.cyr")).is_err(), "{name}");
        }

        let err = validate_module_name("my-module", Path::new("src/my-module.cyr")).unwrap_err();
        expect![[r#"Module name 'my-module' in file 'src/my-module.cyr' contains invalid characters. Only alphanumeric characters, underscores, and double colons are allowed."#]]
            .assert_eq(&err.to_string());
    }

    #[test]
    fn test_module_name_is_file_stem() {
        assert_eq!(module_name_from_path(Path::new("src/hello.cyr")).unwrap(), "hello");
        assert_eq!(module_name_from_path(Path::new("archive.tar.cyr")).unwrap(), "archive.tar");
        assert!(module_name_from_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_input_extension() {
        assert!(check_input_extension(Path::new("main.cyr")).is_ok());
        assert!(check_input_extension(Path::new("main.rs")).is_err());
        assert!(check_input_extension(Path::new("main")).is_err());
    }
}
