//! Source location capture for trace entries.
//!
//! Locations are resolved with `#[track_caller]`: every public entry point on
//! the path from a call site down to [`Locator::capture`] carries the
//! attribute, so the reported location is always the first frame outside the
//! tracer. There is no frame counting to keep in sync with the call depth.

use std::fmt;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Where a trace entry was recorded.
///
/// A zero value (empty strings, line 0) means the location is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    /// Source file, relative to the locator's base directory when possible.
    pub file: String,

    /// Fully-qualified function name, empty if the call site did not supply one.
    pub function: String,

    /// 1-based line number.
    pub line: u32,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Resolves caller locations into [`Source`] values.
#[derive(Debug, Clone, Default)]
pub struct Locator {
    base_dir: Option<PathBuf>,
}

impl Locator {
    /// Creates a locator that makes file paths relative to `base_dir`.
    ///
    /// With no base directory, paths are reported exactly as the compiler
    /// recorded them.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// The directory paths are made relative to.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Captures the location of the caller.
    ///
    /// `function` is recorded as-is; use [`function_name!`](crate::function_name)
    /// at the call site to obtain it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dabug::source::Locator;
    /// let locator = Locator::new(None);
    /// let source = locator.capture("demo::main");
    /// assert_eq!(source.file, file!());
    /// assert_eq!(source.line, line!() - 2);
    /// assert_eq!(source.function, "demo::main");
    /// ```
    #[track_caller]
    pub fn capture(&self, function: &str) -> Source {
        let location = Location::caller();
        self.resolve(location.file(), location.line(), function)
    }

    /// Builds a [`Source`] from an already known location.
    pub fn resolve(&self, file: &str, line: u32, function: &str) -> Source {
        let file = match &self.base_dir {
            Some(base_dir) => normalize_path(file, base_dir),
            None => file.to_owned(),
        };

        Source {
            file,
            function: function.to_owned(),
            line,
        }
    }
}

/// Makes `file` relative to `base_dir`.
///
/// The base directory is stripped component-wise along with any leading
/// separator. Paths outside `base_dir` are returned unchanged.
///
/// # Examples
///
/// ```
/// # use dabug::source::normalize_path;
/// # use std::path::Path;
/// let base = Path::new("/home/dev/project");
/// assert_eq!(normalize_path("/home/dev/project/src/main.rs", base), "src/main.rs");
/// assert_eq!(normalize_path("/opt/other/lib.rs", base), "/opt/other/lib.rs");
/// ```
pub fn normalize_path(file: &str, base_dir: &Path) -> String {
    if base_dir.as_os_str().is_empty() {
        return file.to_owned();
    }

    match Path::new(file).strip_prefix(base_dir) {
        Ok(relative) => relative
            .to_string_lossy()
            .trim_start_matches(std::path::is_separator)
            .to_owned(),
        Err(_) => file.to_owned(),
    }
}

/// Expands to the fully-qualified name of the enclosing function.
///
/// Closures report the function that defines them.
///
/// ```
/// fn outer() -> &'static str {
///     dabug::function_name!()
/// }
/// assert!(outer().ends_with("outer"));
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __dabug_here() {}
        fn __dabug_type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let mut name = __dabug_type_name_of(__dabug_here);
        name = name.strip_suffix("::__dabug_here").unwrap_or(name);
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        name
    }};
}
