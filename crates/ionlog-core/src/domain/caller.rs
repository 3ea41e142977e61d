//! Call-site metadata
//!
//! A [`CallerInfo`] identifies where a log statement lives in source. It is
//! resolved at compile time by the [`caller!`](crate::caller) macro, so no
//! stack walking happens on the hot path.

use serde::{Deserialize, Serialize};

/// The (package, function, file, line) tuple of a log call site
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerInfo {
    /// Last segment of the module path (e.g. `rotation` for `ionlog_core::rotation`)
    pub package: String,
    /// Name of the enclosing function, closures stripped
    pub function: String,
    /// File name without directories
    pub file: String,
    /// Line number
    pub line: u32,
}

impl CallerInfo {
    /// Build caller info from the raw values produced by the `caller!` macro.
    ///
    /// `function_path` is the type name of a probe fn nested in the caller,
    /// e.g. `my_crate::net::connect::{{closure}}::__probe`.
    pub fn resolve(module_path: &str, function_path: &str, file: &str, line: u32) -> Self {
        Self {
            package: last_segment(module_path).to_string(),
            function: function_name(function_path).to_string(),
            file: file_name(file).to_string(),
            line,
        }
    }

    /// Build caller info from explicit parts
    pub fn new(
        package: impl Into<String>,
        function: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            package: package.into(),
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    /// Key identifying the call site in the record history.
    ///
    /// Fields are NUL separated so distinct sites never share a key.
    pub fn site_key(&self) -> String {
        format!("{}\0{}\0{}\0{}", self.package, self.function, self.file, self.line)
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

fn function_name(path: &str) -> &str {
    let path = path.strip_suffix("::__probe").unwrap_or(path);
    path.split("::")
        .filter(|segment| !segment.starts_with("{{"))
        .last()
        .unwrap_or(path)
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Resolve the [`CallerInfo`] of the current call site.
#[macro_export]
macro_rules! caller {
    () => {{
        fn __probe() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::CallerInfo::resolve(
            module_path!(),
            __type_name_of(__probe),
            file!(),
            line!(),
        )
    }};
}
