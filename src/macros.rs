// src/macros.rs

/// `String` shorthand.
///
/// - `s!()` is an empty string
/// - `s!(x)` is `String::from(x)`
/// - `s!("{} of {}", a, b)` formats
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
    ($fmt:literal, $($arg:tt)+) => {
        ::std::format!($fmt, $($arg)+)
    };
}

/// Concatenate string slices into one `String`.
#[macro_export]
macro_rules! join {
    ($($part:expr),+ $(,)?) => {{
        let mut out = ::std::string::String::new();
        $(
            out.push_str($part);
        )+
        out
    }};
}
