/// Error types that can be built from a plain message.
///
/// Implement it for a crate's `Error`, then invoke [`impl_context!`] next to
/// it to get `.context()` and `.with_context()` on `Result` and `Option`.
pub trait FromMessage: Sized {
    fn from_message(message: String) -> Self;
}

/// Generate a crate-local `Context` trait.
///
/// Expects `Error: FromMessage` and `type Result<T>` in the invoking module.
///
/// ```ignore
/// // in crates/foo/src/error.rs
/// shelter_common::impl_context!();
/// ```
#[macro_export]
macro_rules! impl_context {
    () => {
        /// Attach a message to a failure, converting it into this crate's `Error`.
        pub trait Context<T>: Sized {
            fn with_context<C: Into<String>>(self, f: impl FnOnce() -> C) -> Result<T>;

            fn context(self, context: impl Into<String>) -> Result<T> {
                self.with_context(|| context)
            }
        }

        impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
            fn with_context<C: Into<String>>(self, f: impl FnOnce() -> C) -> Result<T> {
                self.map_err(|source| {
                    <Error as $crate::FromMessage>::from_message(format!(
                        "{}: {source}",
                        f().into()
                    ))
                })
            }
        }

        impl<T> Context<T> for Option<T> {
            fn with_context<C: Into<String>>(self, f: impl FnOnce() -> C) -> Result<T> {
                self.ok_or_else(|| <Error as $crate::FromMessage>::from_message(f().into()))
            }
        }
    };
}
